//! Drag-and-drop matching minigame.
//!
//! The controller listens for `Started` on the minigame bus, builds a
//! `MinigameSession` from the registry and switches to `GameState::Minigame`
//! (virtual time frozen). Placements are validated by the session; the
//! first placement that fills every zone publishes `Completed` and schedules
//! the panel to close after a real-time delay. Closing, whether scheduled
//! or by Escape, publishes `Closed` and returns to `Playing`.

use bevy::prelude::*;

use crate::data::{GameConfig, MinigameDefinition, MinigameRegistry};
use crate::shared::*;

mod drag;
mod render;
mod session;

pub use drag::{
    hit_test, rect_contains, DropZoneSlot, Dragging, MinigameItem, MinigamePanel,
    PlacementAttemptEvent,
};
pub use render::{zone_color, ZoneFeedback};
pub use session::{MinigameSession, Placement, RejectReason};

#[derive(Resource, Debug, Default)]
pub struct MinigameController {
    mailbox: Option<SubscriptionId>,
    session: Option<MinigameSession>,
    npc: Option<Entity>,
    closing: Option<Delay>,
}

impl MinigameController {
    pub fn session(&self) -> Option<&MinigameSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_some()
    }

    /// The NPC that asked for the open puzzle, if any.
    pub fn npc(&self) -> Option<Entity> {
        self.npc
    }

    /// Start a session. Refused while another one is open.
    pub fn open(&mut self, definition: MinigameDefinition, npc: Option<Entity>) -> bool {
        if self.is_open() {
            return false;
        }
        self.session = Some(MinigameSession::new(definition));
        self.npc = npc;
        self.closing = None;
        true
    }

    /// Validate a placement. `None` when no session accepts input (closed,
    /// or already counting down to close).
    pub fn place(&mut self, item: &str, zone: &str) -> Option<Placement> {
        if self.closing.is_some() {
            return None;
        }
        self.session.as_mut().map(|session| session.place(item, zone))
    }

    pub fn schedule_close(&mut self, secs: f32) {
        if self.is_open() && self.closing.is_none() {
            self.closing = Some(Delay::new(secs));
        }
    }

    /// Advance the close countdown; `true` once it has run out.
    pub fn tick_close(&mut self, dt: f32) -> bool {
        self.closing
            .as_mut()
            .is_some_and(|delay| delay.advance(dt).is_finished())
    }

    /// End the session, returning the id of the puzzle that was open.
    pub fn close(&mut self) -> Option<MinigameId> {
        self.closing = None;
        self.npc = None;
        self.session
            .take()
            .map(|session| session.definition().id.clone())
    }

    /// Clear every zone of the open session. Not available once the
    /// puzzle is complete.
    pub fn restart(&mut self) -> bool {
        if self.closing.is_some() {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => {
                session.reset();
                true
            }
            None => false,
        }
    }

    /// Drop any session without publishing anything. Used on scene loads.
    pub fn reset(&mut self) {
        self.session = None;
        self.npc = None;
        self.closing = None;
    }
}

pub struct MinigamePlugin;

impl Plugin for MinigamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MinigameBus>()
            .init_resource::<MinigameController>()
            .add_event::<PlacementAttemptEvent>();

        let mailbox = app
            .world_mut()
            .resource_mut::<MinigameBus>()
            .subscribe_mailbox();
        app.world_mut().resource_mut::<MinigameController>().mailbox = Some(mailbox);

        app.add_systems(
            Update,
            (reset_on_scene_load, open_requested_minigames).chain(),
        )
            .add_systems(
                OnEnter(GameState::Minigame),
                (pause_game_time, render::spawn_panel),
            )
            .add_systems(
                OnExit(GameState::Minigame),
                (resume_game_time, render::despawn_panel),
            )
            .add_systems(
                Update,
                (
                    drag::begin_drag,
                    drag::drag_items,
                    drag::end_drag,
                    resolve_placements,
                    restart_on_request,
                    render::tick_zone_feedback,
                    render::color_zones,
                    close_when_due,
                    cancel_on_escape,
                )
                    .chain()
                    .run_if(in_state(GameState::Minigame)),
            );
    }
}

/// A scene load drops any open session without publishing `Closed`; the
/// NPCs that asked for it are gone with the old scene.
fn reset_on_scene_load(
    mut loaded: EventReader<SceneLoadedEvent>,
    mut controller: ResMut<MinigameController>,
) {
    if loaded.read().count() == 0 {
        return;
    }
    if let Some(session) = controller.session() {
        info!("[Minigame] Scene changed, dropping '{}'", session.id());
    }
    controller.reset();
}

fn open_requested_minigames(
    mut bus: ResMut<MinigameBus>,
    mut controller: ResMut<MinigameController>,
    registry: Res<MinigameRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mailbox) = controller.mailbox else {
        return;
    };
    for event in bus.drain(mailbox) {
        let MinigameEvent::Started { minigame, npc } = event else {
            continue;
        };

        let Some(definition) = registry.get(&minigame) else {
            warn!("[Minigame] No definition for '{minigame}', closing immediately");
            bus.publish(MinigameEvent::Closed { minigame });
            continue;
        };

        if !controller.open(definition.clone(), npc) {
            warn!("[Minigame] '{minigame}' requested while another minigame is open");
            let open_id = controller.session().map(|s| s.id().to_string());
            if open_id.as_deref() != Some(minigame.as_str()) {
                bus.publish(MinigameEvent::Closed { minigame });
            }
            continue;
        }
        next_state.set(GameState::Minigame);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_placements(
    mut commands: Commands,
    mut attempts: EventReader<PlacementAttemptEvent>,
    mut controller: ResMut<MinigameController>,
    mut bus: ResMut<MinigameBus>,
    mut audio: ResMut<Audio>,
    config: Res<GameConfig>,
    mut items: Query<(&mut MinigameItem, &mut Transform)>,
    zones: Query<(Entity, &DropZoneSlot, &Transform), Without<MinigameItem>>,
) {
    for attempt in attempts.read() {
        let Some(session) = controller.session() else {
            continue;
        };
        let id = session.id().to_string();
        let success_sound = session.definition().success_sound.clone();
        let fail_sound = session.definition().fail_sound.clone();

        let outcome = attempt
            .zone
            .as_deref()
            .and_then(|zone| controller.place(&attempt.item, zone));
        let zone_slot = attempt
            .zone
            .as_deref()
            .and_then(|zone| zones.iter().find(|(_, slot, _)| slot.id == zone));

        let item = items
            .iter_mut()
            .find(|(item, _)| item.id == attempt.item);

        match outcome {
            Some(placement) if placement.is_accepted() => {
                if let (Some((mut item, mut tf)), Some((_, _, zone_tf))) = (item, zone_slot) {
                    item.placed = true;
                    tf.translation.x = zone_tf.translation.x;
                    tf.translation.y = zone_tf.translation.y;
                }
                if placement == Placement::Completed {
                    info!("[Minigame] '{id}' completed");
                    if let Some(sound) = &success_sound {
                        audio.play_effect(sound);
                    }
                    bus.publish(MinigameEvent::Completed {
                        minigame: id,
                        success: true,
                    });
                    controller.schedule_close(config.minigame_close_delay);
                } else {
                    audio.play_effect(SFX_COLLECTABLE);
                }
            }
            Some(Placement::Rejected(reason)) => {
                debug!("[Minigame] '{}' rejected: {reason:?}", attempt.item);
                if let Some(sound) = &fail_sound {
                    audio.play_effect(sound);
                }
                if let Some((zone_entity, _, _)) = zone_slot {
                    commands
                        .entity(zone_entity)
                        .insert(ZoneFeedback(Delay::new(config.rejection_flash)));
                }
                snap_back(item);
            }
            _ => snap_back(item),
        }
    }
}

fn snap_back(item: Option<(Mut<MinigameItem>, Mut<Transform>)>) {
    if let Some((item, mut tf)) = item {
        tf.translation.x = item.start.x;
        tf.translation.y = item.start.y;
    }
}

fn restart_on_request(
    mut commands: Commands,
    input: Res<PlayerInput>,
    mut controller: ResMut<MinigameController>,
    mut items: Query<(Entity, &mut MinigameItem, &mut Transform)>,
) {
    if !input.restart || !controller.restart() {
        return;
    }
    for (entity, mut item, mut tf) in &mut items {
        item.placed = false;
        tf.translation.x = item.start.x;
        tf.translation.y = item.start.y;
        commands.entity(entity).remove::<Dragging>();
    }
    info!("[Minigame] Restarted");
}

fn close_when_due(
    time: Res<Time<Real>>,
    mut controller: ResMut<MinigameController>,
    mut bus: ResMut<MinigameBus>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if controller.tick_close(time.delta_secs()) {
        close_minigame(&mut controller, &mut bus, &mut next_state);
    }
}

fn cancel_on_escape(
    input: Res<PlayerInput>,
    mut controller: ResMut<MinigameController>,
    mut bus: ResMut<MinigameBus>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.ui_cancel {
        close_minigame(&mut controller, &mut bus, &mut next_state);
    }
}

fn close_minigame(
    controller: &mut MinigameController,
    bus: &mut MinigameBus,
    next_state: &mut NextState<GameState>,
) {
    if let Some(minigame) = controller.close() {
        info!("[Minigame] Closed '{minigame}'");
        bus.publish(MinigameEvent::Closed { minigame });
        next_state.set(GameState::Playing);
    }
}
