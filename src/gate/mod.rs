//! The tower gate at the end of the World scene.
//!
//! Walking into the tower's trigger radius either warns the player (not all
//! companions recruited) or asks for confirmation. Confirming plays the
//! tower sound, grows the tower's colour sphere and schedules the next scene
//! after a short delay. The schedule fires exactly once per scene load.

use bevy::prelude::*;

use crate::data::{GameConfig, WorldLayout};
use crate::npcs::NpcRecord;
use crate::scenes::SceneOrchestrator;
use crate::shared::*;

mod controller;

pub use controller::{GateController, GateResponse};

pub const WARNING_MESSAGE: &str = "Complete all tasks first!";
pub const CONFIRM_MESSAGE: &str = "Everyone is with you. Awaken the tower?";
pub const ACTIVATED_MESSAGE: &str = "Tower activated! Proceeding to next area...";

const TOWER_SIZE: Vec2 = Vec2::new(48.0, 96.0);
const TOWER_COLOR: Color = Color::srgb(0.75, 0.7, 0.9);

#[derive(Component, Debug, Clone)]
pub struct Tower {
    pub trigger_radius: f32,
    pub sphere_radius: f32,
    pub next_scene: String,
    pub player_inside: bool,
}

/// Asks the UI to show a gate message.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePromptEvent {
    Warning,
    Confirm,
    Activated,
}

/// The player's answer to the confirmation prompt.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecisionEvent {
    pub confirmed: bool,
}

pub struct GatePlugin;

impl Plugin for GatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GateController>()
            .add_event::<GatePromptEvent>()
            .add_event::<GateDecisionEvent>()
            .add_systems(
                Update,
                (
                    reset_on_scene_load,
                    refresh_gate,
                    detect_tower_entry.run_if(in_state(GameState::Playing)),
                    apply_gate_decision,
                    tick_scene_transition.run_if(resource_exists::<PendingSceneTransition>),
                )
                    .chain(),
            );
    }
}

fn reset_on_scene_load(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoadedEvent>,
    mut gate: ResMut<GateController>,
    layout: Res<WorldLayout>,
) {
    for event in loaded.read() {
        gate.reset();
        if event.scene != SceneId::World {
            continue;
        }
        let tower = &layout.tower;
        let pos = tower.position();
        commands.spawn((
            Tower {
                trigger_radius: tower.trigger_radius,
                sphere_radius: tower.sphere_radius,
                next_scene: tower.next_scene.clone(),
                player_inside: false,
            },
            Sprite::from_color(TOWER_COLOR, TOWER_SIZE),
            Transform::from_xyz(pos.x, pos.y, Z_ACTORS),
            Tinted { base: TOWER_COLOR },
            SceneEntity,
            Name::new("Tower"),
        ));
    }
}

fn refresh_gate(mut gate: ResMut<GateController>, npcs: Query<&NpcRecord>) {
    let total = npcs.iter().count();
    let following = npcs.iter().filter(|npc| npc.is_following()).count();
    if gate.following() != following || gate.total() != total {
        gate.refresh(following, total);
        if gate.is_ready() {
            info!("[Gate] All {total} companions following, tower is ready");
        }
    }
}

fn detect_tower_entry(
    mut gate: ResMut<GateController>,
    mut prompts: EventWriter<GatePromptEvent>,
    mut next_state: ResMut<NextState<GameState>>,
    player_q: Query<&Transform, With<Player>>,
    mut towers: Query<(&mut Tower, &Transform), Without<Player>>,
) {
    let Ok(player_tf) = player_q.get_single() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    for (mut tower, tf) in &mut towers {
        let inside = tf.translation.truncate().distance(player_pos) <= tower.trigger_radius;
        let entered = inside && !tower.player_inside;
        tower.player_inside = inside;
        if !entered {
            continue;
        }

        match gate.on_player_enter() {
            GateResponse::Warning => {
                info!(
                    "[Gate] Not ready: {}/{} following",
                    gate.following(),
                    gate.total()
                );
                prompts.send(GatePromptEvent::Warning);
            }
            GateResponse::Confirm => {
                prompts.send(GatePromptEvent::Confirm);
                next_state.set(GameState::TowerPrompt);
            }
            GateResponse::Ignored => {}
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_gate_decision(
    mut commands: Commands,
    mut decisions: EventReader<GateDecisionEvent>,
    mut gate: ResMut<GateController>,
    mut audio: ResMut<Audio>,
    mut prompts: EventWriter<GatePromptEvent>,
    config: Res<GameConfig>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    towers: Query<(&Tower, &Transform)>,
) {
    for decision in decisions.read() {
        if *state.get() == GameState::TowerPrompt {
            next_state.set(GameState::Playing);
        }
        if !decision.confirmed {
            info!("[Gate] Activation cancelled");
            gate.cancel();
            continue;
        }
        if !gate.confirm() {
            debug!("[Gate] Confirmation ignored, tower not ready or already triggered");
            continue;
        }

        info!("[Gate] Tower activated");
        audio.play_effect(SFX_TOWER_TRIGGER);
        prompts.send(GatePromptEvent::Activated);

        let Ok((tower, tf)) = towers.get_single() else {
            warn!("[Gate] No tower in scene, loading next scene without effects");
            commands.insert_resource(PendingSceneTransition {
                scene: SceneId::VideoEnd.name().to_string(),
                delay: Delay::new(config.gate_delay),
            });
            continue;
        };

        let target = tower.sphere_radius;
        commands.spawn((
            ColorSphere {
                radius: 0.0,
                fade_width: config.sphere_fade_width,
            },
            SphereGrowth {
                growth: Growth::new(0.0, target, config.sphere_grow_speed),
                then_pulse: Some(Pulse::new(target * 0.9, target * 1.1, config.pulse_speed)),
            },
            Transform::from_translation(tf.translation.with_z(Z_EFFECTS)),
            SceneEntity,
        ));
        commands.insert_resource(PendingSceneTransition {
            scene: tower.next_scene.clone(),
            delay: Delay::new(config.gate_delay),
        });
    }
}

fn tick_scene_transition(
    mut commands: Commands,
    time: Res<Time>,
    mut pending: ResMut<PendingSceneTransition>,
    mut scenes: SceneOrchestrator,
) {
    if !pending.delay.advance(time.delta_secs()).is_finished() {
        return;
    }
    commands.remove_resource::<PendingSceneTransition>();
    info!("[Gate] Loading '{}'", pending.scene);
    scenes.load_named(&pending.scene);
}
