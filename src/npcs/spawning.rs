//! NPC spawning for the World scene.

use bevy::prelude::*;

use super::state::NpcRecord;
use crate::data::{GameConfig, WorldLayout};
use crate::shared::*;

/// The NPC's mailbox on the minigame bus. Dropped from the bus when the
/// component is removed.
#[derive(Component, Debug, Clone, Copy)]
pub struct MinigameSubscription(pub SubscriptionId);

const NPC_SPRITE_SIZE: f32 = 24.0;

/// System: place every NPC from the world layout once the World scene loads.
pub fn spawn_world_npcs(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoadedEvent>,
    layout: Res<WorldLayout>,
    config: Res<GameConfig>,
    mut bus: ResMut<MinigameBus>,
) {
    if !loaded.read().any(|ev| ev.scene == SceneId::World) {
        return;
    }

    for placement in &layout.npcs {
        let range = placement
            .interaction_range
            .unwrap_or(config.interaction_range);
        let record = NpcRecord::new(
            placement.name.clone(),
            placement.minigame.clone(),
            placement.dialogue.clone(),
            range,
            config.npc_collision_radius,
        );
        let subscription = bus.subscribe_mailbox();
        let pos = placement.position();
        let color = placement.color();

        commands.spawn((
            record,
            MinigameSubscription(subscription),
            Sprite::from_color(color, Vec2::splat(NPC_SPRITE_SIZE)),
            Transform::from_xyz(pos.x, pos.y, Z_ACTORS),
            Tinted { base: color },
            SceneEntity,
            Name::new(format!("Npc {}", placement.name)),
        ));
    }

    info!("[Npcs] Spawned {} NPCs", layout.npcs.len());
}

/// Observer: a despawned NPC stops receiving minigame events.
pub fn unsubscribe_on_remove(
    trigger: Trigger<OnRemove, MinigameSubscription>,
    subscriptions: Query<&MinigameSubscription>,
    mut bus: ResMut<MinigameBus>,
) {
    if let Ok(subscription) = subscriptions.get(trigger.entity()) {
        bus.unsubscribe(subscription.0);
    }
}
