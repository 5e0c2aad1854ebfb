use bevy::prelude::*;

use crate::data::{GameConfig, WorldLayout};
use crate::shared::*;

const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 32.0);
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.5, 0.8);

/// Spawn the player when the World scene comes up. Scene teardown removes
/// it again, so there is never more than one.
pub fn spawn_player(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoadedEvent>,
    layout: Res<WorldLayout>,
    config: Res<GameConfig>,
    existing: Query<Entity, With<Player>>,
) {
    for event in loaded.read() {
        if event.scene != SceneId::World {
            continue;
        }
        if !existing.is_empty() {
            warn!("[Player] Player already present, skipping spawn");
            continue;
        }

        let start = layout.player_start();
        commands.spawn((
            Player {
                speed: config.player_speed,
                ..default()
            },
            Sprite::from_color(PLAYER_COLOR, PLAYER_SIZE),
            Transform::from_xyz(start.x, start.y, Z_ACTORS + 1.0),
            Tinted { base: PLAYER_COLOR },
            SceneEntity,
            Name::new("Player"),
        ));
        info!("[Player] Spawned at {start}");
    }
}
