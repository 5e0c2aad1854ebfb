//! The player character: spawned with the World scene, moved by
//! `PlayerInput`, followed by the camera.

mod camera;
mod movement;
mod spawn;

use bevy::prelude::*;

use crate::shared::*;

pub use movement::{apply_move, facing_right, WORLD_HALF_EXTENT};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spawn::spawn_player);

        app.add_systems(
            Update,
            (
                movement::player_movement.in_set(PlayerMotion),
                camera::camera_follow_player,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
