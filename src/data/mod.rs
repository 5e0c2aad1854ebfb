//! Data layer: authored puzzles, world layout and tunables.
//!
//! Everything is RON embedded at compile time. `DataPlugin` parses it in
//! `OnEnter(GameState::Loading)`, then asks the scene loader for the start
//! scene. Other domains read the resulting resources once the game has left
//! `Loading`.

mod config;
mod minigames;
mod world;

pub use config::*;
pub use minigames::*;
pub use world::*;

use std::fmt;

use bevy::prelude::*;

use crate::shared::*;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    Parse { source_name: String, message: String },
    Invalid { id: String, reason: String },
    Io { path: String, message: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Parse {
                source_name,
                message,
            } => write!(f, "failed to parse {source_name} data: {message}"),
            DataError::Invalid { id, reason } => write!(f, "'{id}' is invalid: {reason}"),
            DataError::Io { path, message } => write!(f, "cannot read {path}: {message}"),
        }
    }
}

impl std::error::Error for DataError {}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MinigameRegistry>()
            .init_resource::<WorldLayout>()
            .init_resource::<GameConfig>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

fn load_all_data(
    mut registry: ResMut<MinigameRegistry>,
    mut layout: ResMut<WorldLayout>,
    mut config: ResMut<GameConfig>,
    mut loader: ResMut<Loader>,
) {
    info!("[Data] Loading game data…");

    *config = load_config();

    let added = populate_minigames(&mut registry, DEFAULT_MINIGAMES);
    info!("[Data]   Minigames loaded: {added}");

    match parse_world(DEFAULT_WORLD) {
        Ok(parsed) => *layout = parsed,
        Err(err) => error!("[Data] {err}"),
    }
    for npc in &layout.npcs {
        if registry.get(&npc.minigame).is_none() {
            warn!(
                "[Data] NPC '{}' references unknown minigame '{}'",
                npc.name, npc.minigame
            );
        }
    }
    info!("[Data]   NPCs placed: {}", layout.npcs.len());

    loader.load(&config.start_scene);
}
