//! Gameplay tunables.

use bevy::prelude::*;
use serde::Deserialize;

use super::DataError;

pub const DEFAULT_CONFIG: &str = include_str!("../../assets/config/game.ron");

/// Environment variable naming an optional RON file that overrides the
/// bundled tunables.
pub const CONFIG_ENV: &str = "RESONANCE_CONFIG";

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Scene requested once data has loaded.
    pub start_scene: String,
    pub player_speed: f32,
    /// Default NPC interaction range in world units.
    pub interaction_range: f32,
    pub npc_collision_radius: f32,
    /// Extra gap kept between a companion and the player.
    pub follow_margin: f32,
    /// Speed cap for companions, units per second.
    pub follow_speed: f32,
    /// Real-time seconds between completion and the panel closing.
    pub minigame_close_delay: f32,
    pub rejection_flash: f32,
    /// Seconds between tower confirmation and the scene load.
    pub gate_delay: f32,
    pub warning_fade: f32,
    pub warning_hold: f32,
    pub sphere_grow_speed: f32,
    pub npc_sphere_radius: f32,
    pub sphere_fade_width: f32,
    pub pulse_speed: f32,
    pub intro_duration: f32,
    pub cutscene_duration: f32,
    pub cutscene_end_delay: f32,
    pub main_menu_music: String,
    pub world_music: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_scene: "MainMenu".into(),
            player_speed: 160.0,
            interaction_range: 56.0,
            npc_collision_radius: 12.0,
            follow_margin: 10.0,
            follow_speed: 150.0,
            minigame_close_delay: 1.0,
            rejection_flash: 0.5,
            gate_delay: 2.0,
            warning_fade: 0.5,
            warning_hold: 3.0,
            sphere_grow_speed: 120.0,
            npc_sphere_radius: 72.0,
            sphere_fade_width: 24.0,
            pulse_speed: 1.0,
            intro_duration: 8.0,
            cutscene_duration: 10.0,
            cutscene_end_delay: 2.0,
            main_menu_music: "main_menu".into(),
            world_music: "world".into(),
        }
    }
}

pub fn parse_config(source: &str) -> Result<GameConfig, DataError> {
    ron::from_str(source).map_err(|err| DataError::Parse {
        source_name: "config".into(),
        message: err.to_string(),
    })
}

/// Bundled tunables, replaced by the file named in `RESONANCE_CONFIG` when
/// that variable is set. Any failure keeps the bundled values.
pub fn load_config() -> GameConfig {
    let mut config = match parse_config(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            error!("[Data] Bundled config is broken: {err}");
            GameConfig::default()
        }
    };

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        match read_override(&path) {
            Ok(overridden) => {
                info!("[Data] Using config override from {path}");
                config = overridden;
            }
            Err(err) => warn!("[Data] Ignoring config override: {err}"),
        }
    }
    config
}

fn read_override(path: &str) -> Result<GameConfig, DataError> {
    let text = std::fs::read_to_string(path).map_err(|err| DataError::Io {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    parse_config(&text)
}
