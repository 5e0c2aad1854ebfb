//! World layout: where the player, companions and tower stand.

use bevy::prelude::*;
use serde::Deserialize;

use super::DataError;
use crate::shared::*;

pub const DEFAULT_WORLD: &str = include_str!("../../assets/data/world.ron");

fn default_npc_color() -> (f32, f32, f32) {
    (0.8, 0.8, 0.8)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NpcPlacement {
    pub name: String,
    pub position: (f32, f32),
    pub minigame: MinigameId,
    /// Line shown once the NPC's minigame is solved.
    pub dialogue: String,
    /// Overrides `GameConfig::interaction_range` for this NPC.
    #[serde(default)]
    pub interaction_range: Option<f32>,
    #[serde(default = "default_npc_color")]
    pub color: (f32, f32, f32),
}

impl NpcPlacement {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }

    pub fn color(&self) -> Color {
        let (r, g, b) = self.color;
        Color::srgb(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TowerPlacement {
    pub position: (f32, f32),
    pub trigger_radius: f32,
    /// Final radius of the tower's colour sphere.
    pub sphere_radius: f32,
    pub next_scene: String,
}

impl TowerPlacement {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
pub struct WorldLayout {
    pub player_start: (f32, f32),
    pub npcs: Vec<NpcPlacement>,
    pub tower: TowerPlacement,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            player_start: (0.0, 0.0),
            npcs: Vec::new(),
            tower: TowerPlacement {
                position: (0.0, 300.0),
                trigger_radius: 64.0,
                sphere_radius: 400.0,
                next_scene: SceneId::VideoEnd.name().to_string(),
            },
        }
    }
}

impl WorldLayout {
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.player_start.0, self.player_start.1)
    }
}

pub fn parse_world(source: &str) -> Result<WorldLayout, DataError> {
    ron::from_str(source).map_err(|err| DataError::Parse {
        source_name: "world".into(),
        message: err.to_string(),
    })
}
