//! Minigame definitions: authored matching puzzles.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use serde::Deserialize;

use super::DataError;
use crate::shared::*;

pub const DEFAULT_MINIGAMES: &str = include_str!("../../assets/data/minigames.ron");

fn default_item_size() -> (f32, f32) {
    (80.0, 80.0)
}

fn default_zone_size() -> (f32, f32) {
    (100.0, 100.0)
}

fn default_background() -> (f32, f32, f32) {
    (0.2, 0.2, 0.25)
}

fn default_item_color() -> (f32, f32, f32) {
    (0.9, 0.9, 0.9)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub correct_zone: ZoneId,
    pub start: (f32, f32),
    #[serde(default = "default_item_size")]
    pub size: (f32, f32),
    #[serde(default = "default_item_color")]
    pub color: (f32, f32, f32),
}

impl ItemDefinition {
    pub fn start(&self) -> Vec2 {
        Vec2::new(self.start.0, self.start.1)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneDefinition {
    pub id: ZoneId,
    pub position: (f32, f32),
    #[serde(default = "default_zone_size")]
    pub size: (f32, f32),
}

impl ZoneDefinition {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.size.0, self.size.1)
    }
}

/// A drag-and-drop matching puzzle. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinigameDefinition {
    pub id: MinigameId,
    pub name: String,
    #[serde(default = "default_background")]
    pub background: (f32, f32, f32),
    pub items: Vec<ItemDefinition>,
    pub zones: Vec<ZoneDefinition>,
    #[serde(default)]
    pub success_sound: Option<String>,
    #[serde(default)]
    pub fail_sound: Option<String>,
}

impl MinigameDefinition {
    /// Reject definitions that could never be completed or that reference
    /// zones that don't exist.
    pub fn validate(&self) -> Result<(), DataError> {
        let invalid = |reason: String| DataError::Invalid {
            id: self.id.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("empty minigame id".into()));
        }
        if self.zones.is_empty() {
            return Err(invalid("no drop zones".into()));
        }

        let mut zone_ids = HashSet::new();
        for zone in &self.zones {
            if !zone_ids.insert(zone.id.as_str()) {
                return Err(invalid(format!("duplicate zone '{}'", zone.id)));
            }
        }

        let mut item_ids = HashSet::new();
        let mut targeted = HashSet::new();
        for item in &self.items {
            if !item_ids.insert(item.id.as_str()) {
                return Err(invalid(format!("duplicate item '{}'", item.id)));
            }
            if !zone_ids.contains(item.correct_zone.as_str()) {
                return Err(invalid(format!(
                    "item '{}' targets unknown zone '{}'",
                    item.id, item.correct_zone
                )));
            }
            targeted.insert(item.correct_zone.as_str());
        }

        if let Some(orphan) = self
            .zones
            .iter()
            .find(|zone| !targeted.contains(zone.id.as_str()))
        {
            return Err(invalid(format!(
                "zone '{}' has no matching item, puzzle can never complete",
                orphan.id
            )));
        }

        Ok(())
    }

    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn zone(&self, id: &str) -> Option<&ZoneDefinition> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn background_color(&self) -> Color {
        let (r, g, b) = self.background;
        Color::srgb(r, g, b)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MinigameRegistry {
    pub definitions: HashMap<MinigameId, MinigameDefinition>,
}

impl MinigameRegistry {
    pub fn get(&self, id: &str) -> Option<&MinigameDefinition> {
        self.definitions.get(id)
    }

    pub fn insert(&mut self, definition: MinigameDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

pub fn parse_minigames(source: &str) -> Result<Vec<MinigameDefinition>, DataError> {
    ron::from_str(source).map_err(|err| DataError::Parse {
        source_name: "minigames".into(),
        message: err.to_string(),
    })
}

/// Fill `registry` from RON text. Invalid definitions are logged and
/// skipped. Returns how many were added.
pub fn populate_minigames(registry: &mut MinigameRegistry, source: &str) -> usize {
    let definitions = match parse_minigames(source) {
        Ok(definitions) => definitions,
        Err(err) => {
            error!("[Data] {err}");
            return 0;
        }
    };

    let mut added = 0;
    for definition in definitions {
        if let Err(err) = definition.validate() {
            warn!("[Data] Skipping minigame: {err}");
            continue;
        }
        if registry.get(&definition.id).is_some() {
            warn!("[Data] Minigame '{}' defined twice, keeping the last one", definition.id);
        }
        registry.insert(definition);
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, zone: &str) -> ItemDefinition {
        ItemDefinition {
            id: id.into(),
            correct_zone: zone.into(),
            start: (0.0, 0.0),
            size: default_item_size(),
            color: default_item_color(),
        }
    }

    fn zone(id: &str) -> ZoneDefinition {
        ZoneDefinition {
            id: id.into(),
            position: (0.0, 0.0),
            size: default_zone_size(),
        }
    }

    fn definition(items: Vec<ItemDefinition>, zones: Vec<ZoneDefinition>) -> MinigameDefinition {
        MinigameDefinition {
            id: "test".into(),
            name: "Test".into(),
            background: default_background(),
            items,
            zones,
            success_sound: None,
            fail_sound: None,
        }
    }

    #[test]
    fn test_bundled_minigames_are_valid() {
        let mut registry = MinigameRegistry::default();
        let added = populate_minigames(&mut registry, DEFAULT_MINIGAMES);
        assert_eq!(added, 4);
        for definition in registry.definitions.values() {
            assert!(definition.validate().is_ok(), "{} should validate", definition.id);
        }
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let def = definition(vec![item("a", "missing")], vec![zone("z")]);
        assert!(matches!(def.validate(), Err(DataError::Invalid { .. })));
    }

    #[test]
    fn test_zone_without_item_is_rejected() {
        let def = definition(vec![item("a", "z1")], vec![zone("z1"), zone("z2")]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let def = definition(vec![item("a", "z"), item("a", "z")], vec![zone("z")]);
        assert!(def.validate().is_err());
        let def = definition(vec![item("a", "z")], vec![zone("z"), zone("z")]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_malformed_source_adds_nothing() {
        let mut registry = MinigameRegistry::default();
        assert_eq!(populate_minigames(&mut registry, "[ (id: "), 0);
        assert!(registry.is_empty());
    }
}
