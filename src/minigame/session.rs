//! One play-through of a matching puzzle.

use std::collections::HashMap;

use crate::data::MinigameDefinition;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownItem,
    UnknownZone,
    ItemAlreadyPlaced,
    ZoneOccupied,
    WrongZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Accepted,
    /// Accepted, and it filled the last free zone.
    Completed,
    Rejected(RejectReason),
}

impl Placement {
    pub fn is_accepted(self) -> bool {
        matches!(self, Placement::Accepted | Placement::Completed)
    }
}

/// Item and zone state for the open puzzle. Zone occupancy only changes on
/// an accepted placement or an explicit `reset`.
#[derive(Debug, Clone)]
pub struct MinigameSession {
    definition: MinigameDefinition,
    /// zone id → item placed there
    occupied: HashMap<ZoneId, ItemId>,
    completion_reported: bool,
}

impl MinigameSession {
    pub fn new(definition: MinigameDefinition) -> Self {
        Self {
            definition,
            occupied: HashMap::new(),
            completion_reported: false,
        }
    }

    pub fn definition(&self) -> &MinigameDefinition {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn place(&mut self, item: &str, zone: &str) -> Placement {
        let Some(item_def) = self.definition.item(item) else {
            return Placement::Rejected(RejectReason::UnknownItem);
        };
        if self.definition.zone(zone).is_none() {
            return Placement::Rejected(RejectReason::UnknownZone);
        }
        if self.is_placed(item) {
            return Placement::Rejected(RejectReason::ItemAlreadyPlaced);
        }
        if self.occupied.contains_key(zone) {
            return Placement::Rejected(RejectReason::ZoneOccupied);
        }
        if item_def.correct_zone != zone {
            return Placement::Rejected(RejectReason::WrongZone);
        }

        self.occupied.insert(zone.to_string(), item.to_string());

        if self.all_zones_occupied() && !self.completion_reported {
            self.completion_reported = true;
            Placement::Completed
        } else {
            Placement::Accepted
        }
    }

    pub fn is_occupied(&self, zone: &str) -> bool {
        self.occupied.contains_key(zone)
    }

    pub fn is_placed(&self, item: &str) -> bool {
        self.occupied.values().any(|placed| placed == item)
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn all_zones_occupied(&self) -> bool {
        self.occupied.len() == self.definition.zones.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completion_reported
    }

    /// Clear every zone for a fresh play-through.
    pub fn reset(&mut self) {
        self.occupied.clear();
        self.completion_reported = false;
    }
}
