//! Per-NPC recruitment state machine.
//!
//! ```text
//! Idle ──interact in range──▶ MinigameActive ──Completed{success}──▶ DialogueShown
//!  ▲                               │                                    │
//!  └────────Closed (unsolved)──────┘                         acknowledge │
//!                                                                       ▼
//!                                                                  Following
//! ```
//!
//! `Following` is terminal. Only `reset` leaves it.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NpcPhase {
    #[default]
    Idle,
    MinigameActive,
    DialogueShown,
    Following,
}

/// What a minigame event did to an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcTransition {
    /// The NPC's puzzle was solved; its dialogue should be shown.
    Recruited,
    /// The puzzle was closed unsolved; the NPC is interactable again.
    Aborted,
}

#[derive(Component, Debug, Clone)]
pub struct NpcRecord {
    pub name: String,
    pub minigame: MinigameId,
    pub dialogue: String,
    pub interaction_range: f32,
    pub collision_radius: f32,
    phase: NpcPhase,
    effect: Option<Entity>,
}

impl NpcRecord {
    pub fn new(
        name: impl Into<String>,
        minigame: impl Into<MinigameId>,
        dialogue: impl Into<String>,
        interaction_range: f32,
        collision_radius: f32,
    ) -> Self {
        Self {
            name: name.into(),
            minigame: minigame.into(),
            dialogue: dialogue.into(),
            interaction_range,
            collision_radius,
            phase: NpcPhase::Idle,
            effect: None,
        }
    }

    pub fn phase(&self) -> NpcPhase {
        self.phase
    }

    pub fn is_following(&self) -> bool {
        self.phase == NpcPhase::Following
    }

    pub fn effect(&self) -> Option<Entity> {
        self.effect
    }

    /// Interaction is only offered to idle NPCs within range.
    pub fn can_interact(&self, distance: f32) -> bool {
        self.phase == NpcPhase::Idle && distance <= self.interaction_range
    }

    /// `Idle → MinigameActive`. Returns `false` in any other phase.
    pub fn begin_minigame(&mut self) -> bool {
        if self.phase != NpcPhase::Idle {
            return false;
        }
        self.phase = NpcPhase::MinigameActive;
        true
    }

    /// React to a minigame lifecycle event. Events for other minigames,
    /// failed completions and anything arriving outside `MinigameActive`
    /// are ignored.
    pub fn handle_event(&mut self, event: &MinigameEvent) -> Option<NpcTransition> {
        if self.phase != NpcPhase::MinigameActive || event.minigame() != self.minigame {
            return None;
        }
        match event {
            MinigameEvent::Completed { success: true, .. } => {
                self.phase = NpcPhase::DialogueShown;
                Some(NpcTransition::Recruited)
            }
            MinigameEvent::Closed { .. } => {
                self.phase = NpcPhase::Idle;
                Some(NpcTransition::Aborted)
            }
            MinigameEvent::Completed { success: false, .. } | MinigameEvent::Started { .. } => {
                None
            }
        }
    }

    /// `DialogueShown → Following`.
    pub fn acknowledge(&mut self) -> bool {
        if self.phase != NpcPhase::DialogueShown {
            return false;
        }
        self.phase = NpcPhase::Following;
        true
    }

    /// Record the NPC's visual effect. An NPC owns at most one; a second
    /// attach is refused and returns `false`.
    pub fn attach_effect(&mut self, effect: Entity) -> bool {
        if self.effect.is_some() {
            return false;
        }
        self.effect = Some(effect);
        true
    }

    /// Back to `Idle`. Returns the released effect so the caller can
    /// despawn it.
    pub fn reset(&mut self) -> Option<Entity> {
        self.phase = NpcPhase::Idle;
        self.effect.take()
    }

    /// Jump straight to `Following`, skipping the puzzle. Returns `false`
    /// if the NPC was already following.
    pub fn debug_force_following(&mut self) -> bool {
        if self.phase == NpcPhase::Following {
            return false;
        }
        self.phase = NpcPhase::Following;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NpcRecord {
        NpcRecord::new("Mara", "harvest", "Thanks!", 50.0, 12.0)
    }

    fn completed(id: &str, success: bool) -> MinigameEvent {
        MinigameEvent::Completed {
            minigame: id.into(),
            success,
        }
    }

    fn closed(id: &str) -> MinigameEvent {
        MinigameEvent::Closed {
            minigame: id.into(),
        }
    }

    fn recruit(npc: &mut NpcRecord) {
        assert!(npc.begin_minigame());
        assert_eq!(
            npc.handle_event(&completed("harvest", true)),
            Some(NpcTransition::Recruited)
        );
        assert!(npc.acknowledge());
    }

    #[test]
    fn test_full_recruitment_path() {
        let mut npc = record();
        assert!(npc.can_interact(10.0));
        assert!(npc.begin_minigame());
        assert_eq!(npc.phase(), NpcPhase::MinigameActive);
        assert!(!npc.can_interact(0.0), "no interaction while busy");

        npc.handle_event(&completed("harvest", true));
        assert_eq!(npc.phase(), NpcPhase::DialogueShown);
        assert!(npc.acknowledge());
        assert!(npc.is_following());
    }

    #[test]
    fn test_out_of_range_cannot_interact() {
        let npc = record();
        assert!(npc.can_interact(50.0));
        assert!(!npc.can_interact(50.1));
    }

    #[test]
    fn test_failure_and_foreign_events_are_ignored() {
        let mut npc = record();
        npc.begin_minigame();
        assert_eq!(npc.handle_event(&completed("harvest", false)), None);
        assert_eq!(npc.handle_event(&completed("garden", true)), None);
        assert_eq!(npc.handle_event(&closed("garden")), None);
        assert_eq!(npc.phase(), NpcPhase::MinigameActive);
    }

    #[test]
    fn test_success_while_idle_is_ignored() {
        let mut npc = record();
        assert_eq!(npc.handle_event(&completed("harvest", true)), None);
        assert_eq!(npc.phase(), NpcPhase::Idle);
    }

    #[test]
    fn test_closing_unsolved_puzzle_returns_to_idle() {
        let mut npc = record();
        npc.begin_minigame();
        assert_eq!(npc.handle_event(&closed("harvest")), Some(NpcTransition::Aborted));
        assert_eq!(npc.phase(), NpcPhase::Idle);
        assert!(npc.begin_minigame(), "puzzle can be retried");
    }

    #[test]
    fn test_close_after_success_keeps_dialogue() {
        let mut npc = record();
        npc.begin_minigame();
        npc.handle_event(&completed("harvest", true));
        assert_eq!(npc.handle_event(&closed("harvest")), None);
        assert_eq!(npc.phase(), NpcPhase::DialogueShown);
    }

    #[test]
    fn test_following_is_monotonic() {
        let mut npc = record();
        recruit(&mut npc);

        assert!(!npc.begin_minigame());
        assert!(!npc.acknowledge());
        for event in [
            completed("harvest", true),
            completed("harvest", false),
            closed("harvest"),
            MinigameEvent::Started {
                minigame: "harvest".into(),
                npc: None,
            },
        ] {
            assert_eq!(npc.handle_event(&event), None);
            assert!(npc.is_following());
        }
        assert!(!npc.can_interact(0.0));
    }

    #[test]
    fn test_acknowledge_requires_dialogue() {
        let mut npc = record();
        assert!(!npc.acknowledge());
        npc.begin_minigame();
        assert!(!npc.acknowledge());
    }

    #[test]
    fn test_single_effect_handle_released_on_reset() {
        let mut npc = record();
        recruit(&mut npc);
        let effect = Entity::from_raw(7);
        assert!(npc.attach_effect(effect));
        assert!(!npc.attach_effect(Entity::from_raw(8)));
        assert_eq!(npc.effect(), Some(effect));

        assert_eq!(npc.reset(), Some(effect));
        assert_eq!(npc.phase(), NpcPhase::Idle);
        assert_eq!(npc.effect(), None);
    }

    #[test]
    fn test_debug_force_following() {
        let mut npc = record();
        assert!(npc.debug_force_following());
        assert!(npc.is_following());
        assert!(!npc.debug_force_following());
    }
}
