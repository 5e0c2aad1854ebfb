//! Tower gate bookkeeping.

use bevy::prelude::*;

/// What the gate wants shown when the player walks into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateResponse {
    /// Not every NPC follows yet.
    Warning,
    /// Ready: ask the player to confirm.
    Confirm,
    /// Already triggered, or a prompt is already up.
    Ignored,
}

/// Ready once every NPC in the scene follows the player. A scene with no
/// NPCs is never ready. The trigger latch only resets with the scene.
#[derive(Resource, Debug, Clone, Default)]
pub struct GateController {
    following: usize,
    total: usize,
    triggered: bool,
    prompt_open: bool,
}

impl GateController {
    pub fn refresh(&mut self, following: usize, total: usize) {
        self.following = following.min(total);
        self.total = total;
    }

    pub fn is_ready(&self) -> bool {
        self.total > 0 && self.following == self.total
    }

    pub fn following(&self) -> usize {
        self.following
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt_open
    }

    pub fn on_player_enter(&mut self) -> GateResponse {
        if self.triggered || self.prompt_open {
            return GateResponse::Ignored;
        }
        if self.is_ready() {
            self.prompt_open = true;
            GateResponse::Confirm
        } else {
            GateResponse::Warning
        }
    }

    /// Set the latch. Returns `true` only for the call that set it.
    pub fn confirm(&mut self) -> bool {
        self.prompt_open = false;
        if self.triggered || !self.is_ready() {
            return false;
        }
        self.triggered = true;
        true
    }

    /// Close the prompt without touching the latch.
    pub fn cancel(&mut self) {
        self.prompt_open = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(following: usize, total: usize) -> GateController {
        let mut gate = GateController::default();
        gate.refresh(following, total);
        gate
    }

    #[test]
    fn test_ready_iff_everyone_follows() {
        assert!(!gate(0, 0).is_ready(), "no NPCs is never ready");
        assert!(!gate(0, 1).is_ready());
        assert!(gate(1, 1).is_ready());
        for following in 0..4 {
            assert!(!gate(following, 4).is_ready());
        }
        assert!(gate(4, 4).is_ready());
    }

    #[test]
    fn test_warning_when_not_ready() {
        let mut gate = gate(3, 4);
        assert_eq!(gate.on_player_enter(), GateResponse::Warning);
        assert_eq!(gate.on_player_enter(), GateResponse::Warning);
        assert!(!gate.confirm());
        assert!(!gate.is_triggered());
    }

    #[test]
    fn test_confirm_latches_once() {
        let mut gate = gate(4, 4);
        assert_eq!(gate.on_player_enter(), GateResponse::Confirm);
        assert_eq!(gate.on_player_enter(), GateResponse::Ignored, "prompt already up");
        assert!(gate.confirm());
        assert!(!gate.confirm());
        assert!(gate.is_triggered());
        assert_eq!(gate.on_player_enter(), GateResponse::Ignored);
    }

    #[test]
    fn test_cancel_allows_reprompt() {
        let mut gate = gate(1, 1);
        assert_eq!(gate.on_player_enter(), GateResponse::Confirm);
        gate.cancel();
        assert!(!gate.is_triggered());
        assert_eq!(gate.on_player_enter(), GateResponse::Confirm);
    }

    #[test]
    fn test_reset_clears_latch() {
        let mut gate = gate(1, 1);
        gate.confirm();
        gate.reset();
        assert!(!gate.is_triggered());
        assert_eq!(gate.total(), 0);
    }
}
