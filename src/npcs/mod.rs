//! NPC domain plugin for Resonance.
//!
//! Each companion NPC carries an `NpcRecord` state machine and a mailbox on
//! the minigame bus. Interacting starts its puzzle; solving it shows the
//! NPC's thank-you line; acknowledging that line turns the NPC into a
//! companion that follows the player and restores colour around itself.

use bevy::prelude::*;

use crate::shared::*;

mod follow;
mod interaction;
mod spawning;
mod state;

pub use follow::{clearance, follow_target, keep_clear, step_toward};
pub use interaction::nearest_interactable;
pub use spawning::MinigameSubscription;
pub use state::{NpcPhase, NpcRecord, NpcTransition};

use follow::follow_player;
use interaction::{acknowledge_dialogue, apply_minigame_outcomes, start_minigame_on_interact};
use spawning::{spawn_world_npcs, unsubscribe_on_remove};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MinigameBus>()
            .add_observer(unsubscribe_on_remove);

        app.add_systems(Update, spawn_world_npcs);

        app.add_systems(
            Update,
            (
                apply_minigame_outcomes,
                (acknowledge_dialogue, start_minigame_on_interact)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
                follow_player
                    .after(PlayerMotion)
                    .run_if(in_state(GameState::Playing)),
            )
                .chain(),
        );
    }
}
