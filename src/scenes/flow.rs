//! Menu and cutscene flow between scenes.
//!
//! MainMenu ─confirm─▶ IntroScene ─timer/skip─▶ World ─tower─▶ VideoEnd
//!     ▲                                                          │
//!     └──────confirm────── Ending ◀──────confirm on end panel────┘

use bevy::prelude::*;

use super::SceneOrchestrator;
use crate::data::GameConfig;
use crate::shared::*;

pub const MAIN_MENU_OPTIONS: [&str; 2] = ["Play", "Quit"];
pub const PAUSE_OPTIONS: [&str; 2] = ["Resume", "Main Menu"];

/// Countdown for the intro and the end video.
#[derive(Resource, Debug, Default)]
pub struct FlowTimer(pub Option<Delay>);

/// Shown once the end video has played.
#[derive(Resource, Debug, Default)]
pub struct EndPanel {
    pub visible: bool,
}

/// Highlighted option of whichever menu is open.
#[derive(Resource, Debug, Default)]
pub struct MenuCursor {
    pub index: usize,
}

impl MenuCursor {
    pub fn step(&mut self, input: &PlayerInput, options: usize) {
        if options == 0 {
            return;
        }
        if input.ui_down {
            self.index = (self.index + 1) % options;
        }
        if input.ui_up {
            self.index = (self.index + options - 1) % options;
        }
    }
}

pub(super) fn register(app: &mut App) {
    app.add_systems(OnEnter(GameState::MainMenu), reset_cursor)
        .add_systems(OnEnter(GameState::Paused), (reset_cursor, pause_game_time))
        .add_systems(OnExit(GameState::Paused), resume_game_time)
        .add_systems(OnEnter(GameState::Intro), start_intro)
        .add_systems(OnEnter(GameState::Cutscene), start_end_video)
        .add_systems(
            Update,
            (
                main_menu_flow.run_if(in_state(GameState::MainMenu)),
                intro_flow.run_if(in_state(GameState::Intro)),
                open_pause_menu.run_if(in_state(GameState::Playing)),
                pause_menu_flow.run_if(in_state(GameState::Paused)),
                end_video_flow.run_if(in_state(GameState::Cutscene)),
                ending_flow.run_if(in_state(GameState::Ending)),
            ),
        );
}

fn reset_cursor(mut cursor: ResMut<MenuCursor>) {
    cursor.index = 0;
}

fn main_menu_flow(
    input: Res<PlayerInput>,
    mut cursor: ResMut<MenuCursor>,
    mut audio: ResMut<Audio>,
    mut scenes: SceneOrchestrator,
    mut exit: EventWriter<AppExit>,
) {
    cursor.step(&input, MAIN_MENU_OPTIONS.len());
    if !input.ui_confirm {
        return;
    }
    audio.play_effect(SFX_CLICK);
    match cursor.index {
        0 => scenes.load(SceneId::Intro),
        _ => {
            info!("[Scenes] Quit from main menu");
            exit.send(AppExit::Success);
        }
    }
}

fn start_intro(config: Res<GameConfig>, mut timer: ResMut<FlowTimer>) {
    timer.0 = Some(Delay::new(config.intro_duration));
}

fn intro_flow(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut timer: ResMut<FlowTimer>,
    mut scenes: SceneOrchestrator,
) {
    let Some(delay) = timer.0.as_mut() else {
        return;
    };
    let skipped = input.skip_cutscene || input.ui_confirm;
    if skipped || delay.advance(time.delta_secs()).is_finished() {
        timer.0 = None;
        scenes.load(SceneId::World);
    }
}

fn start_end_video(
    config: Res<GameConfig>,
    mut timer: ResMut<FlowTimer>,
    mut panel: ResMut<EndPanel>,
) {
    timer.0 = Some(Delay::new(
        config.cutscene_duration + config.cutscene_end_delay,
    ));
    panel.visible = false;
}

fn end_video_flow(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut timer: ResMut<FlowTimer>,
    mut panel: ResMut<EndPanel>,
    mut audio: ResMut<Audio>,
    mut scenes: SceneOrchestrator,
) {
    if panel.visible {
        if input.ui_confirm {
            audio.play_effect(SFX_CLICK);
            panel.visible = false;
            scenes.load(SceneId::Ending);
        }
        return;
    }

    let Some(delay) = timer.0.as_mut() else {
        return;
    };
    if input.skip_cutscene || delay.advance(time.delta_secs()).is_finished() {
        timer.0 = None;
        panel.visible = true;
    }
}

fn ending_flow(
    input: Res<PlayerInput>,
    mut audio: ResMut<Audio>,
    mut scenes: SceneOrchestrator,
) {
    if input.ui_confirm {
        audio.play_effect(SFX_CLICK);
        scenes.load(SceneId::MainMenu);
    }
}

fn open_pause_menu(
    input: Res<PlayerInput>,
    mut audio: ResMut<Audio>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if input.pause {
        audio.play_effect(SFX_PAUSE);
        next_state.set(GameState::Paused);
    }
}

fn pause_menu_flow(
    input: Res<PlayerInput>,
    mut cursor: ResMut<MenuCursor>,
    mut audio: ResMut<Audio>,
    mut next_state: ResMut<NextState<GameState>>,
    mut scenes: SceneOrchestrator,
) {
    cursor.step(&input, PAUSE_OPTIONS.len());

    let resume = input.pause || input.ui_cancel || (input.ui_confirm && cursor.index == 0);
    if resume {
        audio.play_effect(SFX_UNPAUSE);
        next_state.set(GameState::Playing);
        return;
    }
    if input.ui_confirm {
        audio.play_effect(SFX_CLICK);
        scenes.load(SceneId::MainMenu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_cursor_wraps() {
        let mut cursor = MenuCursor::default();
        let down = PlayerInput {
            ui_down: true,
            ..default()
        };
        let up = PlayerInput {
            ui_up: true,
            ..default()
        };
        cursor.step(&up, 2);
        assert_eq!(cursor.index, 1);
        cursor.step(&down, 2);
        assert_eq!(cursor.index, 0);
        cursor.step(&down, 2);
        cursor.step(&down, 2);
        assert_eq!(cursor.index, 0);
    }
}
