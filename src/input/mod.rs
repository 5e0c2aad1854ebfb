use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (manage_input_context, reset_and_read_input, read_cursor)
                .chain()
                .after(bevy::input::InputSystem),
        );
    }
}

/// Which action set is live in a given state.
pub fn context_for(state: GameState) -> InputContext {
    match state {
        GameState::Loading => InputContext::Disabled,
        GameState::Playing => InputContext::Gameplay,
        GameState::Minigame => InputContext::Minigame,
        GameState::Intro | GameState::Cutscene => InputContext::Cutscene,
        GameState::MainMenu | GameState::Paused | GameState::TowerPrompt | GameState::Ending => {
            InputContext::Menu
        }
    }
}

/// Derives InputContext from GameState. One system instead of per-domain guards.
fn manage_input_context(game_state: Res<State<GameState>>, mut context: ResMut<InputContext>) {
    let next = context_for(*game_state.get());
    if *context != next {
        *context = next;
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
    mut interaction_claimed: ResMut<InteractionClaimed>,
) {
    *input = PlayerInput::default();
    interaction_claimed.0 = false;

    input.any_key =
        keys.get_just_pressed().next().is_some() || mouse.get_just_pressed().next().is_some();

    let up = keys.just_pressed(bindings.move_up) || keys.just_pressed(KeyCode::ArrowUp);
    let down = keys.just_pressed(bindings.move_down) || keys.just_pressed(KeyCode::ArrowDown);

    match *context {
        InputContext::Disabled => {}

        InputContext::Gameplay => {
            let mut axis = Vec2::ZERO;
            if keys.pressed(bindings.move_up) || keys.pressed(KeyCode::ArrowUp) {
                axis.y += 1.0;
            }
            if keys.pressed(bindings.move_down) || keys.pressed(KeyCode::ArrowDown) {
                axis.y -= 1.0;
            }
            if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
                axis.x -= 1.0;
            }
            if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
                axis.x += 1.0;
            }
            input.move_axis = axis.normalize_or_zero();

            input.interact = keys.just_pressed(bindings.interact);
            input.pause =
                keys.just_pressed(bindings.pause) || keys.just_pressed(bindings.pause_alt);
        }

        InputContext::Menu => {
            input.ui_up = up;
            input.ui_down = down;
            input.ui_confirm =
                keys.just_pressed(bindings.ui_confirm) || keys.just_pressed(bindings.interact);
            input.ui_cancel = keys.just_pressed(bindings.ui_cancel);
            input.pause = keys.just_pressed(bindings.pause_alt);
        }

        InputContext::Minigame => {
            input.pointer_pressed = mouse.just_pressed(MouseButton::Left);
            input.pointer_held = mouse.pressed(MouseButton::Left);
            input.pointer_released = mouse.just_released(MouseButton::Left);
            input.restart = keys.just_pressed(bindings.restart);
            input.ui_cancel = keys.just_pressed(bindings.ui_cancel);
        }

        InputContext::Cutscene => {
            input.skip_cutscene = keys.just_pressed(bindings.skip_cutscene);
            input.ui_confirm =
                keys.just_pressed(bindings.ui_confirm) || keys.just_pressed(bindings.interact);
        }
    }
}

/// World-space cursor for drag and drop. Absent in headless runs.
fn read_cursor(
    mut input: ResMut<PlayerInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(screen_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_tf)) = cameras.get_single() else {
        return;
    };
    input.cursor_world = camera.viewport_to_world_2d(camera_tf, screen_pos).ok();
}
