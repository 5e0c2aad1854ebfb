mod dialogue_box;
mod hud;
mod menu_kit;
mod pause_menu;
mod screens;
mod tower_prompt;
mod transitions;

use bevy::prelude::*;

use crate::shared::*;

pub use dialogue_box::CONTINUE_PROMPT;
pub use hud::companion_label;
pub use menu_kit::MenuTheme;
pub use transitions::ScreenFade;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuTheme>()
            .init_resource::<ScreenFade>();

        // ─── FADE OVERLAY: always present ───
        app.add_systems(Startup, transitions::spawn_fade_overlay);
        app.add_systems(
            Update,
            (
                transitions::trigger_fade_on_scene_load,
                transitions::update_fade,
            )
                .chain(),
        );

        // ─── MENUS ───
        app.add_systems(OnEnter(GameState::MainMenu), screens::spawn_main_menu);
        app.add_systems(
            OnExit(GameState::MainMenu),
            menu_kit::despawn_screen::<screens::MainMenuRoot>,
        );
        app.add_systems(OnEnter(GameState::Intro), screens::spawn_intro);
        app.add_systems(
            OnExit(GameState::Intro),
            menu_kit::despawn_screen::<screens::IntroRoot>,
        );
        app.add_systems(OnEnter(GameState::Ending), screens::spawn_ending);
        app.add_systems(
            OnExit(GameState::Ending),
            menu_kit::despawn_screen::<screens::EndingRoot>,
        );
        app.add_systems(
            OnExit(GameState::Cutscene),
            menu_kit::despawn_screen::<screens::EndPanelRoot>,
        );
        app.add_systems(
            Update,
            (
                screens::sync_end_panel.run_if(in_state(GameState::Cutscene)),
                menu_kit::highlight_menu_options
                    .run_if(in_state(GameState::MainMenu).or(in_state(GameState::Paused))),
            ),
        );

        // ─── PAUSE MENU ───
        app.add_systems(OnEnter(GameState::Paused), pause_menu::spawn_pause_menu);
        app.add_systems(
            OnExit(GameState::Paused),
            menu_kit::despawn_screen::<pause_menu::PauseMenuRoot>,
        );

        // ─── HUD: lives as long as the World scene ───
        app.add_systems(
            Update,
            (
                hud::spawn_hud,
                (hud::update_companion_counter, hud::update_interact_hint)
                    .run_if(in_state(GameState::Playing)),
            )
                .chain(),
        );

        // ─── DIALOGUE ───
        app.add_systems(Update, dialogue_box::apply_dialogue_commands);

        // ─── TOWER ───
        app.add_systems(
            Update,
            (tower_prompt::show_gate_cards, tower_prompt::fade_gate_cards).chain(),
        );
        app.add_systems(OnEnter(GameState::TowerPrompt), tower_prompt::spawn_tower_prompt);
        app.add_systems(
            OnExit(GameState::TowerPrompt),
            menu_kit::despawn_screen::<tower_prompt::TowerPromptRoot>,
        );
        app.add_systems(
            Update,
            tower_prompt::tower_prompt_input.run_if(in_state(GameState::TowerPrompt)),
        );
    }
}
