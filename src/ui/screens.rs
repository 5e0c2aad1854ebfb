//! Main menu, intro card, end-video panel and ending screen.

use bevy::prelude::*;

use super::menu_kit::{self, MenuTheme};
use crate::scenes::{EndPanel, MAIN_MENU_OPTIONS};

#[derive(Component)]
pub struct MainMenuRoot;

#[derive(Component)]
pub struct IntroRoot;

#[derive(Component)]
pub struct EndPanelRoot;

#[derive(Component)]
pub struct EndingRoot;

const SCREEN_BG: Color = Color::srgb(0.05, 0.05, 0.08);

pub fn spawn_main_menu(mut commands: Commands, theme: Res<MenuTheme>) {
    let theme = theme.clone();
    menu_kit::spawn_panel_screen(
        &mut commands,
        (MainMenuRoot, Name::new("MainMenu")),
        &theme,
        SCREEN_BG,
        |panel| {
            menu_kit::spawn_menu_title(panel, "RESONANCE", &theme);
            for (i, label) in MAIN_MENU_OPTIONS.iter().enumerate() {
                menu_kit::spawn_menu_option(panel, i, label, &theme);
            }
            menu_kit::spawn_menu_footer(panel, "Up/Down: Select | Enter: Confirm", &theme);
        },
    );
}

pub fn spawn_intro(mut commands: Commands, theme: Res<MenuTheme>) {
    let theme = theme.clone();
    menu_kit::spawn_panel_screen(
        &mut commands,
        (IntroRoot, Name::new("Intro")),
        &theme,
        SCREEN_BG,
        |panel| {
            menu_kit::spawn_menu_text(
                panel,
                "The colour has drained from the valley.\nFind its people and help them.",
                &theme,
            );
            menu_kit::spawn_menu_footer(panel, "Space: Skip", &theme);
        },
    );
}

/// Shows the "continue" panel once the end video has finished.
pub fn sync_end_panel(
    mut commands: Commands,
    panel: Res<EndPanel>,
    theme: Res<MenuTheme>,
    existing: Query<Entity, With<EndPanelRoot>>,
) {
    if !panel.is_changed() {
        return;
    }
    match (panel.visible, existing.get_single()) {
        (true, Err(_)) => {
            let theme = theme.clone();
            menu_kit::spawn_panel_screen(
                &mut commands,
                (EndPanelRoot, Name::new("EndPanel")),
                &theme,
                theme.bg_overlay,
                |panel| {
                    menu_kit::spawn_menu_text(panel, "The tower sings again.", &theme);
                    menu_kit::spawn_menu_footer(panel, "Enter: Continue", &theme);
                },
            );
        }
        (false, Ok(entity)) => commands.entity(entity).despawn_recursive(),
        _ => {}
    }
}

pub fn spawn_ending(mut commands: Commands, theme: Res<MenuTheme>) {
    let theme = theme.clone();
    menu_kit::spawn_panel_screen(
        &mut commands,
        (EndingRoot, Name::new("Ending")),
        &theme,
        SCREEN_BG,
        |panel| {
            menu_kit::spawn_menu_title(panel, "THE END", &theme);
            menu_kit::spawn_menu_text(panel, "Thank you for playing.", &theme);
            menu_kit::spawn_menu_footer(panel, "Enter: Main Menu", &theme);
        },
    );
}
