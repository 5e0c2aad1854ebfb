use bevy::prelude::*;

use super::menu_kit::{self, MenuTheme};
use crate::scenes::PAUSE_OPTIONS;

#[derive(Component)]
pub struct PauseMenuRoot;

pub fn spawn_pause_menu(mut commands: Commands, theme: Res<MenuTheme>) {
    let theme = theme.clone();
    menu_kit::spawn_panel_screen(
        &mut commands,
        (PauseMenuRoot, Name::new("PauseMenu")),
        &theme,
        theme.bg_overlay,
        |panel| {
            menu_kit::spawn_menu_title(panel, "PAUSED", &theme);
            for (i, label) in PAUSE_OPTIONS.iter().enumerate() {
                menu_kit::spawn_menu_option(panel, i, label, &theme);
            }
            menu_kit::spawn_menu_footer(
                panel,
                "Up/Down: Select | Enter: Confirm | Esc: Resume",
                &theme,
            );
        },
    );
}
