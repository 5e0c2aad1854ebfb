//! Shared menu builder helpers.
//!
//! Every full-screen panel (menus, pause, end panel, tower prompt) is built
//! from these so they share one look.

use bevy::prelude::*;

use crate::scenes::MenuCursor;

// ═══════════════════════════════════════════════════════════════════════
// THEME
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct MenuTheme {
    pub bg_overlay: Color,
    pub panel_bg: Color,
    pub panel_border: Color,
    pub text_color: Color,
    pub highlight_color: Color,
    pub hint_color: Color,
    pub title_font_size: f32,
    pub option_font_size: f32,
    pub hint_font_size: f32,
    pub panel_width: f32,
    pub panel_padding: f32,
    pub panel_gap: f32,
}

impl Default for MenuTheme {
    fn default() -> Self {
        Self {
            bg_overlay: Color::srgba(0.0, 0.0, 0.0, 0.6),
            panel_bg: Color::srgb(0.12, 0.11, 0.16),
            panel_border: Color::srgb(0.55, 0.5, 0.7),
            text_color: Color::srgb(0.85, 0.85, 0.9),
            highlight_color: Color::srgb(1.0, 0.85, 0.4),
            hint_color: Color::srgb(0.6, 0.6, 0.65),
            title_font_size: 36.0,
            option_font_size: 22.0,
            hint_font_size: 13.0,
            panel_width: 360.0,
            panel_padding: 24.0,
            panel_gap: 12.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// One selectable line of a menu.
#[derive(Component, Debug, Clone, Copy)]
pub struct MenuOption {
    pub index: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// BUILDER HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// Full-screen overlay with a centred, bordered panel. `build` fills the panel.
pub fn spawn_panel_screen(
    commands: &mut Commands,
    root: impl Bundle,
    theme: &MenuTheme,
    background: Color,
    build: impl FnOnce(&mut ChildBuilder),
) -> Entity {
    commands
        .spawn((
            root,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            GlobalZIndex(50),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(theme.panel_width),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(theme.panel_padding)),
                        row_gap: Val::Px(theme.panel_gap),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(theme.panel_bg),
                    BorderColor(theme.panel_border),
                ))
                .with_children(build);
        })
        .id()
}

pub fn spawn_menu_title(parent: &mut ChildBuilder, text: &str, theme: &MenuTheme) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: theme.title_font_size,
            ..default()
        },
        TextColor(theme.text_color),
    ));
}

pub fn spawn_menu_text(parent: &mut ChildBuilder, text: &str, theme: &MenuTheme) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: theme.option_font_size,
            ..default()
        },
        TextColor(theme.text_color),
        TextLayout::new_with_justify(JustifyText::Center),
    ));
}

pub fn spawn_menu_option(parent: &mut ChildBuilder, index: usize, label: &str, theme: &MenuTheme) {
    parent.spawn((
        MenuOption { index },
        Text::new(label),
        TextFont {
            font_size: theme.option_font_size,
            ..default()
        },
        TextColor(theme.text_color),
    ));
}

pub fn spawn_menu_footer(parent: &mut ChildBuilder, text: &str, theme: &MenuTheme) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: theme.hint_font_size,
            ..default()
        },
        TextColor(theme.hint_color),
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn highlight_menu_options(
    cursor: Res<MenuCursor>,
    theme: Res<MenuTheme>,
    mut options: Query<(&MenuOption, &mut TextColor)>,
) {
    for (option, mut color) in &mut options {
        color.0 = if option.index == cursor.index {
            theme.highlight_color
        } else {
            theme.text_color
        };
    }
}

pub fn despawn_screen<T: Component>(mut commands: Commands, roots: Query<Entity, With<T>>) {
    for entity in &roots {
        commands.entity(entity).despawn_recursive();
    }
}
