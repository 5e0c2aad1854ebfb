//! Messages raised by the tower gate: the "not yet" warning card, the
//! confirmation panel and the activation banner.

use bevy::prelude::*;

use super::menu_kit::{self, MenuTheme};
use crate::data::GameConfig;
use crate::gate::{
    GateDecisionEvent, GatePromptEvent, ACTIVATED_MESSAGE, CONFIRM_MESSAGE, WARNING_MESSAGE,
};
use crate::shared::*;

/// A fading text card. Only one is on screen at a time.
#[derive(Component)]
pub struct GateCard {
    fade: StepQueue,
}

#[derive(Component)]
pub struct TowerPromptRoot;

pub fn show_gate_cards(
    mut commands: Commands,
    mut prompts: EventReader<GatePromptEvent>,
    config: Res<GameConfig>,
    theme: Res<MenuTheme>,
    cards: Query<Entity, With<GateCard>>,
) {
    for prompt in prompts.read() {
        let message = match prompt {
            GatePromptEvent::Warning => WARNING_MESSAGE,
            GatePromptEvent::Activated => ACTIVATED_MESSAGE,
            GatePromptEvent::Confirm => continue,
        };
        for entity in &cards {
            commands.entity(entity).despawn_recursive();
        }
        commands
            .spawn((
                GateCard {
                    fade: StepQueue::fade_card(config.warning_fade, config.warning_hold),
                },
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Percent(20.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                GlobalZIndex(45),
                SceneEntity,
                Name::new("GateCard"),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(message),
                    TextFont {
                        font_size: 26.0,
                        ..default()
                    },
                    TextColor(theme.highlight_color.with_alpha(0.0)),
                ));
            });
    }
}

/// Fades cards in and out on real time so they keep going while paused.
pub fn fade_gate_cards(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut cards: Query<(Entity, &mut GateCard, &Children)>,
    mut texts: Query<&mut TextColor>,
) {
    for (entity, mut card, children) in &mut cards {
        let done = card.fade.advance(time.delta_secs()).is_finished();
        let alpha = card.fade.value();
        for &child in children.iter() {
            if let Ok(mut color) = texts.get_mut(child) {
                color.0.set_alpha(alpha);
            }
        }
        if done {
            commands.entity(entity).despawn_recursive();
        }
    }
}

pub fn spawn_tower_prompt(mut commands: Commands, theme: Res<MenuTheme>) {
    let theme = theme.clone();
    menu_kit::spawn_panel_screen(
        &mut commands,
        (TowerPromptRoot, Name::new("TowerPrompt")),
        &theme,
        theme.bg_overlay,
        |panel| {
            menu_kit::spawn_menu_text(panel, CONFIRM_MESSAGE, &theme);
            menu_kit::spawn_menu_footer(panel, "Enter/E: Awaken | Esc: Not yet", &theme);
        },
    );
}

pub fn tower_prompt_input(input: Res<PlayerInput>, mut decisions: EventWriter<GateDecisionEvent>) {
    if input.ui_confirm {
        decisions.send(GateDecisionEvent { confirmed: true });
    } else if input.ui_cancel {
        decisions.send(GateDecisionEvent { confirmed: false });
    }
}
