//! In-world HUD: companion counter and the "talk" hint.

use bevy::prelude::*;

use super::menu_kit::MenuTheme;
use crate::gate::GateController;
use crate::npcs::{nearest_interactable, NpcRecord};
use crate::shared::*;

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct CompanionCounter;

#[derive(Component)]
pub struct InteractHint;

pub fn companion_label(following: usize, total: usize) -> String {
    format!("Companions {following}/{total}")
}

/// The HUD is a scene entity of World, so scene teardown removes it.
pub fn spawn_hud(
    mut commands: Commands,
    mut loaded: EventReader<SceneLoadedEvent>,
    theme: Res<MenuTheme>,
) {
    let world_loaded = loaded
        .read()
        .fold(false, |seen, event| seen || event.scene == SceneId::World);
    if !world_loaded {
        return;
    }
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            PickingBehavior::IGNORE,
            SceneEntity,
            Name::new("Hud"),
        ))
        .with_children(|parent| {
            parent.spawn((
                CompanionCounter,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(theme.text_color),
            ));
            parent.spawn((
                InteractHint,
                Text::new("E: Talk"),
                TextFont {
                    font_size: theme.hint_font_size,
                    ..default()
                },
                TextColor(theme.hint_color),
                Visibility::Hidden,
            ));
        });
}

pub fn update_companion_counter(
    gate: Res<GateController>,
    mut counters: Query<&mut Text, With<CompanionCounter>>,
) {
    for mut text in &mut counters {
        let label = companion_label(gate.following(), gate.total());
        if text.0 != label {
            text.0 = label;
        }
    }
}

pub fn update_interact_hint(
    player_q: Query<&Transform, With<Player>>,
    npc_q: Query<(&Transform, &NpcRecord), Without<Player>>,
    mut hints: Query<&mut Visibility, With<InteractHint>>,
) {
    let visible = player_q.get_single().is_ok_and(|player_tf| {
        nearest_interactable(
            player_tf.translation.truncate(),
            npc_q
                .iter()
                .map(|(tf, record)| (tf.translation.truncate(), record)),
        )
        .is_some()
    });
    for mut vis in &mut hints {
        let next = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *vis != next {
            *vis = next;
        }
    }
}
