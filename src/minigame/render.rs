//! Minigame panel sprites.

use bevy::prelude::*;

use super::drag::{DropZoneSlot, MinigameItem, MinigamePanel};
use super::MinigameController;
use crate::shared::*;

const PANEL_SIZE: Vec2 = Vec2::new(820.0, 460.0);
const COLOR_ZONE_FREE: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const COLOR_ZONE_FILLED: Color = Color::srgba(0.2, 0.85, 0.3, 0.6);
const COLOR_ZONE_WRONG: Color = Color::srgba(0.9, 0.15, 0.15, 0.7);
const COLOR_TITLE: Color = Color::srgb(0.95, 0.95, 0.95);

/// Red flash on a zone that refused an item. Runs on real time.
#[derive(Component, Debug, Clone)]
pub struct ZoneFeedback(pub Delay);

pub fn zone_color(occupied: bool, flashing: bool) -> Color {
    if flashing {
        COLOR_ZONE_WRONG
    } else if occupied {
        COLOR_ZONE_FILLED
    } else {
        COLOR_ZONE_FREE
    }
}

/// OnEnter(GameState::Minigame): build the panel for the open session.
pub fn spawn_panel(
    mut commands: Commands,
    controller: Res<MinigameController>,
    camera_q: Query<&Transform, With<Camera2d>>,
) {
    let Some(session) = controller.session() else {
        warn!("[Minigame] Entered minigame state with no open session");
        return;
    };
    let definition = session.definition();
    let origin = camera_q
        .get_single()
        .map(|tf| tf.translation.truncate())
        .unwrap_or(Vec2::ZERO);

    commands
        .spawn((
            MinigamePanel,
            Sprite::from_color(definition.background_color(), PANEL_SIZE),
            Transform::from_xyz(origin.x, origin.y, Z_MINIGAME),
            SceneEntity,
        ))
        .with_children(|panel| {
            panel.spawn((
                Text2d::new(definition.name.clone()),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(COLOR_TITLE),
                Transform::from_xyz(0.0, PANEL_SIZE.y * 0.5 - 24.0, 3.0),
            ));

            for zone in &definition.zones {
                let pos = zone.position();
                panel.spawn((
                    DropZoneSlot {
                        id: zone.id.clone(),
                        size: zone.size(),
                    },
                    Sprite::from_color(zone_color(false, false), zone.size()),
                    Transform::from_xyz(pos.x, pos.y, 1.0),
                ));
            }

            for item in &definition.items {
                let start = item.start();
                let (r, g, b) = item.color;
                panel.spawn((
                    MinigameItem {
                        id: item.id.clone(),
                        start,
                        size: item.size(),
                        placed: false,
                    },
                    Sprite::from_color(Color::srgb(r, g, b), item.size()),
                    Transform::from_xyz(start.x, start.y, 2.0),
                ));
            }
        });

    info!("[Minigame] Opened '{}'", definition.name);
}

/// OnExit(GameState::Minigame).
pub fn despawn_panel(mut commands: Commands, panels: Query<Entity, With<MinigamePanel>>) {
    for entity in &panels {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn tick_zone_feedback(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut flashing: Query<(Entity, &mut ZoneFeedback)>,
) {
    for (entity, mut feedback) in &mut flashing {
        if feedback.0.advance(time.delta_secs()).is_finished() {
            commands.entity(entity).remove::<ZoneFeedback>();
        }
    }
}

pub fn color_zones(
    controller: Res<MinigameController>,
    mut zones: Query<(&DropZoneSlot, &mut Sprite, Has<ZoneFeedback>)>,
) {
    let Some(session) = controller.session() else {
        return;
    };
    for (zone, mut sprite, flashing) in &mut zones {
        sprite.color = zone_color(session.is_occupied(&zone.id), flashing);
    }
}
