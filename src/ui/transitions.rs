use bevy::prelude::*;

use crate::shared::*;

/// Marker for the screen fade overlay
#[derive(Component)]
pub struct ScreenFadeOverlay;

/// Drives the fade-from-black after every scene load.
#[derive(Resource)]
pub struct ScreenFade {
    /// 0.0 (transparent) to 1.0 (opaque black)
    pub alpha: f32,
    /// Alpha units per second
    pub speed: f32,
}

impl Default for ScreenFade {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            speed: 2.0,
        }
    }
}

/// Spawn the fade overlay (always present but invisible)
pub fn spawn_fade_overlay(mut commands: Commands) {
    commands.spawn((
        ScreenFadeOverlay,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(100),
        PickingBehavior::IGNORE,
    ));
}

/// A freshly loaded scene starts black and fades in.
pub fn trigger_fade_on_scene_load(
    mut events: EventReader<SceneLoadedEvent>,
    mut fade: ResMut<ScreenFade>,
) {
    if events.read().last().is_some() {
        fade.alpha = 1.0;
    }
}

pub fn update_fade(
    time: Res<Time<Real>>,
    mut fade: ResMut<ScreenFade>,
    mut query: Query<&mut BackgroundColor, With<ScreenFadeOverlay>>,
) {
    if fade.alpha <= 0.0 {
        return;
    }
    fade.alpha = (fade.alpha - fade.speed * time.delta_secs()).max(0.0);
    for mut bg in &mut query {
        bg.0 = Color::srgba(0.0, 0.0, 0.0, fade.alpha);
    }
}
