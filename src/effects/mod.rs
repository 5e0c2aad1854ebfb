//! Colour restoration.
//!
//! The world starts fully desaturated. Every `ColorSphere` restores colour
//! inside its radius. Sphere data is written each frame to the effect
//! channel (`EffectRenderer`), where a post-process shader reads it; sprites
//! tagged `Tinted` get a CPU-side approximation so the effect is visible
//! without that shader.

use bevy::prelude::*;

use crate::shared::*;

pub const PARAM_SPHERE_COUNT: &str = "_ColorSphereCount";
pub const PARAM_DESATURATION: &str = "_GlobalDesaturation";

/// Names of the four components of sphere `index`: x, y, z, radius.
pub fn sphere_param_names(index: usize) -> [String; 4] {
    ["x", "y", "z", "w"].map(|c| format!("_ColorSpheres[{index}].{c}"))
}

pub fn sphere_fade_param_name(index: usize) -> String {
    format!("_ColorSphereFades[{index}]")
}

/// Colour weight of `point` for one sphere: 1 inside, 0 outside, linear
/// across the fade band at the edge.
pub fn sphere_coverage(center: Vec2, radius: f32, fade_width: f32, point: Vec2) -> f32 {
    let dist = center.distance(point);
    if dist >= radius {
        return 0.0;
    }
    let inner = radius - fade_width.max(0.0);
    if dist <= inner || fade_width <= 0.0 {
        1.0
    } else {
        ((radius - dist) / fade_width).clamp(0.0, 1.0)
    }
}

/// Blend `base` toward its own luminance by `amount` (0 = untouched).
pub fn desaturate(base: Color, amount: f32) -> Color {
    let rgba = base.to_srgba();
    let luma = 0.299 * rgba.red + 0.587 * rgba.green + 0.114 * rgba.blue;
    let amount = amount.clamp(0.0, 1.0);
    let mix = |c: f32| c + (luma - c) * amount;
    Color::srgba(mix(rgba.red), mix(rgba.green), mix(rgba.blue), rgba.alpha)
}

/// Desaturation of the whole screen for a scene.
pub fn scene_desaturation(scene: Option<SceneId>) -> f32 {
    match scene {
        Some(SceneId::World) => 1.0,
        _ => 0.0,
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                grow_spheres,
                pulse_spheres,
                follow_anchors,
                publish_effect_parameters,
                tint_sprites,
            )
                .chain(),
        );
    }
}

fn grow_spheres(
    mut commands: Commands,
    time: Res<Time>,
    mut spheres: Query<(Entity, &mut ColorSphere, &mut SphereGrowth)>,
) {
    let dt = time.delta_secs();
    for (entity, mut sphere, mut growth) in &mut spheres {
        let progress = growth.growth.advance(dt);
        sphere.radius = growth.growth.value();
        if !progress.is_finished() {
            continue;
        }
        let mut entity_commands = commands.entity(entity);
        entity_commands.remove::<SphereGrowth>();
        if let Some(pulse) = growth.then_pulse.take() {
            entity_commands.insert(SpherePulse(pulse));
        }
    }
}

fn pulse_spheres(time: Res<Time>, mut spheres: Query<(&mut ColorSphere, &mut SpherePulse)>) {
    let dt = time.delta_secs();
    for (mut sphere, mut pulse) in &mut spheres {
        sphere.radius = pulse.0.advance(dt);
    }
}

fn follow_anchors(
    mut spheres: Query<(&SphereAnchor, &mut Transform), With<ColorSphere>>,
    anchors: Query<&Transform, Without<ColorSphere>>,
) {
    for (anchor, mut tf) in &mut spheres {
        if let Ok(anchor_tf) = anchors.get(anchor.0) {
            tf.translation.x = anchor_tf.translation.x;
            tf.translation.y = anchor_tf.translation.y;
        }
    }
}

/// The spheres that are drawn this frame: lowest entity ids first, at most
/// `MAX_COLOR_SPHERES`. The shader channel and the sprite tint both use it.
pub fn rendered_spheres<A, B>(mut spheres: Vec<(Entity, A, B)>) -> Vec<(Entity, A, B)> {
    spheres.sort_by_key(|(entity, _, _)| *entity);
    spheres.truncate(MAX_COLOR_SPHERES);
    spheres
}

fn publish_effect_parameters(
    mut effects: ResMut<Effects>,
    current: Res<CurrentScene>,
    spheres: Query<(Entity, &ColorSphere, &Transform)>,
) {
    let all: Vec<_> = spheres.iter().collect();
    if all.len() > MAX_COLOR_SPHERES {
        debug!(
            "[Effects] {} spheres, only the first {MAX_COLOR_SPHERES} are rendered",
            all.len()
        );
    }

    let mut count = 0;
    for (index, (_, sphere, tf)) in rendered_spheres(all).into_iter().enumerate() {
        let [x, y, z, w] = sphere_param_names(index);
        effects.set_parameter(&x, tf.translation.x);
        effects.set_parameter(&y, tf.translation.y);
        effects.set_parameter(&z, tf.translation.z);
        effects.set_parameter(&w, sphere.radius);
        effects.set_parameter(&sphere_fade_param_name(index), sphere.fade_width);
        count += 1;
    }
    effects.set_parameter(PARAM_SPHERE_COUNT, count as f32);
    effects.set_parameter(PARAM_DESATURATION, scene_desaturation(current.scene));
}

fn tint_sprites(
    current: Res<CurrentScene>,
    spheres: Query<(Entity, &ColorSphere, &Transform)>,
    mut sprites: Query<(&Tinted, &Transform, &mut Sprite), Without<ColorSphere>>,
) {
    let desaturation = scene_desaturation(current.scene);
    let visible = rendered_spheres(spheres.iter().collect());
    for (tinted, tf, mut sprite) in &mut sprites {
        let point = tf.translation.truncate();
        let coverage = visible
            .iter()
            .map(|(_, sphere, sphere_tf)| {
                sphere_coverage(
                    sphere_tf.translation.truncate(),
                    sphere.radius,
                    sphere.fade_width,
                    point,
                )
            })
            .fold(0.0_f32, f32::max);
        sprite.color = desaturate(tinted.base, desaturation * (1.0 - coverage));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_inside_edge_outside() {
        let c = Vec2::ZERO;
        assert_eq!(sphere_coverage(c, 100.0, 20.0, Vec2::new(50.0, 0.0)), 1.0);
        assert!((sphere_coverage(c, 100.0, 20.0, Vec2::new(90.0, 0.0)) - 0.5).abs() < 1e-4);
        assert_eq!(sphere_coverage(c, 100.0, 20.0, Vec2::new(150.0, 0.0)), 0.0);
        assert_eq!(sphere_coverage(c, 0.0, 20.0, Vec2::ZERO), 0.0, "zero radius covers nothing");
    }

    #[test]
    fn test_full_desaturation_is_grey() {
        let grey = desaturate(Color::srgb(1.0, 0.0, 0.0), 1.0).to_srgba();
        assert!((grey.red - grey.green).abs() < 1e-4);
        assert!((grey.green - grey.blue).abs() < 1e-4);
        let untouched = desaturate(Color::srgb(1.0, 0.0, 0.0), 0.0).to_srgba();
        assert_eq!(untouched.red, 1.0);
    }

    #[test]
    fn test_rendered_spheres_are_lowest_ids() {
        let spheres: Vec<_> = (0..12u32)
            .rev()
            .map(|i| (Entity::from_raw(i), i, ()))
            .collect();
        let kept: Vec<u32> = rendered_spheres(spheres)
            .into_iter()
            .map(|(_, i, _)| i)
            .collect();
        assert_eq!(kept, (0..MAX_COLOR_SPHERES as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_param_names() {
        let [x, _, _, w] = sphere_param_names(3);
        assert_eq!(x, "_ColorSpheres[3].x");
        assert_eq!(w, "_ColorSpheres[3].w");
        assert_eq!(sphere_fade_param_name(0), "_ColorSphereFades[0]");
    }
}
