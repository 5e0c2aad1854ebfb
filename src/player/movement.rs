use bevy::prelude::*;

use crate::shared::*;

/// The walkable area is a square of this half-size around the origin.
pub const WORLD_HALF_EXTENT: f32 = 640.0;

/// New position after moving along `axis` for `dt` seconds, kept inside
/// the walkable area.
pub fn apply_move(pos: Vec2, axis: Vec2, speed: f32, dt: f32) -> Vec2 {
    let step = axis.normalize_or_zero() * speed * dt;
    (pos + step).clamp(Vec2::splat(-WORLD_HALF_EXTENT), Vec2::splat(WORLD_HALF_EXTENT))
}

/// Sprite facing after horizontal input `x`; unchanged when `x` is zero.
pub fn facing_right(current: bool, x: f32) -> bool {
    if x > 0.0 {
        true
    } else if x < 0.0 {
        false
    } else {
        current
    }
}

/// Moves the player and records the last direction for companions.
pub fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut query: Query<(&mut Transform, &mut Player, &mut Sprite)>,
) {
    let Ok((mut transform, mut player, mut sprite)) = query.get_single_mut() else {
        return;
    };

    let axis = input.move_axis;
    if axis.length_squared() < 0.01 {
        player.is_moving = false;
        return;
    }

    player.is_moving = true;
    player.last_move_dir = axis.normalize_or_zero();
    sprite.flip_x = facing_right(sprite.flip_x, axis.x);

    let next = apply_move(
        transform.translation.truncate(),
        axis,
        player.speed,
        time.delta_secs(),
    );
    transform.translation.x = next.x;
    transform.translation.y = next.y;
}
