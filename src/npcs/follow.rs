//! Companion movement: recruited NPCs trail behind the player.

use bevy::prelude::*;

use super::state::NpcRecord;
use crate::data::GameConfig;
use crate::shared::*;

/// Distance kept between a companion and the player.
pub fn clearance(player_radius: f32, npc_radius: f32, margin: f32) -> f32 {
    player_radius + npc_radius + margin
}

/// Where companion number `slot` should stand: on its own bearing from the
/// player, each slot one clearance further out. A companion standing on the
/// player steps out behind `facing`. Turning around never swings the slot
/// across the player.
pub fn follow_target(
    player_pos: Vec2,
    npc_pos: Vec2,
    facing: Vec2,
    clearance: f32,
    slot: usize,
) -> Vec2 {
    player_pos + bearing(player_pos, npc_pos, facing) * clearance * (slot as f32 + 1.0)
}

/// Pushes `pos` back out to `clearance` from the player if it ended up closer.
pub fn keep_clear(player_pos: Vec2, pos: Vec2, facing: Vec2, clearance: f32) -> Vec2 {
    if pos.distance(player_pos) >= clearance {
        pos
    } else {
        player_pos + bearing(player_pos, pos, facing) * clearance
    }
}

fn bearing(player_pos: Vec2, npc_pos: Vec2, facing: Vec2) -> Vec2 {
    let behind = -facing.normalize_or(Vec2::NEG_Y);
    (npc_pos - player_pos).normalize_or(behind)
}

/// Move from `current` toward `target` by at most `max_step`.
pub fn step_toward(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let offset = target - current;
    let dist = offset.length();
    if dist <= max_step || dist < 0.5 {
        target
    } else {
        current + offset / dist * max_step
    }
}

/// System: every following NPC walks toward its slot and never ends a frame
/// inside the clearance disc around the player.
pub fn follow_player(
    time: Res<Time>,
    config: Res<GameConfig>,
    player_q: Query<(&Transform, &Player)>,
    mut npc_q: Query<(Entity, &NpcRecord, &mut Transform), Without<Player>>,
) {
    let Ok((player_tf, player)) = player_q.get_single() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();
    let max_step = config.follow_speed * time.delta_secs();

    // Stable slot order so companions don't swap places between frames.
    let mut followers: Vec<_> = npc_q
        .iter_mut()
        .filter(|(_, record, _)| record.is_following())
        .collect();
    followers.sort_by_key(|(entity, _, _)| *entity);

    for (slot, (_, record, mut transform)) in followers.into_iter().enumerate() {
        let gap = clearance(
            player.collision_radius,
            record.collision_radius,
            config.follow_margin,
        );
        let facing = player.last_move_dir;
        let current = transform.translation.truncate();
        let target = follow_target(player_pos, current, facing, gap, slot);
        let next = keep_clear(
            player_pos,
            step_toward(current, target, max_step),
            facing,
            gap,
        );
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}
