//! Player ↔ NPC interaction: starting puzzles, reacting to their outcome,
//! acknowledging the thank-you dialogue.

use bevy::prelude::*;

use super::spawning::MinigameSubscription;
use super::state::{NpcPhase, NpcRecord, NpcTransition};
use crate::data::GameConfig;
use crate::shared::*;

/// Index of the nearest candidate whose record accepts interaction at that
/// distance.
pub fn nearest_interactable<'a>(
    player_pos: Vec2,
    candidates: impl IntoIterator<Item = (Vec2, &'a NpcRecord)>,
) -> Option<usize> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, (pos, record))| (index, pos.distance(player_pos), record))
        .filter(|(_, distance, record)| record.can_interact(*distance))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _, _)| index)
}

/// System: E near an idle NPC opens that NPC's puzzle.
pub fn start_minigame_on_interact(
    input: Res<PlayerInput>,
    mut claimed: ResMut<InteractionClaimed>,
    mut bus: ResMut<MinigameBus>,
    player_q: Query<&Transform, With<Player>>,
    mut npc_q: Query<(Entity, &mut NpcRecord, &Transform), Without<Player>>,
) {
    if !input.interact || claimed.0 {
        return;
    }
    let Ok(player_tf) = player_q.get_single() else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    let npcs: Vec<(Entity, Vec2, &NpcRecord)> = npc_q
        .iter()
        .map(|(entity, record, tf)| (entity, tf.translation.truncate(), record))
        .collect();
    let picked = nearest_interactable(
        player_pos,
        npcs.iter().map(|(_, pos, record)| (*pos, *record)),
    )
    .map(|index| npcs[index].0);
    let Some(entity) = picked else {
        return;
    };

    let Ok((_, mut record, _)) = npc_q.get_mut(entity) else {
        return;
    };
    if !record.begin_minigame() {
        return;
    }
    claimed.0 = true;
    info!("[Npcs] {} starts minigame '{}'", record.name, record.minigame);
    bus.publish(MinigameEvent::Started {
        minigame: record.minigame.clone(),
        npc: Some(entity),
    });
}

/// System: drain every NPC's mailbox and apply the outcome.
pub fn apply_minigame_outcomes(
    mut bus: ResMut<MinigameBus>,
    mut dialogue: ResMut<Dialogue>,
    mut npc_q: Query<(&mut NpcRecord, &MinigameSubscription)>,
) {
    for (mut record, subscription) in &mut npc_q {
        for event in bus.drain(subscription.0) {
            match record.handle_event(&event) {
                Some(NpcTransition::Recruited) => {
                    info!("[Npcs] {} recruited", record.name);
                    dialogue.show(&record.name, &record.dialogue);
                }
                Some(NpcTransition::Aborted) => {
                    info!("[Npcs] {}'s minigame closed unsolved", record.name);
                }
                None => {}
            }
        }
    }
}

/// System: E while an NPC's thank-you line is up makes it a companion.
/// Runs before `start_minigame_on_interact` so the same press can't do both.
pub fn acknowledge_dialogue(
    mut commands: Commands,
    input: Res<PlayerInput>,
    mut claimed: ResMut<InteractionClaimed>,
    config: Res<GameConfig>,
    mut dialogue: ResMut<Dialogue>,
    mut audio: ResMut<Audio>,
    mut npc_q: Query<(Entity, &mut NpcRecord)>,
) {
    if !input.interact || claimed.0 {
        return;
    }

    let Some((entity, mut record)) = npc_q
        .iter_mut()
        .find(|(_, record)| record.phase() == NpcPhase::DialogueShown)
    else {
        return;
    };
    if !record.acknowledge() {
        return;
    }
    claimed.0 = true;
    dialogue.hide();
    audio.play_effect(SFX_NPC_UNLOCKED);

    let sphere = commands
        .spawn((
            ColorSphere {
                radius: 0.0,
                fade_width: config.sphere_fade_width,
            },
            SphereGrowth {
                growth: Growth::new(0.0, config.npc_sphere_radius, config.sphere_grow_speed),
                then_pulse: None,
            },
            SphereAnchor(entity),
            Transform::default(),
            SceneEntity,
        ))
        .id();
    record.attach_effect(sphere);
    info!("[Npcs] {} is now following", record.name);
}
