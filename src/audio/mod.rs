//! Audio backend for the default `AudioService`.
//!
//! Gameplay queues `AudioCommand`s through the service; this plugin drains
//! them, looks clips up in the `ClipLibrary` and spawns Bevy audio players.
//! Only the binary adds it, since it needs the asset server.

use std::fmt;

use bevy::audio::Volume;
use bevy::prelude::*;

use crate::shared::*;

const SFX_DIR: &str = "audio/sfx";
const MUSIC_DIR: &str = "audio/music";

const DEFAULT_SFX: [&str; 8] = [
    SFX_NPC_UNLOCKED,
    SFX_COLLECTABLE,
    SFX_CLICK,
    SFX_TOWER_TRIGGER,
    SFX_PAUSE,
    SFX_UNPAUSE,
    "minigame_success",
    "minigame_fail",
];
const DEFAULT_MUSIC: [&str; 2] = ["main_menu", "world"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    UnknownClip(String),
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::UnknownClip(id) => write!(f, "no clip named '{id}'"),
            ClipError::OutOfRange { index, len } => {
                write!(f, "clip index {index} out of range (bank has {len})")
            }
        }
    }
}

impl std::error::Error for ClipError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub id: String,
    pub path: String,
}

/// An indexed list of clips.
#[derive(Debug, Clone, Default)]
pub struct ClipBank {
    clips: Vec<Clip>,
}

impl ClipBank {
    pub fn from_ids(dir: &str, ids: &[&str]) -> Self {
        Self {
            clips: ids
                .iter()
                .map(|id| Clip {
                    id: id.to_string(),
                    path: format!("{dir}/{id}.ogg"),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    pub fn get(&self, index: usize) -> Result<&Clip, ClipError> {
        self.clips.get(index).ok_or(ClipError::OutOfRange {
            index,
            len: self.clips.len(),
        })
    }

    pub fn resolve(&self, id: &str) -> Result<&Clip, ClipError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ClipError::UnknownClip(id.to_string()))?;
        self.get(index)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct ClipLibrary {
    pub sfx: ClipBank,
    pub music: ClipBank,
}

impl Default for ClipLibrary {
    fn default() -> Self {
        Self {
            sfx: ClipBank::from_ids(SFX_DIR, &DEFAULT_SFX),
            music: ClipBank::from_ids(MUSIC_DIR, &DEFAULT_MUSIC),
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct AudioVolume {
    pub music: f32,
    pub sfx: f32,
}

impl Default for AudioVolume {
    fn default() -> Self {
        Self {
            music: 0.6,
            sfx: 0.9,
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct MusicState {
    pub current_track: Option<Entity>,
    pub current_track_id: String,
}

#[derive(Component)]
pub struct MusicTrack;

pub struct SoundPlugin;

impl Plugin for SoundPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClipLibrary>()
            .init_resource::<AudioVolume>()
            .init_resource::<MusicState>()
            .add_systems(PostUpdate, play_queued_audio)
            .add_systems(OnEnter(GameState::Paused), pause_music)
            .add_systems(OnExit(GameState::Paused), resume_music);
    }
}

fn play_queued_audio(
    mut commands: Commands,
    pending: Option<Res<PendingAudio>>,
    library: Res<ClipLibrary>,
    volume: Res<AudioVolume>,
    asset_server: Res<AssetServer>,
    mut music: ResMut<MusicState>,
) {
    let Some(pending) = pending else {
        return;
    };

    for command in pending.0.drain() {
        match command {
            AudioCommand::Effect(id) => match library.sfx.resolve(&id) {
                Ok(clip) => {
                    commands.spawn((
                        AudioPlayer::new(asset_server.load(clip.path.clone())),
                        PlaybackSettings::DESPAWN.with_volume(Volume::new(volume.sfx)),
                    ));
                }
                Err(err) => warn!("[Audio] Sound effect skipped: {err}"),
            },
            AudioCommand::Music(id) => {
                if music.current_track.is_some() && music.current_track_id == id {
                    continue;
                }
                stop_music(&mut commands, &mut music);
                match library.music.resolve(&id) {
                    Ok(clip) => {
                        let entity = commands
                            .spawn((
                                AudioPlayer::new(asset_server.load(clip.path.clone())),
                                PlaybackSettings::LOOP.with_volume(Volume::new(volume.music)),
                                MusicTrack,
                            ))
                            .id();
                        music.current_track = Some(entity);
                        music.current_track_id = id;
                    }
                    Err(err) => error!("[Audio] Music not started: {err}"),
                }
            }
            AudioCommand::Stop => stop_music(&mut commands, &mut music),
        }
    }
}

fn stop_music(commands: &mut Commands, music: &mut MusicState) {
    if let Some(entity) = music.current_track.take() {
        commands.entity(entity).despawn_recursive();
    }
    music.current_track_id.clear();
}

fn pause_music(sinks: Query<&AudioSink, With<MusicTrack>>) {
    for sink in &sinks {
        sink.pause();
    }
}

fn resume_music(sinks: Query<&AudioSink, With<MusicTrack>>) {
    for sink in &sinks {
        sink.play();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_id() {
        let library = ClipLibrary::default();
        let clip = library.sfx.resolve(SFX_TOWER_TRIGGER).expect("known clip");
        assert_eq!(clip.path, "audio/sfx/tower_trigger.ogg");
        assert_eq!(
            library.music.resolve("credits"),
            Err(ClipError::UnknownClip("credits".into()))
        );
    }

    #[test]
    fn test_index_validation() {
        let bank = ClipBank::from_ids(SFX_DIR, &["a", "b"]);
        assert!(bank.get(1).is_ok());
        assert_eq!(bank.get(2), Err(ClipError::OutOfRange { index: 2, len: 2 }));
        assert!(ClipBank::default().get(0).is_err());
    }

    #[test]
    fn test_sound_ids_used_by_gameplay_are_known() {
        let library = ClipLibrary::default();
        for id in [SFX_NPC_UNLOCKED, SFX_COLLECTABLE, SFX_CLICK, SFX_PAUSE, SFX_UNPAUSE] {
            assert!(library.sfx.index_of(id).is_some(), "{id} missing");
        }
    }

    #[test]
    fn test_every_bundled_effect_is_played_somewhere() {
        let definitions = crate::data::parse_minigames(crate::data::DEFAULT_MINIGAMES)
            .expect("bundled minigames parse");
        let mut played = vec![
            SFX_NPC_UNLOCKED.to_string(),
            SFX_COLLECTABLE.to_string(),
            SFX_CLICK.to_string(),
            SFX_TOWER_TRIGGER.to_string(),
            SFX_PAUSE.to_string(),
            SFX_UNPAUSE.to_string(),
        ];
        for definition in &definitions {
            played.extend(definition.success_sound.clone());
            played.extend(definition.fail_sound.clone());
        }
        for id in DEFAULT_SFX {
            assert!(played.iter().any(|p| p == id), "{id} is never played");
        }
    }
}
