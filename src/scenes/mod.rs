//! Scene orchestration.
//!
//! Gameplay asks for scenes by name through `SceneOrchestrator`, which
//! resolves the name and forwards it to the injected `SceneLoader`. The
//! default loader queues names in `PendingSceneLoads`; `apply_scene_loads`
//! drains that queue, tears down every `SceneEntity`, switches to the
//! scene's entry state, starts its music and announces `SceneLoadedEvent`
//! so the other domains can spawn their content.

use std::fmt;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::data::GameConfig;
use crate::shared::*;

mod flow;

pub use flow::{EndPanel, FlowTimer, MenuCursor, MAIN_MENU_OPTIONS, PAUSE_OPTIONS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    EmptyName,
    UnknownScene(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EmptyName => write!(f, "scene name is empty"),
            SceneError::UnknownScene(name) => write!(f, "unknown scene '{name}'"),
        }
    }
}

impl std::error::Error for SceneError {}

pub fn resolve_scene(name: &str) -> Result<SceneId, SceneError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SceneError::EmptyName);
    }
    SceneId::from_name(name).ok_or_else(|| SceneError::UnknownScene(name.to_string()))
}

/// Scene-load entry point for gameplay systems.
#[derive(SystemParam)]
pub struct SceneOrchestrator<'w> {
    loader: ResMut<'w, Loader>,
}

impl SceneOrchestrator<'_> {
    pub fn load(&mut self, scene: SceneId) {
        info!("[Scenes] Requesting '{}'", scene.name());
        self.loader.load(scene.name());
    }

    /// Load by name. Empty or unknown names are logged and ignored.
    pub fn load_named(&mut self, name: &str) -> bool {
        match resolve_scene(name) {
            Ok(scene) => {
                self.load(scene);
                true
            }
            Err(err) => {
                error!("[Scenes] Cannot load: {err}");
                false
            }
        }
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentScene>()
            .init_resource::<FlowTimer>()
            .init_resource::<EndPanel>()
            .init_resource::<MenuCursor>()
            .add_event::<SceneLoadedEvent>()
            .add_systems(PreUpdate, apply_scene_loads);

        flow::register(app);
    }
}

/// Music for a freshly loaded scene; `None` means silence.
pub fn scene_music(scene: SceneId, config: &GameConfig) -> Option<&str> {
    match scene {
        SceneId::MainMenu => Some(config.main_menu_music.as_str()),
        SceneId::World => Some(config.world_music.as_str()),
        SceneId::Intro | SceneId::VideoEnd | SceneId::Ending => None,
    }
}

/// Backend of the default `SceneLoader`.
#[allow(clippy::too_many_arguments)]
pub fn apply_scene_loads(
    mut commands: Commands,
    pending: Option<Res<PendingSceneLoads>>,
    config: Res<GameConfig>,
    mut current: ResMut<CurrentScene>,
    mut next_state: ResMut<NextState<GameState>>,
    mut audio: ResMut<Audio>,
    mut dialogue: ResMut<Dialogue>,
    mut loaded: EventWriter<SceneLoadedEvent>,
    scene_entities: Query<Entity, With<SceneEntity>>,
) {
    let Some(pending) = pending else {
        return;
    };

    for name in pending.0.drain() {
        let scene = match resolve_scene(&name) {
            Ok(scene) => scene,
            Err(err) => {
                error!("[Scenes] Ignoring load request: {err}");
                continue;
            }
        };

        let mut despawned = 0;
        for entity in &scene_entities {
            commands.entity(entity).despawn_recursive();
            despawned += 1;
        }
        commands.remove_resource::<PendingSceneTransition>();
        dialogue.hide();

        current.scene = Some(scene);
        current.generation += 1;
        next_state.set(scene.entry_state());

        match scene_music(scene, &config) {
            Some(track) => audio.play_music(track),
            None => audio.stop(),
        }

        info!(
            "[Scenes] Loaded '{}' (generation {}, {despawned} entities torn down)",
            scene.name(),
            current.generation
        );
        loaded.send(SceneLoadedEvent { scene });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        for scene in SceneId::ALL {
            assert_eq!(resolve_scene(scene.name()), Ok(scene));
        }
        assert_eq!(resolve_scene("IntroScene"), Ok(SceneId::Intro));
    }

    #[test]
    fn test_resolve_rejects_empty_and_unknown() {
        assert_eq!(resolve_scene(""), Err(SceneError::EmptyName));
        assert_eq!(resolve_scene("   "), Err(SceneError::EmptyName));
        assert_eq!(
            resolve_scene("Credits"),
            Err(SceneError::UnknownScene("Credits".into()))
        );
    }

    #[test]
    fn test_music_per_scene() {
        let config = GameConfig::default();
        assert_eq!(scene_music(SceneId::World, &config), Some("world"));
        assert_eq!(scene_music(SceneId::MainMenu, &config), Some("main_menu"));
        assert_eq!(scene_music(SceneId::VideoEnd, &config), None);
    }
}
