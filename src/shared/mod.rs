//! Shared components, resources, events, and states for Resonance.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain's systems directly; they talk
//! through the resources, events and services declared below.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod bus;
pub mod sequence;
pub mod services;

pub use bus::*;
pub use sequence::*;
pub use services::*;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    MainMenu,
    Intro,
    Playing,
    /// Modal drag-and-drop minigame; virtual time is paused.
    Minigame,
    /// Tower confirmation prompt is up.
    TowerPrompt,
    Paused,
    /// The end-of-level video sequence.
    Cutscene,
    Ending,
}

// ═══════════════════════════════════════════════════════════════════════
// SCENES
// ═══════════════════════════════════════════════════════════════════════

/// Every loadable scene. Scene names are the strings handed to the
/// `SceneLoader` service and authored in config / world data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneId {
    MainMenu,
    Intro,
    World,
    VideoEnd,
    Ending,
}

impl SceneId {
    pub const ALL: [SceneId; 5] = [
        SceneId::MainMenu,
        SceneId::Intro,
        SceneId::World,
        SceneId::VideoEnd,
        SceneId::Ending,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneId::MainMenu => "MainMenu",
            SceneId::Intro => "IntroScene",
            SceneId::World => "World",
            SceneId::VideoEnd => "VideoEnd",
            SceneId::Ending => "Ending",
        }
    }

    pub fn from_name(name: &str) -> Option<SceneId> {
        SceneId::ALL.into_iter().find(|scene| scene.name() == name)
    }

    /// The game state a freshly loaded scene starts in.
    pub fn entry_state(self) -> GameState {
        match self {
            SceneId::MainMenu => GameState::MainMenu,
            SceneId::Intro => GameState::Intro,
            SceneId::World => GameState::Playing,
            SceneId::VideoEnd => GameState::Cutscene,
            SceneId::Ending => GameState::Ending,
        }
    }
}

/// Marks an entity that belongs to the currently loaded scene.
/// Everything carrying it is despawned when another scene loads.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SceneEntity;

/// The scene that was most recently loaded, plus a counter that increases
/// on every load (including reloads of the same scene).
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentScene {
    pub scene: Option<SceneId>,
    pub generation: u32,
}

/// A scene load scheduled to fire once its delay runs out (virtual time).
/// Removed when it fires or when any scene loads first.
#[derive(Resource, Debug, Clone)]
pub struct PendingSceneTransition {
    pub scene: String,
    pub delay: Delay,
}

/// Sent after a scene's previous content was torn down and its entry state
/// was requested. Domain plugins spawn their scene content in response.
#[derive(Event, Debug, Clone, Copy)]
pub struct SceneLoadedEvent {
    pub scene: SceneId,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone)]
pub struct Player {
    /// World units per second.
    pub speed: f32,
    pub collision_radius: f32,
    /// Last non-zero movement direction. A companion standing on top of the
    /// player steps out behind it.
    pub last_move_dir: Vec2,
    pub is_moving: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            speed: 160.0,
            collision_radius: 12.0,
            last_move_dir: Vec2::NEG_Y,
            is_moving: false,
        }
    }
}

/// Systems that move the player. Anything that reacts to the player's
/// position this frame runs after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerMotion;

// ═══════════════════════════════════════════════════════════════════════
// COLOUR RESTORATION
// ═══════════════════════════════════════════════════════════════════════

/// At most this many spheres reach the effect channel each frame.
pub const MAX_COLOR_SPHERES: usize = 10;

/// A disc of restored colour in an otherwise desaturated world.
/// Position comes from the entity's `Transform`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ColorSphere {
    pub radius: f32,
    /// Width of the soft edge between colour and greyscale.
    pub fade_width: f32,
}

/// Grows a sphere's radius toward a target. Removing the component stops
/// growth and keeps the radius reached so far.
#[derive(Component, Debug, Clone)]
pub struct SphereGrowth {
    pub growth: Growth,
    /// Pulse started once the target is reached.
    pub then_pulse: Option<Pulse>,
}

/// Endless radius oscillation.
#[derive(Component, Debug, Clone)]
pub struct SpherePulse(pub Pulse);

/// Keeps a sphere centred on another entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct SphereAnchor(pub Entity);

/// Sprite whose colour fades to grey outside every colour sphere.
#[derive(Component, Debug, Clone, Copy)]
pub struct Tinted {
    pub base: Color,
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT: hardware-agnostic actions for the current frame
// ═══════════════════════════════════════════════════════════════════════

/// Which set of bindings is live. Chosen from `GameState` every frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Gameplay,
    Menu,
    Minigame,
    Cutscene,
}

/// Actions for the current frame. Written once in `PreUpdate` by the input
/// plugin; every other domain only reads it.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    /// Talk to / acknowledge an NPC.
    pub interact: bool,
    pub ui_confirm: bool,
    pub ui_cancel: bool,
    pub ui_up: bool,
    pub ui_down: bool,
    pub pause: bool,
    pub skip_cutscene: bool,
    /// Put every minigame item back on its start position.
    pub restart: bool,
    pub any_key: bool,
    /// Cursor position in world space, if the cursor is over the window.
    pub cursor_world: Option<Vec2>,
    pub pointer_pressed: bool,
    pub pointer_held: bool,
    pub pointer_released: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub ui_confirm: KeyCode,
    pub ui_cancel: KeyCode,
    pub pause: KeyCode,
    pub pause_alt: KeyCode,
    pub skip_cutscene: KeyCode,
    pub restart: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
            ui_confirm: KeyCode::Enter,
            ui_cancel: KeyCode::Escape,
            pause: KeyCode::Escape,
            pause_alt: KeyCode::KeyP,
            skip_cutscene: KeyCode::Space,
            restart: KeyCode::KeyR,
        }
    }
}

/// Set by the first system that consumes this frame's interact / confirm
/// press so that later systems don't act on the same key.
#[derive(Resource, Debug, Default)]
pub struct InteractionClaimed(pub bool);

// ═══════════════════════════════════════════════════════════════════════
// SHARED IDS
// ═══════════════════════════════════════════════════════════════════════

pub type MinigameId = String;
pub type ItemId = String;
pub type ZoneId = String;

// Sound effect ids understood by the audio service.
pub const SFX_NPC_UNLOCKED: &str = "npc_unlocked";
pub const SFX_COLLECTABLE: &str = "collectable";
pub const SFX_CLICK: &str = "click";
pub const SFX_TOWER_TRIGGER: &str = "tower_trigger";
pub const SFX_PAUSE: &str = "pause";
pub const SFX_UNPAUSE: &str = "unpause";

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Z layers for sprites.
pub const Z_GROUND: f32 = 0.0;
pub const Z_ACTORS: f32 = 10.0;
pub const Z_EFFECTS: f32 = 5.0;
pub const Z_MINIGAME: f32 = 100.0;

// ═══════════════════════════════════════════════════════════════════════
// GAME TIME
// ═══════════════════════════════════════════════════════════════════════

/// Freeze virtual time. Modal screens (minigame, pause menu) run on
/// `Time<Real>` while it is frozen.
pub fn pause_game_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

pub fn resume_game_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}
