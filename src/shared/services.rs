//! Engine-facing collaborator services.
//!
//! Gameplay code never talks to the audio engine, the renderer, the UI tree or
//! the scene system directly. It calls one of the four traits below through a
//! session-scoped `Service<dyn Trait>` resource. The default implementations
//! queue commands in an [`Outbox`]; backend systems (audio playback, UI text,
//! state changes) drain the other end. Tests swap in their own recorders.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::*;

pub trait AudioService: Send + Sync + 'static {
    fn play_effect(&mut self, id: &str);
    fn play_music(&mut self, id: &str);
    /// Stop the current music track.
    fn stop(&mut self);
}

pub trait SceneLoader: Send + Sync + 'static {
    fn load(&mut self, name: &str);
}

/// Opaque visual-effect channel (post-process shader globals).
pub trait EffectRenderer: Send + Sync + 'static {
    fn set_parameter(&mut self, name: &str, value: f32);
}

pub trait DialogueDisplay: Send + Sync + 'static {
    fn show(&mut self, speaker: &str, text: &str);
    fn hide(&mut self);
}

/// Resource wrapper that owns one service implementation.
pub struct Service<S: ?Sized>(Box<S>);

impl<S: ?Sized + Send + Sync + 'static> Resource for Service<S> {}

impl<S: ?Sized> Service<S> {
    pub fn new(inner: Box<S>) -> Self {
        Self(inner)
    }
}

impl<S: ?Sized> Deref for Service<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: ?Sized> DerefMut for Service<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

pub type Audio = Service<dyn AudioService>;
pub type Loader = Service<dyn SceneLoader>;
pub type Effects = Service<dyn EffectRenderer>;
pub type Dialogue = Service<dyn DialogueDisplay>;

// ═══════════════════════════════════════════════════════════════════════
// OUTBOX: shared queue between a service and its backend
// ═══════════════════════════════════════════════════════════════════════

pub struct Outbox<T>(Arc<Mutex<Vec<T>>>);

impl<T> Clone for Outbox<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for Outbox<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }
}

impl<T> Outbox<T> {
    pub fn push(&self, item: T) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(item);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<T> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    Effect(String),
    Music(String),
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueCommand {
    Show { speaker: String, text: String },
    Hide,
}

pub struct QueuedAudio(pub Outbox<AudioCommand>);

impl AudioService for QueuedAudio {
    fn play_effect(&mut self, id: &str) {
        self.0.push(AudioCommand::Effect(id.to_string()));
    }

    fn play_music(&mut self, id: &str) {
        self.0.push(AudioCommand::Music(id.to_string()));
    }

    fn stop(&mut self) {
        self.0.push(AudioCommand::Stop);
    }
}

pub struct QueuedSceneLoader(pub Outbox<String>);

impl SceneLoader for QueuedSceneLoader {
    fn load(&mut self, name: &str) {
        self.0.push(name.to_string());
    }
}

pub struct QueuedDialogue(pub Outbox<DialogueCommand>);

impl DialogueDisplay for QueuedDialogue {
    fn show(&mut self, speaker: &str, text: &str) {
        self.0.push(DialogueCommand::Show {
            speaker: speaker.to_string(),
            text: text.to_string(),
        });
    }

    fn hide(&mut self) {
        self.0.push(DialogueCommand::Hide);
    }
}

/// Latest value written for every effect parameter.
#[derive(Clone, Default)]
pub struct ParameterTable(Arc<Mutex<HashMap<String, f32>>>);

impl ParameterTable {
    pub fn get(&self, name: &str) -> Option<f32> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    }

    pub fn snapshot(&self) -> HashMap<String, f32> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl EffectRenderer for ParameterTable {
    fn set_parameter(&mut self, name: &str, value: f32) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
    }
}

// Backend ends of the default services.

#[derive(Resource, Clone, Default)]
pub struct PendingAudio(pub Outbox<AudioCommand>);

#[derive(Resource, Clone, Default)]
pub struct PendingSceneLoads(pub Outbox<String>);

#[derive(Resource, Clone, Default)]
pub struct PendingDialogue(pub Outbox<DialogueCommand>);

#[derive(Resource, Clone, Default)]
pub struct EffectParameters(pub ParameterTable);

/// Install the queue-backed service implementations together with the
/// backend resources that read from them. Services already present are kept.
pub fn install_default_services(app: &mut App) {
    let world = app.world_mut();

    if !world.contains_resource::<Audio>() {
        let pending = PendingAudio::default();
        world.insert_resource(Audio::new(Box::new(QueuedAudio(pending.0.clone()))));
        world.insert_resource(pending);
    }
    if !world.contains_resource::<Loader>() {
        let pending = PendingSceneLoads::default();
        world.insert_resource(Loader::new(Box::new(QueuedSceneLoader(pending.0.clone()))));
        world.insert_resource(pending);
    }
    if !world.contains_resource::<Dialogue>() {
        let pending = PendingDialogue::default();
        world.insert_resource(Dialogue::new(Box::new(QueuedDialogue(pending.0.clone()))));
        world.insert_resource(pending);
    }
    if !world.contains_resource::<Effects>() {
        let table = ParameterTable::default();
        world.insert_resource(Effects::new(Box::new(table.clone())));
        world.insert_resource(EffectParameters(table));
    }
}
