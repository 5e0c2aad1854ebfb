//! Ordered publish/subscribe channel for gameplay lifecycle events.
//!
//! A bus keeps a single list of listeners in subscription order. Two kinds of
//! listener share that list:
//!
//! * **callbacks** run inline inside `publish`, on the calling system;
//! * **mailboxes** receive a clone of the event, queued until the owning
//!   system drains it (usually later in the same frame).
//!
//! Dispatch always walks the list front to back, so a callback subscribed
//! before a mailbox observes an event before the mailbox receives it.
//! `publish` holds `&mut self` for the whole dispatch, so a listener can never
//! subscribe or unsubscribe while an event is being delivered.

use std::collections::VecDeque;
use std::fmt;

use bevy::prelude::*;

use super::MinigameId;

/// Handle returned by `subscribe*`. Ids are never reused within a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

enum Listener<E> {
    Callback(Box<dyn FnMut(&E) + Send + Sync>),
    Mailbox(VecDeque<E>),
}

pub struct EventBus<E> {
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    next_id: u64,
    published: u64,
}

impl<E: Send + Sync + 'static> Resource for EventBus<E> {}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            published: 0,
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("published", &self.published)
            .finish()
    }
}

impl<E: Clone> EventBus<E> {
    /// Register a callback invoked synchronously on every `publish`.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.push_listener(Listener::Callback(Box::new(callback)))
    }

    /// Register a mailbox. Events are queued for it until `drain` is called.
    pub fn subscribe_mailbox(&mut self) -> SubscriptionId {
        self.push_listener(Listener::Mailbox(VecDeque::new()))
    }

    /// Remove a listener. Undelivered mailbox events are dropped.
    /// Returns `false` when the id is unknown (already removed).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every current listener in subscription order.
    /// Publishing with no listeners is not an error. Returns how many
    /// listeners the event reached.
    pub fn publish(&mut self, event: E) -> usize {
        self.published += 1;
        for (_, listener) in self.listeners.iter_mut() {
            match listener {
                Listener::Callback(callback) => callback(&event),
                Listener::Mailbox(queue) => queue.push_back(event.clone()),
            }
        }
        self.listeners.len()
    }

    /// Take every queued event for a mailbox, oldest first. Unknown ids and
    /// callback listeners yield nothing.
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<E> {
        self.listeners
            .iter_mut()
            .find(|(listener_id, _)| *listener_id == id)
            .map(|(_, listener)| match listener {
                Listener::Mailbox(queue) => queue.drain(..).collect(),
                Listener::Callback(_) => Vec::new(),
            })
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Total number of `publish` calls over the bus lifetime.
    pub fn published_count(&self) -> u64 {
        self.published
    }

    fn push_listener(&mut self, listener: Listener<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MINIGAME LIFECYCLE EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum MinigameEvent {
    /// An NPC asked for its minigame to be shown.
    Started {
        minigame: MinigameId,
        npc: Option<Entity>,
    },
    /// The minigame finished. Only `success: true` recruits an NPC.
    Completed { minigame: MinigameId, success: bool },
    /// The panel was dismissed, after completion or by the player.
    Closed { minigame: MinigameId },
}

impl MinigameEvent {
    pub fn minigame(&self) -> &str {
        match self {
            MinigameEvent::Started { minigame, .. }
            | MinigameEvent::Completed { minigame, .. }
            | MinigameEvent::Closed { minigame } => minigame,
        }
    }
}

pub type MinigameBus = EventBus<MinigameEvent>;
