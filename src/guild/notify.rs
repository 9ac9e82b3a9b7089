//! Level-up notification sinks
//!
//! The UI layer (toast, banner) implements `NotificationSink`. Each event is
//! handed over by value, once.

use parking_lot::Mutex;
use std::sync::Arc;

use super::member::UserId;
use crate::progression::LevelUpEvent;

/// Receiver for level-up events
pub trait NotificationSink: Send + Sync {
    fn level_up(&self, user: UserId, event: LevelUpEvent);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn level_up(&self, user: UserId, event: LevelUpEvent) {
        (**self).level_up(user, event)
    }
}

/// Writes level-ups to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn level_up(&self, user: UserId, event: LevelUpEvent) {
        log::info!(
            "User {} reached level {} ({}){}",
            user,
            event.to_level,
            event.rank,
            if event.rank_changed { " - new rank" } else { "" }
        );
        for badge in &event.newly_unlocked_badges {
            log::info!("User {} unlocked badge {}", user, badge);
        }
    }
}

/// Keeps every event it receives, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(UserId, LevelUpEvent)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<(UserId, LevelUpEvent)> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Events for one user, without draining
    pub fn events_for(&self, user: UserId) -> Vec<LevelUpEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn level_up(&self, user: UserId, event: LevelUpEvent) {
        self.events.lock().push((user, event));
    }
}
