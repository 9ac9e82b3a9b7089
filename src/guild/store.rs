//! XP storage seam
//!
//! Persistence belongs to the caller. The store's one obligation is to
//! serialise XP updates per user, so a read-modify-write can never lose a
//! concurrent grant (and with it a level-up).

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use super::member::UserId;
use crate::error::{ProgressionError, Result};
use crate::progression::add_xp;

/// Result of one atomic XP update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpChange {
    pub user: UserId,
    pub old_xp: i64,
    pub new_xp: i64,
}

/// Per-user XP storage
pub trait XpStore: Send + Sync {
    /// Current XP; unknown users are at 0
    fn current_xp(&self, user: UserId) -> i64;

    /// Add `delta` atomically and report the before/after pair
    fn apply_gain(&self, user: UserId, delta: i64) -> Result<XpChange>;
}

impl<T: XpStore + ?Sized> XpStore for Arc<T> {
    fn current_xp(&self, user: UserId) -> i64 {
        (**self).current_xp(user)
    }

    fn apply_gain(&self, user: UserId, delta: i64) -> Result<XpChange> {
        (**self).apply_gain(user, delta)
    }
}

/// In-memory store with one lock per user
#[derive(Debug, Default)]
pub struct MemoryXpStore {
    users: RwLock<HashMap<UserId, Arc<Mutex<i64>>>>,
}

impl MemoryXpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's XP, e.g. from the profile backend at startup
    pub fn insert(&self, user: UserId, xp: i64) -> Result<()> {
        if xp < 0 {
            return Err(ProgressionError::invalid(format!(
                "stored XP for user {} must be non-negative, got {}",
                user, xp
            )));
        }
        self.users.write().insert(user, Arc::new(Mutex::new(xp)));
        Ok(())
    }

    fn slot(&self, user: UserId) -> Arc<Mutex<i64>> {
        if let Some(slot) = self.users.read().get(&user) {
            return Arc::clone(slot);
        }
        Arc::clone(self.users.write().entry(user).or_default())
    }
}

impl XpStore for MemoryXpStore {
    fn current_xp(&self, user: UserId) -> i64 {
        self.users.read().get(&user).map(|slot| *slot.lock()).unwrap_or(0)
    }

    fn apply_gain(&self, user: UserId, delta: i64) -> Result<XpChange> {
        let slot = self.slot(user);
        let mut xp = slot.lock();
        let old_xp = *xp;
        let new_xp = add_xp(old_xp, delta)?;
        *xp = new_xp;
        Ok(XpChange { user, old_xp, new_xp })
    }
}
