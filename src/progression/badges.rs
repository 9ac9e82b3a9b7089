//! Badge catalog
//!
//! Level badges unlock from the level curve; role badges come from guild
//! role membership and never from XP.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{ProgressionError, Result};

/// Validated badge identifier (`[a-z0-9_]+`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BadgeId(String);

impl BadgeId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ProgressionError::config("badge id is empty"));
        }
        if !id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
            return Err(ProgressionError::config(format!(
                "badge id '{}' has invalid characters",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BadgeId {
    type Error = ProgressionError;

    fn try_from(value: String) -> Result<Self> {
        BadgeId::new(value)
    }
}

impl From<BadgeId> for String {
    fn from(id: BadgeId) -> Self {
        id.0
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A badge granted automatically once a level is reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBadge {
    pub id: BadgeId,
    pub min_level: u32,
    pub label: String,
}

/// The level-badge table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    badges: Vec<LevelBadge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<LevelBadge>) -> Result<Self> {
        let catalog = Self { badges };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids must be unique and thresholds at least level 1
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for badge in &self.badges {
            if badge.min_level == 0 {
                return Err(ProgressionError::config(format!(
                    "badge '{}' has threshold level 0",
                    badge.id
                )));
            }
            if !seen.insert(&badge.id) {
                return Err(ProgressionError::config(format!("duplicate badge id '{}'", badge.id)));
            }
        }
        Ok(())
    }

    /// Every level badge with a threshold at or below `level`
    pub fn unlocked_at(&self, level: u32) -> BTreeSet<BadgeId> {
        self.badges
            .iter()
            .filter(|b| b.min_level <= level)
            .map(|b| b.id.clone())
            .collect()
    }

    /// Closest badge still locked at `level`
    pub fn next_locked(&self, level: u32) -> Option<&LevelBadge> {
        self.badges
            .iter()
            .filter(|b| b.min_level > level)
            .min_by_key(|b| b.min_level)
    }

    pub fn get(&self, id: &BadgeId) -> Option<&LevelBadge> {
        self.badges.iter().find(|b| &b.id == id)
    }

    pub fn badges(&self) -> &[LevelBadge] {
        &self.badges
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        let rows = [
            (5, "Rising Member"),
            (10, "Regular"),
            (20, "Veteran"),
            (25, "Elite"),
            (50, "Champion"),
            (75, "Legend"),
            (100, "Mythic"),
        ];
        Self {
            badges: rows
                .iter()
                .map(|&(level, label)| LevelBadge {
                    id: BadgeId(format!("level_{}", level)),
                    min_level: level,
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}

/// Badges granted by role membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleBadge {
    Founder,
    Admin,
    Developer,
    Moderator,
    Booster,
}

impl RoleBadge {
    pub const ALL: [RoleBadge; 5] = [
        RoleBadge::Founder,
        RoleBadge::Admin,
        RoleBadge::Developer,
        RoleBadge::Moderator,
        RoleBadge::Booster,
    ];

    pub fn id(&self) -> BadgeId {
        BadgeId(self.id_str().to_string())
    }

    fn id_str(&self) -> &'static str {
        match self {
            RoleBadge::Founder => "founder",
            RoleBadge::Admin => "admin",
            RoleBadge::Developer => "developer",
            RoleBadge::Moderator => "moderator",
            RoleBadge::Booster => "booster",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoleBadge::Founder => "Founder",
            RoleBadge::Admin => "Administrator",
            RoleBadge::Developer => "Developer",
            RoleBadge::Moderator => "Moderator",
            RoleBadge::Booster => "Server Booster",
        }
    }
}
