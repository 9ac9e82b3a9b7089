//! Guild members and roles
//!
//! Identity comes from the auth/role source; this is the shape callers pass
//! into the progression layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::progression::{BadgeId, RoleBadge};

/// Opaque user identifier (Discord snowflake)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Guild roles relevant to progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Member,
    Booster,
    Moderator,
    Developer,
    Admin,
    Founder,
}

impl Role {
    /// Staff roles do not earn chat XP
    pub fn is_xp_exempt(&self) -> bool {
        matches!(self, Role::Developer | Role::Admin | Role::Founder)
    }

    /// Badge granted by holding this role
    pub fn badge(&self) -> Option<RoleBadge> {
        match self {
            Role::Member => None,
            Role::Booster => Some(RoleBadge::Booster),
            Role::Moderator => Some(RoleBadge::Moderator),
            Role::Developer => Some(RoleBadge::Developer),
            Role::Admin => Some(RoleBadge::Admin),
            Role::Founder => Some(RoleBadge::Founder),
        }
    }
}

/// A member as seen by the progression layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
    pub xp: i64,
    pub roles: BTreeSet<Role>,
}

impl Member {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            display_name: display_name.into(),
            xp: 0,
            roles: BTreeSet::from([Role::Member]),
        }
    }

    pub fn with_xp(mut self, xp: i64) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin) || self.roles.contains(&Role::Founder)
    }

    pub fn is_xp_exempt(&self) -> bool {
        self.roles.iter().any(Role::is_xp_exempt)
    }

    /// Role badges, in display order
    pub fn role_badges(&self) -> Vec<RoleBadge> {
        let mut badges: Vec<RoleBadge> = self.roles.iter().filter_map(Role::badge).collect();
        badges.sort();
        badges.dedup();
        badges
    }

    pub fn role_badge_ids(&self) -> BTreeSet<BadgeId> {
        self.role_badges().iter().map(RoleBadge::id).collect()
    }
}
