//! Profile card
//!
//! Everything a profile or message header needs to draw a member's level,
//! rank, XP bar and badge row, computed from the member's XP on demand.

use serde::Serialize;

use super::member::{Member, UserId};
use crate::error::Result;
use crate::progression::{Progress, ProgressionCalculator};

/// A badge ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub id: String,
    pub label: String,
    /// Granted by a role rather than by level
    pub from_role: bool,
}

/// Derived profile view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub user: UserId,
    pub display_name: String,
    pub progress: Progress,
    pub progress_fraction: f32,
    /// Role badges first, then level badges in catalog order
    pub badges: Vec<BadgeView>,
    pub next_rank: Option<String>,
    pub next_badge: Option<BadgeView>,
    pub next_badge_level: Option<u32>,
}

impl ProfileCard {
    pub fn build(calculator: &ProgressionCalculator, member: &Member) -> Result<Self> {
        let progress = calculator.snapshot(member.xp)?;

        let mut badges: Vec<BadgeView> = member
            .role_badges()
            .iter()
            .map(|role| BadgeView {
                id: role.id().to_string(),
                label: role.label().to_string(),
                from_role: true,
            })
            .collect();
        badges.extend(
            calculator
                .catalog()
                .badges()
                .iter()
                .filter(|b| progress.badges.contains(&b.id))
                .map(|b| BadgeView {
                    id: b.id.to_string(),
                    label: b.label.clone(),
                    from_role: false,
                }),
        );

        let next_rank = calculator.ranks().next_tier(progress.level).map(|t| t.label.clone());
        let next = calculator.catalog().next_locked(progress.level);

        Ok(Self {
            user: member.id,
            display_name: member.display_name.clone(),
            progress_fraction: progress.progress_fraction(),
            progress,
            badges,
            next_rank,
            next_badge: next.map(|b| BadgeView {
                id: b.id.to_string(),
                label: b.label.clone(),
                from_role: false,
            }),
            next_badge_level: next.map(|b| b.min_level),
        })
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn rank(&self) -> &str {
        &self.progress.rank
    }
}
