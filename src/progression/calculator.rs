//! Progression calculator
//!
//! Maps an XP total to level, rank and level badges. Holds only immutable
//! tables, so one instance can be shared across threads freely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::badges::{BadgeCatalog, BadgeId};
use super::curve::LevelCurve;
use super::ranks::{RankTable, RankTier};
use crate::error::{ProgressionError, Result};

/// Everything derived from one XP value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub xp: i64,
    pub level: u32,
    pub rank: String,
    pub badges: BTreeSet<BadgeId>,
    /// Total XP at which the current level started
    pub level_floor_xp: i64,
    /// Total XP needed for the next level, `None` at the top of a stepped curve
    pub next_level_xp: Option<i64>,
}

impl Progress {
    /// Fraction of the current level completed, for XP bars (0.0..=1.0)
    pub fn progress_fraction(&self) -> f32 {
        match self.next_level_xp {
            Some(next) if next > self.level_floor_xp => {
                let span = (next - self.level_floor_xp) as f64;
                (((self.xp - self.level_floor_xp) as f64) / span).clamp(0.0, 1.0) as f32
            }
            _ => 1.0,
        }
    }

    /// XP still missing for the next level
    pub fn xp_to_next(&self) -> Option<i64> {
        self.next_level_xp.map(|next| (next - self.xp).max(0))
    }
}

/// Pure XP -> {level, rank, badges} mapping over fixed tables
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressionCalculator {
    curve: LevelCurve,
    ranks: RankTable,
    badges: BadgeCatalog,
}

impl ProgressionCalculator {
    /// Build a calculator, validating every table up front
    pub fn new(curve: LevelCurve, ranks: RankTable, badges: BadgeCatalog) -> Result<Self> {
        curve.validate()?;
        ranks.validate()?;
        badges.validate()?;
        Ok(Self { curve, ranks, badges })
    }

    pub fn level_for_xp(&self, xp: i64) -> Result<u32> {
        self.curve.level_for_xp(xp)
    }

    pub fn rank_for_level(&self, level: u32) -> Result<&RankTier> {
        self.ranks.rank_for_level(level)
    }

    /// Level badges unlocked at `xp`
    pub fn badges_for_xp(&self, xp: i64) -> Result<BTreeSet<BadgeId>> {
        let level = self.level_for_xp(xp)?;
        Ok(self.badges.unlocked_at(level))
    }

    /// Checked XP addition; never wraps
    pub fn add_xp(&self, current: i64, delta: i64) -> Result<i64> {
        add_xp(current, delta)
    }

    /// Level, rank, badges and bar position for `xp`
    pub fn snapshot(&self, xp: i64) -> Result<Progress> {
        let level = self.level_for_xp(xp)?;
        let rank = self.rank_for_level(level)?.label.clone();
        let level_floor_xp = self.curve.xp_for_level(level).unwrap_or(0);
        let next_level_xp = level.checked_add(1).and_then(|next| self.curve.xp_for_level(next));
        Ok(Progress {
            xp,
            level,
            rank,
            badges: self.badges.unlocked_at(level),
            level_floor_xp,
            next_level_xp,
        })
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.badges
    }
}

/// Checked XP addition. Both operands must be non-negative.
pub fn add_xp(current: i64, delta: i64) -> Result<i64> {
    if current < 0 {
        return Err(ProgressionError::invalid(format!(
            "current XP must be non-negative, got {}",
            current
        )));
    }
    if delta < 0 {
        return Err(ProgressionError::invalid(format!(
            "XP gain must be non-negative, got {}",
            delta
        )));
    }
    current
        .checked_add(delta)
        .ok_or(ProgressionError::Overflow { current, delta })
}
