//! Level-up detection
//!
//! Compares the progression before and after an XP change. This is a query:
//! nothing is stored and nothing is dispatched here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::badges::BadgeId;
use super::calculator::ProgressionCalculator;
use crate::error::{ProgressionError, Result};

/// One-shot notification payload for crossing at least one level boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpEvent {
    pub from_level: u32,
    pub to_level: u32,
    /// Rank at `to_level`
    pub rank: String,
    /// Rank label differs from the one held at `from_level`
    pub rank_changed: bool,
    /// Level badges present after the change but not before. May be empty.
    pub newly_unlocked_badges: BTreeSet<BadgeId>,
}

impl LevelUpEvent {
    /// Number of levels gained in one step
    pub fn levels_gained(&self) -> u32 {
        self.to_level - self.from_level
    }
}

impl ProgressionCalculator {
    /// Level-up event for an XP change from `old_xp` to `new_xp`, if the level rose
    pub fn detect_level_up(&self, old_xp: i64, new_xp: i64) -> Result<Option<LevelUpEvent>> {
        if new_xp < old_xp {
            return Err(ProgressionError::invalid(format!(
                "XP cannot regress through level-up detection ({} -> {})",
                old_xp, new_xp
            )));
        }
        let from_level = self.level_for_xp(old_xp)?;
        let to_level = self.level_for_xp(new_xp)?;
        if to_level == from_level {
            return Ok(None);
        }

        let rank = self.rank_for_level(to_level)?.label.clone();
        let old_rank = &self.rank_for_level(from_level)?.label;
        let old_badges = self.badges_for_xp(old_xp)?;
        let newly_unlocked_badges = self
            .badges_for_xp(new_xp)?
            .difference(&old_badges)
            .cloned()
            .collect();

        Ok(Some(LevelUpEvent {
            from_level,
            to_level,
            rank_changed: *old_rank != rank,
            rank,
            newly_unlocked_badges,
        }))
    }
}

/// Free-function form over the default tables
pub fn detect_level_up(old_xp: i64, new_xp: i64) -> Result<Option<LevelUpEvent>> {
    ProgressionCalculator::default().detect_level_up(old_xp, new_xp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::badges::{BadgeCatalog, LevelBadge};
    use crate::progression::curve::LevelCurve;
    use crate::progression::ranks::RankTable;

    fn id(s: &str) -> BadgeId {
        BadgeId::new(s).unwrap()
    }

    #[test]
    fn test_equal_xp_no_event() {
        let calc = ProgressionCalculator::default();
        for xp in [0, 99, 100, 5000, 1_000_000] {
            assert_eq!(calc.detect_level_up(xp, xp), Ok(None));
        }
    }

    #[test]
    fn test_regression_rejected() {
        let err = detect_level_up(100, 50).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_rejected() {
        let err = detect_level_up(-5, 10).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidArgument(_)));
    }

    #[test]
    fn test_level_up_without_badge() {
        let event = detect_level_up(0, 100).unwrap().unwrap();
        assert_eq!(event.from_level, 1);
        assert_eq!(event.to_level, 2);
        assert_eq!(event.rank, "RANG E");
        assert!(!event.rank_changed);
        assert!(event.newly_unlocked_badges.is_empty());
    }

    #[test]
    fn test_multi_level_jump_collects_all_badges() {
        let calc = ProgressionCalculator::default();
        let to = calc.curve().xp_for_level(25).unwrap();
        let event = calc.detect_level_up(0, to).unwrap().unwrap();
        assert_eq!(event.levels_gained(), 24);
        assert_eq!(event.rank, "RANG C");
        assert!(event.rank_changed);
        let expected: BTreeSet<_> =
            ["level_5", "level_10", "level_20", "level_25"].iter().map(|s| id(s)).collect();
        assert_eq!(event.newly_unlocked_badges, expected);
    }

    #[test]
    fn test_diff_matches_badge_sets() {
        let calc = ProgressionCalculator::default();
        let samples = [0, 150, 1_000, 9_000, 12_000, 40_000, 90_000, 300_000];
        for (i, &a) in samples.iter().enumerate() {
            for &b in &samples[i..] {
                if let Some(event) = calc.detect_level_up(a, b).unwrap() {
                    let diff: BTreeSet<_> = calc
                        .badges_for_xp(b)
                        .unwrap()
                        .difference(&calc.badges_for_xp(a).unwrap())
                        .cloned()
                        .collect();
                    assert_eq!(event.newly_unlocked_badges, diff);
                    assert!(event.to_level > event.from_level);
                }
            }
        }
    }

    #[test]
    fn test_single_badge_threshold() {
        let badges = BadgeCatalog::new(vec![LevelBadge {
            id: id("level_2"),
            min_level: 2,
            label: "Level 2".into(),
        }])
        .unwrap();
        let calc = ProgressionCalculator::new(
            LevelCurve::Stepped { thresholds: vec![0, 100, 500, 2000] },
            RankTable::default(),
            badges,
        )
        .unwrap();
        let event = calc.detect_level_up(90, 105).unwrap().unwrap();
        assert_eq!((event.from_level, event.to_level), (1, 2));
        assert_eq!(event.newly_unlocked_badges, BTreeSet::from([id("level_2")]));
        assert_eq!(calc.detect_level_up(105, 110), Ok(None));
    }
}
