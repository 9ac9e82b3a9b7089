//! Rank tiers
//!
//! Ranks are named bands of levels. The table is data: adding a tier means
//! adding a row.

use serde::{Deserialize, Serialize};

use crate::error::{ProgressionError, Result};

/// One rank breakpoint: every level from `min_level` up to the next tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub min_level: u32,
    pub label: String,
}

impl RankTier {
    pub fn new(min_level: u32, label: impl Into<String>) -> Self {
        Self { min_level, label: label.into() }
    }
}

/// Ordered rank breakpoints, lowest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    /// Build a table, rejecting gaps and unordered rows
    pub fn new(tiers: Vec<RankTier>) -> Result<Self> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    /// The table must start at level 1 and ascend strictly so every level has a tier
    pub fn validate(&self) -> Result<()> {
        match self.tiers.first() {
            Some(first) if first.min_level == 1 => {}
            Some(first) => {
                return Err(ProgressionError::config(format!(
                    "rank table must start at level 1, first tier '{}' starts at {}",
                    first.label, first.min_level
                )))
            }
            None => return Err(ProgressionError::config("rank table is empty")),
        }
        for pair in self.tiers.windows(2) {
            if pair[0].min_level >= pair[1].min_level {
                return Err(ProgressionError::config(format!(
                    "rank tiers out of order: '{}' ({}) before '{}' ({})",
                    pair[0].label, pair[0].min_level, pair[1].label, pair[1].min_level
                )));
            }
        }
        if let Some(tier) = self.tiers.iter().find(|t| t.label.trim().is_empty()) {
            return Err(ProgressionError::config(format!(
                "rank tier at level {} has an empty label",
                tier.min_level
            )));
        }
        Ok(())
    }

    /// Tier for `level`: the highest breakpoint not above it
    pub fn rank_for_level(&self, level: u32) -> Result<&RankTier> {
        if level == 0 {
            return Err(ProgressionError::invalid("levels start at 1"));
        }
        let idx = self.tiers.partition_point(|t| t.min_level <= level);
        // idx == 0 only when no tier covers this level
        idx.checked_sub(1)
            .and_then(|i| self.tiers.get(i))
            .ok_or_else(|| ProgressionError::config(format!("no rank tier covers level {}", level)))
    }

    /// Lowest configured tier
    pub fn lowest(&self) -> Option<&RankTier> {
        self.tiers.first()
    }

    /// Tier following the one `level` is in, if any
    pub fn next_tier(&self, level: u32) -> Option<&RankTier> {
        self.tiers.iter().find(|t| t.min_level > level)
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                RankTier::new(1, "RANG E"),
                RankTier::new(10, "RANG D"),
                RankTier::new(20, "RANG C"),
                RankTier::new(35, "RANG B"),
                RankTier::new(50, "RANG A"),
                RankTier::new(75, "RANG S"),
                RankTier::new(100, "RANG SS"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        RankTable::default().validate().unwrap();
    }

    #[test]
    fn test_rank_lookup() {
        let table = RankTable::default();
        assert_eq!(table.rank_for_level(1).unwrap().label, "RANG E");
        assert_eq!(table.rank_for_level(9).unwrap().label, "RANG E");
        assert_eq!(table.rank_for_level(10).unwrap().label, "RANG D");
        assert_eq!(table.rank_for_level(49).unwrap().label, "RANG B");
        assert_eq!(table.rank_for_level(100).unwrap().label, "RANG SS");
        assert_eq!(table.rank_for_level(u32::MAX).unwrap().label, "RANG SS");
    }

    #[test]
    fn test_level_zero_rejected() {
        let err = RankTable::default().rank_for_level(0).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidArgument(_)));
    }

    #[test]
    fn test_gap_at_bottom_rejected() {
        let err = RankTable::new(vec![RankTier::new(5, "Bronze")]).unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_unordered_rejected() {
        let err = RankTable::new(vec![
            RankTier::new(1, "Bronze"),
            RankTier::new(20, "Gold"),
            RankTier::new(10, "Silver"),
        ])
        .unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_unvalidated_gap_fails_loudly() {
        // Deserialized tables skip `new`; lookup still refuses to guess
        let table: RankTable = ron::from_str(r#"[(min_level: 5, label: "Bronze")]"#).unwrap();
        let err = table.rank_for_level(2).unwrap_err();
        assert!(matches!(err, ProgressionError::Configuration(_)));
    }

    #[test]
    fn test_rank_monotonic_in_level() {
        let table = RankTable::default();
        let mut last = 0;
        for level in 1..150 {
            let min = table.rank_for_level(level).unwrap().min_level;
            assert!(min >= last);
            last = min;
        }
    }

    #[test]
    fn test_next_tier() {
        let table = RankTable::default();
        assert_eq!(table.next_tier(1).unwrap().label, "RANG D");
        assert!(table.next_tier(100).is_none());
    }
}
