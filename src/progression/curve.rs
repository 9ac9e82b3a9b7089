//! Experience and leveling
//!
//! The XP -> level curve. Both shapes are pure and monotonic: more XP never
//! yields a lower level.

use serde::{Deserialize, Serialize};

use crate::error::{ProgressionError, Result};

/// Highest level the curve reports; levels saturate here instead of wrapping
pub const MAX_LEVEL: u32 = u32::MAX;

/// Shape of the XP -> level curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelCurve {
    /// Level L -> L+1 costs `base + (L - 1) * step` XP. Unbounded.
    Linear { base: i64, step: i64 },
    /// Explicit total-XP thresholds, one per level starting at level 1.
    /// `thresholds[0]` must be 0. Levels stop at the last row.
    Stepped { thresholds: Vec<i64> },
}

impl Default for LevelCurve {
    fn default() -> Self {
        // 100 XP for level 2, +50 per level after
        LevelCurve::Linear { base: 100, step: 50 }
    }
}

impl LevelCurve {
    /// Check the curve parameters describe a monotonic curve starting at level 1
    pub fn validate(&self) -> Result<()> {
        match self {
            LevelCurve::Linear { base, step } => {
                if *base < 1 {
                    return Err(ProgressionError::config(format!(
                        "linear curve base must be >= 1, got {}",
                        base
                    )));
                }
                if *step < 0 {
                    return Err(ProgressionError::config(format!(
                        "linear curve step must be >= 0, got {}",
                        step
                    )));
                }
                Ok(())
            }
            LevelCurve::Stepped { thresholds } => {
                match thresholds.first() {
                    Some(0) => {}
                    Some(first) => {
                        return Err(ProgressionError::config(format!(
                            "stepped curve must start at 0 XP, got {}",
                            first
                        )))
                    }
                    None => return Err(ProgressionError::config("stepped curve has no thresholds")),
                }
                if let Some(pair) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
                    return Err(ProgressionError::config(format!(
                        "stepped curve thresholds must be strictly ascending ({} then {})",
                        pair[0], pair[1]
                    )));
                }
                Ok(())
            }
        }
    }

    /// Level reached with `xp` total experience
    pub fn level_for_xp(&self, xp: i64) -> Result<u32> {
        if xp < 0 {
            return Err(ProgressionError::invalid(format!("XP must be non-negative, got {}", xp)));
        }
        let level = match self {
            LevelCurve::Linear { base, step } => {
                // Largest n with total(n) <= xp; total is monotonic in n
                let xp = xp as i128;
                let (mut lo, mut hi) = (0i128, (MAX_LEVEL - 1) as i128);
                while lo < hi {
                    let mid = lo + (hi - lo + 1) / 2;
                    if linear_total(*base, *step, mid) <= xp {
                        lo = mid;
                    } else {
                        hi = mid - 1;
                    }
                }
                (lo + 1) as u32
            }
            LevelCurve::Stepped { thresholds } => {
                thresholds.partition_point(|&t| t <= xp).max(1).min(MAX_LEVEL as usize) as u32
            }
        };
        Ok(level)
    }

    /// Total XP needed to reach `level`, or `None` if the curve never gets there
    pub fn xp_for_level(&self, level: u32) -> Option<i64> {
        if level == 0 {
            return None;
        }
        match self {
            LevelCurve::Linear { base, step } => {
                let total = linear_total(*base, *step, (level - 1) as i128);
                Some(total.min(i64::MAX as i128) as i64)
            }
            LevelCurve::Stepped { thresholds } => thresholds.get(level as usize - 1).copied(),
        }
    }
}

/// Sum of the first `n` level costs
fn linear_total(base: i64, step: i64, n: i128) -> i128 {
    n * base as i128 + step as i128 * n * (n - 1).max(0) / 2
}
