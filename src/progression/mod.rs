//! Progression systems
//!
//! XP curve, rank tiers, badge catalog, and level-up detection.

pub mod badges;
pub mod calculator;
pub mod curve;
pub mod events;
pub mod ranks;

pub use badges::{BadgeCatalog, BadgeId, LevelBadge, RoleBadge};
pub use calculator::{add_xp, Progress, ProgressionCalculator};
pub use curve::{LevelCurve, MAX_LEVEL};
pub use events::{detect_level_up, LevelUpEvent};
pub use ranks::{RankTable, RankTier};
