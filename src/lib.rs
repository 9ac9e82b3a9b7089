//! Guildrank - XP progression for a gaming-guild community
//!
//! Turns accumulated chat XP into levels, rank tiers and badges, and
//! detects the moment a member levels up.

pub mod data;
pub mod error;
pub mod guild;
pub mod progression;

// Re-export commonly used types
pub use error::{DataError, ProgressionError};
pub use progression::{LevelUpEvent, Progress, ProgressionCalculator};
