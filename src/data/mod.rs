//! Data loading for progression catalogs
//!
//! The XP curve, rank tiers, level badges and chat XP policy live in an
//! external RON file so they can be tuned without touching code.

pub mod loader;

pub use loader::{default_data_dir, export_default_data, ProgressionData, DATA_DIR_ENV, DATA_FILE};
