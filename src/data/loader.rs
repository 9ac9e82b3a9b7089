//! RON data loader
//!
//! Loads `progression.ron`, with fallback to built-in defaults when the
//! file is absent.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DataError;
use crate::guild::chat::{ChatXpAwarder, ChatXpPolicy};
use crate::guild::notify::NotificationSink;
use crate::guild::store::XpStore;
use crate::progression::{BadgeCatalog, LevelCurve, ProgressionCalculator, RankTable};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "GUILDRANK_DATA_DIR";

/// Catalog file name inside the data directory
pub const DATA_FILE: &str = "progression.ron";

/// All tunable progression tables
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionData {
    pub curve: LevelCurve,
    pub ranks: RankTable,
    pub badges: BadgeCatalog,
    pub chat: ChatXpPolicy,
}

impl ProgressionData {
    /// Load from `dir`, using defaults if the file does not exist.
    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let path = dir.join(DATA_FILE);
        if !path.exists() {
            log::info!("No {} in {:?}, using built-in catalogs", DATA_FILE, dir);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let data = Self::from_ron(&content)?;
        log::info!(
            "Loaded progression data from {:?} ({} rank tiers, {} level badges)",
            path,
            data.ranks.tiers().len(),
            data.badges.badges().len()
        );
        Ok(data)
    }

    /// Like `load`, but any failure falls back to defaults with a warning
    pub fn load_or_default(dir: &Path) -> Self {
        Self::load(dir).unwrap_or_else(|e| {
            log::warn!("Failed to load progression data: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parse and validate a RON document
    pub fn from_ron(content: &str) -> Result<Self, DataError> {
        let data: Self = ron::from_str(content)?;
        data.validate()?;
        Ok(data)
    }

    pub fn to_ron(&self) -> Result<String, DataError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Check every table
    pub fn validate(&self) -> Result<(), DataError> {
        self.curve.validate()?;
        self.ranks.validate()?;
        self.badges.validate()?;
        self.chat.validate()?;
        Ok(())
    }

    /// Calculator over these tables
    pub fn calculator(&self) -> Result<ProgressionCalculator, DataError> {
        Ok(ProgressionCalculator::new(
            self.curve.clone(),
            self.ranks.clone(),
            self.badges.clone(),
        )?)
    }

    /// Chat XP awarder over these tables and the configured chat policy
    pub fn awarder<S: XpStore, N: NotificationSink>(
        &self,
        store: S,
        sink: N,
    ) -> Result<ChatXpAwarder<S, N>, DataError> {
        Ok(ChatXpAwarder::new(self.calculator()?, self.chat, store, sink)?)
    }
}

/// Data directory: `$GUILDRANK_DATA_DIR`, else the per-user data dir, else `assets/data`
pub fn default_data_dir() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    if let Some(proj_dirs) = ProjectDirs::from("com", "guildrank", "Guildrank") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from("assets/data")
    }
}

/// Export the default catalogs to `dir/progression.ron` for editing
pub fn export_default_data(dir: &Path) -> Result<PathBuf, DataError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(DATA_FILE);
    fs::write(&path, ProgressionData::default().to_ron()?)?;
    log::info!("Exported default progression data to {:?}", path);
    Ok(path)
}
