use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::leaderboard::{DEFAULT_LEADERBOARD_KEY, DEFAULT_LEADERBOARD_SIZE};
use crate::model::CARD_IMAGES;

const DATA_DIR_ENV: &str = "MEMORY_MATCH_DATA_DIR";
const APP_DIR_NAME: &str = "memory-match";

/// Which resolved turns count towards the attempts score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptPolicy {
    /// Only failed turns count.
    #[default]
    MismatchesOnly,
    EveryResolution,
}

impl AttemptPolicy {
    pub fn counts(&self, matched: bool) -> bool {
        match self {
            AttemptPolicy::MismatchesOnly => !matched,
            AttemptPolicy::EveryResolution => true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_pair_count")]
    pub pair_count: usize,

    /// Session is lost once this many attempts are counted. `None` plays until won.
    #[serde(default)]
    pub max_attempts: Option<u32>,

    #[serde(default)]
    pub attempt_policy: AttemptPolicy,

    #[serde(default = "default_resolution_delay_ms")]
    pub resolution_delay_ms: u64,

    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,

    #[serde(default = "default_leaderboard_key")]
    pub leaderboard_key: String,
}

// Helper functions for default values
fn default_version() -> u32 {
    1
}
fn default_pair_count() -> usize {
    CARD_IMAGES.len()
}
fn default_resolution_delay_ms() -> u64 {
    1000
}
fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}
fn default_leaderboard_key() -> String {
    DEFAULT_LEADERBOARD_KEY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            pair_count: default_pair_count(),
            max_attempts: None,
            attempt_policy: AttemptPolicy::default(),
            resolution_delay_ms: default_resolution_delay_ms(),
            leaderboard_size: default_leaderboard_size(),
            leaderboard_key: default_leaderboard_key(),
        }
    }
}

impl Settings {
    /// Reads `settings.json` from `data_dir`, writing the defaults there when it is missing
    /// or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = Self::settings_path(data_dir);
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    trace!(target: "settings", "Loaded settings {:?}", settings);
                    return settings;
                }
                Err(err) => {
                    warn!(target: "settings", "Ignoring unreadable {}: {}", path.display(), err)
                }
            }
        }
        let default = Settings::default();
        let _ = default.save(data_dir);
        default
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), std::io::Error> {
        fs::create_dir_all(data_dir)?;
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(Self::settings_path(data_dir), contents)
    }

    fn settings_path(data_dir: &Path) -> PathBuf {
        data_dir.join("settings.json")
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    pub fn resolution_delay(&self) -> Duration {
        Duration::from_millis(self.resolution_delay_ms)
    }

    /// `$MEMORY_MATCH_DATA_DIR`, else the platform data directory.
    pub fn data_dir() -> PathBuf {
        if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(path);
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
