use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const HISTORY_FILE: &str = "search_history.json";

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub ai: AiConfig,
    pub open: OpenConfig,
}

/// Search history journal location
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Defaults to `search_history.json` in the user data directory
    pub path: Option<PathBuf>,
}

/// External tools and thresholds used by the AI capabilities
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub tesseract_command: String,
    pub tesseract_language: String,
    pub ffmpeg_command: String,
    pub ffprobe_command: String,
    /// Sample every Nth video frame
    pub frame_interval: u32,
    pub confidence_threshold: f32,
    /// Face distances below this count as the same person
    pub face_threshold: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            tesseract_command: "tesseract".to_string(),
            tesseract_language: "eng".to_string(),
            ffmpeg_command: "ffmpeg".to_string(),
            ffprobe_command: "ffprobe".to_string(),
            frame_interval: 30,
            confidence_threshold: 0.25,
            face_threshold: 0.6,
        }
    }
}

/// How results are opened
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct OpenConfig {
    /// Command template with `{path}` and `{line}`, e.g. `code --goto {path}:{line}`
    pub editor: Option<String>,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "anvesh").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the default config file, or return defaults if it is missing or broken
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_or_default(&path),
            _ => Config::default(),
        }
    }

    /// Load `path`, falling back to defaults with a warning
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Config::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where the search journal lives
    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history.path {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "anvesh")
            .map(|dirs| dirs.data_dir().join(HISTORY_FILE))
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE))
    }
}
