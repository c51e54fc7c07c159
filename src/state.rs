//! Application state management
//!
//! Everything a command handler needs, built once from the configuration:
//! - Loaded configuration
//! - Search history journal
//! - AI capability provider

use crate::ai::AiFeatures;
use crate::config::Config;
use crate::search::HistoryLog;

/// Main application state
pub struct AppState {
    pub config: Config,

    /// Search history journal
    pub history: HistoryLog,

    /// AI handlers; backends start lazily on first use
    pub ai: AiFeatures,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let history = HistoryLog::new(config.history_path());
        let ai = AiFeatures::from_config(&config.ai);
        Self { config, history, ai }
    }

    /// Swap the AI provider, for embedders that bring their own backends
    pub fn with_ai(mut self, ai: AiFeatures) -> Self {
        self.ai = ai;
        self
    }
}
