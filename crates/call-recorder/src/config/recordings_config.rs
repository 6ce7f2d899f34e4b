use crate::config::default_format;

use std::path::PathBuf;

use call_recorder_core::OutputFormat;
use serde::{Deserialize, Serialize};

/// Where and how recordings are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingsConfig {
    /// Recordings directory (None = `<data dir>/recordings`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Container and encoding for new recordings.
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

impl Default for RecordingsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: default_format(),
        }
    }
}
