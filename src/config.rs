//! Engine configuration.
//!
//! The converter binary path is injected at construction time instead of
//! being read from ambient global state, so tests can run in parallel with
//! fake configurations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a [`VectorEngine`](crate::VectorEngine) instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the external converter binary (Inkscape-compatible CLI).
    pub convert_path: PathBuf,

    /// Directory for converter input temp files.
    ///
    /// `None` uses the OS default temp directory.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            convert_path: PathBuf::from("inkscape"),
            temp_dir: None,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration pointing at the given converter binary.
    pub fn new(convert_path: impl Into<PathBuf>) -> Self {
        Self {
            convert_path: convert_path.into(),
            temp_dir: None,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// - `INKSCAPE_PATH`: converter binary (default: `inkscape` on `PATH`)
    /// - `VECTOR_ENGINE_TEMP_DIR`: temp-file directory (default: OS temp)
    pub fn from_env() -> Self {
        let convert_path = std::env::var("INKSCAPE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("inkscape"));
        let temp_dir = std::env::var("VECTOR_ENGINE_TEMP_DIR")
            .ok()
            .map(PathBuf::from);

        Self {
            convert_path,
            temp_dir,
        }
    }
}
