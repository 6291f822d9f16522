//! Mux orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default wall-clock interval between progress notifications, in seconds.
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 5;

/// Configuration for mux job execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuxConfig {
    /// Directory holding downloaded inputs; outputs are written next to them.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Seconds between progress message edits.
    #[serde(default = "default_progress_interval_secs")]
    pub progress_interval_secs: u64,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_ffmpeg_path() -> String {
    std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string())
}

fn default_progress_interval_secs() -> u64 {
    DEFAULT_PROGRESS_INTERVAL_SECS
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            ffmpeg_path: default_ffmpeg_path(),
            progress_interval_secs: default_progress_interval_secs(),
        }
    }
}

impl MuxConfig {
    /// Create a configuration rooted at the given download directory.
    pub fn with_download_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: dir.into(),
            ..Default::default()
        }
    }

    /// Resolve a bare filename against the download directory.
    pub fn resolve(&self, filename: &str) -> PathBuf {
        self.download_dir.join(filename)
    }

    /// Override the ffmpeg binary path.
    pub fn with_ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }
}

/// Extension of a file name, without the leading dot.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MuxConfig::default();
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.progress_interval_secs, 5);
    }

    #[test]
    fn test_config_parse_partial() {
        let config: MuxConfig =
            serde_json::from_str(r#"{ "download_dir": "/tmp/dl" }"#).unwrap();
        assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(config.progress_interval_secs, 5);
    }

    #[test]
    fn test_resolve_joins_download_dir() {
        let config = MuxConfig::with_download_dir("/data");
        assert_eq!(config.resolve("movie.mp4"), PathBuf::from("/data/movie.mp4"));
    }
}
