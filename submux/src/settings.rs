//! Per-user encode settings.
//!
//! The orchestrator only consumes a key/value lookup; where the values live
//! (database, chat-bot state, ...) is up to the embedding application.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel meaning "leave this aspect of the video unchanged".
pub const UNCHANGED: &str = "original";

/// Settings keys understood by the hard-mux runner.
pub mod keys {
    pub const RESOLUTION: &str = "resolution";
    pub const FPS: &str = "fps";
    pub const CODEC: &str = "codec";
    pub const CRF: &str = "crf";
    pub const PRESET: &str = "preset";
}

/// Key/value settings lookup per user.
pub trait SettingsStore: Send + Sync {
    fn get(&self, user_id: i64, key: &str) -> Option<String>;
}

/// Resolved encode settings for one hard-mux job.
///
/// Values are kept as raw strings the way they are passed to the tool; a
/// field equal to [`UNCHANGED`] omits the corresponding filter or flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeSettings {
    pub resolution: String,
    pub fps: String,
    pub codec: String,
    pub crf: String,
    pub preset: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            resolution: "1920:1080".to_string(),
            fps: UNCHANGED.to_string(),
            codec: "libx264".to_string(),
            crf: "27".to_string(),
            preset: "faster".to_string(),
        }
    }
}

impl EncodeSettings {
    /// Resolve settings for a user, falling back to the defaults per key.
    pub fn for_user(store: &dyn SettingsStore, user_id: i64) -> Self {
        let defaults = Self::default();
        let get = |key: &str, fallback: String| store.get(user_id, key).unwrap_or(fallback);

        Self {
            resolution: get(keys::RESOLUTION, defaults.resolution),
            fps: get(keys::FPS, defaults.fps),
            codec: get(keys::CODEC, defaults.codec),
            crf: get(keys::CRF, defaults.crf),
            preset: get(keys::PRESET, defaults.preset),
        }
    }
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<(i64, String), String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: i64, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .write()
            .insert((user_id, key.into()), value.into());
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, user_id: i64, key: &str) -> Option<String> {
        self.values
            .read()
            .get(&(user_id, key.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EncodeSettings::default();
        assert_eq!(settings.resolution, "1920:1080");
        assert_eq!(settings.fps, UNCHANGED);
        assert_eq!(settings.codec, "libx264");
        assert_eq!(settings.crf, "27");
        assert_eq!(settings.preset, "faster");
    }

    #[test]
    fn test_for_user_falls_back_per_key() {
        let store = MemorySettings::new();
        store.set(7, keys::CODEC, "libx265");
        store.set(7, keys::RESOLUTION, UNCHANGED);

        let settings = EncodeSettings::for_user(&store, 7);
        assert_eq!(settings.codec, "libx265");
        assert_eq!(settings.resolution, UNCHANGED);
        assert_eq!(settings.preset, "faster");
    }

    #[test]
    fn test_for_user_is_scoped_per_user() {
        let store = MemorySettings::new();
        store.set(1, keys::CRF, "18");

        assert_eq!(EncodeSettings::for_user(&store, 1).crf, "18");
        assert_eq!(EncodeSettings::for_user(&store, 2).crf, "27");
    }
}
