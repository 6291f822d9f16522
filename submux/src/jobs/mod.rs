//! Mux job execution.
//!
//! A job is one invocation of the external tool plus the two background
//! tasks that monitor it: a stderr reader deriving progress and an exit
//! waiter holding kill authority. Jobs are tracked in the [`JobRegistry`]
//! while live.
//!
//! [`JobRegistry`]: crate::registry::JobRegistry

mod args;
mod runner;

pub use runner::JobRunner;

use serde::{Deserialize, Serialize};

/// The two supported mux variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuxMode {
    /// Stream-copy the video and attach the subtitle track, into MKV.
    SoftMux,
    /// Re-encode the video with the subtitles burned in, into MP4.
    HardMux,
}

impl MuxMode {
    /// Suffix appended to the input base name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::SoftMux => "soft",
            Self::HardMux => "hard",
        }
    }

    /// Output container extension.
    pub fn container(&self) -> &'static str {
        match self {
            Self::SoftMux => "mkv",
            Self::HardMux => "mp4",
        }
    }

    /// Human-readable label used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SoftMux => "Soft-Mux",
            Self::HardMux => "Hard-Mux",
        }
    }

    /// Derive the output filename for an input filename:
    /// `{base}_{soft|hard}.{mkv|mp4}`.
    pub fn output_name(&self, input: &str) -> String {
        let base = std::path::Path::new(input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.to_string());
        format!("{base}_{}.{}", self.suffix(), self.container())
    }
}

impl std::fmt::Display for MuxMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SoftMux => "soft",
            Self::HardMux => "hard",
        })
    }
}

/// Final outcome of a mux job.
///
/// A tool failure is an outcome, not an error: the runner reports it to the
/// user and hands the caller this value instead of propagating an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxOutcome {
    /// The tool exited cleanly; `output` is the produced filename inside
    /// the download directory.
    Success { output: String, elapsed_secs: u64 },
    /// The tool exited non-zero, was killed, or failed to launch. `detail`
    /// carries the decoded diagnostic output verbatim.
    Failed { detail: String },
}

impl MuxOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
