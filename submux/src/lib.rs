//! Subtitle mux job orchestration.
//!
//! Launches long-running ffmpeg mux jobs, tracks them by short id in a
//! shared registry, derives throttled progress updates from the tool's
//! stderr, and resolves each job to a success/failure outcome with captured
//! diagnostics.
//!
//! Two job variants exist: a stream-copy mux attaching a subtitle track
//! ([`JobRunner::softmux`]) and a filtered re-encode burning subtitles in
//! ([`JobRunner::hardmux`]). Cancellation is realized by looking the job up
//! in the [`JobRegistry`] and killing its process, which the runner then
//! observes as an abnormal exit.
//!
//! ```ignore
//! use std::sync::Arc;
//! use submux::{ConsoleNotifier, JobRegistry, JobRunner, MuxConfig};
//!
//! let registry = Arc::new(JobRegistry::new());
//! let runner = JobRunner::new(
//!     MuxConfig::with_download_dir("downloads"),
//!     Arc::clone(&registry),
//!     Arc::new(ConsoleNotifier::new()),
//! );
//! let outcome = runner.softmux("movie.mp4", "subs.srt").await?;
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod notify;
pub mod progress;
pub mod registry;
pub mod settings;

pub use config::MuxConfig;
pub use error::{Error, Result};
pub use jobs::{JobRunner, MuxMode, MuxOutcome};
pub use notify::{ConsoleNotifier, MessageId, Notifier, ProgressTicker};
pub use progress::{LineReader, ProgressSnapshot, parse_progress};
pub use registry::{JobHandle, JobRegistry};
pub use settings::{EncodeSettings, MemorySettings, SettingsStore};
