//! Notification channel abstraction and progress throttling.
//!
//! Jobs report status by editing a single message rather than appending new
//! ones, so refiring the same summary is cheap and idempotent. The concrete
//! channel (chat message, console, ...) is behind the [`Notifier`] trait.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

use crate::Result;
use crate::progress::ProgressSnapshot;

/// Opaque handle to a previously sent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// A send/edit-message capability consumed by job runners.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a new message and return a handle for later edits.
    async fn send(&self, text: &str) -> Result<MessageId>;

    /// Replace the content of a previously sent message.
    ///
    /// Callers in the progress path swallow edit failures; a transient edit
    /// error must never abort job monitoring.
    async fn edit(&self, id: MessageId, text: &str) -> Result<()>;
}

/// Notifier that writes messages to the log, for CLI use.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, text: &str) -> Result<MessageId> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!(id = id.0, "{text}");
        Ok(id)
    }

    async fn edit(&self, id: MessageId, text: &str) -> Result<()> {
        info!(id = id.0, "{text}");
        Ok(())
    }
}

/// Decides when a progress update is due.
///
/// Fires on every boundary where the rounded elapsed wall time is a multiple
/// of the interval. This deliberately refires for the lifetime of the job:
/// the consumer edits one message in place, so recomputation costs nothing.
#[derive(Debug, Clone)]
pub struct ProgressTicker {
    started: Instant,
    interval_secs: u64,
}

impl ProgressTicker {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            started: Instant::now(),
            interval_secs,
        }
    }

    /// Whether an update should be pushed now.
    pub fn should_fire(&self) -> bool {
        Self::fires_at(self.started.elapsed().as_secs_f64(), self.interval_secs)
    }

    fn fires_at(elapsed_secs: f64, interval_secs: u64) -> bool {
        if interval_secs == 0 {
            return true;
        }
        (elapsed_secs.round() as u64) % interval_secs == 0
    }
}

/// Render the progress summary shown to the user.
pub fn render_progress(progress: &ProgressSnapshot) -> String {
    format!(
        "Progress\nsize:  {}\ntime:  {}\nspeed: {}",
        progress.size.as_deref().unwrap_or("N/A"),
        progress.time.as_deref().unwrap_or("N/A"),
        progress.speed.as_deref().unwrap_or("N/A"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_fires_on_interval_boundaries() {
        for elapsed in [0.0, 5.0, 10.0, 4.6, 300.0] {
            assert!(
                ProgressTicker::fires_at(elapsed, 5),
                "expected fire at {elapsed}"
            );
        }
    }

    #[test]
    fn test_ticker_quiet_between_boundaries() {
        for elapsed in [1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0, 11.3] {
            assert!(
                !ProgressTicker::fires_at(elapsed, 5),
                "unexpected fire at {elapsed}"
            );
        }
    }

    #[test]
    fn test_ticker_refires_on_later_boundaries() {
        // Intentionally not once-per-boundary: every multiple fires.
        assert!(ProgressTicker::fires_at(15.0, 5));
        assert!(ProgressTicker::fires_at(15.2, 5));
    }

    #[test]
    fn test_render_progress_with_values() {
        let progress = ProgressSnapshot {
            size: Some("2048kB".into()),
            time: Some("00:00:10.00".into()),
            speed: Some("1.5x".into()),
            ..Default::default()
        };
        let text = render_progress(&progress);
        assert!(text.contains("size:  2048kB"));
        assert!(text.contains("time:  00:00:10.00"));
        assert!(text.contains("speed: 1.5x"));
    }

    #[test]
    fn test_render_progress_missing_fields() {
        let text = render_progress(&ProgressSnapshot::default());
        assert_eq!(text.matches("N/A").count(), 3);
    }

    #[tokio::test]
    async fn test_console_notifier_hands_out_fresh_ids() {
        let notifier = ConsoleNotifier::new();
        let a = notifier.send("first").await.unwrap();
        let b = notifier.send("second").await.unwrap();
        assert_ne!(a, b);
        notifier.edit(a, "updated").await.unwrap();
    }
}
