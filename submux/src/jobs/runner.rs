//! The job runner: launches the tool, monitors it, resolves the outcome.

use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::process::{ChildStderr, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{MuxMode, MuxOutcome, args};
use crate::Result;
use crate::config::MuxConfig;
use crate::notify::{MessageId, Notifier, ProgressTicker, render_progress};
use crate::progress::{LineReader, parse_progress};
use crate::registry::JobRegistry;
use crate::settings::EncodeSettings;

/// How long the final success message stays up before the runner returns,
/// giving the user a moment to read it.
const SUCCESS_PAUSE: Duration = Duration::from_secs(2);

/// Diagnostic lines retained for the failure report.
const STDERR_TAIL_LINES: usize = 40;

/// Runs mux jobs against an external ffmpeg process.
///
/// Each job spawns the tool with stderr piped, registers itself in the
/// shared [`JobRegistry`], and drives two background tasks to completion:
/// a stderr reader deriving throttled progress edits and an exit waiter
/// holding kill authority. The job is finished only when both are done.
pub struct JobRunner {
    config: MuxConfig,
    registry: Arc<JobRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl JobRunner {
    pub fn new(config: MuxConfig, registry: Arc<JobRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            registry,
            notifier,
        }
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Stream-copy the video and attach the subtitle track.
    ///
    /// `video` and `subtitle` are filenames inside the download directory.
    /// On success returns the produced output filename.
    pub async fn softmux(&self, video: &str, subtitle: &str) -> Result<MuxOutcome> {
        let mode = MuxMode::SoftMux;
        let output = mode.output_name(video);
        let argv = args::softmux_args(
            &self.config.resolve(video),
            &self.config.resolve(subtitle),
            &self.config.resolve(&output),
        );
        self.run(mode, argv, output).await
    }

    /// Re-encode the video with the subtitles burned in, applying the
    /// user's encode settings.
    pub async fn hardmux(
        &self,
        video: &str,
        subtitle: &str,
        settings: &EncodeSettings,
    ) -> Result<MuxOutcome> {
        let mode = MuxMode::HardMux;
        let output = mode.output_name(video);
        let argv = args::hardmux_args(
            &self.config.resolve(video),
            &self.config.resolve(subtitle),
            settings,
            &self.config.resolve(&output),
        );
        self.run(mode, argv, output).await
    }

    /// Shared execution path for both variants.
    async fn run(&self, mode: MuxMode, argv: Vec<String>, output: String) -> Result<MuxOutcome> {
        let started = Instant::now();
        let label = mode.label();

        let message = self
            .notifier
            .send(&format!("Preparing {label} job..."))
            .await?;

        debug!(tool = %self.config.ffmpeg_path, ?argv, "spawning mux process");
        let mut child = match Command::new(&self.config.ffmpeg_path)
            .args(&argv)
            .env("LC_ALL", "C")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                // Launch failure takes the same reported-failure path as a
                // non-zero exit instead of crashing the job.
                let launch = crate::Error::ProcessLaunch {
                    tool: self.config.ffmpeg_path.clone(),
                    source: e,
                };
                error!(error = %launch, "failed to launch mux tool");
                let detail = launch.to_string();
                self.edit_swallowing(message, &format!("Error during {label}!\n\n{detail}"))
                    .await;
                return Ok(MuxOutcome::Failed { detail });
            }
        };

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| crate::Error::config("mux tool stderr was not captured"))?;

        let cancel = CancellationToken::new();
        let job = self.registry.register_new(mode, cancel.clone());
        let job_id = job.id.clone();
        info!(job_id = %job_id, mode = %mode, "mux job started");

        self.edit_swallowing(
            message,
            &format!("{label} job started ({job_id})\nSend /cancel {job_id} to abort"),
        )
        .await;

        let reader = tokio::spawn(monitor_stderr(
            stderr,
            ProgressTicker::new(self.config.progress_interval_secs),
            Arc::clone(&self.notifier),
            message,
        ));

        let waiter = tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("cancellation requested, killing mux process");
                    let _ = child.kill().await;
                    None
                }
                status = child.wait() => match status {
                    Ok(exit) => exit.code(),
                    Err(e) => {
                        error!(error = %e, "error waiting for mux process");
                        Some(-1)
                    }
                },
            }
        });

        // The job is finished only once BOTH tasks are done, in any order.
        let (tail, exit_code) = tokio::join!(reader, waiter);
        let tail = tail.unwrap_or_default();
        let exit_code = exit_code.ok().flatten();

        self.registry.unregister(&job_id);

        match exit_code {
            Some(0) => {
                let elapsed_secs = started.elapsed().as_secs_f64().round() as u64;
                info!(job_id = %job_id, elapsed_secs, output = %output, "mux job completed");
                self.edit_swallowing(
                    message,
                    &format!("{label} {job_id} completed in {elapsed_secs}s"),
                )
                .await;
                tokio::time::sleep(SUCCESS_PAUSE).await;
                Ok(MuxOutcome::Success {
                    output,
                    elapsed_secs,
                })
            }
            code => {
                let detail = tail.join("\n");
                warn!(job_id = %job_id, ?code, "mux job failed");
                self.edit_swallowing(message, &format!("Error during {label}!\n\n{detail}"))
                    .await;
                Ok(MuxOutcome::Failed { detail })
            }
        }
    }

    /// Edit the status message, logging and swallowing any failure.
    async fn edit_swallowing(&self, message: MessageId, text: &str) {
        if let Err(e) = self.notifier.edit(message, text).await {
            warn!(error = %e, "status edit failed");
        }
    }
}

/// Consume the tool's stderr to EOF: reassemble lines, extract progress,
/// push throttled edits, and keep a tail of recent lines for the failure
/// report.
async fn monitor_stderr(
    stderr: ChildStderr,
    ticker: ProgressTicker,
    notifier: Arc<dyn Notifier>,
    message: MessageId,
) -> Vec<String> {
    let mut lines = LineReader::new(stderr);
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);

    loop {
        match lines.next_line().await {
            Ok(Some(raw)) => {
                let line = String::from_utf8_lossy(&raw).into_owned();
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line.clone());

                let Some(progress) = parse_progress(&line) else {
                    continue;
                };
                if ticker.should_fire() {
                    // Transient edit failures must never abort monitoring.
                    if let Err(e) = notifier.edit(message, &render_progress(&progress)).await {
                        warn!(error = %e, "progress edit failed");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "error reading mux tool output");
                break;
            }
        }
    }

    tail.into()
}
