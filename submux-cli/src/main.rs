//! Run a single mux job from the command line.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use submux::{
    ConsoleNotifier, EncodeSettings, JobRegistry, JobRunner, MuxConfig, MuxOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Stream-copy mux into MKV with the subtitle attached as a track.
    Soft,
    /// Re-encode into MP4 with the subtitles burned in.
    Hard,
}

#[derive(Debug, Parser)]
#[command(name = "submux-cli", version, about = "Mux subtitles into a video with ffmpeg")]
struct Cli {
    /// Video filename inside the download directory.
    video: String,

    /// Subtitle filename inside the download directory.
    subtitle: String,

    /// Mux variant.
    #[arg(long, value_enum, default_value_t = Mode::Soft)]
    mode: Mode,

    /// Directory holding the input files.
    #[arg(long, default_value = "downloads")]
    download_dir: PathBuf,

    /// Path to the ffmpeg binary (defaults to FFMPEG_PATH or `ffmpeg`).
    #[arg(long)]
    ffmpeg: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("submux=info")),
        )
        .init();

    let mut config = MuxConfig::with_download_dir(cli.download_dir);
    if let Some(ffmpeg) = cli.ffmpeg {
        config = config.with_ffmpeg_path(ffmpeg);
    }

    let registry = Arc::new(JobRegistry::new());
    let runner = JobRunner::new(
        config,
        Arc::clone(&registry),
        Arc::new(ConsoleNotifier::new()),
    );

    // Ctrl-C cancels live jobs the same way an external cancel command
    // would: kill through the registry, observed by the runner as a failed
    // exit.
    {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                for id in registry.ids() {
                    warn!(job_id = %id, "cancelling job");
                    let _ = registry.cancel(&id);
                }
            }
        });
    }

    let result = match cli.mode {
        Mode::Soft => runner.softmux(&cli.video, &cli.subtitle).await,
        Mode::Hard => {
            runner
                .hardmux(&cli.video, &cli.subtitle, &EncodeSettings::default())
                .await
        }
    };

    match result {
        Ok(MuxOutcome::Success {
            output,
            elapsed_secs,
        }) => {
            info!(%output, elapsed_secs, "mux finished");
            ExitCode::SUCCESS
        }
        Ok(MuxOutcome::Failed { .. }) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "mux job errored");
            ExitCode::FAILURE
        }
    }
}
