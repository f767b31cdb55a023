use anyhow::{Context, bail};
use clap::Parser;
use marker_tracker::{
    camera::OpenCvCamera, config::TrackerConfig, logging::init_logging, preview::PreviewWindow, serial::SerialSink,
};
use marker_vision::{ControlLoop, FrameObserver, LoopReport, LoopState, TrackingPipeline};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tracks two coloured markers and streams their offset over serial")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Capture device index
    #[arg(long)]
    camera: Option<i32>,
    /// Replay a video file instead of a camera
    #[arg(long, conflicts_with = "camera")]
    video: Option<PathBuf>,
    /// Serial port of the receiver
    #[arg(long)]
    port: Option<String>,
    /// Serial speed in bits per second
    #[arg(long)]
    baud: Option<u32>,
    /// Show the diagnostic overlay window (ESC stops the tracker)
    #[arg(long)]
    preview: bool,
    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn resolve(&self) -> anyhow::Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::load(path)?,
            None => TrackerConfig::default(),
        };
        if let Some(camera) = self.camera {
            config.camera_index = camera;
            config.video_path = None;
        }
        if let Some(video) = &self.video {
            config.video_path = Some(video.clone());
        }
        if let Some(port) = &self.port {
            config.serial_port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        config.preview |= self.preview;
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let config = cli.resolve().context("loading configuration")?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current frame");
            cancel_tx.send_replace(true);
        }
    });

    // The loop is blocking; keep it off the async workers.
    let report = tokio::task::spawn_blocking(move || track(&config, cancel_rx))
        .await
        .context("tracking thread panicked")?;

    match report.state {
        LoopState::Faulted(cause) => bail!("tracker faulted: {cause:?}"),
        state => {
            info!(?state, "tracker finished");
            Ok(())
        }
    }
}

fn track(config: &TrackerConfig, cancel: watch::Receiver<bool>) -> LoopReport {
    let pipeline = TrackingPipeline::new(config.pipeline.clone());
    let control = ControlLoop::new(pipeline, config.loop_options()).with_cancellation(cancel);

    let mut preview = if config.preview {
        PreviewWindow::open()
            .inspect_err(|err| warn!("preview window unavailable: {err}"))
            .ok()
    } else {
        None
    };

    control.run(
        || OpenCvCamera::open(config),
        || SerialSink::open(config),
        preview.as_mut().map(|window| window as &mut dyn FrameObserver),
    )
}
