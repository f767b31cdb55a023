use anyhow::{Context, bail};
use marker_vision::control_loop::DEFAULT_MAX_CONSECUTIVE_WRITE_FAILURES;
use marker_vision::{LoopOptions, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Everything the tracker needs for one run. Read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub pipeline: PipelineConfig,
    /// Capture device index, used when `video_path` is unset.
    pub camera_index: i32,
    /// Replay a recorded video instead of opening a camera.
    pub video_path: Option<PathBuf>,
    pub serial_port: String,
    pub baud_rate: u32,
    pub write_timeout_ms: u64,
    /// Pause after opening the port while the receiver resets.
    pub settle_delay_ms: u64,
    pub max_consecutive_write_failures: Option<u32>,
    pub preview: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            camera_index: 1,
            video_path: None,
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            write_timeout_ms: 500,
            settle_delay_ms: 2_000,
            max_consecutive_write_failures: Some(DEFAULT_MAX_CONSECUTIVE_WRITE_FAILURES),
            preview: false,
        }
    }
}

impl TrackerConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.pipeline.validate().context("invalid pipeline config")?;
        if self.baud_rate == 0 {
            bail!("baud rate must be non-zero");
        }
        if self.serial_port.trim().is_empty() {
            bail!("serial port must be set");
        }
        for (name, range) in [("marker_a", &self.pipeline.marker_a), ("marker_b", &self.pipeline.marker_b)] {
            if !range.is_valid() {
                warn!("{name} range has lower > upper on some channel; it will never match: {range:?}");
            }
        }
        Ok(())
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            max_consecutive_write_failures: self.max_consecutive_write_failures,
        }
    }

    /// Human-readable name of the frame source, for logs and errors.
    pub fn source_label(&self) -> String {
        match &self.video_path {
            Some(path) => format!("video {}", path.display()),
            None => format!("camera {}", self.camera_index),
        }
    }
}
