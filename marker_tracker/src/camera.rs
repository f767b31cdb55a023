use crate::config::TrackerConfig;
use crate::mat::mat_to_frame;
use marker_vision::{AcquireError, Frame, FrameSource, SourceError};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::{info, warn};

/// A live camera or a recorded video, read through OpenCV.
pub struct OpenCvCamera {
    capture: VideoCapture,
    frame: Mat,
}

impl OpenCvCamera {
    /// Opens the camera or video named by `config`.
    pub fn open(config: &TrackerConfig) -> Result<Self, AcquireError> {
        let label = config.source_label();
        let unavailable = |detail: String| AcquireError::SourceUnavailable(format!("{label}: {detail}"));

        let capture = match &config.video_path {
            Some(path) => VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY),
            None => VideoCapture::new(config.camera_index, videoio::CAP_ANY),
        }
        .map_err(|err| unavailable(err.to_string()))?;

        if !capture.is_opened().map_err(|err| unavailable(err.to_string()))? {
            return Err(unavailable("device could not be opened".to_string()));
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH).unwrap_or_default();
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT).unwrap_or_default();
        info!("opened {label} ({width}x{height})");

        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn try_read(&mut self) -> Result<Option<Frame>, SourceError> {
        let grabbed = self
            .capture
            .read(&mut self.frame)
            .map_err(|err| SourceError::Device(err.to_string()))?;
        if !grabbed || self.frame.empty() {
            return Ok(None);
        }
        mat_to_frame(&self.frame)
            .map(Some)
            .map_err(|err| SourceError::Device(err.to_string()))
    }

    fn release(&mut self) {
        if let Err(err) = self.capture.release() {
            warn!("failed to release capture device: {err}");
        }
    }
}
