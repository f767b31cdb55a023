use thiserror::Error;

/// A raw buffer did not describe a valid frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("buffer for {width}x{height} frame must be {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Startup acquisition of the frame source or transport sink failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("frame source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("transport sink unavailable: {0}")]
    SinkUnavailable(String),
}

/// Pulling a frame failed mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("frame source device error: {0}")]
    Device(String),
    #[error("frame could not be decoded: {0}")]
    Decode(#[from] FrameError),
}

/// The transport rejected a write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("transport write failed: {0}")]
    Write(String),
    #[error("transport write timed out")]
    TimedOut,
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => SinkError::TimedOut,
            _ => SinkError::Write(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidScale(f64),
    #[error("clamp bound must be finite and positive, got {0}")]
    InvalidClamp(f64),
    #[error("minimum blob area must be at least 1 pixel")]
    InvalidMinBlobArea,
}

/// A wire line did not match `"<x>,<y>\n"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("expected two comma-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invalid integer component {0:?}")]
    InvalidComponent(String),
}
