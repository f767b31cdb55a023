// THEORY:
// This file is the entry point for the `marker_vision` library crate. It exposes the
// two-marker tracking engine: the pure per-frame stages (`core_modules`), the
// `TrackingPipeline` that chains them, and the `ControlLoop` that drives the
// pipeline between a frame source and a command sink.
//
// Device bindings (cameras, serial ports, windows) live in the `marker_tracker`
// binaries and plug in through the `FrameSource`, `CommandSink` and
// `FrameObserver` traits.

pub mod control_loop;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use control_loop::{
    CommandSink, ControlLoop, FaultCause, FrameObserver, FrameSource, LoopOptions, LoopReport, LoopState,
    ObserverSignal, TerminationReason,
};
pub use core_modules::blob_detector::blob_detector::{find_blobs, localize};
pub use core_modules::color_range::ColorRange;
pub use core_modules::color_segmenter::segment;
pub use core_modules::command::{Command, encode};
pub use core_modules::frame::Frame;
pub use core_modules::mask::mask::Mask;
pub use core_modules::pixel::pixel::{Hsv, Pixel};
pub use core_modules::smart_blob::{Centroid, Point, SmartBlob};
pub use core_modules::vector::{DisplacementVector, NormalizedVector, compute};
pub use error::{AcquireError, CommandParseError, ConfigError, FrameError, SinkError, SourceError};
pub use pipeline::{FrameAnalysis, MissingMarkers, PipelineConfig, Report, TrackingPipeline};
