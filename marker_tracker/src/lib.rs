// Device bindings for the `marker_vision` engine: an OpenCV frame source, a serial
// command sink, an optional HighGUI overlay, and the shared startup plumbing
// (configuration, logging) used by both binaries.

pub mod camera;
pub mod config;
pub mod logging;
pub mod mat;
pub mod preview;
pub mod serial;
