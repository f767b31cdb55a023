// THEORY:
// The vector stage turns two marker centroids into a resolution-independent control
// signal.
//
// Axis convention: `dx` is positive when marker B is right of marker A, and `dy` is
// positive when marker A is *above* marker B. Pixel rows grow downward, so the
// vertical axis is flipped relative to raw coordinates.
//
// Normalization divides each axis by half the frame extent on that axis, then
// clamps. A pair spanning the full frame width therefore saturates at ±clamp.

use crate::core_modules::smart_blob::Centroid;
use serde::{Deserialize, Serialize};

/// Default symmetric clamp applied to each normalized component.
pub const DEFAULT_CLAMP: f64 = 1.0;

/// Signed pixel displacement from marker A to marker B (y up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplacementVector {
    pub dx: i64,
    pub dy: i64,
}

/// Displacement scaled to frame half-extents, each component within the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedVector {
    pub x: f64,
    pub y: f64,
}

pub fn displacement(a: Centroid, b: Centroid) -> DisplacementVector {
    DisplacementVector {
        dx: b.x as i64 - a.x as i64,
        dy: a.y as i64 - b.y as i64,
    }
}

/// Scales `d` by the frame half-extents and clamps each component to `[-clamp, clamp]`.
///
/// Returns `None` for a zero-sized frame.
pub fn normalize(d: DisplacementVector, frame_w: u32, frame_h: u32, clamp: f64) -> Option<NormalizedVector> {
    if frame_w == 0 || frame_h == 0 {
        return None;
    }
    let bound = clamp.abs();
    let half_w = frame_w as f64 / 2.0;
    let half_h = frame_h as f64 / 2.0;
    Some(NormalizedVector {
        x: (d.dx as f64 / half_w).clamp(-bound, bound),
        y: (d.dy as f64 / half_h).clamp(-bound, bound),
    })
}

/// Normalized A→B vector, or `None` unless both centroids are present.
pub fn compute(
    centroid_a: Option<Centroid>,
    centroid_b: Option<Centroid>,
    frame_w: u32,
    frame_h: u32,
) -> Option<NormalizedVector> {
    compute_with_clamp(centroid_a, centroid_b, frame_w, frame_h, DEFAULT_CLAMP)
}

pub fn compute_with_clamp(
    centroid_a: Option<Centroid>,
    centroid_b: Option<Centroid>,
    frame_w: u32,
    frame_h: u32,
    clamp: f64,
) -> Option<NormalizedVector> {
    let d = displacement(centroid_a?, centroid_b?);
    normalize(d, frame_w, frame_h, clamp)
}
