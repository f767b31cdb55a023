// THEORY:
// A `SmartBlob` is one maximal connected region of set pixels in a mask. It is the
// spatial summary the rest of the pipeline reasons about: where the marker is (its
// bounding box and box-center centroid) and how big it is (its pixel area).
//
// Like the mask it came from, it is a stateless snapshot of a single frame. Blob ids
// are assigned in scan order and mean nothing across frames.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates (x grows right, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Representative point of a detected marker; see [`SmartBlob::centroid`].
pub type Centroid = Point;

/// Axis-aligned box given by its inclusive top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> u32 {
        self.max.y - self.min.y + 1
    }

    /// Integer box center: `(x + w / 2, y + h / 2)`.
    pub fn center(&self) -> Point {
        Point {
            x: self.min.x + self.width() / 2,
            y: self.min.y + self.height() / 2,
        }
    }
}

/// A single, connected region of set pixels detected in a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartBlob {
    /// Scan-order index within the current mask. Not persistent.
    pub id: u64,
    /// The box enclosing every pixel of the blob.
    pub bounding_box: BoundingBox,
    /// The number of set pixels in the blob.
    pub area: usize,
}

impl SmartBlob {
    /// Bounding-box midpoint, not the area-weighted centre. Downstream
    /// normalization expects box centers.
    pub fn centroid(&self) -> Centroid {
        self.bounding_box.center()
    }
}
