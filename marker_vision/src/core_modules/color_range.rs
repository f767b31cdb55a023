use crate::core_modules::pixel::pixel::Hsv;
use serde::{Deserialize, Serialize};

/// Inclusive lower/upper HSV bounds for one tracked marker.
///
/// A range whose lower bound exceeds its upper bound on any channel is legal; it
/// simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl ColorRange {
    /// Tuned range for the reference marker (a red laser dot).
    pub const RED_DOT: ColorRange = ColorRange::new(Hsv::new(121, 0, 166), Hsv::new(179, 255, 255));
    /// Tuned range for the target marker (a white line under the camera's tint).
    pub const WHITE_LINE: ColorRange = ColorRange::new(Hsv::new(85, 100, 61), Hsv::new(147, 143, 255));

    pub const fn new(lower: Hsv, upper: Hsv) -> Self {
        Self { lower, upper }
    }

    /// Builds a range from `[h, s, v]` arrays.
    pub const fn from_arrays(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self::new(
            Hsv::new(lower[0], lower[1], lower[2]),
            Hsv::new(upper[0], upper[1], upper[2]),
        )
    }

    /// `true` when lower <= upper on every channel.
    pub fn is_valid(&self) -> bool {
        self.lower
            .channels()
            .iter()
            .zip(self.upper.channels().iter())
            .all(|(lo, hi)| lo <= hi)
    }

    /// Inclusive per-channel containment test.
    #[inline]
    pub fn contains(&self, hsv: Hsv) -> bool {
        hsv.hue >= self.lower.hue
            && hsv.hue <= self.upper.hue
            && hsv.saturation >= self.lower.saturation
            && hsv.saturation <= self.upper.saturation
            && hsv.value >= self.lower.value
            && hsv.value <= self.upper.value
    }
}
