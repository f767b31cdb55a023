// THEORY (HSV Pixel):
// The `Pixel` module is the smallest unit of the tracking engine. It holds one RGB
// pixel and knows how to express itself in the hue/saturation/value space used for
// marker segmentation. Nothing here reads neighbours; it is strictly per-pixel.
//
// Scale convention:
// The HSV triple is stored in the 8-bit OpenCV layout so that thresholds tuned with
// OpenCV tools (or the bundled `hsv_tuner`) can be used as-is:
//   • hue:        0..=179 (degrees halved)
//   • saturation: 0..=255 (chroma / value, scaled)
//   • value:      0..=255 (max channel)
// All three are rounded to the nearest integer. A hue that rounds up to 180 wraps
// back to 0 because the wheel is circular.

pub mod pixel {
    use serde::{Deserialize, Serialize};

    pub type Channel = u8;
    pub type Hue = u8;
    pub type Saturation = u8;
    pub type Value = u8;

    /// Upper bound (inclusive) of the hue channel in the 8-bit HSV layout.
    pub const HUE_MAX: Hue = 179;

    const CHANNELS: usize = 3;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    /// A pixel expressed in hue/saturation/value space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
    pub struct Hsv {
        pub hue: Hue,
        pub saturation: Saturation,
        pub value: Value,
    }

    impl Hsv {
        pub const fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        /// Channels in (h, s, v) order, for component-wise comparisons.
        pub fn channels(&self) -> [u8; 3] {
            [self.hue, self.saturation, self.value]
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        /// Converts this pixel into the 8-bit HSV layout.
        ///
        /// - value is the largest channel.
        /// - saturation is chroma over value, scaled to 0..255 (0 for black).
        /// - hue is the colour-wheel angle halved, 0 for greys.
        pub fn to_hsv(&self) -> Hsv {
            let red = self.red as f32;
            let green = self.green as f32;
            let blue = self.blue as f32;

            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel <= 0.0 {
                0.0
            } else {
                chroma * 255.0 / maximum_channel
            };

            let hue_degrees = if chroma <= 0.0 {
                0.0
            } else {
                let (base_difference, sector_offset) = if maximum_channel == red {
                    (green - blue, 0.0)
                } else if maximum_channel == green {
                    (blue - red, 120.0)
                } else {
                    (red - green, 240.0)
                };
                let mut degrees = 60.0 * base_difference / chroma + sector_offset;
                if degrees < 0.0 {
                    degrees += 360.0;
                }
                degrees
            };

            let mut hue = (hue_degrees / 2.0).round() as u16;
            if hue > HUE_MAX as u16 {
                hue = 0;
            }

            Hsv {
                hue: hue as Hue,
                saturation: saturation.round().min(255.0) as Saturation,
                value: maximum_channel as Value,
            }
        }
    }

    impl From<&[Channel]> for Pixel {
        /// Builds a pixel from an `[r, g, b]` slice. Extra trailing bytes are ignored.
        fn from(bytes: &[Channel]) -> Self {
            match bytes {
                [red, green, blue, ..] => Pixel::new(*red, *green, *blue),
                _ => Pixel::default(),
            }
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for [Channel; CHANNELS] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue]
        }
    }
}
