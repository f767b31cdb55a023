// THEORY:
// A `Frame` is one capture instant: an immutable grid of RGB pixels plus the
// geometry used later for normalization. It is owned by the loop iteration that
// pulled it and dropped once that iteration finishes.
//
// Capture devices disagree on channel order, so construction accepts both packed
// RGB and packed BGR (the OpenCV native layout). Internally everything is RGB,
// backed by `image::RgbImage`.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::FrameError;
use image::RgbImage;

const CHANNELS: usize = 3;

/// An immutable RGB frame for a single capture instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wraps an already-decoded RGB image.
    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Builds a frame from a tightly packed `r, g, b` byte buffer.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, FrameError> {
        check_len(width, height, &bytes)?;
        let actual = bytes.len();
        RgbImage::from_raw(width, height, bytes)
            .map(Self::from_image)
            .ok_or(FrameError::BufferSize {
                width,
                height,
                expected: expected_len(width, height),
                actual,
            })
    }

    /// Builds a frame from a tightly packed `b, g, r` byte buffer.
    pub fn from_bgr_bytes(width: u32, height: u32, mut bytes: Vec<u8>) -> Result<Self, FrameError> {
        check_len(width, height, &bytes)?;
        for pixel in bytes.chunks_exact_mut(CHANNELS) {
            pixel.swap(0, 2);
        }
        Self::from_rgb_bytes(width, height, bytes)
    }

    /// A frame filled with a single colour. Handy for synthetic scenes.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let rgb: [u8; CHANNELS] = pixel.into();
        Self::from_image(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        self.image.get_pixel_checked(x, y).map(|rgb| Pixel::from(*rgb))
    }

    /// Row-major iterator over every pixel.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.image.pixels().map(|rgb| Pixel::from(*rgb))
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

fn expected_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

fn check_len(width: u32, height: u32, bytes: &[u8]) -> Result<(), FrameError> {
    let expected = expected_len(width, height);
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(FrameError::BufferSize {
            width,
            height,
            expected,
            actual: bytes.len(),
        })
    }
}
