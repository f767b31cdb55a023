// THEORY:
// The colour segmenter is the first stage of the per-frame pipeline. It converts
// every pixel of a frame to HSV and marks it "set" when all three channels fall
// inside a marker's `ColorRange`. It is a pure, stateless transform.
//
// Degenerate inputs never error: a zero-sized frame gives a zero-sized mask and an
// inverted range gives a blank one.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::frame::Frame;
use crate::core_modules::mask::mask::Mask;

/// Thresholds `frame` against `range`, returning a mask of the same dimensions.
pub fn segment(frame: &Frame, range: &ColorRange) -> Mask {
    let (width, height) = (frame.width(), frame.height());
    if frame.is_empty() || !range.is_valid() {
        return Mask::new(width, height);
    }

    let bits = frame
        .pixels()
        .map(|pixel| range.contains(pixel.to_hsv()))
        .collect();
    Mask::from_bits(width, height, bits).unwrap_or_else(|| Mask::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    const BLUE: ColorRange = ColorRange::from_arrays([110, 200, 200], [130, 255, 255]);

    fn scene() -> Frame {
        let mut image = image::RgbImage::from_pixel(4, 3, image::Rgb([0, 0, 0]));
        image.put_pixel(1, 1, image::Rgb([0, 0, 255]));
        image.put_pixel(2, 1, image::Rgb([10, 10, 250]));
        image.put_pixel(3, 2, image::Rgb([255, 0, 0]));
        Frame::from_image(image)
    }

    #[test]
    fn only_pixels_inside_the_range_are_set() {
        let mask = segment(&scene(), &BLUE);
        assert_eq!((mask.width(), mask.height()), (4, 3));
        assert!(mask.get(1, 1));
        assert!(mask.get(2, 1));
        assert!(!mask.get(3, 2));
        assert_eq!(mask.count_set(), 2);
    }

    #[test]
    fn inverted_range_yields_blank_mask() {
        let inverted = ColorRange::from_arrays([130, 200, 200], [110, 255, 255]);
        let mask = segment(&scene(), &inverted);
        assert!(mask.is_blank());
        assert_eq!((mask.width(), mask.height()), (4, 3));
    }

    #[test]
    fn every_inverted_channel_yields_blank_mask() {
        let frame = Frame::filled(3, 3, Pixel::new(0, 0, 255));
        for channel in 0..3 {
            let mut lower = [0u8, 0, 0];
            let mut upper = [179u8, 255, 255];
            lower[channel] = 100;
            upper[channel] = 99;
            let mask = segment(&frame, &ColorRange::from_arrays(lower, upper));
            assert!(mask.is_blank(), "channel {channel} inverted");
        }
    }

    #[test]
    fn empty_frame_yields_empty_mask() {
        let frame = Frame::filled(0, 5, Pixel::new(0, 0, 255));
        let mask = segment(&frame, &BLUE);
        assert_eq!((mask.width(), mask.height()), (0, 5));
        assert!(mask.is_blank());
    }
}
