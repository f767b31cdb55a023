// THEORY:
// The `pipeline` module is the per-frame API of the tracking engine. It chains the
// pure stages into one call:
//
//   Frame → {mask A, mask B} → {centroid A, centroid B} → displacement
//         → normalized vector → command
//
// Nothing is retained between frames. The only state is the read-only
// `PipelineConfig` captured at construction. Each frame produces a `FrameAnalysis`
// with every intermediate result, so diagnostic front ends can draw it. Its
// `Report` says whether there is anything to transmit.

use crate::core_modules::blob_detector::blob_detector;
use crate::core_modules::color_segmenter::segment;
use crate::core_modules::command::{self, Command, DEFAULT_SCALE};
use crate::core_modules::frame::Frame;
use crate::core_modules::vector::{self, DEFAULT_CLAMP, DisplacementVector, NormalizedVector};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// Re-export key data structures for the public API.
pub use crate::core_modules::color_range::ColorRange;
pub use crate::core_modules::smart_blob::{Centroid, Point};

/// Configuration for the TrackingPipeline. Read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reference marker. The displacement is measured from here.
    pub marker_a: ColorRange,
    /// Target marker. The displacement is measured to here.
    pub marker_b: ColorRange,
    /// Fixed-point factor applied before truncation.
    pub scale: f64,
    /// Symmetric bound applied to each normalized component.
    pub clamp: f64,
    /// Regions smaller than this many pixels are ignored during localization.
    pub min_blob_area: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            marker_a: ColorRange::RED_DOT,
            marker_b: ColorRange::WHITE_LINE,
            scale: DEFAULT_SCALE,
            clamp: DEFAULT_CLAMP,
            min_blob_area: 1,
        }
    }
}

impl PipelineConfig {
    /// Rejects values that would make the output meaningless. Inverted colour
    /// ranges are legal and pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        if !self.clamp.is_finite() || self.clamp <= 0.0 {
            return Err(ConfigError::InvalidClamp(self.clamp));
        }
        if self.min_blob_area == 0 {
            return Err(ConfigError::InvalidMinBlobArea);
        }
        Ok(())
    }
}

/// Which markers were missing from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarkers {
    A,
    B,
    Both,
}

/// The transmit decision for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Report {
    /// At least one marker was not found. Nothing should be sent.
    NoSignal(MissingMarkers),
    /// Both markers were found, but the frame has no extent to normalize against.
    Degenerate,
    /// Both markers were found and this command should be transmitted.
    Transmit(Command),
}

/// Every intermediate result for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    pub frame_width: u32,
    pub frame_height: u32,
    pub centroid_a: Option<Centroid>,
    pub centroid_b: Option<Centroid>,
    pub displacement: Option<DisplacementVector>,
    pub vector: Option<NormalizedVector>,
    pub report: Report,
}

impl FrameAnalysis {
    pub fn command(&self) -> Option<Command> {
        match self.report {
            Report::Transmit(command) => Some(command),
            _ => None,
        }
    }
}

/// The main per-frame engine.
#[derive(Debug, Clone)]
pub struct TrackingPipeline {
    config: PipelineConfig,
}

impl TrackingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full segmentation → localization → vector → command chain.
    pub fn analyze(&self, frame: &Frame) -> FrameAnalysis {
        let (frame_width, frame_height) = (frame.width(), frame.height());

        // Stage 1: Colour Segmentation
        let mask_a = segment(frame, &self.config.marker_a);
        let mask_b = segment(frame, &self.config.marker_b);

        // Stage 2: Blob Localization
        let centroid_a = blob_detector::localize_with_min_area(&mask_a, self.config.min_blob_area);
        let centroid_b = blob_detector::localize_with_min_area(&mask_b, self.config.min_blob_area);

        // Stage 3: Displacement & Normalization
        let displacement = match (centroid_a, centroid_b) {
            (Some(a), Some(b)) => Some(vector::displacement(a, b)),
            _ => None,
        };
        let vector = displacement
            .and_then(|d| vector::normalize(d, frame_width, frame_height, self.config.clamp));

        // Stage 4: Command Encoding
        let report = match (centroid_a, centroid_b, vector) {
            (None, None, _) => Report::NoSignal(MissingMarkers::Both),
            (None, Some(_), _) => Report::NoSignal(MissingMarkers::A),
            (Some(_), None, _) => Report::NoSignal(MissingMarkers::B),
            (Some(_), Some(_), None) => Report::Degenerate,
            (Some(_), Some(_), Some(v)) => Report::Transmit(command::encode_with_scale(v, self.config.scale)),
        };

        FrameAnalysis {
            frame_width,
            frame_height,
            centroid_a,
            centroid_b,
            displacement,
            vector,
            report,
        }
    }

    /// Shorthand for the command to send for `frame`, if any.
    pub fn command_for(&self, frame: &Frame) -> Option<Command> {
        self.analyze(frame).command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Hsv;
    use approx::assert_relative_eq;

    // Pure blue and pure green markers keep test scenes easy to reason about.
    const BLUE: ColorRange = ColorRange::new(Hsv::new(115, 200, 200), Hsv::new(125, 255, 255));
    const GREEN: ColorRange = ColorRange::new(Hsv::new(55, 200, 200), Hsv::new(65, 255, 255));

    fn config() -> PipelineConfig {
        PipelineConfig {
            marker_a: BLUE,
            marker_b: GREEN,
            ..PipelineConfig::default()
        }
    }

    fn scene(width: u32, height: u32, a: Option<(u32, u32)>, b: Option<(u32, u32)>) -> Frame {
        let mut image = image::RgbImage::from_pixel(width, height, image::Rgb([0, 0, 0]));
        if let Some((x, y)) = a {
            image.put_pixel(x, y, image::Rgb([0, 0, 255]));
        }
        if let Some((x, y)) = b {
            image.put_pixel(x, y, image::Rgb([0, 255, 0]));
        }
        Frame::from_image(image)
    }

    #[test]
    fn both_markers_produce_a_command() {
        let pipeline = TrackingPipeline::new(config());
        let analysis = pipeline.analyze(&scene(400, 400, Some((100, 200)), Some((150, 150))));
        assert_eq!(analysis.centroid_a, Some(Point::new(100, 200)));
        assert_eq!(analysis.centroid_b, Some(Point::new(150, 150)));
        assert_eq!(analysis.displacement, Some(DisplacementVector { dx: 50, dy: 50 }));
        let v = analysis.vector.expect("vector present");
        assert_relative_eq!(v.x, 0.25);
        assert_relative_eq!(v.y, 0.25);
        assert_eq!(analysis.report, Report::Transmit(Command::new(25, 25)));
        assert_eq!(analysis.command().map(|c| c.to_wire()), Some("25,25\n".to_string()));
    }

    #[test]
    fn missing_marker_reports_no_signal() {
        let pipeline = TrackingPipeline::new(config());
        let only_a = pipeline.analyze(&scene(40, 40, Some((1, 1)), None));
        assert_eq!(only_a.report, Report::NoSignal(MissingMarkers::B));
        assert_eq!(only_a.command(), None);
        assert_eq!(only_a.vector, None);

        let only_b = pipeline.analyze(&scene(40, 40, None, Some((1, 1))));
        assert_eq!(only_b.report, Report::NoSignal(MissingMarkers::A));

        let neither = pipeline.analyze(&scene(40, 40, None, None));
        assert_eq!(neither.report, Report::NoSignal(MissingMarkers::Both));
    }

    #[test]
    fn zero_sized_frame_has_no_signal() {
        let pipeline = TrackingPipeline::new(config());
        let analysis = pipeline.analyze(&scene(0, 0, None, None));
        assert_eq!(analysis.report, Report::NoSignal(MissingMarkers::Both));
    }

    #[test]
    fn scale_and_clamp_come_from_config() {
        let pipeline = TrackingPipeline::new(PipelineConfig {
            scale: 1000.0,
            clamp: 0.5,
            ..config()
        });
        let command = pipeline.command_for(&scene(400, 400, Some((0, 0)), Some((399, 100))));
        // dx = 399 / 200 clamps to 0.5; dy = -100 / 200 = -0.5
        assert_eq!(command, Some(Command::new(500, -500)));
    }

    #[test]
    fn validation_rejects_unusable_numbers() {
        assert!(PipelineConfig::default().validate().is_ok());
        let bad_scale = PipelineConfig { scale: 0.0, ..PipelineConfig::default() };
        assert_eq!(bad_scale.validate(), Err(ConfigError::InvalidScale(0.0)));
        let bad_clamp = PipelineConfig { clamp: f64::NAN, ..PipelineConfig::default() };
        assert!(matches!(bad_clamp.validate(), Err(ConfigError::InvalidClamp(_))));
        let bad_area = PipelineConfig { min_blob_area: 0, ..PipelineConfig::default() };
        assert_eq!(bad_area.validate(), Err(ConfigError::InvalidMinBlobArea));
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"scale": 50.0}"#).expect("valid json");
        assert_relative_eq!(config.scale, 50.0);
        assert_eq!(config.marker_a, ColorRange::RED_DOT);
        assert_eq!(config.min_blob_area, 1);
    }
}
