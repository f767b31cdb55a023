use crate::mat::frame_to_mat;
use marker_vision::{Centroid, Frame, FrameAnalysis, FrameObserver, ObserverSignal};
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
};
use tracing::warn;

const WINDOW: &str = "Tracking";
const ESC: i32 = 27;

/// Diagnostic overlay: centroids, the A→B arrow, and ESC-to-stop.
pub struct PreviewWindow {
    failed: bool,
}

impl PreviewWindow {
    pub fn open() -> opencv::Result<Self> {
        highgui::named_window(WINDOW, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self { failed: false })
    }

    fn render(&self, frame: &Frame, analysis: &FrameAnalysis) -> opencv::Result<bool> {
        let mut canvas = frame_to_mat(frame)?;

        if let Some(a) = analysis.centroid_a {
            draw_centroid(&mut canvas, a, Scalar::new(0.0, 0.0, 255.0, 0.0))?;
        }
        if let Some(b) = analysis.centroid_b {
            draw_centroid(&mut canvas, b, Scalar::new(255.0, 255.0, 255.0, 0.0))?;
        }
        if let (Some(a), Some(b), Some(_)) = (analysis.centroid_a, analysis.centroid_b, analysis.command()) {
            imgproc::arrowed_line(
                &mut canvas,
                to_cv(a),
                to_cv(b),
                Scalar::new(0.0, 255.0, 0.0, 0.0),
                2,
                imgproc::LINE_8,
                0,
                0.1,
            )?;
        }

        highgui::imshow(WINDOW, &canvas)?;
        Ok(highgui::wait_key(1)? & 0xFF == ESC)
    }
}

impl FrameObserver for PreviewWindow {
    fn observe(&mut self, frame: &Frame, analysis: &FrameAnalysis) -> ObserverSignal {
        if self.failed {
            return ObserverSignal::Continue;
        }
        match self.render(frame, analysis) {
            Ok(true) => ObserverSignal::Interrupt,
            Ok(false) => ObserverSignal::Continue,
            Err(err) => {
                // The overlay is optional; losing it must not stop the tracker.
                warn!("preview disabled after render error: {err}");
                self.failed = true;
                ObserverSignal::Continue
            }
        }
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        let _ = highgui::destroy_all_windows();
    }
}

fn draw_centroid(canvas: &mut Mat, centroid: Centroid, color: Scalar) -> opencv::Result<()> {
    imgproc::circle(canvas, to_cv(centroid), 5, color, -1, imgproc::LINE_8, 0)
}

fn to_cv(point: Centroid) -> core::Point {
    core::Point::new(point.x as i32, point.y as i32)
}
