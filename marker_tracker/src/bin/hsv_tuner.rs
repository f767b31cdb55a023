// Interactive HSV threshold tuner. Six trackbars drive a live mask built by the
// same segmenter the tracker uses; ESC prints the chosen range as config JSON.

use anyhow::Context;
use clap::Parser;
use marker_tracker::{
    camera::OpenCvCamera,
    config::TrackerConfig,
    logging::init_logging,
    mat::{frame_to_mat, mask_to_mat},
};
use marker_vision::core_modules::pixel::pixel::HUE_MAX;
use marker_vision::{ColorRange, FrameSource, segment};
use opencv::{core::Mat, highgui};
use std::path::PathBuf;
use tracing::info;

const TRACKBARS: &str = "Trackbars";
const ESC: i32 = 27;

/// (name, maximum, initial position)
const SLIDERS: [(&str, i32, i32); 6] = [
    ("H_low", HUE_MAX as i32, 0),
    ("S_low", 255, 0),
    ("V_low", 255, 0),
    ("H_high", HUE_MAX as i32, HUE_MAX as i32),
    ("S_high", 255, 255),
    ("V_high", 255, 255),
];

#[derive(Parser, Debug)]
#[command(author, version, about = "Tune HSV marker thresholds against a live camera")]
struct Cli {
    /// Capture device index
    #[arg(long, default_value_t = 1)]
    camera: i32,
    /// Tune against a video file instead of a camera
    #[arg(long)]
    video: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging("info");

    let config = TrackerConfig {
        camera_index: cli.camera,
        video_path: cli.video,
        ..TrackerConfig::default()
    };
    let mut camera = OpenCvCamera::open(&config)?;

    highgui::named_window(TRACKBARS, highgui::WINDOW_AUTOSIZE)?;
    for (name, max, initial) in SLIDERS {
        highgui::create_trackbar(name, TRACKBARS, None, max, None)?;
        highgui::set_trackbar_pos(name, TRACKBARS, initial)?;
    }

    let mut range = current_range()?;
    let outcome: anyhow::Result<()> = loop {
        let frame = match camera.try_read() {
            Ok(Some(frame)) => frame,
            Ok(None) => break Ok(()),
            Err(err) => break Err(err).context("reading frame"),
        };

        range = current_range()?;
        let mask = segment(&frame, &range);

        let original = frame_to_mat(&frame)?;
        let mask_mat = mask_to_mat(&mask)?;
        let mut filtered = Mat::default();
        opencv::core::bitwise_and(&original, &original, &mut filtered, &mask_mat)?;

        highgui::imshow("Original", &original)?;
        highgui::imshow("Mask", &mask_mat)?;
        highgui::imshow("Filtered", &filtered)?;

        if highgui::wait_key(1)? & 0xFF == ESC {
            break Ok(());
        }
    };

    camera.release();
    highgui::destroy_all_windows()?;
    outcome?;

    info!(valid = range.is_valid(), "final range");
    println!("{}", serde_json::to_string_pretty(&range)?);
    Ok(())
}

fn current_range() -> opencv::Result<ColorRange> {
    let mut bounds = [0u8; 6];
    for (slot, (name, _, _)) in bounds.iter_mut().zip(SLIDERS) {
        *slot = highgui::get_trackbar_pos(name, TRACKBARS)?.clamp(0, 255) as u8;
    }
    Ok(ColorRange::from_arrays(
        [bounds[0], bounds[1], bounds[2]],
        [bounds[3], bounds[4], bounds[5]],
    ))
}
