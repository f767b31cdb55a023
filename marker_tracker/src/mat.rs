// Conversions between OpenCV `Mat`s and the engine's `Frame` / `Mask` types.

use marker_vision::{Frame, Mask};
use opencv::{
    core::{self, Mat, Scalar},
    imgproc,
    prelude::*,
};

/// Copies an 8-bit BGR (or grey/BGRA) `Mat` into an RGB `Frame`.
pub fn mat_to_frame(mat: &Mat) -> opencv::Result<Frame> {
    let bgr = match mat.channels() {
        3 => mat.try_clone()?,
        channels => {
            let code = if channels == 1 {
                imgproc::COLOR_GRAY2BGR
            } else {
                imgproc::COLOR_BGRA2BGR
            };
            let mut converted = Mat::default();
            imgproc::cvt_color(mat, &mut converted, code, 0)?;
            converted
        }
    };
    let width = bgr.cols().max(0) as u32;
    let height = bgr.rows().max(0) as u32;
    // `try_clone` and `cvt_color` both produce continuous buffers.
    let bytes = bgr.data_bytes()?.to_vec();
    Frame::from_bgr_bytes(width, height, bytes)
        .map_err(|err| opencv::Error::new(core::StsUnmatchedSizes, err.to_string()))
}

/// Renders a `Frame` back into a BGR `Mat` for display.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;
    let bytes = mat.data_bytes_mut()?;
    for (dst, pixel) in bytes.chunks_exact_mut(3).zip(frame.pixels()) {
        dst[0] = pixel.blue;
        dst[1] = pixel.green;
        dst[2] = pixel.red;
    }
    Ok(mat)
}

/// Renders a `Mask` as a single-channel 0/255 `Mat`.
pub fn mask_to_mat(mask: &Mask) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        mask.height() as i32,
        mask.width() as i32,
        core::CV_8UC1,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(&mask.to_luma_bytes());
    Ok(mat)
}
