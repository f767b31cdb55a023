pub mod blob_detector;
pub mod color_range;
pub mod color_segmenter;
pub mod command;
pub mod frame;
pub mod mask;
pub mod pixel;
pub mod smart_blob;
pub mod vector;
