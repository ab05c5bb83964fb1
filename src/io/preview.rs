//! Preview rendering for the display layer
//!
//! Downscales buffers for on-screen display and writes the shared temporary
//! preview file that image widgets load from.

use std::fs;
use std::path::{Path, PathBuf};

use image::{imageops::FilterType, GrayImage};

use crate::buffer::SampleBuffer;
use crate::error::PipelineError;

/// Longest side of generated previews
pub const PREVIEW_SIZE: u32 = 250;

/// File name of the shared preview image
pub const TEMP_PREVIEW_NAME: &str = "temp_preview.png";

/// Get the preview cache directory
/// Returns ~/.cache/gray-batch on Linux, falling back to the system temp dir
pub fn get_preview_cache_dir() -> PathBuf {
    let mut path = dirs_next::cache_dir()
        .or_else(dirs_next::home_dir)
        .unwrap_or_else(std::env::temp_dir);

    path.push("gray-batch");
    path
}

/// Downscale to fit in `max_side` x `max_side`, keeping the aspect ratio
///
/// Images that already fit are returned at their own size.
pub fn render_preview(buffer: &SampleBuffer, max_side: u32) -> GrayImage {
    let image = buffer.to_gray_image();
    let (width, height) = image.dimensions();
    if width <= max_side && height <= max_side {
        return image;
    }

    let scale = max_side as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    image::imageops::resize(&image, new_width, new_height, FilterType::Lanczos3)
}

/// Write a preview into `dir`, replacing the previous one
///
/// Only one run may write the preview at a time; concurrent writers would
/// race on the same file.
pub fn write_preview_in(dir: &Path, buffer: &SampleBuffer) -> Result<PathBuf, PipelineError> {
    let path = dir.join(TEMP_PREVIEW_NAME);

    fs::create_dir_all(dir).map_err(|e| PipelineError::Write {
        path: path.clone(),
        saved: Vec::new(),
        source: image::ImageError::IoError(e),
    })?;

    render_preview(buffer, PREVIEW_SIZE)
        .save(&path)
        .map_err(|e| PipelineError::Write {
            path: path.clone(),
            saved: Vec::new(),
            source: e,
        })?;

    log::debug!("📸 Preview written: {}", path.display());
    Ok(path)
}

/// Write the preview to the user cache directory
pub fn write_temp_preview(buffer: &SampleBuffer) -> Result<PathBuf, PipelineError> {
    write_preview_in(&get_preview_cache_dir(), buffer)
}
