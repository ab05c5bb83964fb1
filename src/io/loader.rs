//! Grayscale image loader
//!
//! Decodes PNG/JPEG files into a normalized single-channel buffer.
//! Color sources are reduced to luma (Rec. 709 weights), alpha is dropped.

use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::buffer::SampleBuffer;
use crate::error::{DecodeFailure, PipelineError};

/// Load an image file as a `Normalized` grayscale buffer
///
/// # Arguments
/// * `path` - Path to a PNG or JPEG file
///
/// # Returns
/// * `Ok(buffer)` - Normalized samples in [0, 1]
/// * `Err(PipelineError::Decode)` - Missing, unreadable or unsupported file
pub fn load_grayscale(path: &Path) -> Result<SampleBuffer, PipelineError> {
    // Verify file exists
    if !path.exists() {
        return Err(PipelineError::decode(path, DecodeFailure::NotFound));
    }

    // Sniff the content so a mislabeled extension still decodes
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| PipelineError::decode(path, e))?;

    match reader.format() {
        Some(ImageFormat::Png) | Some(ImageFormat::Jpeg) => {}
        _ => return Err(PipelineError::decode(path, DecodeFailure::UnsupportedFormat)),
    }

    let decoded = reader.decode().map_err(|e| PipelineError::decode(path, e))?;
    let luma = decoded.to_luma32f();
    let (width, height) = luma.dimensions();

    log::debug!("📷 Loaded {}: {}x{}", path.display(), width, height);

    Ok(SampleBuffer::from_normalized(width, height, luma.into_raw()).to_normalized())
}
