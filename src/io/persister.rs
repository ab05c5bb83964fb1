//! Save processed images under their original file names
//!
//! Each buffer is written to `<destination>/<basename of source>`; the encoder
//! is picked from the extension. Files with the same basename overwrite each
//! other, the last one written wins.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageError;

use crate::batch::BatchResult;
use crate::buffer::SampleBuffer;
use crate::error::PipelineError;

/// What a save call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No processed images to write
    NothingToSave,
    /// No destination directory was chosen
    NoDestination,
    /// Files written, in order; a path repeats when basenames collide
    Saved(Vec<PathBuf>),
}

impl SaveOutcome {
    /// Number of distinct files left on disk
    pub fn file_count(&self) -> usize {
        match self {
            SaveOutcome::Saved(paths) => paths.iter().collect::<HashSet<_>>().len(),
            SaveOutcome::NothingToSave | SaveOutcome::NoDestination => 0,
        }
    }
}

/// Destination file for a source image, `None` if the source has no file name
pub fn output_path(destination: &Path, source: &Path) -> Option<PathBuf> {
    source.file_name().map(|name| destination.join(name))
}

/// Write buffers in iteration order, stopping at the first failure
///
/// An empty destination path counts as no destination.
///
/// # Returns
/// * `Ok(SaveOutcome::Saved(paths))` - Every file written
/// * `Err(PipelineError::Write)` - The failing file plus those written before it
pub fn save_buffers<'a>(
    entries: impl IntoIterator<Item = (&'a Path, &'a SampleBuffer)>,
    destination: Option<&Path>,
) -> Result<SaveOutcome, PipelineError> {
    let entries: Vec<_> = entries.into_iter().collect();
    if entries.is_empty() {
        return Ok(SaveOutcome::NothingToSave);
    }
    let Some(destination) = destination.filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(SaveOutcome::NoDestination);
    };

    let mut saved = Vec::with_capacity(entries.len());
    let mut targets = HashSet::new();
    for (source, buffer) in entries {
        let Some(target) = output_path(destination, source) else {
            return Err(PipelineError::Write {
                path: source.to_path_buf(),
                saved,
                source: ImageError::IoError(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "source path has no file name",
                )),
            });
        };

        if !targets.insert(target.clone()) {
            log::warn!("⚠️  {} overwrites an earlier image with the same name", target.display());
        }

        if let Err(e) = buffer.to_gray_image().save(&target) {
            log::warn!("⚠️  Save aborted at {}: {}", target.display(), e);
            return Err(PipelineError::Write {
                path: target,
                saved,
                source: e,
            });
        }

        log::debug!("💾 Saved {}", target.display());
        saved.push(target);
    }

    log::info!("✅ Saved {} image(s) to {}", saved.len(), destination.display());
    Ok(SaveOutcome::Saved(saved))
}

/// Save the final (equalized) images of a run
pub fn save_result(result: &BatchResult, destination: Option<&Path>) -> Result<SaveOutcome, PipelineError> {
    save_buffers(result.iter_equalized(), destination)
}

/// Save the filtered (pre-equalization) images of a run
pub fn save_filtered(result: &BatchResult, destination: Option<&Path>) -> Result<SaveOutcome, PipelineError> {
    save_buffers(result.iter_filtered(), destination)
}
