//! Error types for loading and saving images

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a source image could not be decoded
#[derive(Error, Debug)]
pub enum DecodeFailure {
    #[error("file not found")]
    NotFound,

    #[error("unsupported image format (expected PNG or JPEG)")]
    UnsupportedFormat,

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        reason: DecodeFailure,
    },

    /// `saved` lists the files written before the failing one
    #[error("Failed to write {} ({} file(s) saved before the failure): {source}", .path.display(), .saved.len())]
    Write {
        path: PathBuf,
        saved: Vec<PathBuf>,
        #[source]
        source: image::ImageError,
    },

    #[error("Batch task did not complete: {0}")]
    Interrupted(String),
}

impl PipelineError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl Into<DecodeFailure>) -> Self {
        PipelineError::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The file the failing operation was working on
    pub fn path(&self) -> Option<&Path> {
        match self {
            PipelineError::Decode { path, .. } | PipelineError::Write { path, .. } => Some(path.as_path()),
            PipelineError::Interrupted(_) => None,
        }
    }
}
