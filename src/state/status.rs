//! Status signals reported back to the display layer

use std::fmt;
use std::path::PathBuf;

use crate::error::PipelineError;
use crate::metrics::Psnr;

/// Outcome of a user action, with a short human-readable message via `Display`
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Apply was requested with no images selected
    NothingSelected,
    /// A batch finished; `psnr` is the score of the last image when scoring
    Processed { count: usize, psnr: Option<Psnr> },
    DecodeFailed { path: PathBuf, reason: String },
    /// Save was requested before any successful apply
    NothingToSave,
    /// Save was requested without a destination directory
    SaveCancelled,
    SavedSuccessfully { count: usize },
    SaveFailed {
        path: PathBuf,
        saved: Vec<PathBuf>,
        reason: String,
    },
    Interrupted(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::DecodeFailed { .. } | Status::SaveFailed { .. } | Status::Interrupted(_)
        )
    }

    /// How long a status bar should keep the message, in milliseconds
    pub fn display_millis(&self) -> u64 {
        if self.is_error() {
            5000
        } else {
            3000
        }
    }
}

impl From<PipelineError> for Status {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Decode { path, reason } => Status::DecodeFailed {
                path,
                reason: reason.to_string(),
            },
            PipelineError::Write {
                path,
                saved,
                source,
            } => Status::SaveFailed {
                path,
                saved,
                reason: source.to_string(),
            },
            PipelineError::Interrupted(reason) => Status::Interrupted(reason),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NothingSelected => write!(f, "No images selected"),
            Status::Processed { count, psnr: None } => write!(f, "Processed {} image(s)", count),
            Status::Processed {
                count,
                psnr: Some(score),
            } => write!(f, "Processed {} image(s). {}", count, score),
            Status::DecodeFailed { path, reason } => {
                write!(f, "Failed to open {}: {}", path.display(), reason)
            }
            Status::NothingToSave => write!(f, "No processed images to save"),
            Status::SaveCancelled => write!(f, "Save cancelled"),
            Status::SavedSuccessfully { count } => {
                write!(f, "Images saved successfully! ({} file(s))", count)
            }
            Status::SaveFailed {
                path,
                saved,
                reason,
            } => write!(
                f,
                "Failed to save {}: {} ({} file(s) saved before the error)",
                path.display(),
                reason,
                saved.len()
            ),
            Status::Interrupted(reason) => write!(f, "Processing interrupted: {}", reason),
        }
    }
}
