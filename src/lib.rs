//! Grayscale batch filtering and equalization
//!
//! Images are loaded as grayscale, run through one restoration filter and one
//! contrast equalization, optionally scored with PSNR, and saved under their
//! original file names. The display layer drives everything through
//! [`EditorSession`] or calls [`process_batch`] directly.

pub mod batch;
pub mod buffer;
pub mod equalize;
pub mod error;
pub mod filters;
pub mod io;
pub mod metrics;
pub mod state;

pub use batch::{process_batch, process_batch_async, BatchOutcome, BatchResult, ProcessedImage};
pub use buffer::{Domain, SampleBuffer};
pub use equalize::{ClaheSettings, EqualizationSelection};
pub use error::{DecodeFailure, PipelineError};
pub use filters::{FilterSelection, FilterSettings};
pub use metrics::Psnr;
pub use state::params::ProcessingParams;
pub use state::session::EditorSession;
pub use state::status::Status;
