//! Batch processing: load → filter → equalize → quantize → (score) per image
//!
//! A run is a pure function of the path list and the parameters. It either
//! produces a complete [`BatchResult`] or fails on the first image that cannot
//! be processed; partial results are never handed out.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::buffer::SampleBuffer;
use crate::equalize::apply_equalization;
use crate::error::PipelineError;
use crate::filters::apply_filter;
use crate::io::loader::load_grayscale;
use crate::metrics::{psnr, Psnr};
use crate::state::params::ProcessingParams;

/// Final buffers for one source image
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Filter output, `Quantized8`
    pub filtered: SampleBuffer,
    /// Equalization output, `Quantized8`
    pub equalized: SampleBuffer,
    /// Source vs. filtered, when scoring was requested
    pub psnr: Option<Psnr>,
}

/// Everything produced by one run, keyed by source path
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    order: Vec<PathBuf>,
    filtered: HashMap<PathBuf, SampleBuffer>,
    equalized: HashMap<PathBuf, SampleBuffer>,
    scores: HashMap<PathBuf, Psnr>,
}

impl BatchResult {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            filtered: HashMap::new(),
            equalized: HashMap::new(),
            scores: HashMap::new(),
        }
    }

    fn insert(&mut self, path: PathBuf, image: ProcessedImage) {
        if let Some(score) = image.psnr {
            self.scores.insert(path.clone(), score);
        }
        self.filtered.insert(path.clone(), image.filtered);
        self.equalized.insert(path.clone(), image.equalized);
        self.order.push(path);
    }

    /// Source paths in the order they were processed
    pub fn paths(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn filtered(&self) -> &HashMap<PathBuf, SampleBuffer> {
        &self.filtered
    }

    pub fn equalized(&self) -> &HashMap<PathBuf, SampleBuffer> {
        &self.equalized
    }

    pub fn scores(&self) -> &HashMap<PathBuf, Psnr> {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Filtered buffers in processing order
    pub fn iter_filtered(&self) -> impl Iterator<Item = (&Path, &SampleBuffer)> {
        self.order
            .iter()
            .filter_map(|p| self.filtered.get(p).map(|b| (p.as_path(), b)))
    }

    /// Equalized buffers in processing order
    pub fn iter_equalized(&self) -> impl Iterator<Item = (&Path, &SampleBuffer)> {
        self.order
            .iter()
            .filter_map(|p| self.equalized.get(p).map(|b| (p.as_path(), b)))
    }
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The path list was empty; nothing was produced
    NothingSelected,
    Processed(BatchResult),
}

/// Run one image through the pipeline
pub fn process_image(path: &Path, params: &ProcessingParams) -> Result<ProcessedImage, PipelineError> {
    let source = load_grayscale(path)?;
    let filtered = apply_filter(params.filter, &params.filter_settings, &source);
    let equalized = apply_equalization(params.equalization, &params.clahe, &filtered);

    let score = params.score.then(|| psnr(&source, &filtered));

    Ok(ProcessedImage {
        filtered: filtered.to_quantized8(),
        equalized: equalized.into_quantized8(),
        psnr: score,
    })
}

/// Process every path in order, aborting on the first failure
///
/// Duplicate paths are processed once. An empty list yields
/// [`BatchOutcome::NothingSelected`].
pub fn process_batch(paths: &[PathBuf], params: &ProcessingParams) -> Result<BatchOutcome, PipelineError> {
    if paths.is_empty() {
        log::info!("Nothing selected, batch skipped");
        return Ok(BatchOutcome::NothingSelected);
    }

    log::info!(
        "🔍 Processing {} image(s): {} + {}",
        paths.len(),
        params.filter.label(),
        params.equalization.label()
    );

    let mut seen = HashSet::new();
    let mut result = BatchResult::new();

    for path in paths {
        if !seen.insert(path.as_path()) {
            log::debug!("Skipping duplicate {}", path.display());
            continue;
        }

        let image = process_image(path, params).map_err(|e| {
            log::warn!("⚠️  Batch aborted at {}: {}", path.display(), e);
            e
        })?;

        match &image.psnr {
            Some(score) => log::debug!("Processed {} ({})", path.display(), score),
            None => log::debug!("Processed {}", path.display()),
        }
        result.insert(path.clone(), image);
    }

    log::info!("✅ Batch complete: {} image(s)", result.len());
    Ok(BatchOutcome::Processed(result))
}

/// [`process_batch`] on the blocking thread pool, for async hosts
///
/// Images are still processed one after another on a single thread.
pub async fn process_batch_async(
    paths: Vec<PathBuf>,
    params: ProcessingParams,
) -> Result<BatchOutcome, PipelineError> {
    // Spawn blocking because decoding and filtering are CPU-intensive
    match tokio::task::spawn_blocking(move || process_batch(&paths, &params)).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => Err(PipelineError::Interrupted(e.to_string())),
    }
}
