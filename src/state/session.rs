//! Editing session driven by the display layer
//!
//! Tracks the current selection and the last successful run, and turns every
//! user action into a [`Status`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::params::ProcessingParams;
use super::status::Status;
use crate::batch::{process_batch, BatchOutcome, BatchResult};
use crate::buffer::SampleBuffer;
use crate::error::PipelineError;
use crate::io::discover::discover_images;
use crate::io::persister::{save_result, SaveOutcome};
use crate::io::preview::{write_preview_in, write_temp_preview};

/// Select / apply / save state driven by the display layer
///
/// The session owns the selected paths and the last successful
/// [`BatchResult`]. A result is only ever replaced as a whole by a later
/// successful apply; failed or empty applies leave it untouched.
#[derive(Debug, Default)]
pub struct EditorSession {
    selected: Vec<PathBuf>,
    params: ProcessingParams,
    result: Option<BatchResult>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ProcessingParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Replace the selection; duplicates are dropped, order is kept
    pub fn select(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        let mut seen = HashSet::new();
        self.selected = paths
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        log::info!("Selected {} image(s)", self.selected.len());
    }

    /// Select every supported image below `folder`; returns how many were found
    pub fn select_folder(&mut self, folder: &Path) -> usize {
        self.select(discover_images(folder));
        self.selected.len()
    }

    pub fn selected(&self) -> &[PathBuf] {
        &self.selected
    }

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ProcessingParams {
        &mut self.params
    }

    /// Result of the last successful apply
    pub fn result(&self) -> Option<&BatchResult> {
        self.result.as_ref()
    }

    /// Run the current selection through the pipeline
    pub fn apply(&mut self) -> Status {
        match process_batch(&self.selected, &self.params) {
            Ok(BatchOutcome::NothingSelected) => Status::NothingSelected,
            Ok(BatchOutcome::Processed(result)) => {
                let psnr = result
                    .paths()
                    .last()
                    .and_then(|last| result.scores().get(last))
                    .copied();
                let count = result.len();
                self.result = Some(result);
                Status::Processed { count, psnr }
            }
            Err(e) => Status::from(e),
        }
    }

    /// Save the equalized images of the last apply into `destination`
    ///
    /// An empty `destination` is a cancelled dialog. The reported count is
    /// the number of distinct files written; colliding basenames count once.
    pub fn save(&self, destination: Option<&Path>) -> Status {
        let Some(result) = &self.result else {
            return Status::NothingToSave;
        };

        match save_result(result, destination) {
            Ok(outcome @ SaveOutcome::Saved(_)) => Status::SavedSuccessfully {
                count: outcome.file_count(),
            },
            Ok(SaveOutcome::NothingToSave) => Status::NothingToSave,
            Ok(SaveOutcome::NoDestination) => Status::SaveCancelled,
            Err(e) => Status::from(e),
        }
    }

    /// (filtered, equalized) buffers of the first selected image
    pub fn preview(&self) -> Option<(&SampleBuffer, &SampleBuffer)> {
        let result = self.result.as_ref()?;
        let first = self.selected.first()?;
        Some((result.filtered().get(first)?, result.equalized().get(first)?))
    }

    /// Write the equalized preview of the first selected image into `dir`
    pub fn write_preview(&self, dir: &Path) -> Result<Option<PathBuf>, PipelineError> {
        match self.preview() {
            Some((_, equalized)) => write_preview_in(dir, equalized).map(Some),
            None => Ok(None),
        }
    }

    /// Write the equalized preview of the first selected image to the shared
    /// preview file in the user cache directory
    pub fn write_temp_preview(&self) -> Result<Option<PathBuf>, PipelineError> {
        match self.preview() {
            Some((_, equalized)) => write_temp_preview(equalized).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equalize::EqualizationSelection;
    use crate::filters::FilterSelection;
    use crate::metrics::Psnr;
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    fn write_gray(dir: &TempDir, name: &str, value: u8) -> PathBuf {
        let path = dir.path().join(name);
        GrayImage::from_fn(6, 6, |x, _| Luma([value.saturating_add(x as u8 * 10)]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_apply_without_selection() {
        let mut session = EditorSession::new();
        assert_eq!(session.apply(), Status::NothingSelected);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_empty_apply_keeps_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        session.select([write_gray(&dir, "a.png", 10)]);
        assert!(matches!(session.apply(), Status::Processed { count: 1, .. }));
        let before = session.result().cloned();

        session.select(Vec::new());
        assert_eq!(session.apply(), Status::NothingSelected);
        assert_eq!(session.result().cloned(), before);
    }

    #[test]
    fn test_failed_apply_keeps_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        session.select([write_gray(&dir, "a.png", 10)]);
        session.apply();
        let before = session.result().cloned();

        let missing = dir.path().join("gone.png");
        session.select([write_gray(&dir, "b.png", 50), missing.clone()]);
        match session.apply() {
            Status::DecodeFailed { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(session.result().cloned(), before);
    }

    #[test]
    fn test_new_run_replaces_old_keys() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_gray(&dir, "a.png", 10);
        let b = write_gray(&dir, "b.png", 60);
        let mut session = EditorSession::new();

        session.select([a.clone(), b.clone()]);
        session.apply();

        session.select([b.clone()]);
        *session.params_mut() =
            ProcessingParams::new(FilterSelection::Median, EqualizationSelection::GlobalHistogramEqualization);
        session.apply();

        let result = session.result().unwrap();
        assert_eq!(result.paths(), &[b.clone()]);
        assert!(!result.filtered().contains_key(&a));
        assert!(!result.equalized().contains_key(&a));
    }

    #[test]
    fn test_apply_reports_last_psnr() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::with_params(ProcessingParams::default().scored());
        session.select([write_gray(&dir, "a.png", 10)]);

        assert_eq!(
            session.apply(),
            Status::Processed {
                count: 1,
                psnr: Some(Psnr::Identical)
            }
        );
    }

    #[test]
    fn test_save_flow() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();

        assert_eq!(session.save(Some(out.path())), Status::NothingToSave);

        session.select([write_gray(&dir, "a.png", 10), write_gray(&dir, "b.jpg", 90)]);
        session.apply();

        assert_eq!(session.save(None), Status::SaveCancelled);
        assert_eq!(session.save(Some(Path::new(""))), Status::SaveCancelled);
        assert_eq!(session.save(Some(out.path())), Status::SavedSuccessfully { count: 2 });
        assert!(out.path().join("a.png").exists());
        assert!(out.path().join("b.jpg").exists());
    }

    #[test]
    fn test_save_counts_colliding_names_once() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();

        session.select([write_gray(&first, "s.png", 10), write_gray(&second, "s.png", 90)]);
        assert!(matches!(session.apply(), Status::Processed { count: 2, .. }));

        assert_eq!(session.save(Some(out.path())), Status::SavedSuccessfully { count: 1 });
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_failure_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        session.select([write_gray(&dir, "a.png", 10)]);
        session.apply();

        let status = session.save(Some(&dir.path().join("missing").join("deeper")));
        assert!(status.is_error());
        assert!(matches!(status, Status::SaveFailed { .. }));
    }

    #[test]
    fn test_preview_of_first_selected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        assert!(session.preview().is_none());

        session.select([write_gray(&dir, "a.png", 10), write_gray(&dir, "b.png", 90)]);
        session.apply();

        let (filtered, equalized) = session.preview().unwrap();
        assert_eq!(filtered.get(0, 0), crate::buffer::normalize(10));
        assert_eq!(equalized, filtered);

        let preview_dir = dir.path().join("preview");
        let written = session.write_preview(&preview_dir).unwrap().unwrap();
        assert!(written.exists());
    }

    #[test]
    fn test_temp_preview_in_cache_dir() {
        use crate::io::preview::{get_preview_cache_dir, TEMP_PREVIEW_NAME};

        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        assert_eq!(session.write_temp_preview().unwrap(), None);

        session.select([write_gray(&dir, "a.png", 10)]);
        session.apply();

        let written = session.write_temp_preview().unwrap().unwrap();
        assert_eq!(written, get_preview_cache_dir().join(TEMP_PREVIEW_NAME));
        assert!(written.exists());
    }

    #[test]
    fn test_select_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_gray(&dir, "a.png", 10);
        write_gray(&dir, "b.png", 20);
        std::fs::write(dir.path().join("skip.txt"), b"x").unwrap();

        let mut session = EditorSession::new();
        assert_eq!(session.select_folder(dir.path()), 2);
    }

    #[test]
    fn test_select_drops_duplicates() {
        let mut session = EditorSession::new();
        session.select([PathBuf::from("/a.png"), PathBuf::from("/b.png"), PathBuf::from("/a.png")]);
        assert_eq!(session.selected(), &[PathBuf::from("/a.png"), PathBuf::from("/b.png")]);
    }
}
