/// Processing parameters for a batch run
///
/// This struct stores the filter and equalization choices together with the
/// constants each stage runs with. It is serialized to JSON so a host can
/// remember the last selection between sessions.

use serde::{Deserialize, Serialize};

use crate::equalize::{ClaheSettings, EqualizationSelection};
use crate::filters::{FilterSelection, FilterSettings};

/// Everything a batch run needs besides the list of images
///
/// Defaults reproduce the fixed pipeline: wavelet shrinkage with automatic
/// threshold, 5x5 box Wiener with balance 0.1, 3x3 median, diffusion with
/// alpha 0.05 / K 70 / 5 iterations, CLAHE with clip 2.0 on an 8x8 grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct ProcessingParams {
    // ========== Selection ==========

    /// Denoising/smoothing filter, runs first
    pub filter: FilterSelection,

    /// Contrast method, runs on the filtered image
    pub equalization: EqualizationSelection,

    /// Compute PSNR between each source and its filtered image
    pub score: bool,

    // ========== Stage constants ==========

    pub filter_settings: FilterSettings,

    pub clahe: ClaheSettings,
}

impl ProcessingParams {
    /// Create parameters for a given selection with default constants
    pub fn new(filter: FilterSelection, equalization: EqualizationSelection) -> Self {
        Self {
            filter,
            equalization,
            ..Self::default()
        }
    }

    /// Same selection with PSNR scoring switched on
    pub fn scored(mut self) -> Self {
        self.score = true;
        self
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this run leaves images untouched apart from re-quantization
    pub fn is_passthrough(&self) -> bool {
        self.filter == FilterSelection::None && self.equalization == EqualizationSelection::None
    }
}
