/// Denoising and smoothing filters
///
/// Every filter takes a `Normalized` buffer and returns a `Normalized` buffer
/// of the same dimensions. Internal round-trips through 8-bit data (anisotropic
/// diffusion) stay inside the filter.

pub mod diffusion;
pub mod median;
pub mod wavelet;
pub mod wiener;

use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;

pub use diffusion::DiffusionSettings;
pub use wiener::WienerSettings;

/// Which filter to run before equalization
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterSelection {
    #[default]
    None,
    WaveletDenoise,
    WienerDeconvolution,
    Median,
    AnisotropicDiffusion,
}

impl FilterSelection {
    pub const ALL: [FilterSelection; 5] = [
        FilterSelection::None,
        FilterSelection::WaveletDenoise,
        FilterSelection::WienerDeconvolution,
        FilterSelection::Median,
        FilterSelection::AnisotropicDiffusion,
    ];

    /// Human-readable name for status lines and combo boxes
    pub fn label(&self) -> &'static str {
        match self {
            FilterSelection::None => "No filter",
            FilterSelection::WaveletDenoise => "Wavelet denoise",
            FilterSelection::WienerDeconvolution => "Wiener deconvolution",
            FilterSelection::Median => "Median",
            FilterSelection::AnisotropicDiffusion => "Anisotropic diffusion",
        }
    }
}

/// Tunables for the filters that have any
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FilterSettings {
    pub wiener: WienerSettings,
    /// Median neighborhood radius (1 = 3x3)
    pub median_radius: u32,
    pub diffusion: DiffusionSettings,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            wiener: WienerSettings::default(),
            median_radius: 1,
            diffusion: DiffusionSettings::default(),
        }
    }
}

/// Run the selected filter over a normalized buffer
///
/// Panics if `input` is not `Normalized` or if a filter changes the shape.
pub fn apply_filter(
    selection: FilterSelection,
    settings: &FilterSettings,
    input: &SampleBuffer,
) -> SampleBuffer {
    let output = match selection {
        FilterSelection::None => input.clone(),
        FilterSelection::WaveletDenoise => wavelet::denoise(input),
        FilterSelection::WienerDeconvolution => wiener::deconvolve(input, &settings.wiener),
        FilterSelection::Median => median::median(input, settings.median_radius),
        FilterSelection::AnisotropicDiffusion => diffusion::diffuse(input, &settings.diffusion),
    };

    input.assert_same_dimensions(&output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Domain;

    fn noisy_gradient(width: u32, height: u32) -> SampleBuffer {
        let samples = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                let base = x as f32 / width as f32;
                let speckle = if (x * 7 + y * 13) % 5 == 0 { 0.2 } else { 0.0 };
                (base + speckle).min(1.0)
            })
            .collect();
        SampleBuffer::from_normalized(width, height, samples)
    }

    #[test]
    fn test_none_is_identity() {
        let input = noisy_gradient(9, 7);
        let output = apply_filter(FilterSelection::None, &FilterSettings::default(), &input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_every_filter_preserves_shape_and_domain() {
        let settings = FilterSettings::default();
        for (width, height) in [(1, 1), (5, 5), (17, 9), (32, 24)] {
            let input = noisy_gradient(width, height);
            for selection in FilterSelection::ALL {
                let output = apply_filter(selection, &settings, &input);
                assert_eq!(output.dimensions(), (width, height), "{:?}", selection);
                assert_eq!(output.domain(), Domain::Normalized, "{:?}", selection);
                assert!(
                    output.normalized_samples().iter().all(|v| (0.0..=1.0).contains(v)),
                    "{:?} left the [0, 1] range",
                    selection
                );
            }
        }
    }

    #[test]
    fn test_selection_json_names() {
        let json = serde_json::to_string(&FilterSelection::WienerDeconvolution).unwrap();
        assert_eq!(json, "\"wiener_deconvolution\"");
    }
}
