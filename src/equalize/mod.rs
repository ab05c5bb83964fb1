/// Contrast and histogram equalization
///
/// Equalizers consume the filtered `Normalized` buffer. Global equalization
/// answers in the normalized domain, CLAHE answers with 8-bit data that is
/// stored as-is.

pub mod clahe;
pub mod global;
pub mod histogram;

use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;

pub use clahe::ClaheSettings;
pub use histogram::Histogram;

/// Which equalization to run after filtering
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EqualizationSelection {
    #[default]
    None,
    GlobalHistogramEqualization,
    Clahe,
}

impl EqualizationSelection {
    pub const ALL: [EqualizationSelection; 3] = [
        EqualizationSelection::None,
        EqualizationSelection::GlobalHistogramEqualization,
        EqualizationSelection::Clahe,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EqualizationSelection::None => "No equalization",
            EqualizationSelection::GlobalHistogramEqualization => "Histogram equalization",
            EqualizationSelection::Clahe => "CLAHE",
        }
    }
}

/// Run the selected equalization
///
/// The output domain depends on the method; callers quantize before storing.
pub fn apply_equalization(
    selection: EqualizationSelection,
    settings: &ClaheSettings,
    input: &SampleBuffer,
) -> SampleBuffer {
    let output = match selection {
        EqualizationSelection::None => input.clone(),
        EqualizationSelection::GlobalHistogramEqualization => global::equalize(input),
        EqualizationSelection::Clahe => clahe::equalize(input, settings),
    };

    input.assert_same_dimensions(&output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Domain;

    fn ramp(width: u32, height: u32) -> SampleBuffer {
        let n = (width * height) as f32;
        let samples = (0..width * height).map(|i| 0.3 + 0.3 * i as f32 / n).collect();
        SampleBuffer::from_normalized(width, height, samples)
    }

    #[test]
    fn test_none_is_identity() {
        let input = ramp(7, 5);
        let output = apply_equalization(EqualizationSelection::None, &ClaheSettings::default(), &input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_output_domains() {
        let input = ramp(20, 12);
        let settings = ClaheSettings::default();

        let global =
            apply_equalization(EqualizationSelection::GlobalHistogramEqualization, &settings, &input);
        assert_eq!(global.domain(), Domain::Normalized);

        let clahe = apply_equalization(EqualizationSelection::Clahe, &settings, &input);
        assert_eq!(clahe.domain(), Domain::Quantized8);
    }

    #[test]
    fn test_every_method_preserves_shape() {
        let settings = ClaheSettings::default();
        for (width, height) in [(1, 1), (3, 17), (40, 30)] {
            let input = ramp(width, height);
            for selection in EqualizationSelection::ALL {
                let output = apply_equalization(selection, &settings, &input);
                assert_eq!(output.dimensions(), (width, height), "{:?}", selection);
            }
        }
    }

    #[test]
    fn test_flat_input_never_gains_contrast() {
        let input = SampleBuffer::filled(24, 16, 0.5);
        let settings = ClaheSettings::default();
        for selection in EqualizationSelection::ALL {
            let output = apply_equalization(selection, &settings, &input).to_normalized();
            let samples = output.normalized_samples();
            assert!(samples.iter().all(|&v| v == samples[0]), "{:?}", selection);
        }
    }
}
