//! Global histogram equalization on normalized data
//!
//! The histogram spans the image's own intensity range with 256 bins; each
//! sample is mapped to the normalized cumulative count, interpolated linearly
//! between bin centres.

use crate::buffer::SampleBuffer;

const BINS: usize = 256;

/// Equalize a normalized buffer; the result is normalized too
///
/// A flat image has no contrast to redistribute and is returned unchanged.
pub fn equalize(input: &SampleBuffer) -> SampleBuffer {
    let samples = input.normalized_samples();
    let (min, max) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(max > min) {
        return input.clone();
    }

    let (min, max) = (min as f64, max as f64);
    let bin_width = (max - min) / BINS as f64;
    let bin_of = |v: f64| (((v - min) / bin_width) as usize).min(BINS - 1);

    let mut counts = [0u64; BINS];
    for &v in samples {
        counts[bin_of(v as f64)] += 1;
    }

    let total = samples.len() as f64;
    let mut cdf = [0f64; BINS];
    let mut running = 0u64;
    for (slot, count) in cdf.iter_mut().zip(counts) {
        running += count;
        *slot = running as f64 / total;
    }

    let first_centre = min + bin_width / 2.0;
    let last_centre = first_centre + bin_width * (BINS - 1) as f64;
    let map = |v: f64| -> f64 {
        if v <= first_centre {
            cdf[0]
        } else if v >= last_centre {
            cdf[BINS - 1]
        } else {
            let pos = (v - first_centre) / bin_width;
            let i = (pos as usize).min(BINS - 2);
            let t = pos - i as f64;
            cdf[i] + t * (cdf[i + 1] - cdf[i])
        }
    };

    let out = samples.iter().map(|&v| map(v as f64) as f32).collect();
    SampleBuffer::from_normalized(input.width(), input.height(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_unchanged() {
        let input = SampleBuffer::filled(10, 10, 0.42);
        assert_eq!(equalize(&input), input);
    }

    #[test]
    fn test_stretches_low_contrast_ramp() {
        let samples: Vec<f32> = (0..256).map(|i| 0.4 + 0.2 * i as f32 / 255.0).collect();
        let input = SampleBuffer::from_normalized(16, 16, samples);

        let output = equalize(&input);
        let values = output.normalized_samples();
        let lo = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        assert!(lo < 0.01, "lo = {}", lo);
        assert!((hi - 1.0).abs() < 1e-6, "hi = {}", hi);
    }

    #[test]
    fn test_preserves_intensity_order() {
        let samples: Vec<f32> = (0..64).map(|i| ((i * 29) % 64) as f32 / 80.0).collect();
        let input = SampleBuffer::from_normalized(8, 8, samples.clone());
        let output = equalize(&input);
        let mapped = output.normalized_samples();

        for i in 0..samples.len() {
            for j in 0..samples.len() {
                if samples[i] < samples[j] {
                    assert!(mapped[i] <= mapped[j]);
                }
            }
        }
    }
}
