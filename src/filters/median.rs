//! Median filter over a square neighborhood
//!
//! Borders repeat the nearest edge sample.

use crate::buffer::SampleBuffer;

/// Replace each sample with the median of its `(2r+1) x (2r+1)` neighborhood
pub fn median(input: &SampleBuffer, radius: u32) -> SampleBuffer {
    let src = input.normalized_samples();
    let (width, height) = input.dimensions();
    if radius == 0 || input.is_empty() {
        return input.clone();
    }

    let (w, h, r) = (width as i64, height as i64, radius as i64);
    let mut window = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    let mut out = Vec::with_capacity(src.len());

    for y in 0..h {
        for x in 0..w {
            window.clear();
            for dy in -r..=r {
                let sy = (y + dy).clamp(0, h - 1);
                let row = (sy * w) as usize;
                for dx in -r..=r {
                    let sx = (x + dx).clamp(0, w - 1);
                    window.push(src[row + sx as usize]);
                }
            }
            let mid = window.len() / 2;
            let (_, m, _) = window.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
            out.push(*m);
        }
    }

    SampleBuffer::from_normalized(width, height, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_outlier_removed() {
        let mut pixels = vec![0u8; 25];
        pixels[12] = 255;
        let input = SampleBuffer::from_quantized8(5, 5, pixels).to_normalized();

        let output = median(&input, 1);

        assert_eq!(output.get(2, 2), 0.0);
        // Nothing else moves either: every window holds at most one bright sample
        assert!(output.normalized_samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_flat_regions_unchanged() {
        let input = SampleBuffer::filled(6, 4, 0.4);
        assert_eq!(median(&input, 1), input);
    }

    #[test]
    fn test_edge_is_preserved() {
        // Left half dark, right half bright: a median keeps the step
        let samples = (0..8 * 8).map(|i| if i % 8 < 4 { 0.1 } else { 0.9 }).collect();
        let input = SampleBuffer::from_normalized(8, 8, samples);
        assert_eq!(median(&input, 1), input);
    }

    #[test]
    fn test_salt_noise_on_gray_background() {
        let mut samples = vec![0.5f32; 100];
        samples[5 * 10 + 5] = 1.0;
        samples[2 * 10 + 7] = 0.0;
        let input = SampleBuffer::from_normalized(10, 10, samples);

        let output = median(&input, 1);
        assert!(output.normalized_samples().iter().all(|&v| v == 0.5));
    }
}
