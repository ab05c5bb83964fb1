//! Edge-preserving anisotropic diffusion
//!
//! The diffusion runs on 3-channel 8-bit data. Grayscale input is quantized and
//! replicated into three channels, diffused, then reduced back to one normalized
//! channel.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::buffer::{normalize, SampleBuffer};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DiffusionSettings {
    /// Step size of each iteration
    pub alpha: f32,
    /// Conductance K: gradients well above K are treated as edges
    pub conductance: f32,
    pub iterations: u32,
}

impl Default for DiffusionSettings {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            conductance: 70.0,
            iterations: 5,
        }
    }
}

const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Gray → 3-channel 8-bit, same value in every channel
fn replicate(gray: &SampleBuffer) -> RgbImage {
    let (width, height) = gray.dimensions();
    let samples = gray.quantized_samples();
    RgbImage::from_fn(width, height, |x, y| {
        let v = samples[(y * width + x) as usize];
        Rgb([v, v, v])
    })
}

/// One explicit diffusion step over the 8-neighbourhood, replicated border
fn diffusion_step(src: &RgbImage, alpha: f32, inv_k2: f32) -> RgbImage {
    let (width, height) = src.dimensions();
    let (w, h) = (width as i64, height as i64);

    RgbImage::from_fn(width, height, |x, y| {
        let centre = src.get_pixel(x, y).0;
        let mut flux = [0.0f32; 3];

        for (dx, dy) in NEIGHBOURS {
            let nx = (x as i64 + dx).clamp(0, w - 1) as u32;
            let ny = (y as i64 + dy).clamp(0, h - 1) as u32;
            let neighbour = src.get_pixel(nx, ny).0;

            let diff = [0, 1, 2].map(|c| neighbour[c] as f32 - centre[c] as f32);
            let dist2: f32 = diff.iter().map(|d| d * d).sum();
            let g = (-dist2 * inv_k2).exp();
            for c in 0..3 {
                flux[c] += g * diff[c];
            }
        }

        Rgb([0, 1, 2].map(|c| (centre[c] as f32 + alpha * flux[c]).round().clamp(0.0, 255.0) as u8))
    })
}

/// Diffuse a normalized buffer, returning a normalized buffer of the same size
pub fn diffuse(input: &SampleBuffer, settings: &DiffusionSettings) -> SampleBuffer {
    let (width, height) = input.dimensions();
    if input.is_empty() {
        return input.clone();
    }

    let inv_k2 = 1.0 / (settings.conductance * settings.conductance).max(f32::MIN_POSITIVE);
    let mut rgb = replicate(&input.to_quantized8());
    for _ in 0..settings.iterations {
        rgb = diffusion_step(&rgb, settings.alpha, inv_k2);
    }

    // All channels stay identical, keep the first
    let samples = rgb.pixels().map(|p| normalize(p.0[0])).collect();
    SampleBuffer::from_normalized(width, height, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_u8(width: u32, height: u32, pixels: Vec<u8>) -> SampleBuffer {
        SampleBuffer::from_quantized8(width, height, pixels).to_normalized()
    }

    #[test]
    fn test_replicate_fills_all_channels() {
        let gray = SampleBuffer::from_quantized8(2, 1, vec![10, 200]);
        let rgb = replicate(&gray);
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 10, 10]);
        assert_eq!(rgb.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn test_flat_image_unchanged() {
        let input = from_u8(6, 6, vec![77; 36]);
        assert_eq!(diffuse(&input, &DiffusionSettings::default()), input);
    }

    #[test]
    fn test_strong_edge_preserved() {
        let pixels = (0..64).map(|i| if i % 8 < 4 { 0 } else { 255 }).collect();
        let input = from_u8(8, 8, pixels);
        assert_eq!(diffuse(&input, &DiffusionSettings::default()), input);
    }

    #[test]
    fn test_small_bump_smoothed() {
        let mut pixels = vec![110u8; 49];
        pixels[24] = 100;
        let input = from_u8(7, 7, pixels);

        let output = diffuse(&input, &DiffusionSettings::default()).to_quantized8();
        let centre = output.quantized_samples()[24];
        assert!(centre > 100 && centre <= 110, "centre = {}", centre);
    }

    #[test]
    fn test_zero_iterations_only_quantizes() {
        let input = SampleBuffer::from_normalized(2, 2, vec![0.1, 0.2, 0.3, 0.4]);
        let settings = DiffusionSettings {
            iterations: 0,
            ..Default::default()
        };
        assert_eq!(diffuse(&input, &settings), input.to_quantized8().to_normalized());
    }
}
