//! Contrast-Limited Adaptive Histogram Equalization
//!
//! The image is split into a grid of tiles. Each tile gets its own clipped
//! histogram and lookup table; every pixel is mapped by bilinear interpolation
//! between the four nearest tile tables.

use serde::{Deserialize, Serialize};

use super::histogram::Histogram;
use crate::buffer::SampleBuffer;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ClaheSettings {
    /// Histogram cap relative to a uniform distribution; 0 disables clipping
    pub clip_limit: f32,
    pub tiles_x: u32,
    pub tiles_y: u32,
}

impl Default for ClaheSettings {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

/// Mirror an out-of-range index without repeating the edge sample
fn reflect101(i: usize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i % period;
    if m < n {
        m
    } else {
        period - m
    }
}

/// Interpolation weights between neighbouring tiles along one axis
fn tile_neighbours(pos: usize, tile_size: usize, tiles: usize) -> (usize, usize, f32) {
    let f = pos as f32 / tile_size as f32 - 0.5;
    let first = f.floor();
    let weight = f - first;
    let lo = (first.max(0.0) as usize).min(tiles - 1);
    let hi = ((first as i64 + 1).max(0) as usize).min(tiles - 1);
    (lo, hi, weight)
}

/// Apply CLAHE; the input is quantized first and the result stays `Quantized8`
pub fn equalize(input: &SampleBuffer, settings: &ClaheSettings) -> SampleBuffer {
    let quantized = input.to_quantized8();
    if quantized.is_empty() {
        return quantized;
    }

    let (width, height) = (quantized.width() as usize, quantized.height() as usize);
    let pixels = quantized.quantized_samples();
    let tiles_x = settings.tiles_x.max(1) as usize;
    let tiles_y = settings.tiles_y.max(1) as usize;

    // Pad up to a whole number of tiles
    let tile_w = width.div_ceil(tiles_x);
    let tile_h = height.div_ceil(tiles_y);
    let tile_area = (tile_w * tile_h) as f32;

    let clip = if settings.clip_limit > 0.0 {
        Some(((settings.clip_limit * tile_area / 256.0) as u32).max(1))
    } else {
        None
    };

    let mut luts = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let samples = (ty * tile_h..(ty + 1) * tile_h).flat_map(|py| {
                let row = reflect101(py, height) * width;
                (tx * tile_w..(tx + 1) * tile_w).map(move |px| pixels[row + reflect101(px, width)])
            });
            let mut hist = Histogram::from_samples(samples);
            if let Some(limit) = clip {
                hist.clip(limit);
            }

            let scale = 255.0 / tile_area;
            let cdf = hist.cumulative();
            let lut: [u8; 256] =
                std::array::from_fn(|i| (cdf[i] as f32 * scale).round().clamp(0.0, 255.0) as u8);
            luts.push(lut);
        }
    }

    let mut out = Vec::with_capacity(pixels.len());
    for y in 0..height {
        let (ty1, ty2, ya) = tile_neighbours(y, tile_h, tiles_y);
        for x in 0..width {
            let (tx1, tx2, xa) = tile_neighbours(x, tile_w, tiles_x);
            let v = pixels[y * width + x] as usize;
            let lut = |ty: usize, tx: usize| luts[ty * tiles_x + tx][v] as f32;

            let top = lut(ty1, tx1) * (1.0 - xa) + lut(ty1, tx2) * xa;
            let bottom = lut(ty2, tx1) * (1.0 - xa) + lut(ty2, tx2) * xa;
            let value = top * (1.0 - ya) + bottom * ya;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    SampleBuffer::from_quantized8(quantized.width(), quantized.height(), out)
}
