//! Wavelet shrinkage denoising
//!
//! Haar (db1) multi-level decomposition, noise level estimated from the finest
//! diagonal subband, BayesShrink thresholds per subband and soft shrinkage of the
//! detail coefficients. The approximation band is never touched.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::buffer::SampleBuffer;

/// Normal distribution 0.75 quantile, turns a MAD into a standard deviation
const MAD_TO_SIGMA: f64 = 0.674_489_750_196_081_7;

#[derive(Debug, Clone, PartialEq)]
struct Plane {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Plane {
    fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    fn transposed(&self) -> Plane {
        let mut out = Plane::zeros(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                out.data[x * self.height + y] = self.data[y * self.width + x];
            }
        }
        out
    }
}

/// One analysis step; odd lengths repeat the last sample
fn haar_split(src: &[f64]) -> (Vec<f64>, Vec<f64>) {
    src.chunks(2)
        .map(|pair| {
            let a = pair[0];
            let b = pair.get(1).copied().unwrap_or(a);
            ((a + b) * FRAC_1_SQRT_2, (a - b) * FRAC_1_SQRT_2)
        })
        .unzip()
}

/// Inverse of [`haar_split`], cropped back to `len` samples
fn haar_merge(lo: &[f64], hi: &[f64], len: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(lo.len() * 2);
    for (&l, &h) in lo.iter().zip(hi) {
        out.push((l + h) * FRAC_1_SQRT_2);
        out.push((l - h) * FRAC_1_SQRT_2);
    }
    out.truncate(len);
    out
}

fn split_rows(plane: &Plane) -> (Plane, Plane) {
    let half = plane.width.div_ceil(2);
    let mut lo = Plane::zeros(half, plane.height);
    let mut hi = Plane::zeros(half, plane.height);
    for y in 0..plane.height {
        let (l, h) = haar_split(plane.row(y));
        lo.data[y * half..(y + 1) * half].copy_from_slice(&l);
        hi.data[y * half..(y + 1) * half].copy_from_slice(&h);
    }
    (lo, hi)
}

fn merge_rows(lo: &Plane, hi: &Plane, width: usize) -> Plane {
    let mut out = Plane::zeros(width, lo.height);
    for y in 0..lo.height {
        let row = haar_merge(lo.row(y), hi.row(y), width);
        out.data[y * width..(y + 1) * width].copy_from_slice(&row);
    }
    out
}

fn split_cols(plane: &Plane) -> (Plane, Plane) {
    let (lo, hi) = split_rows(&plane.transposed());
    (lo.transposed(), hi.transposed())
}

fn merge_cols(lo: &Plane, hi: &Plane, height: usize) -> Plane {
    merge_rows(&lo.transposed(), &hi.transposed(), height).transposed()
}

/// Detail subbands of one decomposition level plus the size they came from
struct Level {
    width: usize,
    height: usize,
    /// [low-high, high-low, high-high]
    details: [Plane; 3],
}

fn decompose(plane: &Plane) -> (Plane, Level) {
    let (lo, hi) = split_rows(plane);
    let (ll, lh) = split_cols(&lo);
    let (hl, hh) = split_cols(&hi);
    let level = Level {
        width: plane.width,
        height: plane.height,
        details: [lh, hl, hh],
    };
    (ll, level)
}

fn reconstruct(approx: &Plane, level: &Level) -> Plane {
    let [lh, hl, hh] = &level.details;
    let lo = merge_cols(approx, lh, level.height);
    let hi = merge_cols(hl, hh, level.height);
    merge_rows(&lo, &hi, level.width)
}

/// `max(floor(log2(min side)) - 3, 1)`
fn level_count(width: usize, height: usize) -> usize {
    let shortest = width.min(height).max(1);
    let max_level = shortest.ilog2() as usize;
    max_level.saturating_sub(3).max(1)
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

/// Robust noise estimate from the finest diagonal coefficients
fn estimate_sigma(diagonal: &Plane) -> f64 {
    let mut magnitudes: Vec<f64> = diagonal
        .data
        .iter()
        .filter(|&&c| c != 0.0)
        .map(|c| c.abs())
        .collect();
    if magnitudes.is_empty() {
        return 0.0;
    }
    median(&mut magnitudes) / MAD_TO_SIGMA
}

fn bayes_threshold(details: &Plane, noise_var: f64) -> f64 {
    let signal_var =
        details.data.iter().map(|c| c * c).sum::<f64>() / details.data.len().max(1) as f64;
    noise_var / (signal_var - noise_var).max(f64::EPSILON).sqrt()
}

fn soft_threshold(plane: &mut Plane, threshold: f64) {
    for c in plane.data.iter_mut() {
        let magnitude = (c.abs() - threshold).max(0.0);
        *c = magnitude.copysign(*c);
    }
}

/// Denoise a normalized buffer by wavelet coefficient shrinkage
pub fn denoise(input: &SampleBuffer) -> SampleBuffer {
    let (width, height) = input.dimensions();
    if input.is_empty() {
        return input.clone();
    }

    let mut approx = Plane {
        width: width as usize,
        height: height as usize,
        data: input.normalized_samples().iter().map(|&v| v as f64).collect(),
    };

    let mut levels = Vec::new();
    for _ in 0..level_count(approx.width, approx.height) {
        let (next, level) = decompose(&approx);
        levels.push(level);
        approx = next;
    }

    let sigma = estimate_sigma(&levels[0].details[2]);
    if sigma == 0.0 {
        log::debug!("Wavelet denoise: no measurable noise, image left as is");
        return input.to_normalized();
    }
    let noise_var = sigma * sigma;

    for level in levels.iter_mut() {
        for band in level.details.iter_mut() {
            let threshold = bayes_threshold(band, noise_var);
            soft_threshold(band, threshold);
        }
    }

    for level in levels.iter().rev() {
        approx = reconstruct(&approx, level);
    }

    let samples = approx.data.iter().map(|&v| v.clamp(0.0, 1.0) as f32).collect();
    SampleBuffer::from_normalized(width, height, samples)
}
