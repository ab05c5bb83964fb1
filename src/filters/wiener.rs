//! Wiener deconvolution against a known blur kernel
//!
//! Works in the frequency domain with circular boundaries:
//! `X = conj(H) / (|H|² + balance·|R|²) · Y`, where `H` is the transfer function
//! of the box point-spread kernel and `R` the one of a 4-neighbour Laplacian used
//! as regularizer.

use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WienerSettings {
    /// Side of the uniform (box) point-spread kernel
    pub kernel_size: u32,
    /// Noise/regularization balance
    pub balance: f64,
}

impl Default for WienerSettings {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            balance: 0.1,
        }
    }
}

const LAPLACIAN: [[f64; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]];

/// Transfer function of a small kernel whose centre sits at the origin
///
/// Kernels larger than the image wrap around and accumulate.
fn transfer_function(
    kernel: &[f64],
    kernel_size: usize,
    width: usize,
    height: usize,
    planner: &mut FftPlanner<f64>,
) -> Vec<Complex<f64>> {
    let mut padded = vec![Complex::new(0.0, 0.0); width * height];
    let centre = kernel_size / 2;
    for ky in 0..kernel_size {
        for kx in 0..kernel_size {
            let y = (ky + height * kernel_size - centre) % height;
            let x = (kx + width * kernel_size - centre) % width;
            padded[y * width + x].re += kernel[ky * kernel_size + kx];
        }
    }
    fft2(&mut padded, width, height, FftDirection::Forward, planner);
    padded
}

fn transpose(src: &[Complex<f64>], width: usize, height: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); src.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = src[y * width + x];
        }
    }
    out
}

/// In-place 2D FFT (rows then columns); the inverse is scaled by 1/N
fn fft2(
    data: &mut [Complex<f64>],
    width: usize,
    height: usize,
    direction: FftDirection,
    planner: &mut FftPlanner<f64>,
) {
    planner.plan_fft(width, direction).process(data);

    let mut columns = transpose(data, width, height);
    planner.plan_fft(height, direction).process(&mut columns);
    data.copy_from_slice(&transpose(&columns, height, width));

    if direction == FftDirection::Inverse {
        let scale = 1.0 / (width * height) as f64;
        for c in data.iter_mut() {
            *c *= scale;
        }
    }
}

/// Deconvolve a normalized buffer against a uniform blur
pub fn deconvolve(input: &SampleBuffer, settings: &WienerSettings) -> SampleBuffer {
    let (width, height) = input.dimensions();
    if input.is_empty() {
        return input.clone();
    }
    let (w, h) = (width as usize, height as usize);
    let k = settings.kernel_size.max(1) as usize;

    let mut planner = FftPlanner::new();
    let psf = vec![1.0 / (k * k) as f64; k * k];
    let blur = transfer_function(&psf, k, w, h, &mut planner);
    let laplacian: Vec<f64> = LAPLACIAN.iter().flatten().copied().collect();
    let reg = transfer_function(&laplacian, 3, w, h, &mut planner);

    let mut spectrum: Vec<Complex<f64>> = input
        .normalized_samples()
        .iter()
        .map(|&v| Complex::new(v as f64, 0.0))
        .collect();
    fft2(&mut spectrum, w, h, FftDirection::Forward, &mut planner);

    for ((y, hf), rf) in spectrum.iter_mut().zip(&blur).zip(&reg) {
        let denom = hf.norm_sqr() + settings.balance * rf.norm_sqr();
        // Only reachable when the blur kernel has zero gain at DC
        *y = if denom > 0.0 { hf.conj() / denom * *y } else { Complex::new(0.0, 0.0) };
    }

    fft2(&mut spectrum, w, h, FftDirection::Inverse, &mut planner);

    let samples = spectrum.iter().map(|c| c.re.clamp(0.0, 1.0) as f32).collect();
    SampleBuffer::from_normalized(width, height, samples)
}
