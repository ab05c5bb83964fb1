//! Peak signal-to-noise ratio between an original and a filtered buffer

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::SampleBuffer;

/// PSNR in decibels, or an explicit marker for identical buffers
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Psnr {
    /// Zero mean squared error; compares above every finite value
    Identical,
    Decibels(f64),
}

impl Psnr {
    /// `f64::INFINITY` for [`Psnr::Identical`]
    pub fn value(&self) -> f64 {
        match self {
            Psnr::Identical => f64::INFINITY,
            Psnr::Decibels(db) => *db,
        }
    }
}

impl PartialOrd for Psnr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl fmt::Display for Psnr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Psnr::Identical => write!(f, "PSNR: ∞ (identical)"),
            Psnr::Decibels(db) => write!(f, "PSNR: {:.2} dB", db),
        }
    }
}

/// Mean squared per-sample difference of two normalized buffers
pub fn mean_squared_error(original: &SampleBuffer, filtered: &SampleBuffer) -> f64 {
    original.assert_same_dimensions(filtered);
    let a = original.normalized_samples();
    let b = filtered.normalized_samples();
    if a.is_empty() {
        return 0.0;
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    sum / a.len() as f64
}

/// `10·log10(MAX² / MSE)` with `MAX = 1` for normalized data
pub fn psnr(original: &SampleBuffer, filtered: &SampleBuffer) -> Psnr {
    let mse = mean_squared_error(original, filtered);
    if mse == 0.0 {
        Psnr::Identical
    } else {
        Psnr::Decibels(10.0 * (1.0 / mse).log10())
    }
}
