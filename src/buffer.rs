//! Grayscale sample buffers
//!
//! Every buffer carries its numeric domain explicitly:
//! - `Normalized`: f32 samples in [0, 1]
//! - `Quantized8`: u8 samples in [0, 255]
//!
//! Conversions between the two are named methods and never happen implicitly.

use image::GrayImage;

/// Numeric domain of a [`SampleBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Normalized,
    Quantized8,
}

#[derive(Debug, Clone, PartialEq)]
enum Samples {
    Normalized(Vec<f32>),
    Quantized8(Vec<u8>),
}

/// A rectangular, single-channel image in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    width: u32,
    height: u32,
    samples: Samples,
}

/// Convert one 8-bit sample to the normalized domain
#[inline]
pub fn normalize(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Convert one normalized sample to 8 bits, clamping out-of-range input first
#[inline]
pub fn quantize(value: f32) -> u8 {
    // NaN falls through clamp and casts to 0
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn check_len(width: u32, height: u32, len: usize) {
    assert_eq!(
        len,
        width as usize * height as usize,
        "DimensionMismatch: {} samples for a {}x{} buffer",
        len,
        width,
        height
    );
}

impl SampleBuffer {
    /// Wrap normalized samples. Panics if the sample count does not match.
    pub fn from_normalized(width: u32, height: u32, samples: Vec<f32>) -> Self {
        check_len(width, height, samples.len());
        Self {
            width,
            height,
            samples: Samples::Normalized(samples),
        }
    }

    /// Wrap 8-bit samples. Panics if the sample count does not match.
    pub fn from_quantized8(width: u32, height: u32, samples: Vec<u8>) -> Self {
        check_len(width, height, samples.len());
        Self {
            width,
            height,
            samples: Samples::Quantized8(samples),
        }
    }

    pub fn from_gray_image(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_quantized8(width, height, image.into_raw())
    }

    /// Normalized buffer with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self::from_normalized(width, height, vec![value; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn domain(&self) -> Domain {
        match self.samples {
            Samples::Normalized(_) => Domain::Normalized,
            Samples::Quantized8(_) => Domain::Quantized8,
        }
    }

    /// Raw normalized samples
    ///
    /// Stages that only accept normalized input call this; handing them a
    /// quantized buffer is a programming error and panics.
    pub fn normalized_samples(&self) -> &[f32] {
        match &self.samples {
            Samples::Normalized(data) => data,
            Samples::Quantized8(_) => panic!("expected a Normalized buffer, got Quantized8"),
        }
    }

    /// Raw 8-bit samples. Panics on a normalized buffer.
    pub fn quantized_samples(&self) -> &[u8] {
        match &self.samples {
            Samples::Quantized8(data) => data,
            Samples::Normalized(_) => panic!("expected a Quantized8 buffer, got Normalized"),
        }
    }

    /// Sample at (x, y) expressed in the normalized range, whatever the domain
    pub fn get(&self, x: u32, y: u32) -> f32 {
        assert!(x < self.width && y < self.height, "({}, {}) out of bounds", x, y);
        let idx = y as usize * self.width as usize + x as usize;
        match &self.samples {
            Samples::Normalized(data) => data[idx],
            Samples::Quantized8(data) => normalize(data[idx]),
        }
    }

    /// Copy into the normalized domain, clamping to [0, 1]
    pub fn to_normalized(&self) -> SampleBuffer {
        let data = match &self.samples {
            Samples::Normalized(data) => data.iter().map(|v| v.clamp(0.0, 1.0)).collect(),
            Samples::Quantized8(data) => data.iter().copied().map(normalize).collect(),
        };
        Self::from_normalized(self.width, self.height, data)
    }

    /// Copy into the 8-bit domain: `round(clamp(v, 0, 1) * 255)`
    pub fn to_quantized8(&self) -> SampleBuffer {
        let data = match &self.samples {
            Samples::Normalized(data) => data.iter().copied().map(quantize).collect(),
            Samples::Quantized8(data) => data.clone(),
        };
        Self::from_quantized8(self.width, self.height, data)
    }

    /// Consuming variant of [`to_quantized8`](Self::to_quantized8), no copy when already 8-bit
    pub fn into_quantized8(self) -> SampleBuffer {
        match self.samples {
            Samples::Quantized8(_) => self,
            Samples::Normalized(_) => self.to_quantized8(),
        }
    }

    /// Quantize into an `image` crate buffer for encoding or resizing
    pub fn to_gray_image(&self) -> GrayImage {
        let data = match &self.samples {
            Samples::Quantized8(data) => data.clone(),
            Samples::Normalized(data) => data.iter().copied().map(quantize).collect(),
        };
        // Length was checked on construction
        GrayImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| panic!("DimensionMismatch: {}x{}", self.width, self.height))
    }

    /// Stage outputs must keep the exact shape of their input
    pub fn assert_same_dimensions(&self, other: &SampleBuffer) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "DimensionMismatch: {}x{} vs {}x{}",
            self.width,
            self.height,
            other.width,
            other.height
        );
    }
}
