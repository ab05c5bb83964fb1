//! 256-bin intensity histograms shared by the equalizers

/// Histogram data structure
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Sample count per 8-bit level
    pub bins: [u32; 256],
}

impl Histogram {
    pub fn from_samples(samples: impl IntoIterator<Item = u8>) -> Self {
        let mut bins = [0u32; 256];
        for v in samples {
            bins[v as usize] += 1;
        }
        Self { bins }
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Cumulative counts, `cdf[i]` = samples at or below level `i`
    pub fn cumulative(&self) -> [u64; 256] {
        let mut cdf = [0u64; 256];
        let mut sum = 0u64;
        for (i, &count) in self.bins.iter().enumerate() {
            sum += count as u64;
            cdf[i] = sum;
        }
        cdf
    }

    /// Cap every bin at `limit` and spread the excess over all bins
    ///
    /// The excess is split evenly; what does not divide evenly is added one
    /// count at a time, walking the bins at a fixed stride.
    pub fn clip(&mut self, limit: u32) {
        let mut clipped = 0u32;
        for count in self.bins.iter_mut() {
            if *count > limit {
                clipped += *count - limit;
                *count = limit;
            }
        }

        let batch = clipped / 256;
        let mut residual = clipped % 256;
        for count in self.bins.iter_mut() {
            *count += batch;
        }

        if residual > 0 {
            let step = (256 / residual as usize).max(1);
            let mut i = 0;
            while i < 256 && residual > 0 {
                self.bins[i] += 1;
                residual -= 1;
                i += step;
            }
        }
    }
}
