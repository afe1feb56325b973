//! Finite sampled signal.

/// A finite sequence of samples with its sample rate.
///
/// Filters never interpret the sample rate; block filtering copies it into
/// the result unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteSignal {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Samples in time order.
    pub samples: Vec<f32>,
}

impl DiscreteSignal {
    /// Wraps samples recorded at `sample_rate`.
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Unit impulse of `len` samples (`[1, 0, 0, ...]`).
    pub fn unit_impulse(sample_rate: u32, len: usize) -> Self {
        let mut samples = vec![0.0; len];
        if let Some(first) = samples.first_mut() {
            *first = 1.0;
        }
        Self::new(sample_rate, samples)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}
