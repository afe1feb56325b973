//! Circular delay line for difference-equation state.
//!
//! The write offset moves *backwards* through the buffer: after a sample is
//! written at `offset` and the line advances, older samples sit at higher
//! indices (modulo the length). Walking forward from the offset therefore
//! visits samples newest first, which lines up with coefficient index 0, 1,
//! 2, … without ever shifting the history.
//!
//! ```text
//! len = 4, after writing x[n] at offset 1:
//!
//! index:   0       1      2       3
//!        x[n-3]  x[n]  x[n-1]  x[n-2]
//!                 ^offset
//! ```

/// Fixed-capacity ring buffer with a decrementing write offset.
///
/// Allocated once; [`DelayLine::clear`] re-zeros in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayLine {
    buffer: Vec<f32>,
    offset: usize,
}

impl DelayLine {
    /// Creates a zeroed delay line holding `len` samples.
    ///
    /// # Panics
    ///
    /// Panics if `len` is 0.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "Delay line length must be > 0");
        Self {
            buffer: vec![0.0; len],
            offset: len - 1,
        }
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false`; a delay line holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current write offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Raw buffer contents in storage order.
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }

    /// Stores `sample` at the current offset.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.offset] = sample;
    }

    /// Moves the offset one slot back, wrapping to `len - 1`.
    #[inline]
    pub fn advance(&mut self) {
        self.offset = if self.offset == 0 {
            self.buffer.len() - 1
        } else {
            self.offset - 1
        };
    }

    /// `sum coeffs[k] * s[k]` with `s[0]` the sample at the offset and
    /// `s[k]` the sample written `k` steps earlier.
    ///
    /// `coeffs` must have the delay line's length.
    #[inline]
    pub fn dot_newest_first(&self, coeffs: &[f32]) -> f32 {
        debug_assert_eq!(coeffs.len(), self.buffer.len());
        let (head, tail) = self.buffer.split_at(self.offset);
        let (near, far) = coeffs.split_at(tail.len());
        let mut acc = 0.0;
        for (c, s) in near.iter().zip(tail) {
            acc += c * s;
        }
        for (c, s) in far.iter().zip(head) {
            acc += c * s;
        }
        acc
    }

    /// `sum coeffs[k] * s[k]` for `k >= 1`, skipping the slot at the offset
    /// (the one about to be overwritten).
    ///
    /// `coeffs` must have the delay line's length; `coeffs[0]` is unused.
    #[inline]
    pub fn dot_history(&self, coeffs: &[f32]) -> f32 {
        debug_assert_eq!(coeffs.len(), self.buffer.len());
        let after = &self.buffer[self.offset + 1..];
        let before = &self.buffer[..self.offset];
        let (near, far) = coeffs[1..].split_at(after.len());
        let mut acc = 0.0;
        for (c, s) in near.iter().zip(after) {
            acc += c * s;
        }
        for (c, s) in far.iter().zip(before) {
            acc += c * s;
        }
        acc
    }

    /// Zeros the contents and returns the offset to `len - 1`.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.offset = self.buffer.len() - 1;
    }
}
