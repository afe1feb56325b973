//! Streaming processor trait.
//!
//! [`Processor`] is the contract downstream effects and applications drive:
//! one sample in, one sample out, with internal state advanced on every call.
//!
//! ## Design Decisions
//!
//! - **Mono, f32**: runtime filtering happens at reduced precision; design
//!   and analysis stay on [`TransferFunction`](crate::TransferFunction).
//! - **Object-safe**: `Box<dyn Processor>` works for runtime-built chains.
//! - **No allocations**: every method is usable inside an audio callback.

/// One-in, one-out streaming processor.
///
/// # Example
///
/// ```rust
/// use filtro_core::{LtiFilter, Processor, TransferFunction};
///
/// let tf = TransferFunction::new(vec![1.0], vec![1.0, -0.5]).unwrap();
/// let mut filter = LtiFilter::from_transfer_function(tf);
///
/// let mut buffer = [1.0, 0.0, 0.0, 0.0];
/// filter.process_block_inplace(&mut buffer);
/// assert_eq!(buffer, [1.0, 0.5, 0.25, 0.125]);
/// ```
pub trait Processor {
    /// Processes one sample, advancing the internal state.
    fn process(&mut self, input: f32) -> f32;

    /// Processes a block sample by sample.
    ///
    /// # Panics
    /// Default implementation panics in debug builds if the buffers differ in length.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Processes a block in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Returns to the idle state: history cleared, coefficients kept.
    fn reset(&mut self);
}
