//! Filtro Core - LTI digital filter engine
//!
//! This crate models linear time-invariant discrete-time systems as rational
//! transfer functions, converts between their equivalent descriptions and
//! realizes them as streaming filters.
//!
//! # Core Abstractions
//!
//! ## System Model
//!
//! - [`TransferFunction`] - Numerator/denominator coefficients at f64 precision
//! - [`Zpk`] - Zeros, poles and gain
//! - [`StateSpace`] - Controllable canonical realization
//! - [`to_sos`] / [`from_sos`] - Second-order section cascades
//! - [`FrequencyResponse`] - Complex response over `[0, π]`
//!
//! ## Runtime Filters
//!
//! - [`LtiFilter`] - Closed set of realizations, chosen by [`FilterStructure`]
//! - [`FirFilter`] - Non-recursive, one delay line
//! - [`IirFilter`] - Recursive direct form I, two delay lines
//! - [`DelayLine`] - Ring buffer with a decrementing write offset
//! - [`Processor`] - One-in, one-out streaming trait
//!
//! ## Algebra
//!
//! Transfer functions and realized filters compose with operators:
//!
//! - `&a * &b` - series (cascade)
//! - `&a + &b` - parallel (summed outputs)
//!
//! # Example
//!
//! ```rust
//! use filtro_core::{FilterStructure, LtiFilter, Processor, TransferFunction};
//!
//! let smoother = TransferFunction::new(vec![0.5], vec![1.0, -0.5]).unwrap();
//! let differ = TransferFunction::fir(vec![1.0, -1.0]).unwrap();
//!
//! let cascade = &smoother * &differ;
//! assert!(cascade.is_stable());
//!
//! let mut filter = LtiFilter::from_transfer_function(cascade);
//! assert_eq!(filter.structure(), FilterStructure::Recursive);
//!
//! let block = filter.apply_block(&[1.0, 0.0, 0.0]);
//! let streamed: Vec<f32> = [1.0, 0.0, 0.0].iter().map(|&x| filter.process(x)).collect();
//! assert_eq!(block, streamed);
//! ```
//!
//! # Precision
//!
//! Design, analysis and algebra run on f64 transfer functions. Realization
//! casts coefficients down to f32 once; the design transfer function stays
//! attached to the filter.
//!
//! # Features
//!
//! - `tracing` - emit `tracing` debug events from algebra, SOS decomposition
//!   and ignored coefficient replacements

pub mod algebra;
pub mod delay;
pub mod error;
pub mod filter;
pub mod poly;
pub mod processor;
pub mod response;
pub mod signal;
pub mod sos;
pub mod state_space;
pub mod transfer_function;

// Re-export main types at crate root
pub use algebra::{Connection, combine, parallel, series};
pub use delay::DelayLine;
pub use error::{FilterError, Result};
pub use filter::{FilterStructure, FirFilter, IirFilter, LengthPolicy, LtiFilter};
pub use processor::Processor;
pub use response::{FrequencyResponse, unwrap_phase};
pub use signal::DiscreteSignal;
pub use sos::{from_sos, to_sos};
pub use state_space::StateSpace;
pub use transfer_function::{NORMALIZE_TOLERANCE, TransferFunction, Zpk};

pub use rustfft::num_complex::Complex64;
