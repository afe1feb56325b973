//! Series and parallel combination of realized filters.
//!
//! Combination always happens on the design-precision transfer functions:
//! both operands contribute [`LtiFilter::transfer_function`], the result is
//! classified and realized afresh. Operands are never modified.
//!
//! | Operands   | Series | Parallel |
//! |------------|--------|----------|
//! | FIR, FIR   | FIR    | FIR      |
//! | FIR, IIR   | IIR    | IIR      |
//! | IIR, IIR   | IIR    | IIR      |

use core::fmt;
use core::ops::{Add, Mul};

use crate::filter::LtiFilter;
#[cfg(feature = "tracing")]
use crate::filter::FilterStructure;
use crate::transfer_function::TransferFunction;

/// How two systems are connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Connection {
    /// Output of the first feeds the second: `H = H1·H2`.
    #[default]
    Series,
    /// Both see the same input and their outputs are summed: `H = H1 + H2`.
    Parallel,
}

impl Connection {
    /// Combines two transfer functions.
    pub fn combine(self, first: &TransferFunction, second: &TransferFunction) -> TransferFunction {
        match self {
            Self::Series => first * second,
            Self::Parallel => first + second,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series => f.write_str("series"),
            Self::Parallel => f.write_str("parallel"),
        }
    }
}

/// Combines two realized filters and realizes the result.
pub fn combine(first: &LtiFilter, second: &LtiFilter, connection: Connection) -> LtiFilter {
    let tf = connection.combine(&first.transfer_function(), &second.transfer_function());

    #[cfg(feature = "tracing")]
    tracing::debug!(
        %connection,
        first = first.structure().name(),
        second = second.structure().name(),
        result = FilterStructure::classify(&tf).name(),
        order = tf.order(),
        "combined filters"
    );

    LtiFilter::from_transfer_function(tf)
}

/// Cascade of `first` then `second`.
pub fn series(first: &LtiFilter, second: &LtiFilter) -> LtiFilter {
    combine(first, second, Connection::Series)
}

/// Sum of `first` and `second` driven by the same input.
pub fn parallel(first: &LtiFilter, second: &LtiFilter) -> LtiFilter {
    combine(first, second, Connection::Parallel)
}

impl Mul for &LtiFilter {
    type Output = LtiFilter;

    fn mul(self, rhs: &LtiFilter) -> LtiFilter {
        series(self, rhs)
    }
}

impl Add for &LtiFilter {
    type Output = LtiFilter;

    fn add(self, rhs: &LtiFilter) -> LtiFilter {
        parallel(self, rhs)
    }
}
