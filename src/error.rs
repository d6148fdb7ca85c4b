//! The error type returned by fallible operations of this crate.

use std::fmt;

/// Result type alias for convenience.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The loop of the volatility calculation that failed to converge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Stage {
    /// Searching the initial bracket for the new volatility, "Step 5.2." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    Bracketing,
    /// The Illinois iteration, "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    Illinois,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Bracketing => f.write_str("bracketing search"),
            Stage::Illinois => f.write_str("Illinois iteration"),
        }
    }
}

/// Errors of this crate.
///
/// All errors are local and deterministic: retrying with the same input yields the same error.
#[derive(Clone, Copy, PartialEq, Debug, thiserror::Error)]
pub enum Error {
    /// A value was outside of its valid domain, e.g. a deviation `<= 0` or a score outside of `[0, 1]`.
    #[error("invalid {name}: {value}")]
    InvalidInput { name: &'static str, value: f64 },

    /// The volatility calculation did not converge within the configured number of iterations.
    #[error("{stage} did not converge after {iterations} iterations")]
    NumericDivergence { stage: Stage, iterations: u32 },

    /// The results of the rating period carry no information, so the estimated variance is not a positive finite number.
    #[error("degenerate results, estimated variance is {variance}")]
    DegenerateInput { variance: f64 },
}
