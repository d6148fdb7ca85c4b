//! Various constants defined or recommended in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf),
//! including defaults for [`Parameters`][crate::Parameters].

use crate::Rating;

/// Constant for converting between the original Glicko scale, and the Glicko-2 scale.
///
/// See also "Step 2." and "Step 8." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const RATING_SCALING_RATIO: f64 = 173.7178;

/// The Glicko rating that corresponds to a Glicko-2 rating of `0.0`.
pub const RATING_ORIGIN: f64 = 1500.0;

/// Rating of an unrated player as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const DEFAULT_RATING: f64 = 1500.0;

/// Rating deviation of an unrated player as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
pub const DEFAULT_DEVIATION: f64 = 350.0;

/// Volatility of an unrated player as defined by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
///
/// Also assumed for Glicko players that take part in a Glicko-2 calculation without an explicit volatility.
pub const DEFAULT_VOLATILITY: f64 = 0.06;

/// An unrated player on the Glicko scale.
// TODO: Make Rating::new const once float comparisons are allowed in const fn on our MSRV
pub const DEFAULT_START_RATING: Rating = Rating {
    rating: DEFAULT_RATING,
    deviation: DEFAULT_DEVIATION,
};

/// Default system constant.
/// Reasonable values lie between `0.3` and `1.2` as described by "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf),
/// but it might need to be fine-tuned for your application.
pub const DEFAULT_VOLATILITY_CHANGE: f64 = 0.8;

/// Default cutoff value for the converging loop algorithm in "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// Higher values may result in slightly better performance at the cost of less accuracy.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 0.000_000_1;

/// Default maximum number of iterations for both the bracketing search in "Step 5.2."
/// and the converging loop in "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
/// This is a fail-safe so we don't enter an infinite loop (even tho that shouldn't happen for reasonable inputs).
/// If the maximum number of iterations is exceeded, the calculation fails with [`Error::NumericDivergence`][crate::Error::NumericDivergence].
pub const DEFAULT_MAX_ITERATIONS: u32 = 1_000;
