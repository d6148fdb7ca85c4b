//! This crate provides an implementation of the [Glicko-2](https://www.glicko.net/glicko/glicko2.pdf) rating system.
//! Given the rating of a player at the onset of a rating period and the results of the games they played during that period,
//! it calculates the rating of the player once the period closes.
//!
//! Ratings can be expressed on two scales (see [`scale::Scale`]):
//! the original Glicko scale ([`Rating`]), centered around 1500, and the Glicko-2 scale ([`ScaledRating`]), centered around 0.
//! The algorithm always runs on the Glicko-2 scale. [`scale::Player`] tags a rating with its scale,
//! and [`algorithm::new_rating`] hands back the new rating on the scale it was given.
//!
//! ```
//! use glicko2_rating::algorithm::{self, GameResult, MatchResult};
//! use glicko2_rating::scale::Player;
//! use glicko2_rating::Parameters;
//!
//! # fn main() -> glicko2_rating::Result<()> {
//! let player = Player::new_v1(Some(1500.0), Some(200.0))?;
//! let results = [
//!     GameResult::new(Player::new_v1(Some(1400.0), Some(30.0))?, MatchResult::Win)?,
//!     GameResult::new(Player::new_v1(Some(1550.0), Some(100.0))?, MatchResult::Loss)?,
//!     GameResult::new(Player::new_v1(Some(1700.0), Some(300.0))?, MatchResult::Loss)?,
//! ];
//!
//! let parameters = Parameters::default().with_volatility_change(0.5);
//! let new_player = algorithm::new_rating(player, &results, parameters)?;
//!
//! assert!((new_player.rating() - 1464.06).abs() < 0.01);
//! assert!((new_player.deviation() - 151.52).abs() < 0.01);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_rust_codeblocks
)]
#![forbid(unsafe_code)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use scale::{deviation_to, rating_to, Scale};

pub mod algorithm;
pub mod constants;
pub mod error;
pub mod scale;

pub use error::{Error, Result};

/// Checks that `value` is finite and strictly positive.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidInput { name, value })
    }
}

/// Checks that `value` is finite.
pub(crate) fn check_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput { name, value })
    }
}

/// A skill rating on the original Glicko scale.
///
/// The Glicko scale has no notion of volatility.
/// Whenever a [`Rating`] is used in a Glicko-2 calculation, a volatility has to be assumed,
/// usually [`constants::DEFAULT_VOLATILITY`].
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRating"))]
pub struct Rating {
    rating: f64,
    deviation: f64,
}

impl From<ScaledRating> for Rating {
    /// Converts to the Glicko scale, dropping the volatility.
    fn from(scaled: ScaledRating) -> Self {
        Rating {
            rating: rating_to(scaled.rating, Scale::V1),
            deviation: deviation_to(scaled.deviation, Scale::V1),
        }
    }
}

impl Default for Rating {
    /// The rating of an unrated player, see [`constants::DEFAULT_START_RATING`].
    fn default() -> Self {
        constants::DEFAULT_START_RATING
    }
}

impl Rating {
    /// Creates a new [`Rating`] with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `rating` is not finite or `deviation` is not a positive finite number.
    pub fn new(rating: f64, deviation: f64) -> Result<Self> {
        Ok(Rating {
            rating: check_finite("rating", rating)?,
            deviation: check_positive("deviation", deviation)?,
        })
    }

    /// The rating value.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// Converts to the Glicko-2 scale, assuming `volatility`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `volatility` is not a positive finite number.
    pub fn to_scaled(self, volatility: f64) -> Result<ScaledRating> {
        Ok(ScaledRating {
            rating: rating_to(self.rating, Scale::V2),
            deviation: deviation_to(self.deviation, Scale::V2),
            volatility: check_positive("volatility", volatility)?,
        })
    }

    /// The interval `rating ± 2 * deviation`, in which the true skill of the player lies with about 95% confidence.
    #[must_use]
    pub fn rating_interval(&self) -> (f64, f64) {
        (
            self.rating - 2.0 * self.deviation,
            self.rating + 2.0 * self.deviation,
        )
    }
}

/// A Glicko-2 skill rating on the Glicko-2 scale.
/// See "Step 2." and "Step 8." in [Glickmans' paper](http://www.glicko.net/glicko/glicko2.pdf).
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawScaledRating"))]
pub struct ScaledRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl Default for ScaledRating {
    /// The rating of an unrated player, converted from [`constants::DEFAULT_START_RATING`].
    fn default() -> Self {
        let Rating { rating, deviation } = constants::DEFAULT_START_RATING;

        ScaledRating {
            rating: rating_to(rating, Scale::V2),
            deviation: deviation_to(deviation, Scale::V2),
            volatility: constants::DEFAULT_VOLATILITY,
        }
    }
}

impl ScaledRating {
    /// Creates a new [`ScaledRating`] with the specified parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `rating` is not finite, or `deviation` or `volatility` is not a positive finite number.
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Result<Self> {
        Ok(ScaledRating {
            rating: check_finite("rating", rating)?,
            deviation: check_positive("deviation", deviation)?,
            volatility: check_positive("volatility", volatility)?,
        })
    }

    /// The rating value.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// The rating deviation.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The rating volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// The interval `rating ± 2 * deviation`, in which the true skill of the player lies with about 95% confidence.
    #[must_use]
    pub fn rating_interval(&self) -> (f64, f64) {
        (
            self.rating - 2.0 * self.deviation,
            self.rating + 2.0 * self.deviation,
        )
    }
}

/// Unchecked [`Rating`] fields, validated through [`Rating::new`] when deserializing.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRating {
    rating: f64,
    deviation: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRating> for Rating {
    type Error = Error;

    fn try_from(raw: RawRating) -> Result<Self> {
        Rating::new(raw.rating, raw.deviation)
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawScaledRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawScaledRating> for ScaledRating {
    type Error = Error;

    fn try_from(raw: RawScaledRating) -> Result<Self> {
        ScaledRating::new(raw.rating, raw.deviation, raw.volatility)
    }
}

/// The parameters used by the Glicko-2 algorithm.
///
/// With the `serde` feature, missing fields take their default values and unknown fields are ignored.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Parameters {
    #[cfg_attr(feature = "serde", serde(alias = "system_constant"))]
    volatility_change: f64,
    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Parameters {
    /// Creates [`Parameters`] with the given parameters and the default [`constants::DEFAULT_MAX_ITERATIONS`].
    ///
    /// # Arguments
    ///
    /// * `volatility_change` - Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    /// Reasonable choices are between 0.3 and 1.2, other values are accepted but may make the calculation numerically unstable.
    /// Small values prevent volatility and therefore rating from changing too much after improbable results.
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    /// * `convergence_tolerance` - The cutoff value for the converging loop algorithm in "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `convergence_tolerance` is not a positive finite number.
    pub fn new(volatility_change: f64, convergence_tolerance: f64) -> Result<Self> {
        Parameters {
            volatility_change,
            convergence_tolerance,
            max_iterations: constants::DEFAULT_MAX_ITERATIONS,
        }
        .validate()
    }

    /// Returns `self` if all parameters are valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `convergence_tolerance` is not a positive finite number or `max_iterations` is `0`.
    pub fn validate(self) -> Result<Self> {
        check_positive("convergence_tolerance", self.convergence_tolerance)?;

        if self.max_iterations == 0 {
            return Err(Error::InvalidInput {
                name: "max_iterations",
                value: 0.0,
            });
        }

        Ok(self)
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the volatility change to `volatility_change`.
    #[must_use]
    pub fn with_volatility_change(self, volatility_change: f64) -> Self {
        Parameters {
            volatility_change,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the convergence tolerance to `convergence_tolerance`.
    ///
    /// The value is checked by [`Parameters::validate`] before use.
    #[must_use]
    pub fn with_convergence_tolerance(self, convergence_tolerance: f64) -> Self {
        Parameters {
            convergence_tolerance,
            ..self
        }
    }

    /// Creates [`Parameters`] with the same parameters as `self`, only changing the iteration cap to `max_iterations`.
    #[must_use]
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Parameters {
            max_iterations,
            ..self
        }
    }

    /// Also called "system constant" or "τ".
    /// This constant constraints change in volatility over time.
    ///
    /// See also "Step 1." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf) and [`constants::DEFAULT_VOLATILITY_CHANGE`].
    #[must_use]
    pub fn volatility_change(&self) -> f64 {
        self.volatility_change
    }

    /// The cutoff value for the converging loop algorithm in "Step 5.4." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
    ///
    /// See also [`constants::DEFAULT_CONVERGENCE_TOLERANCE`].
    #[must_use]
    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    /// The maximum number of iterations of each loop in "Step 5." before giving up.
    ///
    /// See also [`constants::DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl Default for Parameters {
    /// Creates a default version of this struct with the parameters defined in [`constants`].
    fn default() -> Self {
        Parameters {
            volatility_change: constants::DEFAULT_VOLATILITY_CHANGE,
            convergence_tolerance: constants::DEFAULT_CONVERGENCE_TOLERANCE,
            max_iterations: constants::DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{constants, Error, Parameters, Rating, ScaledRating};

    #[test]
    fn test_invalid_ratings() {
        assert_eq!(
            Rating::new(1500.0, 0.0),
            Err(Error::InvalidInput {
                name: "deviation",
                value: 0.0
            })
        );
        assert!(Rating::new(f64::NAN, 350.0).is_err());
        assert!(ScaledRating::new(0.0, -1.0, 0.06).is_err());
        assert!(ScaledRating::new(0.0, 1.0, 0.0).is_err());
        assert!(ScaledRating::new(0.0, 1.0, f64::INFINITY).is_err());
        assert!(Rating::default().to_scaled(-0.06).is_err());
    }

    #[test]
    fn test_default_ratings_agree() {
        let scaled = Rating::default()
            .to_scaled(constants::DEFAULT_VOLATILITY)
            .unwrap();

        assert_eq!(scaled, ScaledRating::default());
        assert!(scaled.rating().abs() < f64::EPSILON);

        let rating = Rating::from(scaled);
        assert!((rating.rating() - constants::DEFAULT_RATING).abs() < 1e-9);
        assert!((rating.deviation() - constants::DEFAULT_DEVIATION).abs() < 1e-9);
    }

    #[test]
    fn test_rating_interval() {
        let rating = Rating::new(1500.0, 200.0).unwrap();

        assert_eq!(rating.rating_interval(), (1100.0, 1900.0));
    }

    #[test]
    fn test_parameters_validation() {
        assert!(Parameters::new(0.5, 0.0).is_err());
        assert!(Parameters::new(0.5, -1e-7).is_err());
        assert!(Parameters::default().with_max_iterations(0).validate().is_err());

        let parameters = Parameters::new(0.5, 1e-6).unwrap();
        assert!((parameters.volatility_change() - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            parameters.max_iterations(),
            constants::DEFAULT_MAX_ITERATIONS
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parameters_deserialize_defaults_and_ignores_unknown_keys() {
        let parameters: Parameters =
            serde_json::from_str(r#"{ "system_constant": 0.5, "unrelated": "ignored" }"#).unwrap();

        assert_eq!(parameters, Parameters::default().with_volatility_change(0.5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_ratings_deserialize_through_validation() {
        let rating: Rating = serde_json::from_str(r#"{ "rating": 1600.0, "deviation": 80.0 }"#).unwrap();
        assert_eq!(rating, Rating::new(1600.0, 80.0).unwrap());

        assert!(serde_json::from_str::<Rating>(r#"{ "rating": 1600.0, "deviation": 0.0 }"#).is_err());
        assert!(serde_json::from_str::<ScaledRating>(
            r#"{ "rating": 0.0, "deviation": 1.0, "volatility": -0.06 }"#
        )
        .is_err());
    }
}
