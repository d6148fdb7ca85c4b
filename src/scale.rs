//! Conversion between the Glicko and the Glicko-2 rating scale.
//!
//! See "Step 2." and "Step 8." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{self, RATING_ORIGIN, RATING_SCALING_RATIO};
use crate::{Rating, Result, ScaledRating};

/// One of the two rating scales.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Scale {
    /// The original Glicko scale, centered around `1500`.
    V1,
    /// The Glicko-2 scale, centered around `0`.
    V2,
}

/// Converts a rating value from the other scale to `target`.
#[must_use]
pub fn rating_to(value: f64, target: Scale) -> f64 {
    match target {
        Scale::V1 => value * RATING_SCALING_RATIO + RATING_ORIGIN,
        Scale::V2 => (value - RATING_ORIGIN) / RATING_SCALING_RATIO,
    }
}

/// Converts a rating deviation from the other scale to `target`.
#[must_use]
pub fn deviation_to(value: f64, target: Scale) -> f64 {
    match target {
        Scale::V1 => value * RATING_SCALING_RATIO,
        Scale::V2 => value / RATING_SCALING_RATIO,
    }
}

/// A player's rating, tagged with the scale it is expressed in.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Player {
    V1(Rating),
    V2(ScaledRating),
}

impl From<Rating> for Player {
    fn from(rating: Rating) -> Self {
        Player::V1(rating)
    }
}

impl From<ScaledRating> for Player {
    fn from(rating: ScaledRating) -> Self {
        Player::V2(rating)
    }
}

impl Player {
    /// Creates a player on the Glicko scale.
    /// Omitted values are taken from [`constants::DEFAULT_START_RATING`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`][crate::Error::InvalidInput] if `rating` is not finite or `deviation` is not a positive finite number.
    pub fn new_v1(rating: Option<f64>, deviation: Option<f64>) -> Result<Self> {
        let default = constants::DEFAULT_START_RATING;

        Rating::new(
            rating.unwrap_or(default.rating()),
            deviation.unwrap_or(default.deviation()),
        )
        .map(Player::V1)
    }

    /// Creates a player on the Glicko-2 scale.
    /// Omitted values are taken from [`ScaledRating::default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`][crate::Error::InvalidInput] if `rating` is not finite, or `deviation` or `volatility` is not a positive finite number.
    pub fn new_v2(
        rating: Option<f64>,
        deviation: Option<f64>,
        volatility: Option<f64>,
    ) -> Result<Self> {
        let default = ScaledRating::default();

        ScaledRating::new(
            rating.unwrap_or(default.rating()),
            deviation.unwrap_or(default.deviation()),
            volatility.unwrap_or(default.volatility()),
        )
        .map(Player::V2)
    }

    /// The scale this player is expressed in.
    #[must_use]
    pub fn scale(&self) -> Scale {
        match self {
            Player::V1(_) => Scale::V1,
            Player::V2(_) => Scale::V2,
        }
    }

    /// The rating value, on the player's scale.
    #[must_use]
    pub fn rating(&self) -> f64 {
        match self {
            Player::V1(rating) => rating.rating(),
            Player::V2(rating) => rating.rating(),
        }
    }

    /// The rating deviation, on the player's scale.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        match self {
            Player::V1(rating) => rating.deviation(),
            Player::V2(rating) => rating.deviation(),
        }
    }

    /// The volatility, if the player is on the Glicko-2 scale.
    #[must_use]
    pub fn volatility(&self) -> Option<f64> {
        match self {
            Player::V1(_) => None,
            Player::V2(rating) => Some(rating.volatility()),
        }
    }

    /// Converts the player to the Glicko scale, dropping the volatility.
    #[must_use]
    pub fn to_v1(self) -> Self {
        match self {
            Player::V1(_) => self,
            Player::V2(scaled) => Player::V1(scaled.into()),
        }
    }

    /// Converts the player to the Glicko-2 scale.
    /// A player on the Glicko scale gets `volatility`, or [`constants::DEFAULT_VOLATILITY`] if omitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`][crate::Error::InvalidInput] if the volatility is not a positive finite number.
    pub fn to_v2(self, volatility: Option<f64>) -> Result<Self> {
        self.to_scaled(volatility).map(Player::V2)
    }

    /// Like [`Player::to_v2`], but returns the untagged rating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`][crate::Error::InvalidInput] if the volatility is not a positive finite number.
    pub fn to_scaled(self, volatility: Option<f64>) -> Result<ScaledRating> {
        match self {
            Player::V1(rating) => {
                rating.to_scaled(volatility.unwrap_or(constants::DEFAULT_VOLATILITY))
            }
            Player::V2(scaled) => Ok(scaled),
        }
    }

    /// Expresses a Glicko-2 `rating` on the scale `scale`.
    #[must_use]
    pub fn from_scaled(rating: ScaledRating, scale: Scale) -> Self {
        match scale {
            Scale::V1 => Player::V1(rating.into()),
            Scale::V2 => Player::V2(rating),
        }
    }

    /// The interval `rating ± 2 * deviation` on the player's scale.
    #[must_use]
    pub fn rating_interval(&self) -> (f64, f64) {
        match self {
            Player::V1(rating) => rating.rating_interval(),
            Player::V2(rating) => rating.rating_interval(),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::{deviation_to, rating_to, Player, Scale};
    use crate::constants;

    #[test]
    fn test_scalar_conversion() {
        assert_abs_diff_eq!(rating_to(1500.0, Scale::V2), 0.0);
        assert_abs_diff_eq!(rating_to(0.0, Scale::V1), 1500.0);
        assert_abs_diff_eq!(rating_to(1673.7178, Scale::V2), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(deviation_to(1.0, Scale::V1), 173.7178);
        assert_abs_diff_eq!(deviation_to(350.0, Scale::V2), 2.014_761, epsilon = 1e-6);
    }

    #[test]
    fn test_defaults() {
        let v1 = Player::new_v1(None, None).unwrap();
        assert_eq!(v1.scale(), Scale::V1);
        assert_abs_diff_eq!(v1.rating(), constants::DEFAULT_RATING);
        assert_abs_diff_eq!(v1.deviation(), constants::DEFAULT_DEVIATION);
        assert_eq!(v1.volatility(), None);

        let v2 = Player::new_v2(None, None, None).unwrap();
        assert_eq!(v2.scale(), Scale::V2);
        assert_abs_diff_eq!(v2.rating(), 0.0);
        assert_abs_diff_eq!(
            v2.deviation(),
            constants::DEFAULT_DEVIATION / constants::RATING_SCALING_RATIO
        );
        assert_eq!(v2.volatility(), Some(constants::DEFAULT_VOLATILITY));

        assert_eq!(v1.to_v2(None).unwrap(), v2);
    }

    #[test]
    fn test_conversion_is_identity_on_same_scale() {
        let v1 = Player::new_v1(Some(1700.0), Some(80.0)).unwrap();
        assert_eq!(v1.to_v1(), v1);

        let v2 = Player::new_v2(Some(0.3), Some(1.2), Some(0.09)).unwrap();
        assert_eq!(v2.to_v2(Some(0.5)).unwrap(), v2);
    }

    #[test]
    fn test_volatility_on_conversion() {
        let v1 = Player::new_v1(Some(1700.0), Some(80.0)).unwrap();

        assert_eq!(v1.to_v2(Some(0.09)).unwrap().volatility(), Some(0.09));
        assert!(v1.to_v2(Some(0.0)).is_err());
        assert_eq!(v1.to_v2(None).unwrap().to_v1().volatility(), None);
    }

    #[test]
    fn test_invalid_players() {
        assert!(Player::new_v1(None, Some(0.0)).is_err());
        assert!(Player::new_v2(None, None, Some(-0.06)).is_err());
        assert!(Player::new_v2(Some(f64::NAN), None, None).is_err());
    }

    #[test]
    fn test_rating_interval() {
        let v2 = Player::new_v2(Some(0.5), Some(0.25), None).unwrap();

        assert_eq!(v2.rating_interval(), (0.0, 1.0));
    }
}
