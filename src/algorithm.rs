//! The Glicko-2 algorithm for closing one rating period of a single player.
//!
//! [`new_rating`] works with players on either scale (see [`Player`]),
//! [`rate_player_scaled`] is the same calculation on the Glicko-2 scale only.

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::Stage;
use crate::scale::{deviation_to, rating_to, Player, Scale};
use crate::{Error, Parameters, Result, ScaledRating};

/// Something that can be turned into the scores of both players of a game.
pub trait Score {
    /// The score of the player, between `0.0` (loss) and `1.0` (win).
    fn player_score(&self) -> f64;
    /// The score of the opponent.
    fn opponent_score(&self) -> f64;
}

/// Shortcuts for the usual scores.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl Score for MatchResult {
    fn player_score(&self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Draw => 0.5,
            MatchResult::Loss => 0.0,
        }
    }

    fn opponent_score(&self) -> f64 {
        self.invert().player_score()
    }
}

impl MatchResult {
    /// The result from the perspective of the opponent.
    #[must_use]
    pub fn invert(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Draw => MatchResult::Draw,
            MatchResult::Loss => MatchResult::Win,
        }
    }
}

impl Score for f64 {
    fn player_score(&self) -> f64 {
        *self
    }

    fn opponent_score(&self) -> f64 {
        1.0 - *self
    }
}

fn check_score(score: &impl Score) -> Result<f64> {
    let score = score.player_score();

    if (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(Error::InvalidInput {
            name: "score",
            value: score,
        })
    }
}

/// The result of one game, from the perspective of the player being rated.
///
/// `opponent` is a snapshot of the opponent's rating at the time of the game. Its volatility is not used.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGameResult"))]
pub struct GameResult {
    opponent: Player,
    score: f64,
}

impl GameResult {
    /// Creates a new [`GameResult`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the player score is not within `[0.0, 1.0]`.
    pub fn new(opponent: impl Into<Player>, score: impl Score) -> Result<Self> {
        Ok(GameResult {
            opponent: opponent.into(),
            score: check_score(&score)?,
        })
    }

    #[must_use]
    pub fn opponent(&self) -> Player {
        self.opponent
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The same result with the opponent on the Glicko-2 scale.
    #[must_use]
    pub fn to_scaled(self) -> ScaledGameResult {
        let (opponent_rating, opponent_deviation) = glicko2_values(self.opponent);

        ScaledGameResult {
            opponent_rating,
            opponent_deviation,
            score: self.score,
        }
    }
}

/// A [`GameResult`] with the opponent on the Glicko-2 scale.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawScaledGameResult"))]
pub struct ScaledGameResult {
    opponent_rating: f64,
    opponent_deviation: f64,
    score: f64,
}

impl ScaledGameResult {
    /// Creates a new [`ScaledGameResult`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the player score is not within `[0.0, 1.0]`.
    pub fn new(opponent: ScaledRating, score: impl Score) -> Result<Self> {
        Ok(ScaledGameResult {
            opponent_rating: opponent.rating(),
            opponent_deviation: opponent.deviation(),
            score: check_score(&score)?,
        })
    }

    #[must_use]
    pub fn opponent_rating(&self) -> f64 {
        self.opponent_rating
    }

    #[must_use]
    pub fn opponent_deviation(&self) -> f64 {
        self.opponent_deviation
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGameResult {
    opponent: Player,
    score: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGameResult> for GameResult {
    type Error = Error;

    fn try_from(raw: RawGameResult) -> Result<Self> {
        GameResult::new(raw.opponent, raw.score)
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawScaledGameResult {
    opponent_rating: f64,
    opponent_deviation: f64,
    score: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawScaledGameResult> for ScaledGameResult {
    type Error = Error;

    fn try_from(raw: RawScaledGameResult) -> Result<Self> {
        Ok(ScaledGameResult {
            opponent_rating: crate::check_finite("opponent_rating", raw.opponent_rating)?,
            opponent_deviation: crate::check_positive("opponent_deviation", raw.opponent_deviation)?,
            score: check_score(&raw.score)?,
        })
    }
}

/// Rating and deviation of `player` on the Glicko-2 scale.
fn glicko2_values(player: Player) -> (f64, f64) {
    match player {
        Player::V1(rating) => (
            rating_to(rating.rating(), Scale::V2),
            deviation_to(rating.deviation(), Scale::V2),
        ),
        Player::V2(rating) => (rating.rating(), rating.deviation()),
    }
}

/// Closes a rating period for `player`, taking into account all `results`.
/// The new rating is on the same scale as `player`.
///
/// A player on the Glicko scale is assumed to have [`constants::DEFAULT_VOLATILITY`][crate::constants::DEFAULT_VOLATILITY].
/// The volatility calculated during the rating period is dropped when converting back.
///
/// If `results` is empty, only the rating deviation grows.
///
/// # Arguments
///
/// * `player` - The rating of the player **at the onset of the rating period**
/// * `results` - The results of the player that occurred in the rating period
/// * `parameters`
///
/// # Errors
///
/// See [`rate_player_scaled`].
pub fn new_rating(player: Player, results: &[GameResult], parameters: Parameters) -> Result<Player> {
    let scale = player.scale();
    let player_rating = player.to_scaled(None)?;
    let results: Vec<_> = results.iter().copied().map(GameResult::to_scaled).collect();

    let new_rating = rate_player_scaled(player_rating, &results, parameters)?;

    Ok(Player::from_scaled(new_rating, scale))
}

/// [`new_rating`] on the Glicko-2 scale.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if `parameters` are not valid
/// * [`Error::DegenerateInput`] if the `results` carry no information, e.g. because every opponent is rated too far away
/// * [`Error::NumericDivergence`] if the new volatility can not be found within [`Parameters::max_iterations`]
pub fn rate_player_scaled(
    player_rating: ScaledRating,
    results: &[ScaledGameResult],
    parameters: Parameters,
) -> Result<ScaledRating> {
    let parameters = parameters.validate()?;

    // Step 1. (initialising) doesn't apply, we have already set the starting ratings.
    // Step 2. happened when the results were scaled.
    if results.is_empty() {
        // If `results` is empty, only Step 6. applies
        let new_deviation =
            calculate_pre_rating_period_value(player_rating.volatility(), player_rating, 1.0);

        return Ok(ScaledRating {
            deviation: new_deviation,
            ..player_rating
        });
    }

    // Step 3. and 4.
    let period = RatingPeriod::new(player_rating, results)?;

    // Step 5.
    let new_volatility = calculate_new_volatility(&period, player_rating, parameters)?;

    // Step 6.
    let pre_rating_period_value =
        calculate_pre_rating_period_value(new_volatility, player_rating, 1.0);

    // Step 7.
    let new_deviation =
        calculate_new_rating_deviation(pre_rating_period_value, period.estimated_variance);

    let new_rating = player_rating.rating() + new_deviation * new_deviation * period.results_effect;

    trace!(new_rating, new_deviation, new_volatility, "closed rating period");

    Ok(ScaledRating {
        rating: new_rating,
        deviation: new_deviation,
        volatility: new_volatility,
    })
}

/// Grows the rating deviation of `player` for `elapsed_periods` rating periods without any games.
/// `elapsed_periods` may be fractional.
///
/// `decay(player, 1.0)` is the same as calling [`new_rating`] without results.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `elapsed_periods` is negative or not finite.
pub fn decay(player: Player, elapsed_periods: f64) -> Result<Player> {
    if !elapsed_periods.is_finite() || elapsed_periods < 0.0 {
        return Err(Error::InvalidInput {
            name: "elapsed_periods",
            value: elapsed_periods,
        });
    }

    let scale = player.scale();
    let player_rating = player.to_scaled(None)?;

    let new_deviation =
        calculate_pre_rating_period_value(player_rating.volatility(), player_rating, elapsed_periods);

    Ok(Player::from_scaled(
        ScaledRating {
            deviation: new_deviation,
            ..player_rating
        },
        scale,
    ))
}

/// The expected score of `player` in a game against `opponent`, between `0.0` and `1.0`.
///
/// Only the uncertainty of the opponent's rating is taken into account, just like in "Step 3." in [Glickman's paper](http://www.glicko.net/glicko/glicko2.pdf).
#[must_use]
pub fn expected_score(player: Player, opponent: Player) -> f64 {
    let (player_rating, _) = glicko2_values(player);
    let (opponent_rating, opponent_deviation) = glicko2_values(opponent);

    calculate_e(calculate_g(opponent_deviation), player_rating, opponent_rating)
}

/// Intermediate values of one rating period, Step 3. and Step 4.
#[derive(Clone, Copy, PartialEq, Debug)]
struct RatingPeriod {
    /// v
    estimated_variance: f64,
    /// Sum of g * (s - E) over all results.
    results_effect: f64,
    /// Δ
    estimated_improvement: f64,
}

impl RatingPeriod {
    fn new(player_rating: ScaledRating, results: &[ScaledGameResult]) -> Result<Self> {
        let (information, results_effect) =
            results
                .iter()
                .fold((0.0, 0.0), |(information, results_effect), result| {
                    let g = calculate_g(result.opponent_deviation);
                    let e = calculate_e(g, player_rating.rating(), result.opponent_rating);

                    (
                        information + g * g * e * (1.0 - e),
                        results_effect + g * (result.score - e),
                    )
                });

        let estimated_variance = 1.0 / information;

        if !estimated_variance.is_finite() || estimated_variance <= 0.0 {
            warn!(
                estimated_variance,
                results = results.len(),
                "results carry no information"
            );

            return Err(Error::DegenerateInput {
                variance: estimated_variance,
            });
        }

        let estimated_improvement = estimated_variance * results_effect;

        trace!(estimated_variance, estimated_improvement, "rating period");

        Ok(RatingPeriod {
            estimated_variance,
            results_effect,
            estimated_improvement,
        })
    }
}

#[must_use]
fn calculate_g(deviation: f64) -> f64 {
    1.0 / f64::sqrt(1.0 + 3.0 * deviation * deviation / (PI * PI))
}

#[must_use]
fn calculate_e(g: f64, player_rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-g * (player_rating - opponent_rating)))
}

/// Step 5.
fn calculate_new_volatility(
    period: &RatingPeriod,
    player_rating: ScaledRating,
    parameters: Parameters,
) -> Result<f64> {
    let deviation = player_rating.deviation();
    let deviation_sq = deviation * deviation;
    let current_volatility = player_rating.volatility();

    let estimated_variance = period.estimated_variance;
    let estimated_improvement_sq = period.estimated_improvement * period.estimated_improvement;

    let volatility_change = parameters.volatility_change();
    let max_iterations = parameters.max_iterations();

    // 1.
    // ln(σ²) computed as 2 ln(σ), σ² underflows for very small volatilities.
    let alpha = 2.0 * f64::ln(current_volatility);

    let f = |x: f64| {
        let x_exp = f64::exp(x);

        let tmp_1 = x_exp * (estimated_improvement_sq - deviation_sq - estimated_variance - x_exp);

        let tmp_2 = 2.0 * {
            let tmp = deviation_sq + estimated_variance + x_exp;
            tmp * tmp
        };

        let tmp_3 = x - alpha;

        let tmp_4 = volatility_change * volatility_change;

        tmp_1 / tmp_2 - tmp_3 / tmp_4
    };

    // 2.
    let mut a = alpha;

    let mut b = if estimated_improvement_sq > deviation_sq + estimated_variance {
        f64::ln(estimated_improvement_sq - deviation_sq - estimated_variance)
    } else {
        // (i)
        let mut k = 1;

        loop {
            // (ii)
            let estimated_b = alpha - f64::from(k) * volatility_change;

            if f(estimated_b) >= 0.0 {
                break estimated_b;
            }

            if k >= max_iterations {
                warn!(k, alpha, volatility_change, "no bracket for the new volatility");

                return Err(Error::NumericDivergence {
                    stage: Stage::Bracketing,
                    iterations: k,
                });
            }

            k += 1;
        }
    };

    // 3.
    let mut f_a = f(a);
    let mut f_b = f(b);

    if !(f_a.is_finite() && f_b.is_finite()) {
        warn!(a, b, f_a, f_b, "volatility function is not finite on the bracket");

        return Err(Error::NumericDivergence {
            stage: Stage::Bracketing,
            iterations: 0,
        });
    }

    // 4.
    let mut iterations = 0;

    while f64::abs(b - a) > parameters.convergence_tolerance() {
        if iterations >= max_iterations {
            warn!(iterations, a, b, "new volatility did not converge");

            return Err(Error::NumericDivergence {
                stage: Stage::Illinois,
                iterations,
            });
        }

        iterations += 1;

        // (a)
        let c = a + (a - b) * f_a / (f_b - f_a);
        let f_c = f(c);

        if !(c.is_finite() && f_c.is_finite()) {
            warn!(iterations, c, f_c, "new volatility diverged");

            return Err(Error::NumericDivergence {
                stage: Stage::Illinois,
                iterations,
            });
        }

        // (b)
        if f_c * f_b <= 0.0 {
            a = b;
            f_a = f_b;
        } else {
            f_a /= 2.0;
        }

        // (c)
        b = c;
        f_b = f_c;

        // (d) checked by loop
    }

    trace!(iterations, "new volatility converged");

    // 5.
    Ok(f64::exp(a / 2.0))
}

/// Step 6.
#[must_use]
fn calculate_pre_rating_period_value(
    new_volatility: f64,
    player_rating: ScaledRating,
    elapsed_periods: f64,
) -> f64 {
    let current_deviation = player_rating.deviation();

    f64::sqrt(
        current_deviation * current_deviation + elapsed_periods * new_volatility * new_volatility,
    )
}

/// Step 7.1.
#[must_use]
fn calculate_new_rating_deviation(pre_rating_period_value: f64, estimated_variance: f64) -> f64 {
    1.0 / f64::sqrt(
        1.0 / (pre_rating_period_value * pre_rating_period_value) + 1.0 / estimated_variance,
    )
}
