use approx::assert_abs_diff_eq;
use glicko2_rating::algorithm::{self, GameResult, MatchResult};
use glicko2_rating::scale::Player;
use glicko2_rating::{Error, Parameters};
use proptest::prelude::*;

fn v1_player() -> impl Strategy<Value = Player> {
    (0.0..3000.0f64, 1.0..1000.0f64)
        .prop_map(|(rating, deviation)| Player::new_v1(Some(rating), Some(deviation)).unwrap())
}

fn v2_player() -> impl Strategy<Value = Player> {
    (-8.0..8.0f64, 0.01..5.0f64, 0.01..1.0f64).prop_map(|(rating, deviation, volatility)| {
        Player::new_v2(Some(rating), Some(deviation), Some(volatility)).unwrap()
    })
}

/// Rating in `[-10000, 10000]` and deviation in `(0, 1000]`.
fn bounded_v1_player() -> impl Strategy<Value = Player> {
    (-10_000.0..=10_000.0f64, 1e-6..=1000.0f64)
        .prop_map(|(rating, deviation)| Player::new_v1(Some(rating), Some(deviation)).unwrap())
}

/// Volatility in `(0, 1]`, down to values whose square underflows.
fn bounded_volatility() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-300.0..0.0f64).prop_map(|exponent| 10f64.powf(exponent)),
        1e-6..=1.0f64,
    ]
}

fn bounded_game_result() -> impl Strategy<Value = GameResult> {
    (bounded_v1_player(), 0.0..=1.0f64)
        .prop_map(|(opponent, score)| GameResult::new(opponent, score).unwrap())
}

fn game_result() -> impl Strategy<Value = GameResult> {
    (v1_player(), 0.0..=1.0f64)
        .prop_map(|(opponent, score)| GameResult::new(opponent, score).unwrap())
}

proptest! {
    #[test]
    fn v1_round_trip(rating in -10_000.0..10_000.0f64, deviation in 0.001..1000.0f64) {
        let player = Player::new_v1(Some(rating), Some(deviation)).unwrap();
        let round_trip = player.to_v2(None).unwrap().to_v1();

        assert_abs_diff_eq!(round_trip.rating(), rating, epsilon = 1e-9);
        assert_abs_diff_eq!(round_trip.deviation(), deviation, epsilon = 1e-9);
    }

    #[test]
    fn v2_round_trip(player in v2_player()) {
        let round_trip = player.to_v1().to_v2(player.volatility()).unwrap();

        assert_abs_diff_eq!(round_trip.rating(), player.rating(), epsilon = 1e-9);
        assert_abs_diff_eq!(round_trip.deviation(), player.deviation(), epsilon = 1e-9);
        prop_assert_eq!(round_trip.volatility(), player.volatility());
    }

    #[test]
    fn no_results_only_grows_deviation(player in v2_player()) {
        let new_player = algorithm::new_rating(player, &[], Parameters::default()).unwrap();

        prop_assert!(new_player.deviation() > player.deviation());
        prop_assert_eq!(new_player.rating(), player.rating());
        prop_assert_eq!(new_player.volatility(), player.volatility());
    }

    #[test]
    fn converges_within_the_default_iteration_cap(
        player in bounded_v1_player(),
        volatility in bounded_volatility(),
        volatility_change in 0.3..1.2f64,
        results in prop::collection::vec(bounded_game_result(), 1..8),
    ) {
        let player = player.to_v2(Some(volatility)).unwrap();
        let parameters = Parameters::default().with_volatility_change(volatility_change);

        match algorithm::new_rating(player, &results, parameters) {
            Ok(new_player) => {
                prop_assert!(new_player.deviation() > 0.0);
                prop_assert!(new_player.volatility().unwrap() > 0.0);
            }
            // Expected scores round to exactly 0 or 1 for large enough rating gaps.
            Err(Error::DegenerateInput { .. }) => {}
            Err(error) => prop_assert!(false, "{:?}", error),
        }
    }

    // Players and opponents within 3000 rating points of each other need far fewer passes.
    #[test]
    fn close_ratings_converge_within_a_hundred_iterations(
        player in v1_player(),
        volatility in 0.01..1.0f64,
        volatility_change in 0.3..1.2f64,
        results in prop::collection::vec(game_result(), 1..8),
    ) {
        let player = player.to_v2(Some(volatility)).unwrap();
        let parameters = Parameters::default()
            .with_volatility_change(volatility_change)
            .with_max_iterations(100);

        let new_player = algorithm::new_rating(player, &results, parameters);

        prop_assert!(new_player.is_ok(), "{:?}", new_player);
    }

    #[test]
    fn wins_rate_higher_than_losses(
        player in v1_player(),
        opponent in v1_player(),
        games in 1..6usize,
    ) {
        let wins = vec![GameResult::new(opponent, MatchResult::Win).unwrap(); games];
        let losses = vec![GameResult::new(opponent, MatchResult::Loss).unwrap(); games];

        let after_wins = algorithm::new_rating(player, &wins, Parameters::default()).unwrap();
        let after_losses = algorithm::new_rating(player, &losses, Parameters::default()).unwrap();

        prop_assert!(after_wins.rating() > after_losses.rating());
    }

    #[test]
    fn self_play_draws_keep_rating(player in v1_player(), games in 1..6usize) {
        let draws = vec![GameResult::new(player, MatchResult::Draw).unwrap(); games];

        let new_player = algorithm::new_rating(player, &draws, Parameters::default()).unwrap();

        assert_abs_diff_eq!(new_player.rating(), player.rating(), epsilon = 1e-6);
    }
}
