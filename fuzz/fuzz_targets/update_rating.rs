#![no_main]

use std::sync::Arc;

use arbitrary::{Arbitrary, Unstructured};
use glicko2_engine::{
    Rating, RatingDifference, RatingScalar, RatingSystem, Score, UpdateError, Volatility,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary)]
struct ArbitraryRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl ArbitraryRating {
    fn into_clamped(self, system: &Arc<RatingSystem>) -> Option<Rating> {
        if self.rating.is_nan() || self.deviation.is_nan() || self.volatility.is_nan() {
            None
        } else {
            Some(Rating::new(
                RatingScalar(self.rating.clamp(-10000.0, 10000.0)),
                RatingDifference(self.deviation.clamp(0.0, 1000.0)),
                Volatility(self.volatility).clamp(Volatility(0.001), Volatility(1.0)),
                Arc::clone(system),
            ))
        }
    }
}

#[derive(Arbitrary)]
struct Period {
    player: ArbitraryRating,
    games: Vec<(ArbitraryRating, f64)>,
    tau: f64,
}

fn assert_rating(rating: &Rating, system: &RatingSystem) {
    assert!(!f64::from(rating.rating).is_nan());
    assert!(!f64::from(rating.deviation).is_nan());
    assert!(!f64::from(rating.volatility).is_nan());
    assert!(rating.deviation <= system.base_deviation());
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(period) = Period::arbitrary(&mut u) else {
        return;
    };
    if period.tau.is_nan() {
        return;
    }

    let system = Arc::new(
        RatingSystem::builder()
            .tau(period.tau.clamp(0.05, 2.0))
            .build(),
    );

    let Some(player) = period.player.into_clamped(&system) else {
        return;
    };
    let mut opponents = Vec::new();
    let mut scores = Vec::new();
    for (opponent, score) in period.games {
        if score.is_nan() {
            return;
        }
        let Some(opponent) = opponent.into_clamped(&system) else {
            return;
        };
        opponents.push(opponent);
        scores.push(Score(score.clamp(0.0, 1.0)));
    }

    match player.updated(&opponents, &scores) {
        Ok(updated) => assert_rating(&updated, &system),
        Err(UpdateError::NoOpponents) => assert!(opponents.is_empty()),
        Err(_) => (),
    }
});
