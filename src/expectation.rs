//! The `g` and `E` functions of Glicko-2, on internal-scale values.

use std::f64::consts::PI;

/// Weight of an opponent with the given internal-scale deviation. Approaches
/// `1.0` for a certain opponent and shrinks as the opponent's deviation grows.
#[inline]
pub fn g(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * deviation * deviation / (PI * PI)).sqrt()
}

/// Expected score of a player with internal rating `rating` against an
/// opponent with internal rating `opponent_rating` and deviation
/// `opponent_deviation`.
#[inline]
pub fn expected_score(rating: f64, opponent_rating: f64, opponent_deviation: f64) -> f64 {
    expected_score_weighted(rating, opponent_rating, g(opponent_deviation))
}

/// Same as [`expected_score`], given the precomputed `g` of the opponent.
#[inline]
pub(crate) fn expected_score_weighted(rating: f64, opponent_rating: f64, g: f64) -> f64 {
    1.0 / (1.0 + f64::exp(-g * (rating - opponent_rating)))
}
