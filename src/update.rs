use std::sync::Arc;

use tracing::debug;

use crate::{
    estimation::estimate,
    expectation::{expected_score_weighted, g},
    internal_rating::{InternalRating, InternalRatingDifference},
    volatility::VolatilitySolver,
    Rating, RatingSystem, Score, UpdateError, Volatility,
};

impl InternalRating {
    /// Rating after a rating period in which the player met `opponents` with
    /// the corresponding `scores`. All values are on the internal scale;
    /// `system` only provides the solver parameters.
    pub fn updated(
        &self,
        opponents: &[InternalRating],
        scores: &[Score],
        system: &RatingSystem,
    ) -> Result<InternalRating, UpdateError> {
        if opponents.len() != scores.len() {
            return Err(UpdateError::LengthMismatch {
                opponents: opponents.len(),
                scores: scores.len(),
            });
        }
        if opponents.is_empty() {
            return Err(UpdateError::NoOpponents);
        }

        let gs: Vec<f64> = opponents
            .iter()
            .map(|opponent| g(opponent.deviation.0))
            .collect();
        let es: Vec<f64> = opponents
            .iter()
            .zip(&gs)
            .map(|(opponent, &g)| expected_score_weighted(self.rating, opponent.rating, g))
            .collect();

        let estimate = estimate(&gs, &es, scores)?;
        let solution =
            VolatilitySolver::new(system).solve(self.deviation, self.volatility, &estimate)?;

        // Deviation grown by the new volatility, then narrowed by the games.
        let pre_period_sq = self.deviation.sq() + solution.volatility.sq();
        let deviation = 1.0 / (1.0 / pre_period_sq + 1.0 / estimate.variance).sqrt();
        let rating = self.rating + deviation * deviation * estimate.improvement_partial;

        let updated = InternalRating {
            rating,
            deviation: InternalRatingDifference(deviation),
            volatility: solution.volatility,
        };
        if !updated.is_finite() {
            return Err(UpdateError::NonFinite);
        }

        debug!(
            games = scores.len(),
            variance = estimate.variance,
            improvement = estimate.improvement(),
            iterations = solution.iterations,
            "updated internal rating"
        );
        Ok(updated)
    }
}

impl Rating {
    /// Rating after a rating period in which the player met `opponents` with
    /// the corresponding `scores`.
    ///
    /// Opponents are read with their own rating systems. The updated deviation
    /// never exceeds the base deviation of the player's system.
    pub fn updated(&self, opponents: &[Rating], scores: &[Score]) -> Result<Rating, UpdateError> {
        if opponents.len() != scores.len() {
            return Err(UpdateError::LengthMismatch {
                opponents: opponents.len(),
                scores: scores.len(),
            });
        }

        let opponents: Vec<InternalRating> = opponents.iter().map(Rating::to_internal).collect();
        let updated = self
            .to_internal()
            .updated(&opponents, scores, self.system())?;
        Ok(Rating::from_updated(self.system(), updated))
    }

    /// Like [`Rating::updated`], but replaces `self`. On error, `self` is
    /// unchanged.
    pub fn update(&mut self, opponents: &[Rating], scores: &[Score]) -> Result<(), UpdateError> {
        *self = self.updated(opponents, scores)?;
        Ok(())
    }

    pub(crate) fn from_updated(system: &Arc<RatingSystem>, updated: InternalRating) -> Rating {
        let mut rating = updated.to_public(Arc::clone(system));
        rating.deviation = rating.deviation.min(system.base_deviation());
        rating
    }
}
