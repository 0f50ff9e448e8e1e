use std::sync::Arc;

use crate::{Rating, RatingDifference, RatingSystem, Volatility};

/// Ratio between the public scale and the internal Glicko-2 scale.
pub const INTERNAL_RATING_SCALE: f64 = 173.7178;

/// A rating difference or deviation on the internal scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct InternalRatingDifference(pub f64);

impl From<InternalRatingDifference> for f64 {
    #[inline]
    fn from(InternalRatingDifference(difference): InternalRatingDifference) -> f64 {
        difference
    }
}

impl From<RatingDifference> for InternalRatingDifference {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> InternalRatingDifference {
        InternalRatingDifference(difference / INTERNAL_RATING_SCALE)
    }
}

impl From<InternalRatingDifference> for RatingDifference {
    #[inline]
    fn from(InternalRatingDifference(difference): InternalRatingDifference) -> RatingDifference {
        RatingDifference(difference * INTERNAL_RATING_SCALE)
    }
}

impl InternalRatingDifference {
    #[inline]
    pub fn sq(self) -> f64 {
        self.0 * self.0
    }
}

/// A rating on the internal scale: rating `μ` centered at zero, deviation `φ`
/// and volatility `σ`.
///
/// Carries no reference to its rating system. The base rating is only needed
/// to move between scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InternalRating {
    pub rating: f64,
    pub deviation: InternalRatingDifference,
    pub volatility: Volatility,
}

impl InternalRating {
    pub fn from_public(rating: &Rating) -> InternalRating {
        let RatingDifference(offset) = rating.rating - rating.system().base_rating();
        InternalRating {
            rating: offset / INTERNAL_RATING_SCALE,
            deviation: InternalRatingDifference::from(rating.deviation),
            volatility: rating.volatility,
        }
    }

    /// Converts back to the public scale of `system`. No clamping is applied.
    pub fn to_public(&self, system: Arc<RatingSystem>) -> Rating {
        let rating = system.base_rating() + RatingDifference(self.rating * INTERNAL_RATING_SCALE);
        Rating::new(
            rating,
            RatingDifference::from(self.deviation),
            self.volatility,
            system,
        )
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.rating.is_finite() && self.deviation.0.is_finite() && self.volatility.0.is_finite()
    }
}

impl From<&Rating> for InternalRating {
    fn from(rating: &Rating) -> InternalRating {
        InternalRating::from_public(rating)
    }
}
