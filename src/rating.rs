use std::{
    fmt,
    ops::{Add, Mul, Sub},
    sync::Arc,
};

use crate::{expectation, internal_rating::InternalRating, RatingSystem, Score};

/// Number representing playing strength on the public scale, such that the
/// difference between two ratings can be used to predict an expected score.
/// Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct RatingScalar(pub f64);

impl From<RatingScalar> for f64 {
    #[inline]
    fn from(RatingScalar(rating): RatingScalar) -> f64 {
        rating
    }
}

impl From<f64> for RatingScalar {
    #[inline]
    fn from(rating: f64) -> RatingScalar {
        RatingScalar(rating)
    }
}

impl Sub<RatingScalar> for RatingScalar {
    type Output = RatingDifference;

    #[inline]
    fn sub(self, rhs: RatingScalar) -> RatingDifference {
        RatingDifference(self.0 - rhs.0)
    }
}

impl Add<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn add(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 + difference)
    }
}

impl Sub<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn sub(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 - difference)
    }
}

/// A difference between two public-scale ratings. Deviations are expressed
/// in the same unit.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct RatingDifference(pub f64);

impl From<RatingDifference> for f64 {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> f64 {
        difference
    }
}

impl From<f64> for RatingDifference {
    #[inline]
    fn from(difference: f64) -> RatingDifference {
        RatingDifference(difference)
    }
}

impl RatingDifference {
    #[must_use]
    #[inline]
    pub fn min(self, other: RatingDifference) -> RatingDifference {
        RatingDifference(f64::min(self.0, other.0))
    }
}

impl Mul<RatingDifference> for f64 {
    type Output = RatingDifference;

    #[inline]
    fn mul(self, RatingDifference(difference): RatingDifference) -> RatingDifference {
        RatingDifference(self * difference)
    }
}

/// Number indicating the degree of expected fluctuation in a rating. The
/// same on both scales.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Volatility(pub f64);

impl Volatility {
    #[must_use]
    #[inline]
    pub fn clamp(self, min: Volatility, max: Volatility) -> Volatility {
        Volatility(self.0.clamp(min.0, max.0))
    }

    #[inline]
    pub(crate) fn sq(self) -> f64 {
        self.0 * self.0
    }
}

impl From<Volatility> for f64 {
    #[inline]
    fn from(Volatility(volatility): Volatility) -> f64 {
        volatility
    }
}

impl From<f64> for Volatility {
    #[inline]
    fn from(volatility: f64) -> Volatility {
        Volatility(volatility)
    }
}

/// A player's rating on the public scale, tied to the rating system it was
/// created in.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    /// Number indicating playing strength. Higher is better. The difference
    /// between two ratings determines the expected score in a game between
    /// the two players.
    pub rating: RatingScalar,
    /// Uncertainty in the rating. A range from rating minus twice the deviation
    /// to rating plus twice the deviation approximately represents a 95%
    /// confidence interval.
    pub deviation: RatingDifference,
    /// Number indicating the degree of expected fluctuation in the rating.
    pub volatility: Volatility,
    system: Arc<RatingSystem>,
}

impl Default for Rating {
    fn default() -> Rating {
        Rating::initial(Arc::new(RatingSystem::default()))
    }
}

impl Rating {
    pub fn new(
        rating: RatingScalar,
        deviation: RatingDifference,
        volatility: Volatility,
        system: Arc<RatingSystem>,
    ) -> Rating {
        Rating {
            rating,
            deviation,
            volatility,
            system,
        }
    }

    /// The starting rating of a new player in `system`.
    pub fn initial(system: Arc<RatingSystem>) -> Rating {
        Rating {
            rating: system.base_rating(),
            deviation: system.base_deviation(),
            volatility: system.base_volatility(),
            system,
        }
    }

    pub fn system(&self) -> &Arc<RatingSystem> {
        &self.system
    }

    /// Rating, deviation and volatility.
    pub fn values(&self) -> (f64, f64, f64) {
        (
            f64::from(self.rating),
            f64::from(self.deviation),
            f64::from(self.volatility),
        )
    }

    /// Converts to the internal Glicko-2 scale.
    pub fn to_internal(&self) -> InternalRating {
        InternalRating::from_public(self)
    }

    /// Expected score of this player in a game against `opponent`.
    pub fn expected_score(&self, opponent: &Rating) -> Score {
        let us = self.to_internal();
        let them = opponent.to_internal();
        Score(expectation::expected_score(
            us.rating,
            them.rating,
            f64::from(them.deviation),
        ))
    }

    /// Approximate 95% confidence interval of the rating.
    pub fn confidence_interval(&self) -> (RatingScalar, RatingScalar) {
        (
            self.rating - 2.0 * self.deviation,
            self.rating + 2.0 * self.deviation,
        )
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Rating[{:.3}] Deviation[{:.3}] Volatility[{:.3}]}}",
            self.rating.0, self.deviation.0, self.volatility.0
        )
    }
}
