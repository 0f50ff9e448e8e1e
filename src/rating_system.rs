use crate::{RatingDifference, RatingScalar, Volatility};

/// Default starting rating.
pub const DEFAULT_RATING: RatingScalar = RatingScalar(1500.0);
/// Default starting deviation. Also the upper bound of any updated deviation.
pub const DEFAULT_DEVIATION: RatingDifference = RatingDifference(350.0);
/// Default starting volatility.
pub const DEFAULT_VOLATILITY: Volatility = Volatility(0.06);
/// Default system constant. Reasonable choices are between `0.3` and `1.2`,
/// with smaller values preventing the volatility from changing by large
/// amounts.
pub const DEFAULT_TAU: f64 = 0.3;
/// Width of the volatility bracket (on the `ln(σ²)` axis) at which the
/// solver stops.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 0.000_001;
/// Iteration cap for both the bracket search and the Illinois iteration.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    base_rating: RatingScalar,
    base_deviation: RatingDifference,
    base_volatility: Volatility,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            base_rating: DEFAULT_RATING,
            base_deviation: DEFAULT_DEVIATION,
            base_volatility: DEFAULT_VOLATILITY,

            tau: DEFAULT_TAU,

            convergence_tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn base_rating(&mut self, base_rating: RatingScalar) -> &mut Self {
        assert!(base_rating.0.is_finite());
        self.base_rating = base_rating;
        self
    }

    pub fn base_deviation(&mut self, base_deviation: RatingDifference) -> &mut Self {
        assert!(base_deviation.0 >= 0.0);
        self.base_deviation = base_deviation;
        self
    }

    pub fn base_volatility(&mut self, base_volatility: Volatility) -> &mut Self {
        assert!(base_volatility.0 >= 0.0);
        self.base_volatility = base_volatility;
        self
    }

    pub fn tau(&mut self, tau: f64) -> &mut Self {
        assert!(tau > 0.0);
        self.tau = tau;
        self
    }

    pub fn convergence_tolerance(&mut self, convergence_tolerance: f64) -> &mut Self {
        assert!(convergence_tolerance > 0.0);
        self.convergence_tolerance = convergence_tolerance;
        self
    }

    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        assert!(max_iterations >= 1);
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> RatingSystem {
        RatingSystem {
            base_rating: self.base_rating,
            base_deviation: self.base_deviation,
            base_volatility: self.base_volatility,

            tau: self.tau,

            convergence_tolerance: self.convergence_tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// Parameters of a rating system.
///
/// Immutable once built. Ratings refer to their system through a shared
/// `Arc<RatingSystem>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSystem {
    base_rating: RatingScalar,
    base_deviation: RatingDifference,
    base_volatility: Volatility,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem::new()
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn new() -> RatingSystem {
        RatingSystem::builder().build()
    }

    /// Rating system with custom starting values and system constant, using
    /// the default solver settings.
    pub fn with_values(
        base_rating: RatingScalar,
        base_deviation: RatingDifference,
        base_volatility: Volatility,
        tau: f64,
    ) -> RatingSystem {
        RatingSystem::builder()
            .base_rating(base_rating)
            .base_deviation(base_deviation)
            .base_volatility(base_volatility)
            .tau(tau)
            .build()
    }

    pub fn base_rating(&self) -> RatingScalar {
        self.base_rating
    }

    pub fn base_deviation(&self) -> RatingDifference {
        self.base_deviation
    }

    pub fn base_volatility(&self) -> Volatility {
        self.base_volatility
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Base rating, base deviation, base volatility and tau.
    pub fn values(&self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.base_rating),
            f64::from(self.base_deviation),
            f64::from(self.base_volatility),
            self.tau,
        )
    }
}
