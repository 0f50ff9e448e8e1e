//! Iterative computation of the new volatility.
//!
//! The new volatility `σ'` is `exp(A / 2)` where `A` is the root of
//!
//! ```text
//! f(x) = exp(x) (Δ² - φ² - v - exp(x)) / (2 (φ² + v + exp(x))²) - (x - ln(σ²)) / τ²
//! ```
//!
//! found by the Illinois variant of regula falsi. `f` is strictly decreasing,
//! so once a bracket with a sign change is established, the root is unique.

use tracing::{trace, warn};

use crate::{
    estimation::Estimate, internal_rating::InternalRatingDifference, RatingSystem, UpdateError,
    Volatility,
};

/// Result of a successful volatility computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilitySolution {
    pub volatility: Volatility,
    /// Number of Illinois iterations needed.
    pub iterations: u32,
}

struct Objective {
    a: f64,
    delta_sq: f64,
    phi_sq: f64,
    variance: f64,
    tau_sq: f64,
}

impl Objective {
    #[inline]
    fn eval(&self, x: f64) -> f64 {
        let ex = x.exp();
        let denom = self.phi_sq + self.variance + ex;
        ex * (self.delta_sq - self.phi_sq - self.variance - ex) / (2.0 * denom * denom)
            - (x - self.a) / self.tau_sq
    }
}

/// Bounded root finder for the new volatility, configured from a
/// [`RatingSystem`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilitySolver {
    tau: f64,
    tolerance: f64,
    max_iterations: u32,
}

impl From<&RatingSystem> for VolatilitySolver {
    fn from(system: &RatingSystem) -> VolatilitySolver {
        VolatilitySolver::new(system)
    }
}

impl VolatilitySolver {
    pub fn new(system: &RatingSystem) -> VolatilitySolver {
        VolatilitySolver {
            tau: system.tau(),
            tolerance: system.convergence_tolerance(),
            max_iterations: system.max_iterations(),
        }
    }

    /// Computes the new volatility of a player with internal-scale
    /// `deviation` and current `volatility`, given the summary of the games
    /// in the rating period.
    pub fn solve(
        &self,
        deviation: InternalRatingDifference,
        volatility: Volatility,
        estimate: &Estimate,
    ) -> Result<VolatilitySolution, UpdateError> {
        if volatility.0 == 0.0 {
            // ln(0) pins the prior at zero, so the volatility stays there.
            return Ok(VolatilitySolution {
                volatility: Volatility(0.0),
                iterations: 0,
            });
        }

        let f = Objective {
            a: volatility.sq().ln(),
            delta_sq: estimate.improvement().powi(2),
            phi_sq: deviation.sq(),
            variance: estimate.variance,
            tau_sq: self.tau * self.tau,
        };

        // Bracket the root of f by A <= ln(σ'²) <= B (or B <= ln(σ'²) <= A).
        let mut a = f.a;
        let mut b = if f.delta_sq > f.phi_sq + f.variance {
            (f.delta_sq - f.phi_sq - f.variance).ln()
        } else {
            self.search_lower_bound(&f)?
        };
        trace!(a, b, "bracketed new volatility");

        let mut fa = f.eval(a);
        let mut fb = f.eval(b);
        let mut iterations = 0;

        loop {
            // A NaN width never counts as converged.
            let width = (b - a).abs();
            if width <= self.tolerance {
                break;
            }
            if iterations >= self.max_iterations {
                warn!(
                    iterations,
                    width, "new volatility did not converge, rejecting update"
                );
                return Err(UpdateError::VolatilityNotConverged { iterations, width });
            }

            let c = a + (a - b) * fa / (fb - fa);
            let fc = f.eval(c);
            iterations += 1;
            if fc == 0.0 {
                // Exact root, the bracket cannot shrink any further.
                a = c;
                break;
            }
            if fc * fb < 0.0 {
                a = b;
                fa = fb;
            } else {
                // Illinois step: keep the old endpoint, halve its weight.
                fa /= 2.0;
            }
            b = c;
            fb = fc;
        }

        trace!(iterations, a, "new volatility converged");
        Ok(VolatilitySolution {
            volatility: Volatility((a / 2.0).exp()),
            iterations,
        })
    }

    /// Steps left from `ln(σ²)` in multiples of `τ` until `f` is non-negative.
    fn search_lower_bound(&self, f: &Objective) -> Result<f64, UpdateError> {
        for k in 1..=self.max_iterations {
            let x = f.a - f64::from(k) * self.tau;
            if f.eval(x) >= 0.0 {
                return Ok(x);
            }
        }

        warn!(
            steps = self.max_iterations,
            "no bracket for new volatility found, rejecting update"
        );
        Err(UpdateError::BracketNotFound {
            steps: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn reference_estimate() -> Estimate {
        Estimate {
            variance: 1.7785,
            improvement_partial: -0.4834 / 1.7785,
        }
    }

    fn objective(
        deviation: f64,
        volatility: f64,
        estimate: &Estimate,
        system: &RatingSystem,
    ) -> Objective {
        Objective {
            a: (volatility * volatility).ln(),
            delta_sq: estimate.improvement().powi(2),
            phi_sq: deviation * deviation,
            variance: estimate.variance,
            tau_sq: system.tau() * system.tau(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        for tau in [0.3, 0.5] {
            let system = RatingSystem::builder().tau(tau).build();
            let solution = VolatilitySolver::new(&system)
                .solve(
                    InternalRatingDifference(1.1513),
                    Volatility(0.06),
                    &reference_estimate(),
                )
                .unwrap();
            assert_abs_diff_eq!(solution.volatility.0, 0.05999, epsilon = 0.0001);
            assert!(solution.iterations <= system.max_iterations());
        }
    }

    #[test]
    fn test_root() {
        let system = RatingSystem::new();
        let estimate = reference_estimate();
        let solution = VolatilitySolver::from(&system)
            .solve(InternalRatingDifference(1.1513), Volatility(0.06), &estimate)
            .unwrap();

        let f = objective(1.1513, 0.06, &estimate, &system);
        assert_abs_diff_eq!(
            f.eval(solution.volatility.sq().ln()),
            0.0,
            epsilon = 0.001
        );
    }

    #[test]
    fn test_surprising_results_raise_volatility() {
        // Δ² > φ² + v: upper bracket from the closed form.
        let system = RatingSystem::builder().tau(0.5).build();
        let estimate = Estimate {
            variance: 0.5,
            improvement_partial: 4.0,
        };
        let solution = VolatilitySolver::new(&system)
            .solve(InternalRatingDifference(0.1), Volatility(0.06), &estimate)
            .unwrap();
        assert!(solution.volatility.0 > 0.06);

        let f = objective(0.1, 0.06, &estimate, &system);
        assert_abs_diff_eq!(
            f.eval(solution.volatility.sq().ln()),
            0.0,
            epsilon = 0.001
        );
    }

    #[test]
    fn test_deterministic() {
        let solver = VolatilitySolver::new(&RatingSystem::new());
        let first = solver
            .solve(InternalRatingDifference(0.8), Volatility(0.07), &reference_estimate())
            .unwrap();
        let second = solver
            .solve(InternalRatingDifference(0.8), Volatility(0.07), &reference_estimate())
            .unwrap();
        assert_eq!(first.volatility.0.to_bits(), second.volatility.0.to_bits());
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn test_iteration_cap() {
        let system = RatingSystem::builder().max_iterations(1).build();
        let result = VolatilitySolver::new(&system).solve(
            InternalRatingDifference(1.1513),
            Volatility(0.06),
            &reference_estimate(),
        );
        assert!(matches!(
            result,
            Err(UpdateError::VolatilityNotConverged { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_zero_volatility() {
        let solution = VolatilitySolver::new(&RatingSystem::new())
            .solve(InternalRatingDifference(1.1513), Volatility(0.0), &reference_estimate())
            .unwrap();
        assert_eq!(solution.volatility, Volatility(0.0));
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn test_bracket_not_found() {
        let system = RatingSystem::builder().max_iterations(10).build();
        let result = VolatilitySolver::new(&system).solve(
            InternalRatingDifference(1.1513),
            Volatility(f64::NAN),
            &reference_estimate(),
        );
        assert_eq!(result, Err(UpdateError::BracketNotFound { steps: 10 }));
    }
}
