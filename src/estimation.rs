use crate::{Score, UpdateError};

/// Summary of a set of games, sufficient to update a rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Estimated variance `v` of the rating, based only on game outcomes.
    pub variance: f64,
    /// Sum of `g * (score - E)` over all games. Scaled by the variance, this
    /// is the estimated improvement `Δ`.
    pub improvement_partial: f64,
}

impl Estimate {
    /// Estimated improvement `Δ` of the rating over the pre-period rating.
    #[inline]
    pub fn improvement(&self) -> f64 {
        self.variance * self.improvement_partial
    }
}

/// Estimated variance from per-opponent `g` and `E` values.
///
/// Infinite if no game carries information, in particular for an empty
/// slice. Prefer [`estimate`], which rejects this case.
pub fn estimated_variance(gs: &[f64], es: &[f64]) -> f64 {
    debug_assert_eq!(gs.len(), es.len());
    let total: f64 = gs
        .iter()
        .zip(es)
        .map(|(g, e)| g * g * e * (1.0 - e))
        .sum();
    1.0 / total
}

/// Estimated improvement before scaling by the variance.
pub fn estimated_improvement_partial(gs: &[f64], es: &[f64], scores: &[Score]) -> f64 {
    debug_assert_eq!(gs.len(), es.len());
    debug_assert_eq!(gs.len(), scores.len());
    gs.iter()
        .zip(es)
        .zip(scores)
        .map(|((g, e), score)| g * (score.value() - e))
        .sum()
}

/// Summarizes a set of games given as parallel slices, indexed by opponent.
pub fn estimate(gs: &[f64], es: &[f64], scores: &[Score]) -> Result<Estimate, UpdateError> {
    if gs.len() != es.len() {
        return Err(UpdateError::ExpectationMismatch {
            weights: gs.len(),
            expectations: es.len(),
        });
    }
    if gs.len() != scores.len() {
        return Err(UpdateError::LengthMismatch {
            opponents: gs.len(),
            scores: scores.len(),
        });
    }
    if scores.is_empty() {
        return Err(UpdateError::NoOpponents);
    }

    let variance = estimated_variance(gs, es);
    if !variance.is_finite() || variance <= 0.0 {
        return Err(UpdateError::DegenerateVariance);
    }

    Ok(Estimate {
        variance,
        improvement_partial: estimated_improvement_partial(gs, es, scores),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const GS: [f64; 3] = [0.9955, 0.9531, 0.7242];
    const ES: [f64; 3] = [0.639, 0.432, 0.303];

    #[test]
    fn test_reference_values() {
        let estimate = estimate(&GS, &ES, &[Score::WIN, Score::LOSS, Score::LOSS]).unwrap();
        assert_abs_diff_eq!(estimate.variance, 1.7785, epsilon = 0.01);
        assert_abs_diff_eq!(estimate.improvement(), -0.4834, epsilon = 0.01);
    }

    #[test]
    fn test_empty() {
        assert_eq!(estimate(&[], &[], &[]), Err(UpdateError::NoOpponents));
        assert!(estimated_variance(&[], &[]).is_infinite());
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            estimate(&GS, &ES, &[Score::WIN, Score::LOSS]),
            Err(UpdateError::LengthMismatch {
                opponents: 3,
                scores: 2
            })
        );
        assert_eq!(
            estimate(&GS[..2], &ES, &[Score::WIN, Score::LOSS]),
            Err(UpdateError::ExpectationMismatch {
                weights: 2,
                expectations: 3
            })
        );
    }

    #[test]
    fn test_degenerate() {
        // Expectation saturated at a certain win.
        assert_eq!(
            estimate(&[1.0], &[1.0], &[Score::WIN]),
            Err(UpdateError::DegenerateVariance)
        );
    }

    #[test]
    fn test_improvement_sign() {
        let wins = estimate(&GS, &ES, &[Score::WIN; 3]).unwrap();
        let losses = estimate(&GS, &ES, &[Score::LOSS; 3]).unwrap();
        assert!(wins.improvement() > 0.0);
        assert!(losses.improvement() < 0.0);
        assert_eq!(wins.variance, losses.variance);
    }
}
