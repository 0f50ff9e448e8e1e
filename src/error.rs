use thiserror::Error;

/// Failure to update a single rating. The rating is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateError {
    #[error("number of opponents must match number of scores ({opponents} != {scores})")]
    LengthMismatch { opponents: usize, scores: usize },
    #[error("number of g values must match number of expected scores ({weights} != {expectations})")]
    ExpectationMismatch { weights: usize, expectations: usize },
    #[error("cannot update rating without opponents")]
    NoOpponents,
    #[error("game outcomes carry no information about the rating (estimated variance is not finite)")]
    DegenerateVariance,
    #[error("no bracket for the new volatility found within {steps} steps")]
    BracketNotFound { steps: u32 },
    #[error("new volatility did not converge within {iterations} iterations (bracket width {width})")]
    VolatilityNotConverged { iterations: u32, width: f64 },
    #[error("updated rating is not finite")]
    NonFinite,
}

/// Failure to update a roster. No rating of the roster is changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error("expected {expected} rows of results, got {found}")]
    Rows { expected: usize, found: usize },
    #[error("expected {expected} results in row {row}, got {found}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("failed to update player {index}")]
    Player {
        index: usize,
        #[source]
        source: UpdateError,
    },
}
