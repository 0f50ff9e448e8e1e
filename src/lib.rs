//! Glicko-2 rating updates.
//!
//! A [`Rating`] belongs to a shared, immutable [`RatingSystem`]. After a
//! rating period, [`Rating::updated`] computes the new rating from the
//! opponents met and the [`Score`]s achieved against them. The new volatility
//! is found with a bounded Illinois iteration, and failure to converge is
//! reported as an [`UpdateError`] rather than silently accepted.
//!
//! [`updated_roster`] rates a whole round-robin round against a frozen
//! snapshot of the pre-round ratings, so the result does not depend on the
//! order of the players.
//!
//! ```
//! use std::sync::Arc;
//!
//! use glicko2_engine::{Rating, RatingDifference, RatingScalar, RatingSystem, Score, Volatility};
//!
//! let system = Arc::new(RatingSystem::new());
//! let rating = |r, rd| {
//!     Rating::new(RatingScalar(r), RatingDifference(rd), Volatility(0.06), Arc::clone(&system))
//! };
//!
//! let player = rating(1500.0, 200.0);
//! let opponents = [rating(1400.0, 30.0), rating(1550.0, 100.0), rating(1700.0, 300.0)];
//! let scores = [Score::WIN, Score::LOSS, Score::LOSS];
//!
//! let updated = player.updated(&opponents, &scores)?;
//! assert!((updated.rating.0 - 1464.06).abs() < 0.01);
//! assert!((updated.deviation.0 - 151.52).abs() < 0.01);
//! # Ok::<_, glicko2_engine::UpdateError>(())
//! ```

mod batch;
mod error;
pub mod estimation;
pub mod expectation;
mod internal_rating;
mod rating;
mod rating_system;
mod score;
mod update;
pub mod volatility;

pub use batch::{update_roster, updated_roster};
pub use error::{BatchError, UpdateError};
pub use internal_rating::{InternalRating, InternalRatingDifference, INTERNAL_RATING_SCALE};
pub use rating::{Rating, RatingDifference, RatingScalar, Volatility};
pub use rating_system::{
    RatingSystem, RatingSystemBuilder, DEFAULT_CONVERGENCE_TOLERANCE, DEFAULT_DEVIATION,
    DEFAULT_MAX_ITERATIONS, DEFAULT_RATING, DEFAULT_TAU, DEFAULT_VOLATILITY,
};
pub use score::Score;
