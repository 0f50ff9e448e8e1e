//! Round-robin updates of an entire roster.
//!
//! Every player is rated against the ratings all other players had *before*
//! the round. The roster is converted to the internal scale once, and that
//! frozen snapshot is the only input of every per-player update. New ratings
//! are committed only after all of them have been computed.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::{internal_rating::InternalRating, BatchError, Rating, Score};

/// All elements of `items` except the one at `index`, in order.
fn except<T: Clone>(index: usize, items: &[T]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

fn update_player(
    index: usize,
    players: &[Rating],
    snapshot: &[InternalRating],
    row: &[Score],
) -> Result<Rating, BatchError> {
    let player = &players[index];
    let opponents = except(index, snapshot);
    let scores = except(index, row);

    snapshot[index]
        .updated(&opponents, &scores, player.system())
        .map(|updated| Rating::from_updated(player.system(), updated))
        .map_err(|source| BatchError::Player { index, source })
}

/// New ratings of all `players` after a round in which everyone met everyone
/// else.
///
/// `results` is a square matrix: `results[i][j]` is the score of player `i`
/// against player `j`. The diagonal is ignored. Scores are not required to be
/// consistent between `results[i][j]` and `results[j][i]`.
///
/// Fails without side effects if the matrix shape does not match the roster
/// or any single update fails. A roster of one player fails, since that
/// player has no opponents.
pub fn updated_roster<R>(players: &[Rating], results: &[R]) -> Result<Vec<Rating>, BatchError>
where
    R: AsRef<[Score]> + Sync,
{
    let n = players.len();
    if results.len() != n {
        return Err(BatchError::Rows {
            expected: n,
            found: results.len(),
        });
    }
    for (row, scores) in results.iter().enumerate() {
        let found = scores.as_ref().len();
        if found != n {
            return Err(BatchError::Shape {
                row,
                expected: n,
                found,
            });
        }
    }

    let snapshot: Vec<InternalRating> = players.iter().map(Rating::to_internal).collect();

    #[cfg(not(feature = "rayon"))]
    let updated = (0..n)
        .map(|index| update_player(index, players, &snapshot, results[index].as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "rayon")]
    let updated = (0..n)
        .into_par_iter()
        .map(|index| update_player(index, players, &snapshot, results[index].as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(players = n, "updated roster");
    Ok(updated)
}

/// Like [`updated_roster`], but replaces the ratings in `players`. On error,
/// no rating is changed.
pub fn update_roster<R>(players: &mut [Rating], results: &[R]) -> Result<(), BatchError>
where
    R: AsRef<[Score]> + Sync,
{
    let updated = updated_roster(players, results)?;
    for (player, rating) in players.iter_mut().zip(updated) {
        *player = rating;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{RatingDifference, RatingScalar, RatingSystem, UpdateError, Volatility};

    fn roster() -> Vec<Rating> {
        let system = Arc::new(RatingSystem::new());
        [(1500.0, 200.0), (1400.0, 30.0), (1550.0, 100.0), (1700.0, 300.0)]
            .into_iter()
            .map(|(rating, deviation)| {
                Rating::new(
                    RatingScalar(rating),
                    RatingDifference(deviation),
                    Volatility(0.06),
                    Arc::clone(&system),
                )
            })
            .collect()
    }

    fn results() -> Vec<Vec<Score>> {
        use Score as S;
        vec![
            vec![S::DRAW, S::WIN, S::LOSS, S::LOSS],
            vec![S::LOSS, S::DRAW, S::DRAW, S::LOSS],
            vec![S::WIN, S::DRAW, S::DRAW, S::DRAW],
            vec![S::WIN, S::WIN, S::DRAW, S::DRAW],
        ]
    }

    #[test]
    fn test_except() {
        assert_eq!(except(0, &[1, 2, 3]), vec![2, 3]);
        assert_eq!(except(1, &[1, 2, 3]), vec![1, 3]);
        assert_eq!(except(2, &[1, 2, 3]), vec![1, 2]);
        assert!(except(0, &[1]).is_empty());
    }

    #[test]
    fn test_matches_individual_updates() {
        let players = roster();
        let results = results();
        let updated = updated_roster(&players, &results).unwrap();

        for (i, player) in players.iter().enumerate() {
            let expected = player
                .updated(&except(i, &players), &except(i, &results[i]))
                .unwrap();
            assert_eq!(updated[i], expected);
        }
    }

    #[test]
    fn test_first_player_is_reference_scenario() {
        let mut players = roster();
        update_roster(&mut players, &results()).unwrap();
        approx::assert_abs_diff_eq!(players[0].rating.0, 1464.06, epsilon = 0.01);
        approx::assert_abs_diff_eq!(players[0].deviation.0, 151.52, epsilon = 0.01);
    }

    #[test]
    fn test_exact_volatility_root() {
        use Score as S;
        let system = Arc::new(RatingSystem::builder().tau(1.2).build());
        let mut players: Vec<Rating> = [
            (3000.0, 150.0, 0.5),
            (400.0, 50.0, 0.06),
            (500.0, 50.0, 0.06),
        ]
        .into_iter()
        .map(|(rating, deviation, volatility)| {
            Rating::new(
                RatingScalar(rating),
                RatingDifference(deviation),
                Volatility(volatility),
                Arc::clone(&system),
            )
        })
        .collect();
        let results = [
            [S::DRAW, S::WIN, S::LOSS],
            [S::LOSS, S::DRAW, S::DRAW],
            [S::WIN, S::DRAW, S::DRAW],
        ];

        update_roster(&mut players, &results).unwrap();
        approx::assert_abs_diff_eq!(players[0].rating.0, 2818.716, epsilon = 0.01);
        approx::assert_abs_diff_eq!(players[1].rating.0, 402.014, epsilon = 0.01);
        approx::assert_abs_diff_eq!(players[2].rating.0, 511.286, epsilon = 0.01);
    }

    #[test]
    fn test_empty_roster() {
        let results: Vec<Vec<Score>> = Vec::new();
        assert_eq!(updated_roster(&[], &results), Ok(Vec::new()));
    }

    #[test]
    fn test_single_player() {
        let mut players = vec![Rating::default()];
        let before = players.clone();
        assert_eq!(
            update_roster(&mut players, &[[Score::DRAW]]),
            Err(BatchError::Player {
                index: 0,
                source: UpdateError::NoOpponents
            })
        );
        assert_eq!(players, before);
    }

    #[test]
    fn test_shape() {
        let mut players = roster();
        let before = players.clone();

        let mut results = results();
        results[2].pop();
        assert_eq!(
            update_roster(&mut players, &results),
            Err(BatchError::Shape {
                row: 2,
                expected: 4,
                found: 3
            })
        );

        results.pop();
        assert_eq!(
            update_roster(&mut players, &results),
            Err(BatchError::Rows {
                expected: 4,
                found: 3
            })
        );

        assert_eq!(players, before);
    }
}
