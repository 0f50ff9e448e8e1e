/// A game result or expectation value in the range `0.0..=1.0`, from the
/// perspective of the rated player.
///
/// The associated constants are the usual outcomes. Any value in between is
/// accepted as a partial score.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl From<Score> for f64 {
    #[inline]
    fn from(Score(score): Score) -> f64 {
        score
    }
}

impl From<f64> for Score {
    #[inline]
    fn from(score: f64) -> Score {
        Score(score)
    }
}

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    /// The same game seen from the opponent's side.
    #[must_use]
    #[inline]
    pub fn opposite(self) -> Score {
        Score(1.0 - self.0)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes() {
        assert_eq!(Score::WIN.value(), 1.0);
        assert_eq!(Score::LOSS.value(), 0.0);
        assert_eq!(Score::DRAW.value(), 0.5);
        assert_eq!(Score::WIN.opposite(), Score::LOSS);
        assert_eq!(Score::DRAW.opposite(), Score::DRAW);
    }
}
