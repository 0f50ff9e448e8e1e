use std::str::FromStr;

use glicko2_engine::Score;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

/// One game as read from the input CSV.
#[serde_as]
#[derive(Deserialize, Debug)]
pub struct RawEncounter {
    pub round: u64,
    pub white: String,
    pub black: String,
    #[serde_as(as = "DisplayFromStr")]
    pub result: PgnResult,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PgnResult {
    Unknown,
    WhiteWins,
    BlackWins,
    Draw,
}

#[derive(Debug, Error)]
#[error("invalid game result")]
pub struct InvalidPgnResult;

impl FromStr for PgnResult {
    type Err = InvalidPgnResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "1-0" => PgnResult::WhiteWins,
            "0-1" => PgnResult::BlackWins,
            "1/2-1/2" => PgnResult::Draw,
            "*" => PgnResult::Unknown,
            _ => return Err(InvalidPgnResult),
        })
    }
}

impl PgnResult {
    pub fn white_score(self) -> Option<Score> {
        Some(match self {
            PgnResult::WhiteWins => Score::WIN,
            PgnResult::BlackWins => Score::LOSS,
            PgnResult::Draw => Score::DRAW,
            PgnResult::Unknown => return None,
        })
    }
}
