use std::{
    error::Error as StdError,
    io,
    io::{BufWriter, Write as _},
    mem,
    sync::Arc,
};

use clap::Parser as _;
use glicko2_engine::{
    Rating, RatingDifference, RatingScalar, RatingSystem, Score, UpdateError, Volatility,
};
use glicko2_engine_research::{
    encounter::RawEncounter,
    player::{ByPlayerId, PlayerId, PlayerIds},
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
struct Opt {
    #[clap(long, default_value = "1500")]
    base_rating: f64,
    #[clap(long, default_value = "350")]
    base_deviation: f64,
    #[clap(long, default_value = "0.06")]
    base_volatility: f64,
    #[clap(long, default_value = "0.3")]
    tau: f64,
    #[clap(long, default_value = "100")]
    max_iterations: u32,
}

#[derive(Debug, Error)]
#[error("invalid option --{0}")]
struct InvalidOption(&'static str);

impl Opt {
    fn rating_system(&self) -> Result<RatingSystem, InvalidOption> {
        if !self.base_rating.is_finite() {
            return Err(InvalidOption("base-rating"));
        }
        if !(self.base_deviation >= 0.0) {
            return Err(InvalidOption("base-deviation"));
        }
        if !(self.base_volatility >= 0.0) {
            return Err(InvalidOption("base-volatility"));
        }
        if !(self.tau > 0.0) {
            return Err(InvalidOption("tau"));
        }
        if self.max_iterations < 1 {
            return Err(InvalidOption("max-iterations"));
        }

        Ok(RatingSystem::builder()
            .base_rating(RatingScalar(self.base_rating))
            .base_deviation(RatingDifference(self.base_deviation))
            .base_volatility(Volatility(self.base_volatility))
            .tau(self.tau)
            .max_iterations(self.max_iterations)
            .build())
    }
}

/// Games of a single round, from the perspective of each participant.
#[derive(Default)]
struct Round {
    number: u64,
    games: FxHashMap<PlayerId, Vec<(PlayerId, Score)>>,
}

impl Round {
    fn add(&mut self, white: PlayerId, black: PlayerId, white_score: Score) {
        self.games
            .entry(white)
            .or_default()
            .push((black, white_score));
        self.games
            .entry(black)
            .or_default()
            .push((white, white_score.opposite()));
    }
}

struct Leaderboard {
    system: Arc<RatingSystem>,
    ratings: ByPlayerId<Rating>,
    rounds: u64,
    errors: u64,
}

impl Leaderboard {
    fn new(system: RatingSystem) -> Leaderboard {
        Leaderboard {
            system: Arc::new(system),
            ratings: ByPlayerId::default(),
            rounds: 0,
            errors: 0,
        }
    }

    fn rating(&self, player: PlayerId) -> Rating {
        self.ratings
            .get(player)
            .cloned()
            .unwrap_or_else(|| Rating::initial(Arc::clone(&self.system)))
    }

    /// Rates every participant of the round against the ratings from before
    /// the round, then commits all new ratings at once.
    fn commit(&mut self, round: Round) {
        let number = round.number;
        let games: Vec<(PlayerId, Vec<(PlayerId, Score)>)> = round.games.into_iter().collect();

        let before = &*self;
        let updated: Vec<(PlayerId, Result<Rating, UpdateError>)> = games
            .par_iter()
            .map(|(player, games)| {
                let opponents: Vec<Rating> = games
                    .iter()
                    .map(|&(opponent, _)| before.rating(opponent))
                    .collect();
                let scores: Vec<Score> = games.iter().map(|&(_, score)| score).collect();
                (*player, before.rating(*player).updated(&opponents, &scores))
            })
            .collect();

        for (player, result) in updated {
            match result {
                Ok(rating) => self.ratings.set(player, rating),
                Err(err) => {
                    warn!(round = number, ?player, %err, "keeping previous rating");
                    self.errors += 1;
                }
            }
        }

        self.rounds += 1;
        debug!(round = number, players = games.len(), "committed round");
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opt = Opt::parse();
    let mut leaderboard = Leaderboard::new(opt.rating_system()?);

    let mut reader = csv::Reader::from_reader(io::stdin().lock());
    let mut players = PlayerIds::default();
    let mut round = Round::default();
    let mut encounters: u64 = 0;

    for encounter in reader.deserialize() {
        let encounter: RawEncounter = encounter?;

        if encounter.round != round.number && !round.games.is_empty() {
            leaderboard.commit(mem::take(&mut round));
        }
        round.number = encounter.round;

        let white_score = match encounter.result.white_score() {
            Some(score) => score,
            None => continue,
        };
        let white = players.get_or_insert(encounter.white);
        let black = players.get_or_insert(encounter.black);
        round.add(white, black, white_score);
        encounters += 1;
    }

    if !round.games.is_empty() {
        leaderboard.commit(round);
    }

    info!(
        encounters,
        rounds = leaderboard.rounds,
        players = players.len(),
        errors = leaderboard.errors,
        "replay finished"
    );

    let mut ranking: Vec<(PlayerId, &Rating)> = leaderboard.ratings.iter().collect();
    ranking.sort_by(|(_, a), (_, b)| b.rating.0.total_cmp(&a.rating.0));

    let mut stdout = BufWriter::new(io::stdout().lock());
    writeln!(stdout, "player,rating,deviation,volatility")?;
    for (player, rating) in ranking {
        let (r, rd, vola) = rating.values();
        writeln!(stdout, "{},{},{},{}", players.name(player), r, rd, vola)?;
    }
    writeln!(stdout, "# Rounds: {}", leaderboard.rounds)?;
    writeln!(stdout, "# Total errors: {}", leaderboard.errors)?;
    stdout.flush()?;

    Ok(())
}
