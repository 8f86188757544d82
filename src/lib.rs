pub mod bracket;
pub mod models;
pub mod season;
pub mod utils;

pub use bracket::*;
pub use models::*;
pub use season::{Season, SeasonError};
pub use utils::*;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use utils::data::{load_games, load_odds, load_participants};

/// Everything the pool shows for one snapshot of results and odds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolReport {
    pub season: u16,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub eliminated_teams: Vec<String>,
    pub divisional: BTreeMap<Conference, DivisionalMatchups>,
    pub probabilities: ProbabilityResult,
    pub unresolved: Vec<UnresolvedGame>,
}

/// Run the whole pipeline over one snapshot.
///
/// Pure and repeatable: the same inputs always produce the same report.
pub fn build_pool_report(
    season: &Season,
    games: &[Game],
    participants: &[Participant],
    odds: &OddsBook,
) -> PoolReport {
    let bracket = resolve_bracket(season, games);

    PoolReport {
        season: season.year(),
        leaderboard: leaderboard(season, participants, games),
        eliminated_teams: eliminated_teams(games).into_iter().collect(),
        divisional: Conference::BOTH
            .into_iter()
            .map(|conference| {
                (
                    conference,
                    compute_divisional_matchups(season, games, conference),
                )
            })
            .collect(),
        probabilities: enumerate_outcomes(season, games, participants, odds),
        unresolved: bracket.unresolved,
    }
}

/// Where the pool's input files live
#[derive(Debug, Clone)]
pub struct PoolInputs {
    pub season: PathBuf,
    pub participants: PathBuf,
    pub games: PathBuf,
    pub odds: Option<PathBuf>,
}

/// One loaded snapshot of the pool: configuration, picks, results and odds
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub season: Season,
    pub participants: Vec<Participant>,
    pub games: Vec<Game>,
    pub odds: OddsBook,
}

impl PoolSnapshot {
    /// Load every input file
    pub fn load(inputs: &PoolInputs) -> Result<Self> {
        let season = Season::load(&inputs.season)?;
        let participants = load_participants(&season, &inputs.participants)?;
        let games = load_games(&inputs.games)?;
        let odds = match &inputs.odds {
            Some(path) => load_odds(&season, path)?,
            None => OddsBook::new(),
        };

        info!(
            season = season.year(),
            participants = participants.len(),
            games = games.len(),
            odds = odds.len(),
            "loaded pool snapshot"
        );

        Ok(Self {
            season,
            participants,
            games,
            odds,
        })
    }

    pub fn report(&self) -> PoolReport {
        build_pool_report(&self.season, &self.games, &self.participants, &self.odds)
    }
}

/// Build the report on tokio's blocking thread pool
pub async fn report_in_background(snapshot: Arc<PoolSnapshot>) -> Result<PoolReport> {
    tokio::task::spawn_blocking(move || snapshot.report())
        .await
        .context("Pool report worker failed")
}
