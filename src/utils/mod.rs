pub mod data;
pub mod odds;
pub mod probability;
pub mod scoring;

pub use odds::{GameOdds, OddsBook, OddsQuote, PriceFormat};
pub use probability::{enumerate_outcomes, ProbabilityResult, ProbabilityTier, WinProbabilities};
pub use scoring::{
    count_correct, eliminated_teams, elimination_round, leaderboard, pick_status,
    possible_remaining, score, PickStatus,
};
