//! Bracket topology: where feed games land, and who meets whom after reseeding.

pub mod expected;
pub mod reseeding;
pub mod slots;

pub use expected::expected_opponent;
pub use reseeding::{
    bye_team_opponent, compute_divisional_matchups, divisional_contestants, divisional_pairings,
    reseed, wild_card_complete, wild_card_winners, DivisionalMatchups, Reseeded,
};
pub use slots::{
    decided_results, resolve_bracket, resolve_slot, ResolvedBracket, SlotResolution,
    UnresolvedGame, UnresolvedReason,
};
