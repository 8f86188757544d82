use crate::bracket::reseeding::divisional_contestants;
use crate::bracket::slots::resolve_bracket;
use crate::models::{Game, Participant, Round, SlotId, SlotMap};
use crate::season::Season;
use crate::utils::odds::OddsBook;
use crate::utils::scoring::score;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A participant's chance of finishing first under both models
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbabilities {
    /// Every remaining game treated as a coin flip
    pub fifty_fifty: f64,
    /// Each scenario weighted by the odds-implied probability of its outcomes
    pub vegas: f64,
}

/// Enumerator output, keyed by participant name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityResult {
    pub probabilities: BTreeMap<String, WinProbabilities>,
    pub is_eliminated: BTreeMap<String, bool>,
}

impl ProbabilityResult {
    pub fn get(&self, name: &str) -> Option<WinProbabilities> {
        self.probabilities.get(name).copied()
    }

    pub fn eliminated(&self, name: &str) -> bool {
        self.is_eliminated.get(name).copied().unwrap_or(false)
    }
}

/// Coarse bucket for displaying a win probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityTier {
    High,
    Medium,
    Low,
    Eliminated,
}

impl ProbabilityTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability == 0.0 {
            ProbabilityTier::Eliminated
        } else if probability > 0.4 {
            ProbabilityTier::High
        } else if probability >= 0.15 {
            ProbabilityTier::Medium
        } else {
            ProbabilityTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbabilityTier::High => "high",
            ProbabilityTier::Medium => "medium",
            ProbabilityTier::Low => "low",
            ProbabilityTier::Eliminated => "out",
        }
    }
}

/// Win probabilities for every participant by brute force over all
/// completions of the bracket.
///
/// Each undecided slot is a binary choice between its two contestants, so
/// there are `2^n` scenarios for `n` open slots (8192 at most). Scenarios are
/// played out in canonical slot order so Divisional, Conference and Super Bowl
/// contestants can be read off the winners already chosen. The top scorer of
/// each scenario takes a win share, split evenly on ties.
pub fn enumerate_outcomes(
    season: &Season,
    games: &[Game],
    participants: &[Participant],
    odds: &OddsBook,
) -> ProbabilityResult {
    let bracket = resolve_bracket(season, games);
    let completed = bracket.results.as_strs();
    let remaining: Vec<SlotId> = completed.vacant().collect();

    if participants.is_empty() {
        return ProbabilityResult::default();
    }
    if remaining.is_empty() {
        return final_standings(participants, &completed);
    }

    let mut tallies = vec![WinProbabilities::default(); participants.len()];
    let mut totals = vec![0u32; participants.len()];
    let mut valid_scenarios = 0u32;
    let mut total_vegas_weight = 0.0;

    let scenario_count = 1u32 << remaining.len();
    for outcome in 0..scenario_count {
        let Some((scenario, vegas_weight)) =
            play_out(season, &bracket.games, &completed, &remaining, outcome, odds)
        else {
            continue;
        };
        valid_scenarios += 1;
        total_vegas_weight += vegas_weight;

        for (total, participant) in totals.iter_mut().zip(participants) {
            *total = score(participant, &scenario).total;
        }
        let top = totals.iter().copied().max().unwrap_or(0);
        let tied = totals.iter().filter(|t| **t == top).count();
        let win_share = 1.0 / tied as f64;

        for (tally, total) in tallies.iter_mut().zip(&totals) {
            if *total == top {
                tally.fifty_fifty += win_share;
                tally.vegas += vegas_weight * win_share;
            }
        }
    }

    debug!(
        remaining = remaining.len(),
        scenarios = scenario_count,
        valid_scenarios,
        total_vegas_weight,
        "enumerated bracket outcomes"
    );

    let mut result = ProbabilityResult::default();
    for (participant, tally) in participants.iter().zip(tallies) {
        let probabilities = normalize(tally, valid_scenarios, total_vegas_weight);
        result.is_eliminated.insert(
            participant.name.clone(),
            probabilities.fifty_fifty == 0.0 && probabilities.vegas == 0.0,
        );
        result
            .probabilities
            .insert(participant.name.clone(), probabilities);
    }
    result
}

/// Fill every open slot according to the bits of `outcome` (bit `j` decides
/// `remaining[j]`), returning the scenario and its joint odds weight.
/// `None` when a slot's contestants cannot be determined.
fn play_out<'a>(
    season: &'a Season,
    slot_games: &SlotMap<&'a Game>,
    completed: &SlotMap<&'a str>,
    remaining: &[SlotId],
    outcome: u32,
    odds: &OddsBook,
) -> Option<(SlotMap<&'a str>, f64)> {
    let mut scenario = completed.clone();
    let mut vegas_weight = 1.0;

    for (bit, slot) in remaining.iter().enumerate() {
        let pair = contestants(season, slot_games, &scenario, *slot)?;
        let winner = pair[((outcome >> bit) & 1) as usize];
        vegas_weight *= odds.win_probability(pair[0], pair[1], winner);
        scenario.insert(*slot, winner);
    }

    Some((scenario, vegas_weight))
}

/// The two teams that can win `slot`, given the winners chosen so far
fn contestants<'a>(
    season: &'a Season,
    slot_games: &SlotMap<&'a Game>,
    scenario: &SlotMap<&'a str>,
    slot: SlotId,
) -> Option<[&'a str; 2]> {
    match slot.round() {
        Round::WildCard => slot_games
            .get(slot)
            .copied()
            .and_then(Game::matchup)
            .or_else(|| season.wild_card_matchup(slot)),
        Round::Divisional => divisional_contestants(season, slot, scenario),
        Round::Conference => {
            let [div1, div2] = SlotId::divisionals(slot.conference()?);
            Some([*scenario.get(div1)?, *scenario.get(div2)?])
        }
        Round::SuperBowl => Some([
            *scenario.get(SlotId::AfcConf)?,
            *scenario.get(SlotId::NfcConf)?,
        ]),
    }
}

/// Nothing left to play: the top scorers split the pool
fn final_standings(participants: &[Participant], results: &SlotMap<&str>) -> ProbabilityResult {
    let totals: Vec<u32> = participants
        .iter()
        .map(|p| score(p, results).total)
        .collect();
    let top = totals.iter().copied().max().unwrap_or(0);
    let winners = totals.iter().filter(|t| **t == top).count();

    let mut result = ProbabilityResult::default();
    for (participant, total) in participants.iter().zip(totals) {
        let share = if total == top {
            1.0 / winners as f64
        } else {
            0.0
        };
        result.probabilities.insert(
            participant.name.clone(),
            WinProbabilities {
                fifty_fifty: share,
                vegas: share,
            },
        );
        result
            .is_eliminated
            .insert(participant.name.clone(), total != top);
    }
    result
}

fn normalize(tally: WinProbabilities, valid_scenarios: u32, total_vegas_weight: f64) -> WinProbabilities {
    WinProbabilities {
        fifty_fifty: if valid_scenarios > 0 {
            tally.fifty_fifty / valid_scenarios as f64
        } else {
            0.0
        },
        vegas: if total_vegas_weight > 0.0 {
            tally.vegas / total_vegas_weight
        } else {
            0.0
        },
    }
}
