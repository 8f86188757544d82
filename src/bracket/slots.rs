use crate::models::{Conference, Game, ResultsMap, Round, SlotId, SlotMap};
use crate::season::Season;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Outcome of mapping a feed game onto a bracket slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum SlotResolution {
    Resolved(SlotId),
    Unresolvable(UnresolvedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedReason {
    /// A conference-round game arrived without a conference
    MissingConference,
    /// Neither team appears in the season's Wild Card pairing table
    UnknownWildCardPairing,
    /// More games in this round and conference than the bracket has slots
    ExtraGame,
    /// Another game already claimed the slot
    SlotTaken(SlotId),
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::MissingConference => f.write_str("game has no conference"),
            UnresolvedReason::UnknownWildCardPairing => {
                f.write_str("no Wild Card pairing matches either team")
            }
            UnresolvedReason::ExtraGame => f.write_str("more games than slots for this round"),
            UnresolvedReason::SlotTaken(slot) => write!(f, "slot {} already filled", slot),
        }
    }
}

/// Diagnostic for a feed game that could not be placed in the bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedGame {
    pub game_id: String,
    pub round: Round,
    pub conference: Option<Conference>,
    pub reason: UnresolvedReason,
}

/// Map one game onto its slot.
///
/// `position` is the zero-based order of the game among the feed's games of
/// the same round and conference. Wild Card games resolve by membership in the
/// season's pairing table; later rounds resolve by position.
pub fn resolve_slot(season: &Season, game: &Game, position: usize) -> SlotResolution {
    use SlotResolution::{Resolved, Unresolvable};

    if game.round == Round::SuperBowl {
        return match position {
            0 => Resolved(SlotId::SuperBowl),
            _ => Unresolvable(UnresolvedReason::ExtraGame),
        };
    }

    let Some(conference) = game.conference else {
        return Unresolvable(UnresolvedReason::MissingConference);
    };

    match game.round {
        Round::WildCard => {
            let teams: Vec<&str> = [game.home_abbreviation(), game.away_abbreviation()]
                .into_iter()
                .flatten()
                .collect();
            season
                .wild_card_slot_for(conference, &teams)
                .map(Resolved)
                .unwrap_or(Unresolvable(UnresolvedReason::UnknownWildCardPairing))
        }
        Round::Divisional => match SlotId::divisionals(conference).get(position) {
            Some(slot) => Resolved(*slot),
            None => Unresolvable(UnresolvedReason::ExtraGame),
        },
        Round::Conference => match position {
            0 => Resolved(SlotId::conference_final(conference)),
            _ => Unresolvable(UnresolvedReason::ExtraGame),
        },
        Round::SuperBowl => unreachable!("handled above"),
    }
}

/// The feed's games placed into bracket slots
#[derive(Debug, Clone)]
pub struct ResolvedBracket<'g> {
    /// The game occupying each slot, if the feed has one
    pub games: SlotMap<&'g Game>,
    /// Winners of slots whose game is final
    pub results: ResultsMap,
    pub unresolved: Vec<UnresolvedGame>,
}

/// Resolve every game in a feed snapshot.
///
/// Games are positioned within their round and conference by the feed's
/// `slot` ordinal, ties keeping feed order. The first game to claim a slot
/// keeps it; anything that cannot be placed is reported in `unresolved`.
pub fn resolve_bracket<'g>(season: &Season, games: &'g [Game]) -> ResolvedBracket<'g> {
    let mut order: Vec<&'g Game> = games.iter().collect();
    order.sort_by_key(|game| (game.round, game.slot));

    let mut positions: HashMap<(Round, Option<Conference>), usize> = HashMap::new();
    let mut bracket = ResolvedBracket {
        games: SlotMap::new(),
        results: ResultsMap::new(),
        unresolved: Vec::new(),
    };

    for game in order {
        let position = positions.entry((game.round, game.conference)).or_insert(0);
        let resolution = match resolve_slot(season, game, *position) {
            SlotResolution::Resolved(slot) if bracket.games.contains(slot) => {
                SlotResolution::Unresolvable(UnresolvedReason::SlotTaken(slot))
            }
            other => other,
        };
        *position += 1;

        match resolution {
            SlotResolution::Resolved(slot) => {
                bracket.games.insert(slot, game);
                if let Some(winner) = game.decided_winner() {
                    bracket.results.insert(slot, winner.to_string());
                }
            }
            SlotResolution::Unresolvable(reason) => {
                warn!(
                    game_id = %game.id,
                    round = ?game.round,
                    conference = ?game.conference,
                    %reason,
                    "dropping game that does not map to a bracket slot"
                );
                bracket.unresolved.push(UnresolvedGame {
                    game_id: game.id.clone(),
                    round: game.round,
                    conference: game.conference,
                    reason,
                });
            }
        }
    }

    bracket
}

/// Winners of every decided slot
pub fn decided_results(season: &Season, games: &[Game]) -> ResultsMap {
    resolve_bracket(season, games).results
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{GameStatus, Team};
    use crate::season::tests::season_2025;

    pub(crate) fn team(season: &Season, abbreviation: &str) -> Team {
        season.team(abbreviation).cloned().unwrap_or_else(|| Team {
            id: abbreviation.to_lowercase(),
            name: abbreviation.to_string(),
            abbreviation: abbreviation.to_string(),
            short_name: abbreviation.to_string(),
            conference: Conference::Afc,
            seed: 7,
            primary_color: String::new(),
            secondary_color: String::new(),
            logo: None,
        })
    }

    /// A feed game; `winner` marks it final
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn game(
        season: &Season,
        id: &str,
        round: Round,
        conference: Option<Conference>,
        slot: u8,
        home: &str,
        away: &str,
        winner: Option<&str>,
    ) -> Game {
        Game {
            id: id.to_string(),
            round,
            conference,
            slot,
            home_team: Some(team(season, home)),
            away_team: Some(team(season, away)),
            home_score: None,
            away_score: None,
            winner: winner.map(str::to_string),
            status: if winner.is_some() {
                GameStatus::Final
            } else {
                GameStatus::Scheduled
            },
            game_time: None,
            display_clock: None,
            period: None,
        }
    }

    pub(crate) fn wild_card(
        season: &Season,
        slot: u8,
        home: &str,
        away: &str,
        winner: Option<&str>,
    ) -> Game {
        let conference = season.team(home).map(|t| t.conference);
        let id = format!("wc-{}-{}", home, away);
        game(season, &id, Round::WildCard, conference, slot, home, away, winner)
    }

    #[test]
    fn test_wild_card_resolves_by_team_membership() {
        let season = season_2025();
        let g = wild_card(&season, 5, "HOU", "PIT", None);
        assert_eq!(resolve_slot(&season, &g, 3), SlotResolution::Resolved(SlotId::AfcWc1));

        let g = wild_card(&season, 1, "GB", "CHI", None);
        assert_eq!(resolve_slot(&season, &g, 0), SlotResolution::Resolved(SlotId::NfcWc3));
    }

    #[test]
    fn test_unknown_wild_card_pairing_is_unresolvable() {
        let season = season_2025();
        let g = game(&season, "x", Round::WildCard, Some(Conference::Afc), 1, "DEN", "KC", None);
        assert_eq!(
            resolve_slot(&season, &g, 0),
            SlotResolution::Unresolvable(UnresolvedReason::UnknownWildCardPairing)
        );
    }

    #[test]
    fn test_later_rounds_resolve_by_position() {
        let season = season_2025();
        let g = game(&season, "d", Round::Divisional, Some(Conference::Nfc), 3, "SEA", "CAR", None);
        assert_eq!(resolve_slot(&season, &g, 0), SlotResolution::Resolved(SlotId::NfcDiv1));
        assert_eq!(resolve_slot(&season, &g, 1), SlotResolution::Resolved(SlotId::NfcDiv2));
        assert_eq!(
            resolve_slot(&season, &g, 2),
            SlotResolution::Unresolvable(UnresolvedReason::ExtraGame)
        );

        let g = game(&season, "c", Round::Conference, Some(Conference::Afc), 1, "DEN", "HOU", None);
        assert_eq!(resolve_slot(&season, &g, 0), SlotResolution::Resolved(SlotId::AfcConf));

        let g = game(&season, "c", Round::Conference, None, 1, "DEN", "HOU", None);
        assert_eq!(
            resolve_slot(&season, &g, 0),
            SlotResolution::Unresolvable(UnresolvedReason::MissingConference)
        );

        let g = game(&season, "sb", Round::SuperBowl, None, 1, "DEN", "SEA", None);
        assert_eq!(resolve_slot(&season, &g, 0), SlotResolution::Resolved(SlotId::SuperBowl));
    }

    #[test]
    fn test_resolve_bracket_positions_per_conference() {
        let season = season_2025();
        let games = vec![
            game(&season, "n2", Round::Divisional, Some(Conference::Nfc), 4, "PHI", "GB", None),
            game(&season, "a1", Round::Divisional, Some(Conference::Afc), 1, "DEN", "JAX", Some("DEN")),
            game(&season, "n1", Round::Divisional, Some(Conference::Nfc), 3, "SEA", "CAR", None),
            game(&season, "a2", Round::Divisional, Some(Conference::Afc), 2, "HOU", "BUF", None),
        ];
        let bracket = resolve_bracket(&season, &games);

        assert_eq!(bracket.games.get(SlotId::AfcDiv1).map(|g| g.id.as_str()), Some("a1"));
        assert_eq!(bracket.games.get(SlotId::AfcDiv2).map(|g| g.id.as_str()), Some("a2"));
        assert_eq!(bracket.games.get(SlotId::NfcDiv1).map(|g| g.id.as_str()), Some("n1"));
        assert_eq!(bracket.games.get(SlotId::NfcDiv2).map(|g| g.id.as_str()), Some("n2"));
        assert_eq!(bracket.results.get(SlotId::AfcDiv1).map(String::as_str), Some("DEN"));
        assert_eq!(bracket.results.len(), 1);
        assert!(bracket.unresolved.is_empty());
    }

    #[test]
    fn test_unresolvable_games_are_reported_not_scored() {
        let season = season_2025();
        let games = vec![
            wild_card(&season, 1, "HOU", "PIT", Some("HOU")),
            game(&season, "dup", Round::WildCard, Some(Conference::Afc), 2, "PIT", "HOU", Some("PIT")),
            game(&season, "bad", Round::WildCard, Some(Conference::Afc), 3, "DEN", "KC", Some("KC")),
        ];
        let bracket = resolve_bracket(&season, &games);

        assert_eq!(bracket.results.get(SlotId::AfcWc1).map(String::as_str), Some("HOU"));
        assert_eq!(bracket.results.len(), 1);
        let reasons: Vec<_> = bracket.unresolved.iter().map(|u| (u.game_id.as_str(), u.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                ("dup", UnresolvedReason::SlotTaken(SlotId::AfcWc1)),
                ("bad", UnresolvedReason::UnknownWildCardPairing),
            ]
        );
    }

    #[test]
    fn test_results_only_include_final_games() {
        let season = season_2025();
        let mut live = wild_card(&season, 1, "BUF", "JAX", None);
        live.status = GameStatus::Live;
        live.winner = Some("BUF".to_string());
        let games = vec![live, wild_card(&season, 2, "LAC", "NE", Some("NE"))];

        let results = decided_results(&season, &games);
        assert!(!results.contains(SlotId::AfcWc2));
        assert_eq!(results.get(SlotId::AfcWc3).map(String::as_str), Some("NE"));
    }
}
