use crate::bracket::slots::resolve_bracket;
use crate::models::{
    Game, LeaderboardEntry, Participant, Pick, Round, ScoreBreakdown, SlotMap,
};
use crate::season::Season;
use serde::Serialize;
use std::collections::BTreeSet;

/// Where a single pick stands against the results so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStatus {
    Correct,
    Incorrect,
    Pending,
    /// Undecided, but the picked team has already lost
    Eliminated,
}

/// Points a participant has earned against the decided slots
pub fn score<S: AsRef<str>>(participant: &Participant, results: &SlotMap<S>) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();
    for pick in participant.picks() {
        if is_correct(pick, results) {
            breakdown.credit(pick.slot.round());
        }
    }
    breakdown
}

/// Number of picks matching decided results, regardless of point value
pub fn count_correct<S: AsRef<str>>(participant: &Participant, results: &SlotMap<S>) -> usize {
    participant
        .picks()
        .iter()
        .filter(|pick| is_correct(pick, results))
        .count()
}

fn is_correct<S: AsRef<str>>(pick: &Pick, results: &SlotMap<S>) -> bool {
    results
        .get(pick.slot)
        .is_some_and(|winner| winner.as_ref() == pick.team)
}

/// Every team that has lost a final game, in any round
pub fn eliminated_teams(games: &[Game]) -> BTreeSet<String> {
    games
        .iter()
        .flat_map(|game| game.losers())
        .map(str::to_string)
        .collect()
}

/// The round in which a team was knocked out, if it has been
pub fn elimination_round(team: &str, games: &[Game]) -> Option<Round> {
    games
        .iter()
        .find(|game| game.losers().any(|loser| loser == team))
        .map(|game| game.round)
}

/// A participant's ceiling: the points still available from picks whose game
/// is not final and whose team has not lost anywhere.
///
/// `slot_games` is the feed resolved into slots; a slot with no game yet counts
/// as undecided. This does not check that the picked team can still reach the
/// slot's matchup.
pub fn possible_remaining(
    participant: &Participant,
    slot_games: &SlotMap<&Game>,
    eliminated: &BTreeSet<String>,
) -> u32 {
    participant
        .picks()
        .iter()
        .filter(|pick| !slot_games.get(pick.slot).is_some_and(|game| game.is_final()))
        .filter(|pick| !eliminated.contains(&pick.team))
        .map(|pick| pick.slot.round().points())
        .sum()
}

pub fn pick_status<S: AsRef<str>>(
    pick: &Pick,
    results: &SlotMap<S>,
    eliminated: &BTreeSet<String>,
) -> PickStatus {
    match results.get(pick.slot) {
        Some(winner) if winner.as_ref() == pick.team => PickStatus::Correct,
        Some(_) => PickStatus::Incorrect,
        None if eliminated.contains(&pick.team) => PickStatus::Eliminated,
        None => PickStatus::Pending,
    }
}

/// Pool standings.
///
/// Sorted by total score, then by possible remaining points. Participants
/// with equal totals share a rank; the next distinct total takes its
/// position in the list (1, 1, 3).
pub fn leaderboard(
    season: &Season,
    participants: &[Participant],
    games: &[Game],
) -> Vec<LeaderboardEntry> {
    let bracket = resolve_bracket(season, games);
    let eliminated = eliminated_teams(games);

    let mut entries: Vec<LeaderboardEntry> = participants
        .iter()
        .map(|participant| LeaderboardEntry {
            participant: participant.clone(),
            score: score(participant, &bracket.results),
            rank: 0,
            correct_picks: count_correct(participant, &bracket.results),
            possible_remaining: possible_remaining(participant, &bracket.games, &eliminated),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .total
            .cmp(&a.score.total)
            .then(b.possible_remaining.cmp(&a.possible_remaining))
    });

    let mut rank = 1;
    for index in 0..entries.len() {
        if index > 0 && entries[index].score.total < entries[index - 1].score.total {
            rank = index + 1;
        }
        entries[index].rank = rank;
    }

    entries
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bracket::slots::tests::{game, wild_card};
    use crate::models::{Conference, GameStatus, ResultsMap, SlotId};
    use crate::season::tests::season_2025;

    /// A participant who picks `team` for every slot except the overrides
    pub(crate) fn entrant(name: &str, overrides: &[(SlotId, &str)], team: &str) -> Participant {
        let picks = SlotId::ALL
            .iter()
            .map(|slot| {
                let chosen = overrides
                    .iter()
                    .find(|(s, _)| s == slot)
                    .map(|(_, t)| *t)
                    .unwrap_or(team);
                Pick::new(*slot, chosen)
            })
            .collect();
        Participant::new(name.to_lowercase(), name, picks).unwrap()
    }

    fn results(pairs: &[(SlotId, &str)]) -> ResultsMap {
        pairs.iter().map(|(s, t)| (*s, t.to_string())).collect()
    }

    #[test]
    fn test_score_credits_round_points() {
        let p = entrant(
            "Jen",
            &[(SlotId::AfcWc1, "HOU"), (SlotId::AfcDiv1, "DEN"), (SlotId::SuperBowl, "DEN")],
            "XXX",
        );
        let r = results(&[
            (SlotId::AfcWc1, "HOU"),
            (SlotId::AfcDiv1, "DEN"),
            (SlotId::AfcConf, "DEN"),
            (SlotId::SuperBowl, "DEN"),
        ]);
        let s = score(&p, &r);
        assert_eq!(s.wild_card, 1);
        assert_eq!(s.divisional, 2);
        assert_eq!(s.conference, 0);
        assert_eq!(s.super_bowl, 5);
        assert_eq!(s.total, 8);
        assert_eq!(s.total, s.wild_card + s.divisional + s.conference + s.super_bowl);
        assert_eq!(count_correct(&p, &r), 3);
    }

    #[test]
    fn test_perfect_bracket_scores_max() {
        let picks: Vec<(SlotId, &str)> = SlotId::ALL.iter().map(|s| (*s, "SEA")).collect();
        let p = entrant("All", &picks, "SEA");
        let r = results(&picks);
        assert_eq!(score(&p, &r), ScoreBreakdown::MAX);
        assert_eq!(count_correct(&p, &r), 13);
    }

    #[test]
    fn test_losing_wild_card_pick() {
        let season = season_2025();
        let p = entrant("Jen", &[(SlotId::AfcWc1, "PIT")], "DEN");
        let games = vec![wild_card(&season, 1, "HOU", "PIT", Some("HOU"))];
        let bracket = resolve_bracket(&season, &games);

        assert_eq!(score(&p, &bracket.results).wild_card, 0);
        let eliminated = eliminated_teams(&games);
        assert!(eliminated.contains("PIT"));
        assert!(!eliminated.contains("HOU"));
        assert_eq!(elimination_round("PIT", &games), Some(Round::WildCard));
        assert_eq!(elimination_round("HOU", &games), None);
    }

    #[test]
    fn test_eliminated_ignores_unfinished_games() {
        let season = season_2025();
        let mut live = wild_card(&season, 1, "BUF", "JAX", None);
        live.status = GameStatus::Live;
        assert!(eliminated_teams(&[live]).is_empty());
    }

    #[test]
    fn test_possible_remaining() {
        let season = season_2025();
        let p = entrant(
            "Matt",
            &[
                (SlotId::AfcWc1, "PIT"),
                (SlotId::AfcWc2, "BUF"),
                (SlotId::AfcDiv1, "PIT"),
                (SlotId::AfcDiv2, "BUF"),
            ],
            "SEA",
        );
        let mut in_progress = wild_card(&season, 2, "BUF", "JAX", None);
        in_progress.status = GameStatus::Live;
        let games = vec![wild_card(&season, 1, "HOU", "PIT", Some("HOU")), in_progress];
        let bracket = resolve_bracket(&season, &games);
        let eliminated = eliminated_teams(&games);

        // afcWc1 is final; afcDiv1 rides on PIT who is out.
        // Everything else is open and SEA/BUF are alive:
        // 5 WC (1 each) + 3 DIV (2 each) + 2 CONF (3 each) + SB 5 = 22
        assert_eq!(possible_remaining(&p, &bracket.games, &eliminated), 22);
    }

    #[test]
    fn test_pick_status() {
        let eliminated: BTreeSet<String> = ["PIT".to_string()].into_iter().collect();
        let r = results(&[(SlotId::AfcWc1, "HOU")]);

        assert_eq!(pick_status(&Pick::new(SlotId::AfcWc1, "HOU"), &r, &eliminated), PickStatus::Correct);
        assert_eq!(pick_status(&Pick::new(SlotId::AfcWc1, "PIT"), &r, &eliminated), PickStatus::Incorrect);
        assert_eq!(pick_status(&Pick::new(SlotId::AfcDiv1, "PIT"), &r, &eliminated), PickStatus::Eliminated);
        assert_eq!(pick_status(&Pick::new(SlotId::AfcDiv1, "DEN"), &r, &eliminated), PickStatus::Pending);
    }

    #[test]
    fn test_leaderboard_ranks_ties_by_position() {
        let season = season_2025();
        let games = vec![
            wild_card(&season, 1, "HOU", "PIT", Some("HOU")),
            wild_card(&season, 2, "BUF", "JAX", Some("BUF")),
            game(&season, "afc-3", Round::WildCard, Some(Conference::Afc), 3, "LAC", "NE", None),
        ];
        let participants = vec![
            entrant("Low", &[(SlotId::AfcWc1, "PIT"), (SlotId::AfcWc2, "JAX")], "NE"),
            entrant("TieA", &[(SlotId::AfcWc1, "HOU"), (SlotId::AfcWc2, "JAX")], "PIT"),
            entrant("Top", &[(SlotId::AfcWc1, "HOU"), (SlotId::AfcWc2, "BUF")], "NE"),
            entrant("TieB", &[(SlotId::AfcWc1, "PIT"), (SlotId::AfcWc2, "BUF")], "NE"),
        ];

        let board = leaderboard(&season, &participants, &games);
        let rows: Vec<(&str, u32, usize)> = board
            .iter()
            .map(|e| (e.participant.name.as_str(), e.score.total, e.rank))
            .collect();

        // TieB keeps more possible points alive than TieA (NE vs the eliminated PIT)
        assert_eq!(
            rows,
            vec![("Top", 2, 1), ("TieB", 1, 2), ("TieA", 1, 2), ("Low", 0, 4)]
        );
        assert!(board[1].possible_remaining > board[2].possible_remaining);
        for pair in board.windows(2) {
            assert!(pair[0].score.total >= pair[1].score.total);
            assert!(pair[0].rank <= pair[1].rank);
        }
    }
}
