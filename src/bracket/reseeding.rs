use crate::models::{Conference, Game, Round, SlotId, SlotMap, Team};
use crate::season::{Season, UNSEEDED};
use serde::Serialize;

/// Divisional-round pairings for one conference.
///
/// Only `div1_home` (the bye team) is known before every Wild Card game in the
/// conference is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionalMatchups {
    pub div1_home: Option<Team>,
    pub div1_away: Option<Team>,
    pub div2_home: Option<Team>,
    pub div2_away: Option<Team>,
}

impl DivisionalMatchups {
    pub fn is_complete(&self) -> bool {
        self.div1_home.is_some()
            && self.div1_away.is_some()
            && self.div2_home.is_some()
            && self.div2_away.is_some()
    }
}

/// Three Wild Card winners ordered by original seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reseeded<'a> {
    pub best: &'a str,
    pub middle: &'a str,
    pub worst: &'a str,
}

/// Order Wild Card winners by seed, best (lowest number) first.
/// Teams missing from the season table sort as the weakest.
pub fn reseed<'a>(season: &Season, winners: [&'a str; 3]) -> Reseeded<'a> {
    let mut sorted = winners;
    sorted.sort_by_key(|team| season.seed_of(team).unwrap_or(UNSEEDED));
    let [best, middle, worst] = sorted;
    Reseeded {
        best,
        middle,
        worst,
    }
}

/// `[[div1_home, div1_away], [div2_home, div2_away]]` once all three Wild Card
/// winners are known: the bye team hosts the weakest survivor, and the better
/// of the other two hosts the remaining one.
pub fn divisional_pairings<'a>(
    season: &'a Season,
    conference: Conference,
    winners: [&'a str; 3],
) -> [[&'a str; 2]; 2] {
    let bye = season.bye_team(conference).abbreviation.as_str();
    let Reseeded {
        best,
        middle,
        worst,
    } = reseed(season, winners);
    [[bye, worst], [best, middle]]
}

/// The two contestants of a Divisional slot given the results decided so far,
/// or `None` while any of the conference's Wild Card slots is open.
pub fn divisional_contestants<'a>(
    season: &'a Season,
    slot: SlotId,
    results: &SlotMap<&'a str>,
) -> Option<[&'a str; 2]> {
    let conference = slot.conference()?;
    let [div1, div2] = SlotId::divisionals(conference);
    let [wc1, wc2, wc3] = SlotId::wild_cards(conference);
    let winners = [
        *results.get(wc1)?,
        *results.get(wc2)?,
        *results.get(wc3)?,
    ];
    let [first, second] = divisional_pairings(season, conference, winners);
    if slot == div1 {
        Some(first)
    } else if slot == div2 {
        Some(second)
    } else {
        None
    }
}

/// Every final Wild Card winner in a conference that the season knows about
pub fn wild_card_winners<'s>(
    season: &'s Season,
    games: &[Game],
    conference: Conference,
) -> Vec<&'s Team> {
    games
        .iter()
        .filter(|g| g.round == Round::WildCard && g.conference == Some(conference))
        .filter_map(|g| g.decided_winner())
        .filter_map(|winner| season.team(winner))
        .collect()
}

/// True when the conference has exactly three Wild Card games and all are final
pub fn wild_card_complete(games: &[Game], conference: Conference) -> bool {
    let wild_cards: Vec<&Game> = games
        .iter()
        .filter(|g| g.round == Round::WildCard && g.conference == Some(conference))
        .collect();
    wild_cards.len() == 3 && wild_cards.iter().all(|g| g.is_final())
}

/// Divisional matchups for a conference from the live game feed.
///
/// Falls back to the bye-team-only structure unless all three Wild Card games
/// are final with a known winner; no partial reseeding is attempted.
pub fn compute_divisional_matchups(
    season: &Season,
    games: &[Game],
    conference: Conference,
) -> DivisionalMatchups {
    let bye = season.bye_team(conference);
    let mut matchups = DivisionalMatchups {
        div1_home: Some(bye.clone()),
        div1_away: None,
        div2_home: None,
        div2_away: None,
    };

    if !wild_card_complete(games, conference) {
        return matchups;
    }
    let winners = wild_card_winners(season, games, conference);
    let [a, b, c] = winners.as_slice() else {
        return matchups;
    };

    let reseeded = reseed(
        season,
        [
            a.abbreviation.as_str(),
            b.abbreviation.as_str(),
            c.abbreviation.as_str(),
        ],
    );
    matchups.div1_away = season.team(reseeded.worst).cloned();
    matchups.div2_home = season.team(reseeded.best).cloned();
    matchups.div2_away = season.team(reseeded.middle).cloned();
    matchups
}

/// Who the bye team meets in the Divisional round, once known
pub fn bye_team_opponent(season: &Season, games: &[Game], conference: Conference) -> Option<Team> {
    compute_divisional_matchups(season, games, conference).div1_away
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::slots::tests::wild_card;
    use crate::models::GameStatus;
    use crate::season::tests::season_2025;

    fn abbreviation(team: &Option<Team>) -> Option<&str> {
        team.as_ref().map(|t| t.abbreviation.as_str())
    }

    #[test]
    fn test_reseed_orders_by_seed() {
        let season = season_2025();
        // seeds: JAX 7, HOU 2, PIT 5
        let r = reseed(&season, ["JAX", "HOU", "PIT"]);
        assert_eq!((r.best, r.middle, r.worst), ("HOU", "PIT", "JAX"));

        let r = reseed(&season, ["ZZZ", "NE", "BUF"]);
        assert_eq!(r.worst, "ZZZ");
    }

    #[test]
    fn test_afc_reseeding_from_games() {
        let season = season_2025();
        let games = vec![
            wild_card(&season, 1, "HOU", "PIT", Some("HOU")),
            wild_card(&season, 2, "BUF", "JAX", Some("JAX")),
            wild_card(&season, 3, "LAC", "NE", Some("LAC")),
        ];
        // winners: HOU(2), JAX(7), LAC(4)
        let m = compute_divisional_matchups(&season, &games, Conference::Afc);
        assert!(m.is_complete());
        assert_eq!(abbreviation(&m.div1_home), Some("DEN"));
        assert_eq!(abbreviation(&m.div1_away), Some("JAX"));
        assert_eq!(abbreviation(&m.div2_home), Some("HOU"));
        assert_eq!(abbreviation(&m.div2_away), Some("LAC"));
    }

    #[test]
    fn test_nfc_two_five_seven_reseeding() {
        let season = season_2025();
        // PHI(2), CHI(5), CAR(7) win
        let games = vec![
            wild_card(&season, 4, "LAR", "CAR", Some("CAR")),
            wild_card(&season, 5, "SF", "PHI", Some("PHI")),
            wild_card(&season, 6, "GB", "CHI", Some("CHI")),
        ];
        let m = compute_divisional_matchups(&season, &games, Conference::Nfc);
        assert_eq!(abbreviation(&m.div1_home), Some("SEA"));
        assert_eq!(abbreviation(&m.div1_away), Some("CAR"));
        assert_eq!(abbreviation(&m.div2_home), Some("PHI"));
        assert_eq!(abbreviation(&m.div2_away), Some("CHI"));
        assert_eq!(
            bye_team_opponent(&season, &games, Conference::Nfc).map(|t| t.abbreviation),
            Some("CAR".to_string())
        );
    }

    #[test]
    fn test_incomplete_wild_card_round_is_partial() {
        let season = season_2025();
        let mut games = vec![
            wild_card(&season, 1, "HOU", "PIT", Some("HOU")),
            wild_card(&season, 2, "BUF", "JAX", Some("BUF")),
            wild_card(&season, 3, "LAC", "NE", None),
        ];
        let m = compute_divisional_matchups(&season, &games, Conference::Afc);
        assert_eq!(abbreviation(&m.div1_home), Some("DEN"));
        assert!(m.div1_away.is_none() && m.div2_home.is_none() && m.div2_away.is_none());
        assert!(!wild_card_complete(&games, Conference::Afc));

        // final but without a declared winner: still no reseeding
        games[2].status = GameStatus::Final;
        assert!(wild_card_complete(&games, Conference::Afc));
        let m = compute_divisional_matchups(&season, &games, Conference::Afc);
        assert!(!m.is_complete());
        assert_eq!(wild_card_winners(&season, &games, Conference::Afc).len(), 2);
    }

    #[test]
    fn test_divisional_contestants_from_results() {
        let season = season_2025();
        let mut results: SlotMap<&str> = SlotMap::new();
        results.insert(SlotId::AfcWc1, "PIT");
        results.insert(SlotId::AfcWc2, "BUF");
        assert_eq!(divisional_contestants(&season, SlotId::AfcDiv1, &results), None);

        results.insert(SlotId::AfcWc3, "NE");
        // PIT 5, BUF 3, NE 6
        assert_eq!(
            divisional_contestants(&season, SlotId::AfcDiv1, &results),
            Some(["DEN", "NE"])
        );
        assert_eq!(
            divisional_contestants(&season, SlotId::AfcDiv2, &results),
            Some(["BUF", "PIT"])
        );
        assert_eq!(divisional_contestants(&season, SlotId::AfcConf, &results), None);
        assert_eq!(divisional_contestants(&season, SlotId::NfcDiv1, &results), None);
    }
}
