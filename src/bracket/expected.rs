use crate::bracket::reseeding::reseed;
use crate::models::{Conference, Participant, SlotId};
use crate::season::Season;

/// The opponent a participant's own earlier picks imply for one of their
/// later-round picks.
///
/// Wild Card slots have real scheduled opponents and return `None`. For the
/// Divisional round the participant's Wild Card picks are reseeded the same
/// way actual results are; an upset pick over the bye team is shown facing
/// the bye team.
pub fn expected_opponent<'a>(
    season: &'a Season,
    participant: &'a Participant,
    slot: SlotId,
) -> Option<&'a str> {
    let other = |pick: &'a str, first: &'a str, second: &'a str| {
        if pick == first {
            second
        } else {
            first
        }
    };

    match slot {
        SlotId::AfcDiv1 | SlotId::NfcDiv1 | SlotId::AfcDiv2 | SlotId::NfcDiv2 => {
            let conference = slot.conference()?;
            divisional_opponent(season, participant, conference, slot)
        }
        SlotId::AfcConf | SlotId::NfcConf => {
            let conference = slot.conference()?;
            let [div1, div2] = SlotId::divisionals(conference);
            Some(other(
                participant.pick_for(slot),
                participant.pick_for(div1),
                participant.pick_for(div2),
            ))
        }
        SlotId::SuperBowl => Some(other(
            participant.pick_for(slot),
            participant.pick_for(SlotId::AfcConf),
            participant.pick_for(SlotId::NfcConf),
        )),
        _ => None,
    }
}

fn divisional_opponent<'a>(
    season: &'a Season,
    participant: &'a Participant,
    conference: Conference,
    slot: SlotId,
) -> Option<&'a str> {
    let bye = season.bye_team(conference).abbreviation.as_str();
    let [div1, div2] = SlotId::divisionals(conference);
    let [wc1, wc2, wc3] = SlotId::wild_cards(conference);
    let div1_pick = participant.pick_for(div1);
    let div2_pick = participant.pick_for(div2);

    let survivors = reseed(
        season,
        [
            participant.pick_for(wc1),
            participant.pick_for(wc2),
            participant.pick_for(wc3),
        ],
    );
    // weakest first: the order the bye team would draw them in
    let weakest_first = [survivors.worst, survivors.middle, survivors.best];

    if slot == div1 {
        if div1_pick != bye {
            return Some(bye);
        }
        // skip a survivor the participant already has winning the other game
        return weakest_first
            .iter()
            .take(2)
            .find(|team| **team != div2_pick)
            .or(weakest_first.last())
            .copied();
    }

    let in_div1 = |team: &str| {
        team == bye || team == div1_pick || (div1_pick == bye && team == survivors.worst)
    };
    let candidates: Vec<&'a str> = [survivors.best, survivors.middle, survivors.worst]
        .into_iter()
        .filter(|team| !in_div1(*team))
        .collect();
    candidates
        .iter()
        .find(|team| **team != div2_pick)
        .or(candidates.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pick;
    use crate::season::tests::season_2025;

    fn participant(picks: &[(SlotId, &str)]) -> Participant {
        Participant::new(
            "p",
            "P",
            picks.iter().map(|(slot, team)| Pick::new(*slot, *team)).collect(),
        )
        .unwrap()
    }

    fn chalk_afc(div1: &str, div2: &str, conf: &str, sb: &str) -> Participant {
        participant(&[
            (SlotId::AfcWc1, "HOU"),
            (SlotId::AfcWc2, "BUF"),
            (SlotId::AfcWc3, "NE"),
            (SlotId::AfcDiv1, div1),
            (SlotId::AfcDiv2, div2),
            (SlotId::AfcConf, conf),
            (SlotId::NfcWc1, "LAR"),
            (SlotId::NfcWc2, "PHI"),
            (SlotId::NfcWc3, "CHI"),
            (SlotId::NfcDiv1, "SEA"),
            (SlotId::NfcDiv2, "PHI"),
            (SlotId::NfcConf, "SEA"),
            (SlotId::SuperBowl, sb),
        ])
    }

    #[test]
    fn test_wild_card_has_no_expected_opponent() {
        let season = season_2025();
        let p = chalk_afc("DEN", "HOU", "DEN", "DEN");
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcWc1), None);
    }

    #[test]
    fn test_bye_team_faces_weakest_picked_survivor() {
        let season = season_2025();
        // picked survivors: HOU 2, BUF 3, NE 6
        let p = chalk_afc("DEN", "HOU", "DEN", "DEN");
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcDiv1), Some("NE"));
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcDiv2), Some("BUF"));
    }

    #[test]
    fn test_upset_over_bye_team_faces_bye_team() {
        let season = season_2025();
        let p = chalk_afc("NE", "HOU", "HOU", "HOU");
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcDiv1), Some("DEN"));
        // NE is in the Div1 game, so Div2 is HOU against BUF
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcDiv2), Some("BUF"));
    }

    #[test]
    fn test_bye_opponent_skips_div2_pick() {
        let season = season_2025();
        let p = chalk_afc("DEN", "NE", "DEN", "DEN");
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcDiv1), Some("BUF"));
    }

    #[test]
    fn test_conference_and_super_bowl_opponents() {
        let season = season_2025();
        let p = chalk_afc("DEN", "HOU", "HOU", "SEA");
        assert_eq!(expected_opponent(&season, &p, SlotId::AfcConf), Some("DEN"));
        assert_eq!(expected_opponent(&season, &p, SlotId::SuperBowl), Some("HOU"));
        assert_eq!(expected_opponent(&season, &p, SlotId::NfcConf), Some("PHI"));
    }
}
