mod slot;

pub use slot::{ResultsMap, SlotId, SlotMap, UnknownSlot, SLOT_COUNT};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conference {
    Afc,
    Nfc,
}

impl Conference {
    pub const BOTH: [Conference; 2] = [Conference::Afc, Conference::Nfc];

    pub fn label(&self) -> &'static str {
        match self {
            Conference::Afc => "AFC",
            Conference::Nfc => "NFC",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Playoff rounds, earliest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    WildCard,
    Divisional,
    Conference,
    SuperBowl,
}

impl Round {
    /// Points credited for a correct pick in this round
    pub fn points(&self) -> u32 {
        match self {
            Round::WildCard => 1,
            Round::Divisional => 2,
            Round::Conference => 3,
            Round::SuperBowl => 5,
        }
    }

    pub fn slot_count(&self) -> u32 {
        match self {
            Round::WildCard => 6,
            Round::Divisional => 4,
            Round::Conference => 2,
            Round::SuperBowl => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Round::WildCard => "Wild Card",
            Round::Divisional => "Divisional",
            Round::Conference => "Conference Championship",
            Round::SuperBowl => "Super Bowl",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    Final,
    Postponed,
}

/// A playoff team as listed in the season configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub short_name: String,
    pub conference: Conference,
    pub seed: u8,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// A real-world playoff game as delivered by the live-score feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub round: Round,
    pub conference: Option<Conference>, // None only for the Super Bowl
    pub slot: u8,                       // position within the round, as ordered by the feed
    #[serde(default)]
    pub home_team: Option<Team>,
    #[serde(default)]
    pub away_team: Option<Team>,
    #[serde(default)]
    pub home_score: Option<u16>,
    #[serde(default)]
    pub away_score: Option<u16>,
    #[serde(default)]
    pub winner: Option<String>, // team abbreviation
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub game_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_clock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u8>,
}

impl Game {
    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }

    pub fn home_abbreviation(&self) -> Option<&str> {
        self.home_team.as_ref().map(|t| t.abbreviation.as_str())
    }

    pub fn away_abbreviation(&self) -> Option<&str> {
        self.away_team.as_ref().map(|t| t.abbreviation.as_str())
    }

    /// Both participants once the feed has filled them in, `[home, away]`
    pub fn matchup(&self) -> Option<[&str; 2]> {
        Some([self.home_abbreviation()?, self.away_abbreviation()?])
    }

    /// The winner, only once the game is final
    pub fn decided_winner(&self) -> Option<&str> {
        if self.is_final() {
            self.winner.as_deref()
        } else {
            None
        }
    }

    /// Every listed team that did not win a final game
    pub fn losers(&self) -> impl Iterator<Item = &str> {
        let winner = self.decided_winner();
        [self.home_abbreviation(), self.away_abbreviation()]
            .into_iter()
            .flatten()
            .filter(move |team| winner.is_some_and(|w| w != *team))
    }
}

/// A participant's predicted winner for one bracket slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub slot: SlotId,
    pub team: String, // team abbreviation
}

impl Pick {
    pub fn new(slot: SlotId, team: impl Into<String>) -> Self {
        Self {
            slot,
            team: team.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PicksError {
    #[error("no pick for slot {0}")]
    MissingSlot(SlotId),
    #[error("more than one pick for slot {0}")]
    DuplicateSlot(SlotId),
    #[error("empty team for slot {0}")]
    EmptyTeam(SlotId),
}

/// A pool entrant with one pick for every bracket slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParticipantRecord")]
pub struct Participant {
    pub id: String,
    pub name: String,
    picks: Vec<Pick>,
}

#[derive(Deserialize)]
struct ParticipantRecord {
    id: String,
    name: String,
    picks: Vec<Pick>,
}

impl TryFrom<ParticipantRecord> for Participant {
    type Error = PicksError;

    fn try_from(record: ParticipantRecord) -> Result<Self, Self::Error> {
        Participant::new(record.id, record.name, record.picks)
    }
}

impl Participant {
    /// Builds a participant, requiring exactly one pick per slot.
    /// Picks are stored in canonical slot order.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        picks: Vec<Pick>,
    ) -> Result<Self, PicksError> {
        let mut by_slot: SlotMap<Pick> = SlotMap::new();
        for pick in picks {
            if pick.team.trim().is_empty() {
                return Err(PicksError::EmptyTeam(pick.slot));
            }
            let slot = pick.slot;
            if by_slot.insert(slot, pick).is_some() {
                return Err(PicksError::DuplicateSlot(slot));
            }
        }
        if let Some(missing) = by_slot.vacant().next() {
            return Err(PicksError::MissingSlot(missing));
        }

        Ok(Self {
            id: id.into(),
            name: name.into(),
            picks: by_slot.iter().map(|(_, pick)| pick.clone()).collect(),
        })
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn pick_for(&self, slot: SlotId) -> &str {
        &self.picks[slot.index()].team
    }
}

/// Points earned per round plus their sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub wild_card: u32,
    pub divisional: u32,
    pub conference: u32,
    pub super_bowl: u32,
    pub total: u32,
}

impl ScoreBreakdown {
    pub const MAX: ScoreBreakdown = ScoreBreakdown {
        wild_card: 6,
        divisional: 8,
        conference: 6,
        super_bowl: 5,
        total: 25,
    };

    /// Credits one correct pick in `round` to its bucket and the total
    pub fn credit(&mut self, round: Round) {
        let points = round.points();
        match round {
            Round::WildCard => self.wild_card += points,
            Round::Divisional => self.divisional += points,
            Round::Conference => self.conference += points,
            Round::SuperBowl => self.super_bowl += points,
        }
        self.total += points;
    }
}

/// A ranked row of the pool standings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub participant: Participant,
    pub score: ScoreBreakdown,
    pub rank: usize,
    pub correct_picks: usize,
    pub possible_remaining: u32,
}

impl LeaderboardEntry {
    /// Format the entry as a readable string
    pub fn format(&self) -> String {
        format!(
            "{:>2}. {:<12} {:>2} pts | WC {} | DIV {} | CONF {} | SB {} | {} correct | {} pts possible",
            self.rank,
            self.participant.name,
            self.score.total,
            self.score.wild_card,
            self.score.divisional,
            self.score.conference,
            self.score.super_bowl,
            self.correct_picks,
            self.possible_remaining
        )
    }
}
