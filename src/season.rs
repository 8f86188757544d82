use crate::models::{Conference, Round, SlotId, SlotMap, Team};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Seed used for a team the season table does not know; sorts as the weakest
pub const UNSEEDED: u8 = 99;

#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("failed to parse season config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("team {0} is listed more than once")]
    DuplicateTeam(String),
    #[error("team {team} has seed {seed}, expected 1-7")]
    InvalidSeed { team: String, seed: u8 },
    #[error("{conference} seed {seed} is assigned to more than one team")]
    DuplicateSeed { conference: Conference, seed: u8 },
    #[error("{0} has no #1 seed")]
    MissingByeTeam(Conference),
    #[error("no Wild Card matchup configured for {0}")]
    MissingWildCardMatchup(SlotId),
    #[error("{0} is not a Wild Card slot")]
    NotAWildCardSlot(SlotId),
    #[error("{slot} references unknown team {team}")]
    UnknownTeam { slot: SlotId, team: String },
    #[error("{slot} lists {team}, which does not play in that conference")]
    ConferenceMismatch { slot: SlotId, team: String },
    #[error("{0} appears in more than one Wild Card matchup")]
    TeamInMultipleMatchups(String),
    #[error("alias {alias} points at unknown team {team}")]
    UnknownAlias { alias: String, team: String },
}

/// On-disk layout of a season file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeasonConfig {
    season: u16,
    teams: Vec<Team>,
    wild_card_matchups: BTreeMap<SlotId, [String; 2]>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Per-season reference data: the playoff field, its seeds, the Wild Card
/// pairings, and the team-name aliases pick sheets and odds feeds use.
///
/// Built once at startup and passed into every engine call.
#[derive(Debug, Clone)]
pub struct Season {
    year: u16,
    teams: Vec<Team>,
    bye_teams: [usize; 2],
    wild_card_matchups: SlotMap<[String; 2]>,
    aliases: HashMap<String, String>,
}

impl Season {
    pub fn from_json_str(json: &str) -> Result<Self, SeasonError> {
        let config: SeasonConfig = serde_json::from_str(json)?;
        Self::try_from(config)
    }

    /// Load a season file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read season file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid season file {}", path.display()))
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, abbreviation: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.abbreviation == abbreviation)
    }

    pub fn seed_of(&self, abbreviation: &str) -> Option<u8> {
        self.team(abbreviation).map(|t| t.seed)
    }

    /// The conference's #1 seed, which skips the Wild Card round
    pub fn bye_team(&self, conference: Conference) -> &Team {
        let index = match conference {
            Conference::Afc => self.bye_teams[0],
            Conference::Nfc => self.bye_teams[1],
        };
        &self.teams[index]
    }

    /// Configured `[away, home]` pairing for a Wild Card slot
    pub fn wild_card_matchup(&self, slot: SlotId) -> Option<[&str; 2]> {
        self.wild_card_matchups
            .get(slot)
            .map(|[away, home]| [away.as_str(), home.as_str()])
    }

    /// The Wild Card slot whose configured pairing contains any of `teams`.
    /// Pairings are tested in slot order.
    pub fn wild_card_slot_for(&self, conference: Conference, teams: &[&str]) -> Option<SlotId> {
        SlotId::wild_cards(conference).into_iter().find(|slot| {
            self.wild_card_matchups
                .get(*slot)
                .is_some_and(|pair| pair.iter().any(|t| teams.contains(&t.as_str())))
        })
    }

    /// Map a free-form team name (alias, full name, short name or
    /// abbreviation) to its abbreviation. Unknown names come back uppercased.
    pub fn normalize_team_name(&self, name: &str) -> String {
        let key = name.trim().to_lowercase();
        if let Some(abbreviation) = self.aliases.get(&key) {
            return abbreviation.clone();
        }
        self.teams
            .iter()
            .find(|t| {
                t.name.to_lowercase() == key
                    || t.short_name.to_lowercase() == key
                    || t.abbreviation.to_lowercase() == key
            })
            .map(|t| t.abbreviation.clone())
            .unwrap_or_else(|| name.trim().to_uppercase())
    }
}

impl TryFrom<SeasonConfig> for Season {
    type Error = SeasonError;

    fn try_from(config: SeasonConfig) -> Result<Self, Self::Error> {
        let mut abbreviations = HashSet::new();
        let mut seeds = HashSet::new();
        for team in &config.teams {
            if !abbreviations.insert(team.abbreviation.as_str()) {
                return Err(SeasonError::DuplicateTeam(team.abbreviation.clone()));
            }
            if !(1..=7).contains(&team.seed) {
                return Err(SeasonError::InvalidSeed {
                    team: team.abbreviation.clone(),
                    seed: team.seed,
                });
            }
            if !seeds.insert((team.conference, team.seed)) {
                return Err(SeasonError::DuplicateSeed {
                    conference: team.conference,
                    seed: team.seed,
                });
            }
        }

        let bye_index = |conference: Conference| {
            config
                .teams
                .iter()
                .position(|t| t.conference == conference && t.seed == 1)
                .ok_or(SeasonError::MissingByeTeam(conference))
        };
        let bye_teams = [bye_index(Conference::Afc)?, bye_index(Conference::Nfc)?];

        let mut wild_card_matchups = SlotMap::new();
        let mut paired = HashSet::new();
        for (slot, pair) in config.wild_card_matchups {
            if slot.round() != Round::WildCard {
                return Err(SeasonError::NotAWildCardSlot(slot));
            }
            for abbreviation in &pair {
                let team = config
                    .teams
                    .iter()
                    .find(|t| &t.abbreviation == abbreviation)
                    .ok_or_else(|| SeasonError::UnknownTeam {
                        slot,
                        team: abbreviation.clone(),
                    })?;
                if Some(team.conference) != slot.conference() {
                    return Err(SeasonError::ConferenceMismatch {
                        slot,
                        team: abbreviation.clone(),
                    });
                }
                if !paired.insert(abbreviation.clone()) {
                    return Err(SeasonError::TeamInMultipleMatchups(abbreviation.clone()));
                }
            }
            wild_card_matchups.insert(slot, pair);
        }
        for conference in Conference::BOTH {
            if let Some(missing) = SlotId::wild_cards(conference)
                .into_iter()
                .find(|slot| !wild_card_matchups.contains(*slot))
            {
                return Err(SeasonError::MissingWildCardMatchup(missing));
            }
        }

        let mut aliases = HashMap::new();
        for (alias, abbreviation) in config.aliases {
            if !abbreviations.contains(abbreviation.as_str()) {
                return Err(SeasonError::UnknownAlias {
                    alias,
                    team: abbreviation,
                });
            }
            aliases.insert(alias.trim().to_lowercase(), abbreviation);
        }

        Ok(Self {
            year: config.season,
            teams: config.teams,
            bye_teams,
            wild_card_matchups,
            aliases,
        })
    }
}
