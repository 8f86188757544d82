use crate::models::{Game, LeaderboardEntry, Participant, Pick, SlotId};
use crate::season::Season;
use crate::utils::odds::{OddsBook, OddsQuote};
use crate::utils::probability::{ProbabilityResult, ProbabilityTier};
use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Load any JSON snapshot file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;
    Ok(value)
}

/// Save any value as pretty-printed JSON
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize data")?;
    std::fs::write(path.as_ref(), json).context("Failed to write JSON file")?;
    Ok(())
}

/// Load a game feed snapshot
pub fn load_games(path: impl AsRef<Path>) -> Result<Vec<Game>> {
    load_json(path)
}

/// Load bookmaker quotes and turn them into a vig-free odds book
pub fn load_odds(season: &Season, path: impl AsRef<Path>) -> Result<OddsBook> {
    let quotes: Vec<OddsQuote> = load_json(path)?;
    Ok(OddsBook::from_quotes(season, &quotes))
}

/// Participant id derived from a display name: "Jen Smith" becomes "jen-smith"
pub fn participant_id(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Results are keyed by participant, so names and ids must not repeat
fn ensure_unique_participants(participants: &[Participant]) -> Result<()> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for participant in participants {
        if !names.insert(participant.name.as_str()) || !ids.insert(participant.id.as_str()) {
            bail!("duplicate participant {}", participant.name);
        }
    }
    Ok(())
}

/// Read a pick sheet: a `name` column plus one column per bracket slot.
/// Team cells may use any name the season knows.
pub fn read_participants_csv<R: Read>(season: &Season, reader: R) -> Result<Vec<Participant>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let mut name_column = None;
    let mut slot_columns = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if header.eq_ignore_ascii_case("name") {
            name_column = Some(index);
        } else {
            let slot: SlotId = header.parse()?;
            slot_columns.push((index, slot));
        }
    }
    let name_column = name_column.ok_or_else(|| anyhow!("pick sheet has no name column"))?;

    let mut participants = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read pick sheet row {}", row + 1))?;
        let name = record.get(name_column).unwrap_or_default();
        if name.is_empty() {
            bail!("pick sheet row {} has no name", row + 1);
        }
        let picks = slot_columns
            .iter()
            .map(|(index, slot)| {
                let team = record.get(*index).unwrap_or_default();
                Pick::new(*slot, season.normalize_team_name(team))
            })
            .collect();
        let participant = Participant::new(participant_id(name), name, picks)
            .with_context(|| format!("Invalid picks for {}", name))?;
        participants.push(participant);
    }
    ensure_unique_participants(&participants)?;
    Ok(participants)
}

/// Load participants from a CSV pick sheet or a JSON list, by file extension
pub fn load_participants(season: &Season, path: impl AsRef<Path>) -> Result<Vec<Participant>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        return read_participants_csv(season, file);
    }

    let participants: Vec<Participant> = load_json(path)?;
    let participants = participants
        .into_iter()
        .map(|p| {
            let picks = p
                .picks()
                .iter()
                .map(|pick| Pick::new(pick.slot, season.normalize_team_name(&pick.team)))
                .collect();
            Participant::new(p.id.clone(), p.name.clone(), picks)
                .with_context(|| format!("Invalid picks for {}", p.name))
        })
        .collect::<Result<Vec<_>>>()?;
    ensure_unique_participants(&participants)?;
    Ok(participants)
}

/// Save the standings to CSV
pub fn save_leaderboard_to_csv(entries: &[LeaderboardEntry], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Rank",
        "Name",
        "Total",
        "Wild Card",
        "Divisional",
        "Conference",
        "Super Bowl",
        "Correct Picks",
        "Possible Remaining",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.rank.to_string(),
            entry.participant.name.clone(),
            entry.score.total.to_string(),
            entry.score.wild_card.to_string(),
            entry.score.divisional.to_string(),
            entry.score.conference.to_string(),
            entry.score.super_bowl.to_string(),
            entry.correct_picks.to_string(),
            entry.possible_remaining.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Save win probabilities to CSV
pub fn save_probabilities_to_csv(result: &ProbabilityResult, filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Name",
        "Fifty-Fifty (%)",
        "Vegas (%)",
        "Tier",
        "Eliminated",
    ])?;

    for (name, probabilities) in &result.probabilities {
        writer.write_record([
            name.clone(),
            format!("{:.1}", probabilities.fifty_fifty * 100.0),
            format!("{:.1}", probabilities.vegas * 100.0),
            ProbabilityTier::from_probability(probabilities.vegas)
                .label()
                .to_string(),
            result.eliminated(name).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
