use super::{Conference, Round};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fixed bracket positions in the playoff pool
pub const SLOT_COUNT: usize = 13;

/// One of the 13 fixed logical bracket positions picks are keyed on.
///
/// Variants are declared in canonical bracket order, which is also the order
/// the outcome enumerator walks them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotId {
    AfcWc1,
    AfcWc2,
    AfcWc3,
    NfcWc1,
    NfcWc2,
    NfcWc3,
    AfcDiv1,
    AfcDiv2,
    NfcDiv1,
    NfcDiv2,
    AfcConf,
    NfcConf,
    SuperBowl,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bracket slot: {0}")]
pub struct UnknownSlot(pub String);

impl SlotId {
    pub const ALL: [SlotId; SLOT_COUNT] = [
        SlotId::AfcWc1,
        SlotId::AfcWc2,
        SlotId::AfcWc3,
        SlotId::NfcWc1,
        SlotId::NfcWc2,
        SlotId::NfcWc3,
        SlotId::AfcDiv1,
        SlotId::AfcDiv2,
        SlotId::NfcDiv1,
        SlotId::NfcDiv2,
        SlotId::AfcConf,
        SlotId::NfcConf,
        SlotId::SuperBowl,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn round(self) -> Round {
        match self {
            SlotId::AfcWc1
            | SlotId::AfcWc2
            | SlotId::AfcWc3
            | SlotId::NfcWc1
            | SlotId::NfcWc2
            | SlotId::NfcWc3 => Round::WildCard,
            SlotId::AfcDiv1 | SlotId::AfcDiv2 | SlotId::NfcDiv1 | SlotId::NfcDiv2 => {
                Round::Divisional
            }
            SlotId::AfcConf | SlotId::NfcConf => Round::Conference,
            SlotId::SuperBowl => Round::SuperBowl,
        }
    }

    /// The conference a slot belongs to; `None` for the Super Bowl
    pub fn conference(self) -> Option<Conference> {
        match self {
            SlotId::AfcWc1
            | SlotId::AfcWc2
            | SlotId::AfcWc3
            | SlotId::AfcDiv1
            | SlotId::AfcDiv2
            | SlotId::AfcConf => Some(Conference::Afc),
            SlotId::NfcWc1
            | SlotId::NfcWc2
            | SlotId::NfcWc3
            | SlotId::NfcDiv1
            | SlotId::NfcDiv2
            | SlotId::NfcConf => Some(Conference::Nfc),
            SlotId::SuperBowl => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotId::AfcWc1 => "afcWc1",
            SlotId::AfcWc2 => "afcWc2",
            SlotId::AfcWc3 => "afcWc3",
            SlotId::NfcWc1 => "nfcWc1",
            SlotId::NfcWc2 => "nfcWc2",
            SlotId::NfcWc3 => "nfcWc3",
            SlotId::AfcDiv1 => "afcDiv1",
            SlotId::AfcDiv2 => "afcDiv2",
            SlotId::NfcDiv1 => "nfcDiv1",
            SlotId::NfcDiv2 => "nfcDiv2",
            SlotId::AfcConf => "afcConf",
            SlotId::NfcConf => "nfcConf",
            SlotId::SuperBowl => "superBowl",
        }
    }

    /// The three Wild Card slots of a conference, in table order
    pub fn wild_cards(conference: Conference) -> [SlotId; 3] {
        match conference {
            Conference::Afc => [SlotId::AfcWc1, SlotId::AfcWc2, SlotId::AfcWc3],
            Conference::Nfc => [SlotId::NfcWc1, SlotId::NfcWc2, SlotId::NfcWc3],
        }
    }

    /// `[div1, div2]` for a conference
    pub fn divisionals(conference: Conference) -> [SlotId; 2] {
        match conference {
            Conference::Afc => [SlotId::AfcDiv1, SlotId::AfcDiv2],
            Conference::Nfc => [SlotId::NfcDiv1, SlotId::NfcDiv2],
        }
    }

    pub fn conference_final(conference: Conference) -> SlotId {
        match conference {
            Conference::Afc => SlotId::AfcConf,
            Conference::Nfc => SlotId::NfcConf,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SlotId {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotId::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

/// Fixed-size map from every bracket slot to an optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMap<T> {
    entries: [Option<T>; SLOT_COUNT],
}

/// Decided slots mapped to the winning team abbreviation
pub type ResultsMap = SlotMap<String>;

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
        }
    }
}

impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SlotId) -> Option<&T> {
        self.entries[slot.index()].as_ref()
    }

    /// Stores a value, returning whatever the slot held before
    pub fn insert(&mut self, slot: SlotId, value: T) -> Option<T> {
        self.entries[slot.index()].replace(value)
    }

    pub fn contains(&self, slot: SlotId) -> bool {
        self.entries[slot.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Occupied slots in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        SlotId::ALL
            .into_iter()
            .zip(self.entries.iter())
            .filter_map(|(slot, entry)| entry.as_ref().map(|value| (slot, value)))
    }

    /// Slots with no value, in canonical order
    pub fn vacant(&self) -> impl Iterator<Item = SlotId> + '_ {
        SlotId::ALL
            .into_iter()
            .filter(move |slot| !self.contains(*slot))
    }
}

impl<T: AsRef<str>> SlotMap<T> {
    /// Borrowed view of a string-valued map
    pub fn as_strs(&self) -> SlotMap<&str> {
        SlotMap {
            entries: std::array::from_fn(|i| self.entries[i].as_ref().map(T::as_ref)),
        }
    }
}

impl<T> FromIterator<(SlotId, T)> for SlotMap<T> {
    fn from_iter<I: IntoIterator<Item = (SlotId, T)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (slot, value) in iter {
            map.insert(slot, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for SlotMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
