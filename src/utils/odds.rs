use crate::season::Season;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Probability used for either side of a matchup with no odds
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn american_odds_to_probability(odds: i32) -> f64 {
    if odds > 0 {
        // For positive odds: 100 / (odds + 100)
        100.0 / (odds as f64 + 100.0)
    } else {
        // For negative odds: |odds| / (|odds| + 100)
        let abs_odds = odds.abs() as f64;
        abs_odds / (abs_odds + 100.0)
    }
}

/// Convert decimal odds (2.50 pays 2.50 per 1 staked) to implied probability
pub fn decimal_odds_to_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// Remove the bookmaker's margin by scaling both sides to sum to 1.
/// Negative or non-finite inputs give the neutral pair.
pub fn remove_vig(home_prob: f64, away_prob: f64) -> (f64, f64) {
    let usable = |p: f64| p.is_finite() && p >= 0.0;
    let total = home_prob + away_prob;
    if !usable(home_prob) || !usable(away_prob) || total <= 0.0 {
        return (NEUTRAL_PROBABILITY, NEUTRAL_PROBABILITY);
    }
    (home_prob / total, away_prob / total)
}

/// Vig-free win probabilities for one matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOdds {
    pub home_team: String,
    pub away_team: String,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
}

impl GameOdds {
    pub fn from_decimal_prices(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_price: f64,
        away_price: f64,
    ) -> Self {
        let (home, away) = remove_vig(
            decimal_odds_to_probability(home_price),
            decimal_odds_to_probability(away_price),
        );
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_win_probability: home,
            away_win_probability: away,
        }
    }

    pub fn from_american_prices(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_price: i32,
        away_price: i32,
    ) -> Self {
        let (home, away) = remove_vig(
            american_odds_to_probability(home_price),
            american_odds_to_probability(away_price),
        );
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_win_probability: home,
            away_win_probability: away,
        }
    }

    /// Win probability for `team`, if it plays in this matchup
    pub fn probability_for(&self, team: &str) -> Option<f64> {
        if team == self.home_team {
            Some(self.home_win_probability)
        } else if team == self.away_team {
            Some(self.away_win_probability)
        } else {
            None
        }
    }

    fn key(&self) -> (&str, &str) {
        matchup_key(&self.home_team, &self.away_team)
    }
}

/// Orientation-free key for a matchup: the two abbreviations in sorted order
pub fn matchup_key<'a>(team1: &'a str, team2: &'a str) -> (&'a str, &'a str) {
    if team1 <= team2 {
        (team1, team2)
    } else {
        (team2, team1)
    }
}

/// How a raw moneyline quote is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFormat {
    Decimal,
    American,
}

/// A bookmaker's head-to-head quote with team names as the feed spells them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsQuote {
    pub home_team: String,
    pub away_team: String,
    pub home_price: f64,
    pub away_price: f64,
    pub format: PriceFormat,
}

impl OddsQuote {
    /// Decimal prices must exceed 1.0; American prices must be whole numbers
    /// of at least 100 either way.
    pub fn has_valid_prices(&self) -> bool {
        let valid = |price: f64| {
            price.is_finite()
                && match self.format {
                    PriceFormat::Decimal => price > 1.0,
                    PriceFormat::American => price.abs() >= 100.0 && price.fract() == 0.0,
                }
        };
        valid(self.home_price) && valid(self.away_price)
    }
}

/// Per-matchup odds, looked up without regard to home/away orientation.
///
/// The pool never holds more than a handful of matchups, so lookups scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GameOdds>", into = "Vec<GameOdds>")]
pub struct OddsBook {
    entries: Vec<GameOdds>,
}

impl From<Vec<GameOdds>> for OddsBook {
    fn from(entries: Vec<GameOdds>) -> Self {
        let mut book = OddsBook::new();
        for odds in entries {
            book.insert(odds);
        }
        book
    }
}

impl From<OddsBook> for Vec<GameOdds> {
    fn from(book: OddsBook) -> Self {
        book.entries
    }
}

impl OddsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from raw quotes, normalizing team names through the season.
    /// Quotes naming a team outside the playoff field, or priced out of range
    /// for their format, are skipped.
    pub fn from_quotes(season: &Season, quotes: &[OddsQuote]) -> Self {
        let mut book = OddsBook::new();
        for quote in quotes {
            let home = season.normalize_team_name(&quote.home_team);
            let away = season.normalize_team_name(&quote.away_team);
            if season.team(&home).is_none() || season.team(&away).is_none() {
                warn!(
                    home = %quote.home_team,
                    away = %quote.away_team,
                    "skipping odds for a matchup outside the playoff field"
                );
                continue;
            }
            if !quote.has_valid_prices() {
                warn!(
                    home = %home,
                    away = %away,
                    home_price = quote.home_price,
                    away_price = quote.away_price,
                    format = ?quote.format,
                    "skipping odds with prices out of range for their format"
                );
                continue;
            }
            let odds = match quote.format {
                PriceFormat::Decimal => {
                    GameOdds::from_decimal_prices(home, away, quote.home_price, quote.away_price)
                }
                PriceFormat::American => GameOdds::from_american_prices(
                    home,
                    away,
                    quote.home_price.round() as i32,
                    quote.away_price.round() as i32,
                ),
            };
            book.insert(odds);
        }
        book
    }

    /// Add odds for a matchup, replacing any existing entry for the same pair
    pub fn insert(&mut self, odds: GameOdds) {
        match self.entries.iter_mut().find(|e| e.key() == odds.key()) {
            Some(existing) => *existing = odds,
            None => self.entries.push(odds),
        }
    }

    pub fn get(&self, team1: &str, team2: &str) -> Option<&GameOdds> {
        let key = matchup_key(team1, team2);
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Probability that `target` wins the `team1` vs `team2` matchup; 0.5 when
    /// the book has no entry or the entry does not list `target`
    pub fn win_probability(&self, team1: &str, team2: &str, target: &str) -> f64 {
        self.get(team1, team2)
            .and_then(|odds| odds.probability_for(target))
            .unwrap_or(NEUTRAL_PROBABILITY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
