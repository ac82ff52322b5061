use crate::balancer::BalanceStrategy;
use crate::error::BalancerError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier assigned to a player by the league store
pub type PlayerId = usize;

/// A canonical player as listed in the league directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerDirectoryEntry {
    pub id: PlayerId,
    pub name: String,
    /// ISO 3166-1 alpha-2 code, if the player registered one
    #[serde(default, alias = "country")]
    pub country_code: Option<String>,
}

impl PlayerDirectoryEntry {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            country_code: None,
        }
    }
}

/// Aggregated results for one player. Missing or null fields deserialize as zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerHistoricalRecord {
    pub player_id: PlayerId,
    #[serde(deserialize_with = "null_as_default")]
    pub games_played: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub wins: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub losses: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub ties: u32,
    /// Win percentage in [0, 100]
    #[serde(deserialize_with = "null_as_default")]
    pub win_percentage: f64,
    /// Mean goal differential per game played
    #[serde(deserialize_with = "null_as_default")]
    pub avg_goal_diff: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A roster token that was matched to a directory entry and scored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub country_code: Option<String>,
    /// Composite strength in [0, 100], one decimal
    pub power_rating: f64,
    /// The input text that produced this match
    pub source_token: String,
    /// Fuzzy score of the accepted match
    pub match_score: u32,
    pub record: Option<PlayerHistoricalRecord>,
}

impl ResolvedPlayer {
    /// Power rating in whole tenths of a point
    pub fn power_tenths(&self) -> i64 {
        to_tenths(self.power_rating)
    }

    pub fn tier(&self) -> PowerTier {
        PowerTier::from_rating(self.power_rating)
    }

    pub fn flag(&self) -> String {
        self.country_code
            .as_deref()
            .map(country_flag)
            .unwrap_or_default()
    }
}

/// A roster token that did not resolve to any directory entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnmatchedToken(pub String);

/// The three places a resolved player can sit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    A,
    B,
    Unassigned,
}

impl Group {
    pub fn label(&self) -> &'static str {
        match self {
            Group::A => "teamA",
            Group::B => "teamB",
            Group::Unassigned => "unassigned",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Group {
    type Err = BalancerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "teama" | "black" => Ok(Group::A),
            "b" | "teamb" | "white" => Ok(Group::B),
            "unassigned" => Ok(Group::Unassigned),
            _ => Err(BalancerError::UnknownGroup(s.to_string())),
        }
    }
}

/// Target capacities of the two groups
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSizes {
    pub a: usize,
    pub b: usize,
}

impl TeamSizes {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// As-equal-as-possible split: A takes the extra player on odd rosters
    pub fn for_roster(n: usize) -> Self {
        Self {
            a: n.div_ceil(2),
            b: n / 2,
        }
    }

    pub fn capacity(&self, group: Group) -> usize {
        match group {
            Group::A => self.a,
            Group::B => self.b,
            Group::Unassigned => usize::MAX,
        }
    }
}

/// Coarse strength band used by hosts to colour ratings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerTier {
    Strong,
    Average,
    Weak,
}

impl PowerTier {
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 70.0 {
            PowerTier::Strong
        } else if rating >= 50.0 {
            PowerTier::Average
        } else {
            PowerTier::Weak
        }
    }
}

/// Regional-indicator emoji for a two-letter country code
pub fn country_flag(code: &str) -> String {
    let code = code.trim();
    if code.chars().count() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return String::new();
    }
    code.to_ascii_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

pub(crate) fn to_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Tunables for resolution, balancing and export
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Minimum fuzzy score a token needs to be accepted
    pub accept_threshold: u32,
    /// Largest edit distance the typo fallback tolerates
    pub max_edit_distance: usize,
    /// The typo fallback only applies to tokens longer than this
    pub min_fuzzy_token_len: usize,
    /// Rating used for matched players without any recorded games
    pub default_power_rating: f64,
    /// Explicit group capacities; `None` splits the roster evenly
    pub team_sizes: Option<TeamSizes>,
    pub strategy: BalanceStrategy,
    pub team_a_label: String,
    pub team_b_label: String,
    pub export_title: String,
    /// Number of balance history entries kept
    pub history_limit: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 50,
            max_edit_distance: 2,
            min_fuzzy_token_len: 3,
            default_power_rating: 50.0,
            team_sizes: None,
            strategy: BalanceStrategy::LocalSearch,
            team_a_label: "BLACK".to_string(),
            team_b_label: "WHITE".to_string(),
            export_title: "STRIKERS TEAM BALANCE".to_string(),
            history_limit: 10,
        }
    }
}

impl BalancerConfig {
    /// Parse a host config, rejecting values the balancer cannot work with
    pub fn from_json(json: &str) -> Result<Self, BalancerError> {
        let config: Self = serde_json::from_str(json).map_err(BalancerError::Config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BalancerError> {
        let rating = self.default_power_rating;
        if !rating.is_finite() || !(0.0..=100.0).contains(&rating) {
            return Err(BalancerError::InvalidConfig(format!(
                "default_power_rating must be within 0..=100, got {rating}"
            )));
        }
        Ok(())
    }

    /// Rating given to a matched player without a record, clamped to the
    /// rating range and rounded to one decimal
    pub fn fallback_rating(&self) -> f64 {
        let rating = self.default_power_rating;
        if rating.is_finite() {
            round_tenth(rating.clamp(0.0, 100.0))
        } else {
            50.0
        }
    }

    pub fn team_label(&self, group: Group) -> &str {
        match group {
            Group::A => &self.team_a_label,
            Group::B => &self.team_b_label,
            Group::Unassigned => "UNASSIGNED",
        }
    }
}
