use crate::rating::rate;
use crate::types::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Separators inside one line: comma, tab, or a run of two or more spaces
static RE_TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\t]|\s{2,}").unwrap());

pub const SCORE_EXACT: u32 = 100;
pub const SCORE_PREFIX: u32 = 90;
pub const SCORE_FIRST_NAME: u32 = 85;
pub const SCORE_CONTAINS: u32 = 80;
/// Typo fallback scores `SCORE_EDIT_BASE - 10 * distance`
pub const SCORE_EDIT_BASE: u32 = 70;

/// Player directory in a fixed iteration order.
///
/// Entries are kept sorted by case-insensitive name, then id, so that
/// tie-breaking between equally scored candidates does not depend on the
/// order the store happened to return rows in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PlayerDirectoryEntry>", into = "Vec<PlayerDirectoryEntry>")]
pub struct PlayerDirectory {
    entries: Vec<PlayerDirectoryEntry>,
}

impl PlayerDirectory {
    pub fn new(mut entries: Vec<PlayerDirectoryEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.name
                .trim()
                .to_lowercase()
                .cmp(&b.name.trim().to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[PlayerDirectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<PlayerDirectoryEntry>> for PlayerDirectory {
    fn from(entries: Vec<PlayerDirectoryEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<PlayerDirectory> for Vec<PlayerDirectoryEntry> {
    fn from(directory: PlayerDirectory) -> Self {
        directory.entries
    }
}

/// Output of one resolution pass
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub matched: Vec<ResolvedPlayer>,
    pub unmatched: Vec<UnmatchedToken>,
}

/// Split free-text roster input into trimmed, non-empty name tokens
pub fn tokenize(raw_text: &str) -> Vec<String> {
    raw_text
        .lines()
        .flat_map(|line| RE_TOKEN_SEPARATOR.split(line))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps roster tokens onto directory entries
pub struct NameResolver<'a> {
    config: &'a BalancerConfig,
}

impl<'a> NameResolver<'a> {
    pub fn new(config: &'a BalancerConfig) -> Self {
        Self { config }
    }

    /// Score `token` against `target`; 0 means no rule fired.
    ///
    /// Every rule that fires is considered and the highest score wins.
    pub fn match_score(&self, token: &str, target: &str) -> u32 {
        let token = token.trim().to_lowercase();
        let target = target.trim().to_lowercase();
        if token.is_empty() {
            return 0;
        }

        let mut best = 0;
        if token == target {
            best = best.max(SCORE_EXACT);
        }
        if target.starts_with(&token) {
            best = best.max(SCORE_PREFIX);
        }
        if target.contains(&token) {
            best = best.max(SCORE_CONTAINS);
        }
        if target.split_whitespace().next() == Some(token.as_str()) {
            best = best.max(SCORE_FIRST_NAME);
        }
        if best == 0 && token.chars().count() > self.config.min_fuzzy_token_len {
            let distance = strsim::levenshtein(&token, &target);
            if distance <= self.config.max_edit_distance {
                best = SCORE_EDIT_BASE.saturating_sub(distance as u32 * 10);
            }
        }
        best
    }

    /// Resolve every token in `raw_text`. Tokens claim players in input
    /// order and a claimed player is never offered to a later token.
    pub fn resolve(
        &self,
        raw_text: &str,
        directory: &PlayerDirectory,
        records: &HashMap<PlayerId, PlayerHistoricalRecord>,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        let mut claimed: HashSet<PlayerId> = HashSet::new();

        for token in tokenize(raw_text) {
            let mut best: Option<(&PlayerDirectoryEntry, u32)> = None;

            for entry in directory.entries() {
                if claimed.contains(&entry.id) {
                    continue;
                }
                let score = self.match_score(&token, &entry.name);
                // Strictly greater: the first entry wins ties
                if score > best.map(|(_, s)| s).unwrap_or(0) {
                    best = Some((entry, score));
                }
            }

            match best {
                Some((entry, score)) if score >= self.config.accept_threshold => {
                    let record = records.get(&entry.id).cloned();
                    let power_rating = match &record {
                        Some(r) => rate(Some(r)),
                        None => self.config.fallback_rating(),
                    };
                    log::debug!(
                        "resolved '{}' -> {} (#{}) score={} pwr={}",
                        token,
                        entry.name,
                        entry.id,
                        score,
                        power_rating
                    );
                    claimed.insert(entry.id);
                    resolution.matched.push(ResolvedPlayer {
                        id: entry.id,
                        name: entry.name.clone(),
                        country_code: entry.country_code.clone(),
                        power_rating,
                        source_token: token,
                        match_score: score,
                        record,
                    });
                }
                _ => {
                    log::debug!("no directory match for '{}'", token);
                    resolution.unmatched.push(UnmatchedToken(token));
                }
            }
        }

        resolution
    }
}
