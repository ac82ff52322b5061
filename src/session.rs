use crate::balancer::TeamBalancer;
use crate::export::export_text;
use crate::resolver::{NameResolver, PlayerDirectory, Resolution};
use crate::roster::{BalanceMetrics, TeamAssignment};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// One automatic balance, kept for the history panel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub balance_score: u32,
}

/// State of one interactive team-building session.
///
/// A new resolution replaces the roster wholesale and discards any
/// partition built on the previous one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamBuilder {
    pub config: BalancerConfig,
    directory: PlayerDirectory,
    records: HashMap<PlayerId, PlayerHistoricalRecord>,
    resolution: Resolution,
    assignment: TeamAssignment,
    /// Newest first
    history: VecDeque<BalanceHistoryEntry>,
}

impl TeamBuilder {
    pub fn new(config: BalancerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Replace the active player directory
    pub fn load_directory(&mut self, entries: Vec<PlayerDirectoryEntry>) {
        self.directory = PlayerDirectory::new(entries);
        log::info!("loaded {} directory entries", self.directory.len());
    }

    /// Replace the historical records, keyed by player id
    pub fn load_records(&mut self, records: Vec<PlayerHistoricalRecord>) {
        self.records = records.into_iter().map(|r| (r.player_id, r)).collect();
        log::info!("loaded {} player records", self.records.len());
    }

    pub fn directory(&self) -> &PlayerDirectory {
        &self.directory
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn assignment(&self) -> &TeamAssignment {
        &self.assignment
    }

    pub fn metrics(&self) -> &BalanceMetrics {
        self.assignment.metrics()
    }

    pub fn history(&self) -> impl Iterator<Item = &BalanceHistoryEntry> {
        self.history.iter()
    }

    /// Power rating for a directory player, as a resolution would assign it
    pub fn power_rating(&self, id: PlayerId) -> f64 {
        match self.records.get(&id) {
            Some(record) => crate::rating::rate(Some(record)),
            None => self.config.fallback_rating(),
        }
    }

    /// Resolve a free-text roster. Every matched player starts unassigned.
    pub fn resolve(&mut self, raw_text: &str) -> &Resolution {
        self.resolution =
            NameResolver::new(&self.config).resolve(raw_text, &self.directory, &self.records);
        self.assignment = TeamAssignment::unassigned(
            self.resolution.matched.clone(),
            self.team_sizes(self.resolution.matched.len()),
        );
        log::info!(
            "resolved {} players, {} unmatched",
            self.resolution.matched.len(),
            self.resolution.unmatched.len()
        );
        &self.resolution
    }

    /// Automatically balance the current roster, stamping history with now
    pub fn balance(&mut self) -> &TeamAssignment {
        self.balance_at(Utc::now())
    }

    pub fn balance_at(&mut self, timestamp: DateTime<Utc>) -> &TeamAssignment {
        let players = &self.resolution.matched;
        self.assignment = TeamBalancer::new(self.config.strategy)
            .balance(players, Some(self.team_sizes(players.len())));

        if self.assignment.is_partitioned() {
            let metrics = *self.assignment.metrics();
            log::info!(
                "balanced teams: {} vs {} (diff {}, score {})",
                metrics.total_a,
                metrics.total_b,
                metrics.absolute_difference,
                metrics.balance_score
            );
            self.record_history(timestamp);
        } else {
            log::info!("not enough players to balance ({})", players.len());
        }
        &self.assignment
    }

    pub fn move_player(&mut self, id: PlayerId, from: Group, to: Group) -> bool {
        self.assignment.move_player(id, from, to)
    }

    pub fn swap_groups(&mut self) {
        self.assignment.swap_groups();
    }

    pub fn reset(&mut self) {
        self.assignment.reset();
    }

    pub fn export_text(&self) -> String {
        self.export_text_at(Utc::now())
    }

    pub fn export_text_at(&self, generated_at: DateTime<Utc>) -> String {
        export_text(&self.assignment, &self.config, generated_at)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn team_sizes(&self, roster_len: usize) -> TeamSizes {
        self.config
            .team_sizes
            .unwrap_or_else(|| TeamSizes::for_roster(roster_len))
    }

    fn record_history(&mut self, timestamp: DateTime<Utc>) {
        let names = |group| -> Vec<String> {
            self.assignment
                .members(group)
                .map(|p| p.name.clone())
                .collect()
        };
        let entry = BalanceHistoryEntry {
            timestamp,
            team_a: names(Group::A),
            team_b: names(Group::B),
            balance_score: self.assignment.metrics().balance_score,
        };

        self.history.push_front(entry);
        self.history.truncate(self.config.history_limit);
    }
}
