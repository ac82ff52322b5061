pub mod balancer;
pub mod error;
pub mod export;
pub mod logging;
pub mod rating;
pub mod resolver;
pub mod roster;
pub mod session;
pub mod types;

pub use balancer::{balance, BalanceStrategy, TeamBalancer};
pub use error::BalancerError;
pub use rating::rate;
pub use resolver::{tokenize, NameResolver, PlayerDirectory, Resolution};
pub use roster::{BalanceMetrics, TeamAssignment};
pub use session::{BalanceHistoryEntry, TeamBuilder};
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    logging::init(log::LevelFilter::Info);
}

/// Change console log verbosity ("error", "warn", "info", "debug", "trace", "off")
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    log::set_max_level(logging::parse_level(level));
}

fn player_json(player: &ResolvedPlayer) -> serde_json::Value {
    serde_json::json!({
        "id": player.id,
        "name": player.name,
        "country_code": player.country_code,
        "flag": player.flag(),
        "power_rating": player.power_rating,
        "tier": player.tier(),
        "source_token": player.source_token,
        "match_score": player.match_score,
        "has_stats": player.record.is_some(),
    })
}

fn assignment_json(assignment: &TeamAssignment) -> serde_json::Value {
    let group = |g| -> Vec<serde_json::Value> { assignment.members(g).map(player_json).collect() };
    let metrics = if assignment.is_partitioned() {
        serde_json::to_value(assignment.metrics()).unwrap_or_default()
    } else {
        serde_json::Value::Null
    };
    serde_json::json!({
        "team_a": group(Group::A),
        "team_b": group(Group::B),
        "unassigned": group(Group::Unassigned),
        "team_sizes": assignment.sizes(),
        "metrics": metrics,
    })
}

/// WASM-exposed team builder session
#[wasm_bindgen]
pub struct TeamBalancerEngine {
    builder: TeamBuilder,
}

#[wasm_bindgen]
impl TeamBalancerEngine {
    /// Create a new session with default config
    #[wasm_bindgen(constructor)]
    pub fn new() -> TeamBalancerEngine {
        TeamBalancerEngine {
            builder: TeamBuilder::new(BalancerConfig::default()),
        }
    }

    /// Create with custom config
    pub fn new_with_config(config_json: &str) -> Result<TeamBalancerEngine, JsValue> {
        Ok(TeamBalancerEngine {
            builder: TeamBuilder::new(BalancerConfig::from_json(config_json)?),
        })
    }

    /// Update config; takes effect on the next resolve/balance
    pub fn update_config(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.builder.config = BalancerConfig::from_json(config_json)?;
        Ok(())
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&BalancerConfig::default()).unwrap_or_default()
    }

    /// Load active players: `[{ id, name, country_code? }]`
    pub fn load_players(&mut self, players_json: &str) -> Result<usize, JsValue> {
        let entries: Vec<PlayerDirectoryEntry> =
            serde_json::from_str(players_json).map_err(BalancerError::Directory)?;
        self.builder.load_directory(entries);
        Ok(self.builder.directory().len())
    }

    /// Load player stats: `[{ player_id, games_played, wins, ..., avg_goal_diff }]`
    pub fn load_stats(&mut self, stats_json: &str) -> Result<(), JsValue> {
        let records: Vec<PlayerHistoricalRecord> =
            serde_json::from_str(stats_json).map_err(BalancerError::Records)?;
        self.builder.load_records(records);
        Ok(())
    }

    /// Resolve free-text roster input; returns `{ matched, unmatched }`
    pub fn resolve(&mut self, raw_text: &str) -> String {
        let resolution = self.builder.resolve(raw_text);
        let matched: Vec<_> = resolution.matched.iter().map(player_json).collect();
        serde_json::json!({
            "matched": matched,
            "unmatched": resolution.unmatched,
        })
        .to_string()
    }

    /// Auto-balance the resolved roster; returns the new state
    pub fn balance(&mut self) -> String {
        self.builder.balance();
        self.get_state()
    }

    /// Move a player between "teamA", "teamB" and "unassigned"
    pub fn move_player(&mut self, player_id: usize, from: &str, to: &str) -> Result<bool, JsValue> {
        let from: Group = from.parse()?;
        let to: Group = to.parse()?;
        Ok(self.builder.move_player(player_id, from, to))
    }

    /// Swap teams entirely
    pub fn swap_teams(&mut self) {
        self.builder.swap_groups();
    }

    /// Put every player back in the unassigned pool
    pub fn reset_teams(&mut self) {
        self.builder.reset();
    }

    /// Get teams and metrics as JSON
    pub fn get_state(&self) -> String {
        assignment_json(self.builder.assignment()).to_string()
    }

    /// Get balance metrics as JSON (null before balancing)
    pub fn get_metrics(&self) -> String {
        assignment_json(self.builder.assignment())["metrics"].to_string()
    }

    /// Get recent balance history, newest first
    pub fn get_history(&self) -> Result<String, JsValue> {
        let history: Vec<_> = self.builder.history().collect();
        serde_json::to_string(&history)
            .map_err(|e| BalancerError::Serialization(e).into())
    }

    pub fn clear_history(&mut self) {
        self.builder.clear_history();
    }

    /// Plain-text summary for the clipboard
    pub fn export_teams(&self) -> String {
        self.builder.export_text()
    }
}

impl Default for TeamBalancerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Power rating for a single stats row (or null for a player with no games)
#[wasm_bindgen]
pub fn power_rating(stats_json: &str) -> Result<f64, JsValue> {
    let record: Option<PlayerHistoricalRecord> =
        serde_json::from_str(stats_json).map_err(BalancerError::Records)?;
    Ok(rate(record.as_ref()))
}

/// Flag emoji for a two-letter country code
#[wasm_bindgen]
pub fn flag_for_country(code: &str) -> String {
    country_flag(code)
}

/// Tier name ("Strong", "Average", "Weak") for a rating
#[wasm_bindgen]
pub fn power_tier(rating: f64) -> String {
    format!("{:?}", PowerTier::from_rating(rating))
}
