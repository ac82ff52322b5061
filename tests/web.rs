//! Browser-side checks of the exported engine. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use strikers_team_balancer::{flag_for_country, power_rating, power_tier, TeamBalancerEngine};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const PLAYERS: &str = r#"[
    {"id": 1, "name": "Ana Silva", "country": "BR"},
    {"id": 2, "name": "Ben Ode", "country_code": "NG"},
    {"id": 3, "name": "Carlos Ruiz"},
    {"id": 4, "name": "Dan Brown"}
]"#;

const STATS: &str = r#"[
    {"player_id": 1, "games_played": 30, "win_percentage": 80, "avg_goal_diff": 2.0},
    {"player_id": 2, "games_played": 25, "win_percentage": 70, "avg_goal_diff": 1.0},
    {"player_id": 3, "games_played": 20, "win_percentage": 50, "avg_goal_diff": null}
]"#;

fn loaded_engine() -> TeamBalancerEngine {
    let mut engine = TeamBalancerEngine::new();
    assert_eq!(engine.load_players(PLAYERS).unwrap(), 4);
    engine.load_stats(STATS).unwrap();
    engine
}

fn parse(json: &str) -> serde_json::Value {
    serde_json::from_str(json).unwrap()
}

#[wasm_bindgen_test]
fn resolve_reports_matched_and_unmatched() {
    let mut engine = loaded_engine();
    let result = parse(&engine.resolve("Ana, Ben\nCarlos  Dan\nZed"));

    assert_eq!(result["matched"].as_array().unwrap().len(), 4);
    assert_eq!(result["unmatched"], serde_json::json!(["Zed"]));
    assert_eq!(result["matched"][0]["flag"], "\u{1F1E7}\u{1F1F7}");
    assert_eq!(result["matched"][3]["power_rating"], 50.0);
}

#[wasm_bindgen_test]
fn balance_move_swap_and_reset() {
    let mut engine = loaded_engine();
    engine.resolve("Ana, Ben, Carlos, Dan");

    let state = parse(&engine.balance());
    assert_eq!(state["team_a"].as_array().unwrap().len(), 2);
    assert_eq!(state["team_b"].as_array().unwrap().len(), 2);
    assert!(state["metrics"]["balance_score"].is_u64());

    let moved_id = state["team_a"][0]["id"].as_u64().unwrap() as usize;
    assert!(engine.move_player(moved_id, "teamA", "white").unwrap());
    assert!(!engine.move_player(moved_id, "teamA", "teamB").unwrap());
    assert!(engine.move_player(moved_id, "teamA", "bench").is_err());

    engine.swap_teams();
    let state = parse(&engine.get_state());
    assert_eq!(state["team_a"].as_array().unwrap().len(), 3);

    engine.reset_teams();
    assert_eq!(engine.get_metrics(), "null");

    let history = parse(&engine.get_history().unwrap());
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert!(engine.export_teams().starts_with("STRIKERS TEAM BALANCE"));
}

#[wasm_bindgen_test]
fn config_errors_surface_to_host() {
    assert!(TeamBalancerEngine::new_with_config("{not json").is_err());
    assert!(TeamBalancerEngine::new_with_config(r#"{"default_power_rating": 1e300}"#).is_err());
    let engine = TeamBalancerEngine::new_with_config(r#"{"team_a_label": "RED"}"#).unwrap();
    assert!(engine.export_teams().contains("RED TEAM"));

    let mut engine = engine;
    assert!(engine.update_config(r#"{"default_power_rating": -1}"#).is_err());
}

#[wasm_bindgen_test]
fn free_functions() {
    assert_eq!(power_rating("null").unwrap(), 17.5);
    assert_eq!(
        power_rating(r#"{"player_id": 9, "win_percentage": 100, "avg_goal_diff": 3, "games_played": 20}"#)
            .unwrap(),
        100.0
    );
    assert_eq!(flag_for_country("pl"), "\u{1F1F5}\u{1F1F1}");
    assert_eq!(power_tier(71.0), "Strong");
}
