use crate::types::{round_tenth, PlayerHistoricalRecord};

/// Ceiling of the win-percentage component
pub const WIN_WEIGHT: f64 = 50.0;
/// Ceiling of the goal-differential component
pub const NET_RATING_WEIGHT: f64 = 35.0;
/// Ceiling of the experience component
pub const EXPERIENCE_WEIGHT: f64 = 15.0;
/// Goal differential mapped to the bottom and top of the net-rating scale
pub const GOAL_DIFF_SPAN: f64 = 3.0;
/// Games after which experience stops adding to the rating
pub const EXPERIENCE_SATURATION_GAMES: f64 = 20.0;

/// Composite power rating in [0, 100], rounded to one decimal.
///
/// An absent record scores as zero games, 0% wins and an even goal
/// differential, i.e. only the midpoint of the net-rating component.
pub fn rate(record: Option<&PlayerHistoricalRecord>) -> f64 {
    let (win_pct, avg_goal_diff, games_played) = record
        .map(|r| (r.win_percentage, r.avg_goal_diff, r.games_played as f64))
        .unwrap_or((0.0, 0.0, 0.0));

    let total = win_component(win_pct)
        + net_rating_component(avg_goal_diff)
        + experience_component(games_played);

    round_tenth(total.min(100.0))
}

fn win_component(win_pct: f64) -> f64 {
    nan_as_zero((win_pct / 100.0) * WIN_WEIGHT).clamp(0.0, WIN_WEIGHT)
}

fn net_rating_component(avg_goal_diff: f64) -> f64 {
    let normalized = (avg_goal_diff + GOAL_DIFF_SPAN) / (2.0 * GOAL_DIFF_SPAN);
    // NaN differential counts as even
    let normalized = if normalized.is_nan() { 0.5 } else { normalized };
    normalized.clamp(0.0, 1.0) * NET_RATING_WEIGHT
}

fn experience_component(games_played: f64) -> f64 {
    ((games_played / EXPERIENCE_SATURATION_GAMES) * EXPERIENCE_WEIGHT).min(EXPERIENCE_WEIGHT)
}

fn nan_as_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
