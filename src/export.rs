use crate::roster::TeamAssignment;
use crate::types::{BalancerConfig, Group};
use chrono::{DateTime, Utc};

/// Clipboard-ready summary of both teams
pub fn export_text(
    assignment: &TeamAssignment,
    config: &BalancerConfig,
    generated_at: DateTime<Utc>,
) -> String {
    let metrics = assignment.metrics();
    let score = if assignment.is_partitioned() {
        format!("{}%", metrics.balance_score)
    } else {
        "N/A".to_string()
    };

    let mut lines = vec![
        config.export_title.clone(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Balance Score: {}", score),
    ];

    for (group, total) in [(Group::A, metrics.total_a), (Group::B, metrics.total_b)] {
        lines.push(String::new());
        lines.push(format!("{} TEAM (PWR: {})", config.team_label(group), total));

        let names: Vec<&str> = assignment.members(group).map(|p| p.name.as_str()).collect();
        if names.is_empty() {
            lines.push("No players".to_string());
        } else {
            lines.extend(names.into_iter().map(str::to_string));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResolvedPlayer, TeamSizes};
    use chrono::TimeZone;

    fn player(id: usize, name: &str, power_rating: f64) -> ResolvedPlayer {
        ResolvedPlayer {
            id,
            name: name.to_string(),
            country_code: None,
            power_rating,
            source_token: name.to_string(),
            match_score: 100,
            record: None,
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap()
    }

    #[test]
    fn test_export_lists_both_teams() {
        let roster = vec![
            player(1, "Ana Silva", 72.5),
            player(2, "Ben Ode", 70.0),
            player(3, "Carlos Ruiz", 55.0),
        ];
        let assignment =
            TeamAssignment::from_groups(roster, TeamSizes::new(2, 1), vec![1, 3], vec![2]);

        let text = export_text(&assignment, &BalancerConfig::default(), generated_at());
        let expected = "STRIKERS TEAM BALANCE\n\
                        Generated: 2026-03-14 18:30:00 UTC\n\
                        Balance Score: 0%\n\
                        \n\
                        BLACK TEAM (PWR: 127.5)\n\
                        Ana Silva\n\
                        Carlos Ruiz\n\
                        \n\
                        WHITE TEAM (PWR: 70)\n\
                        Ben Ode";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_export_before_balancing() {
        let roster = vec![player(1, "Ana Silva", 72.5)];
        let assignment = TeamAssignment::unassigned(roster, TeamSizes::for_roster(1));

        let text = export_text(&assignment, &BalancerConfig::default(), generated_at());
        assert!(text.contains("Balance Score: N/A"));
        assert!(text.contains("BLACK TEAM (PWR: 0)\nNo players"));
        assert!(text.ends_with("WHITE TEAM (PWR: 0)\nNo players"));
    }

    #[test]
    fn test_export_uses_configured_labels() {
        let config = BalancerConfig {
            team_a_label: "RED".to_string(),
            team_b_label: "BLUE".to_string(),
            export_title: "THURSDAY FIVES".to_string(),
            ..Default::default()
        };
        let roster = vec![player(1, "Ana Silva", 60.0), player(2, "Ben Ode", 60.0)];
        let assignment = TeamAssignment::from_groups(roster, TeamSizes::new(1, 1), vec![1], vec![2]);

        let text = export_text(&assignment, &config, generated_at());
        assert!(text.starts_with("THURSDAY FIVES\n"));
        assert!(text.contains("Balance Score: 100%"));
        assert!(text.contains("RED TEAM (PWR: 60)\nAna Silva"));
        assert!(text.contains("BLUE TEAM (PWR: 60)\nBen Ode"));
    }
}
