use crate::types::*;
use serde::{Deserialize, Serialize};

/// Strength summary of the current split
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceMetrics {
    pub total_a: f64,
    pub total_b: f64,
    pub avg_a: f64,
    pub avg_b: f64,
    pub absolute_difference: f64,
    /// `max(0, 100 - 2 * absolute_difference)`, rounded to a whole number
    pub balance_score: u32,
}

impl BalanceMetrics {
    /// Metrics from group totals expressed in tenths of a rating point
    pub fn from_tenths(total_a: i64, len_a: usize, total_b: i64, len_b: usize) -> Self {
        let mean = |total: i64, len: usize| {
            if len == 0 {
                0.0
            } else {
                round_tenth(total as f64 / 10.0 / len as f64)
            }
        };
        let diff_tenths = (total_a - total_b).abs();
        let score = (100.0 - diff_tenths as f64 / 10.0 * 2.0).max(0.0);

        Self {
            total_a: total_a as f64 / 10.0,
            total_b: total_b as f64 / 10.0,
            avg_a: mean(total_a, len_a),
            avg_b: mean(total_b, len_b),
            absolute_difference: diff_tenths as f64 / 10.0,
            balance_score: score.round() as u32,
        }
    }
}

/// Current split of a resolved roster into two teams plus a bench.
///
/// Every resolved player is in exactly one of `group_a`, `group_b` and
/// `unassigned`. Metrics are rebuilt on every membership change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    roster: Vec<ResolvedPlayer>,
    group_a: Vec<PlayerId>,
    group_b: Vec<PlayerId>,
    unassigned: Vec<PlayerId>,
    sizes: TeamSizes,
    metrics: BalanceMetrics,
}

impl TeamAssignment {
    /// Everyone on the bench, metrics zeroed
    pub fn unassigned(roster: Vec<ResolvedPlayer>, sizes: TeamSizes) -> Self {
        let unassigned = roster.iter().map(|p| p.id).collect();
        Self {
            roster,
            group_a: Vec::new(),
            group_b: Vec::new(),
            unassigned,
            sizes,
            metrics: BalanceMetrics::default(),
        }
    }

    /// Build from an explicit split. Roster players missing from both
    /// groups land in `unassigned`; ids not on the roster are dropped.
    pub fn from_groups(
        roster: Vec<ResolvedPlayer>,
        sizes: TeamSizes,
        group_a: Vec<PlayerId>,
        group_b: Vec<PlayerId>,
    ) -> Self {
        let mut assignment = Self::unassigned(roster, sizes);
        for id in group_a {
            assignment.transfer(id, Group::Unassigned, Group::A);
        }
        for id in group_b {
            assignment.transfer(id, Group::Unassigned, Group::B);
        }
        assignment.recompute();
        assignment
    }

    pub fn roster(&self) -> &[ResolvedPlayer] {
        &self.roster
    }

    pub fn sizes(&self) -> TeamSizes {
        self.sizes
    }

    pub fn metrics(&self) -> &BalanceMetrics {
        &self.metrics
    }

    pub fn group(&self, group: Group) -> &[PlayerId] {
        match group {
            Group::A => &self.group_a,
            Group::B => &self.group_b,
            Group::Unassigned => &self.unassigned,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&ResolvedPlayer> {
        self.roster.iter().find(|p| p.id == id)
    }

    /// Resolved players of one group, in group order
    pub fn members(&self, group: Group) -> impl Iterator<Item = &ResolvedPlayer> + '_ {
        self.group(group).iter().filter_map(move |&id| self.player(id))
    }

    pub fn group_of(&self, id: PlayerId) -> Option<Group> {
        [Group::A, Group::B, Group::Unassigned]
            .into_iter()
            .find(|&g| self.group(g).contains(&id))
    }

    /// True once at least one team has members
    pub fn is_partitioned(&self) -> bool {
        !self.group_a.is_empty() || !self.group_b.is_empty()
    }

    /// Move `id` from `from` to the end of `to`. No capacity checks: manual
    /// overrides may leave the teams uneven. Returns false (and changes
    /// nothing) when `id` is not in `from` or the groups are the same.
    ///
    /// Order within a group is not preserved across a round trip: moving a
    /// player out and back restores membership and metrics, but the player
    /// ends up last in its original group.
    pub fn move_player(&mut self, id: PlayerId, from: Group, to: Group) -> bool {
        let moved = self.transfer(id, from, to);
        if moved {
            self.recompute();
            log::debug!("moved #{} {} -> {}", id, from, to);
        }
        moved
    }

    /// Exchange the whole membership of the two teams
    pub fn swap_groups(&mut self) {
        std::mem::swap(&mut self.group_a, &mut self.group_b);
        self.recompute();
    }

    /// Send everyone back to the bench and zero the metrics
    pub fn reset(&mut self) {
        let mut benched = std::mem::take(&mut self.group_a);
        benched.append(&mut self.group_b);
        self.unassigned.append(&mut benched);
        self.metrics = BalanceMetrics::default();
    }

    fn transfer(&mut self, id: PlayerId, from: Group, to: Group) -> bool {
        if from == to {
            return false;
        }
        let source = self.group_mut(from);
        let Some(pos) = source.iter().position(|&p| p == id) else {
            return false;
        };
        source.remove(pos);
        self.group_mut(to).push(id);
        true
    }

    fn group_mut(&mut self, group: Group) -> &mut Vec<PlayerId> {
        match group {
            Group::A => &mut self.group_a,
            Group::B => &mut self.group_b,
            Group::Unassigned => &mut self.unassigned,
        }
    }

    fn total_tenths(&self, group: Group) -> i64 {
        self.members(group).map(|p| p.power_tenths()).sum()
    }

    /// Rebuild metrics from current membership
    pub(crate) fn recompute(&mut self) {
        self.metrics = if self.is_partitioned() {
            BalanceMetrics::from_tenths(
                self.total_tenths(Group::A),
                self.group_a.len(),
                self.total_tenths(Group::B),
                self.group_b.len(),
            )
        } else {
            BalanceMetrics::default()
        };
    }
}
