use crate::roster::TeamAssignment;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Roster size above which the exhaustive strategy falls back to local search
pub const EXHAUSTIVE_MAX_PLAYERS: usize = 16;

/// How the split is optimised after sizes are fixed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStrategy {
    /// Seeded draft, greedy fill, then first-improvement pairwise swaps
    #[default]
    LocalSearch,
    /// Try every split of the roster (small rosters only)
    Exhaustive,
}

/// Working split while balancing; strengths are in tenths of a point
#[derive(Clone, Debug, Default)]
struct Split {
    a: Vec<(PlayerId, i64)>,
    b: Vec<(PlayerId, i64)>,
    bench: Vec<PlayerId>,
}

impl Split {
    fn sum_a(&self) -> i64 {
        self.a.iter().map(|&(_, p)| p).sum()
    }

    fn sum_b(&self) -> i64 {
        self.b.iter().map(|&(_, p)| p).sum()
    }

    fn difference(&self) -> i64 {
        (self.sum_a() - self.sum_b()).abs()
    }

    fn ids(side: &[(PlayerId, i64)]) -> Vec<PlayerId> {
        side.iter().map(|&(id, _)| id).collect()
    }
}

/// Partitions a resolved roster into two teams of near-equal strength
#[derive(Clone, Copy, Debug, Default)]
pub struct TeamBalancer {
    strategy: BalanceStrategy,
}

impl TeamBalancer {
    pub fn new(strategy: BalanceStrategy) -> Self {
        Self { strategy }
    }

    /// Split `players` into two teams. `sizes` defaults to ceil(n/2) and
    /// floor(n/2). Fewer than two players is not partitioned: everyone
    /// stays unassigned.
    pub fn balance(&self, players: &[ResolvedPlayer], sizes: Option<TeamSizes>) -> TeamAssignment {
        let sizes = sizes.unwrap_or_else(|| TeamSizes::for_roster(players.len()));
        if players.len() < 2 {
            return TeamAssignment::unassigned(players.to_vec(), sizes);
        }

        let split = match self.strategy {
            BalanceStrategy::Exhaustive
                if players.len() <= EXHAUSTIVE_MAX_PLAYERS
                    && sizes.a + sizes.b == players.len() =>
            {
                exhaustive_split(players, sizes)
            }
            _ => {
                let mut split = seeded_fill(players, sizes);
                let swaps = refine(&mut split);
                log::debug!("local search applied {} swaps", swaps);
                split
            }
        };

        log::debug!(
            "balanced {} players: A={} B={} bench={} diff={}",
            players.len(),
            split.a.len(),
            split.b.len(),
            split.bench.len(),
            split.difference() as f64 / 10.0
        );

        TeamAssignment::from_groups(
            players.to_vec(),
            sizes,
            Split::ids(&split.a),
            Split::ids(&split.b),
        )
    }
}

/// Balance with the default local-search strategy
pub fn balance(players: &[ResolvedPlayer], sizes: Option<TeamSizes>) -> TeamAssignment {
    TeamBalancer::default().balance(players, sizes)
}

fn ranked(players: &[ResolvedPlayer]) -> Vec<(PlayerId, i64)> {
    let mut ranked: Vec<(PlayerId, i64)> =
        players.iter().map(|p| (p.id, p.power_tenths())).collect();
    // Stable: equal ratings keep roster order
    ranked.sort_by_key(|&(_, power)| Reverse(power));
    ranked
}

/// Phases 1 and 2: snake-seed the top four (A, B, B, A) so the two
/// strongest never share a side, then hand each remaining player to the
/// weaker team that still has room.
fn seeded_fill(players: &[ResolvedPlayer], sizes: TeamSizes) -> Split {
    let mut split = Split::default();

    for (rank, (id, power)) in ranked(players).into_iter().enumerate() {
        let room_a = split.a.len() < sizes.capacity(Group::A);
        let room_b = split.b.len() < sizes.capacity(Group::B);

        let prefer_a = if rank < 4 {
            rank == 0 || rank == 3
        } else {
            // Ties go to A
            split.sum_a() <= split.sum_b()
        };

        match (prefer_a, room_a, room_b) {
            (true, true, _) | (false, true, false) => split.a.push((id, power)),
            (false, _, true) | (true, false, true) => split.b.push((id, power)),
            _ => split.bench.push(id),
        }
    }

    split
}

/// Phase 3: first-improvement local search over cross-team swaps.
///
/// Scans (a, b) pairs row-major, applies the first swap that strictly
/// lowers the difference and rescans. The difference is a non-negative
/// integer (tenths) that drops on every swap, so this terminates.
fn refine(split: &mut Split) -> usize {
    let mut swaps = 0;
    let mut sum_a = split.sum_a();
    let mut sum_b = split.sum_b();

    loop {
        let current = (sum_a - sum_b).abs();
        let mut improving = None;

        'scan: for (i, &(_, pa)) in split.a.iter().enumerate() {
            for (j, &(_, pb)) in split.b.iter().enumerate() {
                let new_a = sum_a - pa + pb;
                let new_b = sum_b - pb + pa;
                if (new_a - new_b).abs() < current {
                    improving = Some((i, j));
                    break 'scan;
                }
            }
        }

        let Some((i, j)) = improving else {
            return swaps;
        };

        let (pa, pb) = (split.a[i].1, split.b[j].1);
        std::mem::swap(&mut split.a[i], &mut split.b[j]);
        sum_a = sum_a - pa + pb;
        sum_b = sum_b - pb + pa;
        swaps += 1;
        log::debug!(
            "swap #{} <-> #{} diff {} -> {}",
            split.b[j].0,
            split.a[i].0,
            current,
            (sum_a - sum_b).abs()
        );
    }
}

/// Best split over every assignment with exact team sizes
fn exhaustive_split(players: &[ResolvedPlayer], sizes: TeamSizes) -> Split {
    let ranked = ranked(players);
    let total: i64 = ranked.iter().map(|&(_, p)| p).sum();

    let mut in_a = Vec::with_capacity(sizes.a);
    let mut best: Option<(i64, Vec<usize>)> = None;
    search_subsets(&ranked, sizes.a, 0, 0, total, &mut in_a, &mut best);

    let chosen = best.map(|(_, idx)| idx).unwrap_or_default();
    let mut split = Split::default();
    for (i, &entry) in ranked.iter().enumerate() {
        if chosen.contains(&i) {
            split.a.push(entry);
        } else {
            split.b.push(entry);
        }
    }
    split
}

fn search_subsets(
    ranked: &[(PlayerId, i64)],
    target_a: usize,
    idx: usize,
    sum_a: i64,
    total: i64,
    in_a: &mut Vec<usize>,
    best: &mut Option<(i64, Vec<usize>)>,
) {
    if best.as_ref().is_some_and(|(diff, _)| *diff == 0) {
        return;
    }

    if in_a.len() == target_a {
        let diff = (sum_a - (total - sum_a)).abs();
        if best.as_ref().map_or(true, |(d, _)| diff < *d) {
            *best = Some((diff, in_a.clone()));
        }
        return;
    }

    let remaining = ranked.len() - idx;
    if remaining < target_a - in_a.len() {
        return;
    }

    in_a.push(idx);
    search_subsets(ranked, target_a, idx + 1, sum_a + ranked[idx].1, total, in_a, best);
    in_a.pop();

    search_subsets(ranked, target_a, idx + 1, sum_a, total, in_a, best);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn roster(ratings: &[f64]) -> Vec<ResolvedPlayer> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &power_rating)| ResolvedPlayer {
                id: i + 1,
                name: format!("Player {}", i + 1),
                country_code: None,
                power_rating,
                source_token: format!("p{}", i + 1),
                match_score: 100,
                record: None,
            })
            .collect()
    }

    fn random_roster(rng: &mut StdRng, n: usize) -> Vec<ResolvedPlayer> {
        let ratings: Vec<f64> = (0..n)
            .map(|_| (rng.gen_range(0.0..100.0_f64) * 10.0).round() / 10.0)
            .collect();
        roster(&ratings)
    }

    #[test]
    fn test_six_player_scenario() {
        let players = roster(&[90.0, 85.0, 60.0, 55.0, 50.0, 40.0]);

        let mut split = seeded_fill(&players, TeamSizes::for_roster(6));
        // Draft: 90 and 55 to A, 85 and 60 to B; 50 ties into A, 40 fills B
        assert_eq!(Split::ids(&split.a), vec![1, 4, 5]);
        assert_eq!(Split::ids(&split.b), vec![2, 3, 6]);
        assert_eq!(split.difference(), 100);

        refine(&mut split);
        assert_eq!(split.difference(), 0);

        let assignment = balance(&players, None);
        assert_eq!(assignment.group(Group::A), &[2, 4, 5]);
        assert_eq!(assignment.group(Group::B), &[1, 3, 6]);
        assert!(assignment.group(Group::Unassigned).is_empty());
        assert_eq!(assignment.metrics().total_a, 190.0);
        assert_eq!(assignment.metrics().total_b, 190.0);
        assert!(assignment.metrics().balance_score >= 80);
    }

    #[test]
    fn test_fewer_than_two_players_is_not_partitioned() {
        let assignment = balance(&roster(&[70.0]), None);
        assert!(assignment.group(Group::A).is_empty());
        assert!(assignment.group(Group::B).is_empty());
        assert_eq!(assignment.group(Group::Unassigned), &[1]);
        assert_eq!(assignment.metrics().balance_score, 0);

        let assignment = balance(&[], None);
        assert!(assignment.roster().is_empty());
    }

    #[test]
    fn test_small_rosters_respect_capacity() {
        let assignment = balance(&roster(&[80.0, 60.0]), None);
        assert_eq!(assignment.group(Group::A), &[1]);
        assert_eq!(assignment.group(Group::B), &[2]);

        // The snake would put rank 3 on B; B is already full
        let assignment = balance(&roster(&[80.0, 60.0, 30.0]), None);
        assert_eq!(assignment.group(Group::A).len(), 2);
        assert_eq!(assignment.group(Group::B).len(), 1);
    }

    #[test]
    fn test_explicit_sizes_bench_the_overflow() {
        let players = roster(&[90.0, 80.0, 70.0, 60.0, 50.0]);
        let assignment = balance(&players, Some(TeamSizes::new(2, 2)));
        assert_eq!(assignment.group(Group::A).len(), 2);
        assert_eq!(assignment.group(Group::B).len(), 2);
        assert_eq!(assignment.group(Group::Unassigned), &[5]);
    }

    #[test]
    fn test_equal_ratings_keep_roster_order() {
        let players = roster(&[50.0, 50.0, 50.0, 50.0]);
        let assignment = balance(&players, None);
        assert_eq!(assignment.group(Group::A), &[1, 4]);
        assert_eq!(assignment.group(Group::B), &[2, 3]);
        assert_eq!(assignment.metrics().balance_score, 100);
    }

    #[test]
    fn test_balance_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let players = random_roster(&mut rng, 13);
        assert_eq!(balance(&players, None), balance(&players, None));
    }

    #[test]
    fn test_random_rosters_hold_partition_invariants() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let n = rng.gen_range(2..24);
            let players = random_roster(&mut rng, n);
            let sizes = TeamSizes::for_roster(n);

            let mut split = seeded_fill(&players, sizes);
            let greedy_diff = split.difference();
            refine(&mut split);
            assert!(split.difference() <= greedy_diff);

            let assignment = balance(&players, None);
            let a = assignment.group(Group::A);
            let b = assignment.group(Group::B);
            let bench = assignment.group(Group::Unassigned);

            assert_eq!(a.len(), sizes.a);
            assert_eq!(b.len(), sizes.b);
            assert!(bench.is_empty());
            assert_eq!(a.len() + b.len() + bench.len(), players.len());

            let mut seen: Vec<PlayerId> = a.iter().chain(b).copied().collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), players.len());

            let m = assignment.metrics();
            assert_eq!(m.absolute_difference, split.difference() as f64 / 10.0);
            assert!(m.balance_score <= 100);
        }
    }

    #[test]
    fn test_exhaustive_never_worse_than_local_search() {
        let mut rng = StdRng::seed_from_u64(1234);
        let exhaustive = TeamBalancer::new(BalanceStrategy::Exhaustive);

        for _ in 0..50 {
            let n = rng.gen_range(2..=12);
            let players = random_roster(&mut rng, n);

            let local = balance(&players, None);
            let exact = exhaustive.balance(&players, None);

            assert_eq!(exact.group(Group::A).len(), n.div_ceil(2));
            assert_eq!(exact.group(Group::B).len(), n / 2);
            assert!(
                exact.metrics().absolute_difference <= local.metrics().absolute_difference,
                "exhaustive {} worse than local {}",
                exact.metrics().absolute_difference,
                local.metrics().absolute_difference
            );
        }
    }

    #[test]
    fn test_exhaustive_with_uneven_sizes() {
        // 8+7 | 6+5+4 balances exactly
        let players = roster(&[8.0, 7.0, 6.0, 5.0, 4.0]);
        let exact = TeamBalancer::new(BalanceStrategy::Exhaustive)
            .balance(&players, Some(TeamSizes::new(2, 3)));
        assert_eq!(exact.metrics().absolute_difference, 0.0);
    }
}
