//! HEXFIEF Arena - headless AI vs AI matches
//!
//! Runs batches of matches against the engine surface only: every seed is
//! played twice with sides swapped for fairness, the turn cap falls back
//! to a hex-count tie-break, and outcomes aggregate into win/elimination
//! statistics. Matches fan out over rayon when configured.

mod config;
mod runner;
mod summary;

pub use config::{AiKind, ArenaConfig, MapSize};
pub use runner::{run_match, DecidedBy, MatchOutcome};
pub use summary::ArenaSummary;

use hexfief_core::MapError;
use rayon::prelude::*;
use tracing::info;

/// Run the full schedule: each configured seed is played twice, sides
/// swapped, sequentially or in parallel. Outcomes come back in schedule
/// order either way.
pub fn run_arena(
    ai1: AiKind,
    ai2: AiKind,
    config: &ArenaConfig,
) -> Result<Vec<MatchOutcome>, MapError> {
    let schedule: Vec<(u64, bool)> = config
        .seeds
        .iter()
        .flat_map(|&seed| [(seed, false), (seed, true)])
        .collect();
    info!(
        games = schedule.len(),
        ai1 = ai1.label(),
        ai2 = ai2.label(),
        "starting arena"
    );

    let play = |&(seed, swapped): &(u64, bool)| -> Result<MatchOutcome, MapError> {
        let (first, second) = if swapped { (ai2, ai1) } else { (ai1, ai2) };
        let mut outcome = run_match(first, second, seed, config)?;
        outcome.swapped = swapped;
        Ok(outcome)
    };

    if config.parallel {
        schedule.par_iter().map(play).collect()
    } else {
        schedule.iter().map(play).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_plays_each_seed_twice() {
        let config = ArenaConfig {
            seeds: vec![1, 2],
            map_size: MapSize::Small,
            max_turns: 8,
            parallel: false,
            ..ArenaConfig::default()
        };
        let outcomes = run_arena(AiKind::Random, AiKind::Random, &config).unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].seed, 1);
        assert!(!outcomes[0].swapped);
        assert!(outcomes[1].swapped);
        assert_eq!(outcomes[2].seed, 2);
    }

    #[test]
    fn test_arena_parallel_matches_sequential() {
        let base = ArenaConfig {
            seeds: vec![3],
            map_size: MapSize::Small,
            max_turns: 8,
            parallel: false,
            ..ArenaConfig::default()
        };
        let sequential = run_arena(AiKind::Random, AiKind::Greedy, &base).unwrap();
        let parallel = run_arena(
            AiKind::Random,
            AiKind::Greedy,
            &ArenaConfig {
                parallel: true,
                ..base
            },
        )
        .unwrap();
        let winners: Vec<_> = sequential.iter().map(|o| o.winning_ai()).collect();
        let par_winners: Vec<_> = parallel.iter().map(|o| o.winning_ai()).collect();
        assert_eq!(winners, par_winners);
    }
}
