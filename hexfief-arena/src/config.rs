//! Arena configuration: AI registry and map presets

use std::str::FromStr;
use std::time::Duration;

use hexfief_core::{AiPlayer, AlphaBetaAi, GreedyAi, PlayerId, RandomAi};

/// Which player implementation to field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiKind {
    Random,
    Greedy,
    AlphaBeta,
}

impl AiKind {
    pub fn label(self) -> &'static str {
        match self {
            AiKind::Random => "random",
            AiKind::Greedy => "greedy",
            AiKind::AlphaBeta => "alphabeta",
        }
    }

    /// Instantiate a player for one match. `seed` feeds the randomized
    /// players so a match replays identically.
    pub fn build(self, pid: PlayerId, seed: u64, time_budget: Duration) -> Box<dyn AiPlayer> {
        match self {
            AiKind::Random => Box::new(RandomAi::new(pid, seed ^ u64::from(pid))),
            AiKind::Greedy => Box::new(GreedyAi::new(pid)),
            AiKind::AlphaBeta => Box::new(AlphaBetaAi::new(pid, time_budget)),
        }
    }
}

impl FromStr for AiKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(AiKind::Random),
            "greedy" => Ok(AiKind::Greedy),
            "alphabeta" => Ok(AiKind::AlphaBeta),
            other => Err(format!(
                "unknown AI '{other}' (expected random, greedy, or alphabeta)"
            )),
        }
    }
}

/// Map size presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSize {
    Small,
    Medium,
    Large,
}

impl MapSize {
    pub fn dimensions(self) -> (i16, i16) {
        match self {
            MapSize::Small => (12, 8),
            MapSize::Medium => (16, 12),
            MapSize::Large => (24, 16),
        }
    }
}

impl FromStr for MapSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(MapSize::Small),
            "medium" => Ok(MapSize::Medium),
            "large" => Ok(MapSize::Large),
            other => Err(format!(
                "unknown map size '{other}' (expected small, medium, or large)"
            )),
        }
    }
}

/// Settings shared by every match of an arena run.
#[derive(Clone, Debug)]
pub struct ArenaConfig {
    /// Each seed is played twice, sides swapped.
    pub seeds: Vec<u64>,
    pub map_size: MapSize,
    /// Turn cap; at the cap the hex count decides.
    pub max_turns: u32,
    /// Per-turn wall-clock budget for the alpha-beta player.
    pub ai_time_budget: Duration,
    pub parallel: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seeds: (0..10).collect(),
            map_size: MapSize::Medium,
            max_turns: 50,
            ai_time_budget: Duration::from_millis(1000),
            parallel: true,
        }
    }
}

impl ArenaConfig {
    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_map_size(mut self, map_size: MapSize) -> Self {
        self.map_size = map_size;
        self
    }
}
