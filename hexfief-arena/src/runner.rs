//! Single-match execution against the engine surface

use hexfief_core::{apply_action, generate_map, Action, MapConfig, MapError, PlayerId};
use tracing::debug;

use crate::config::{AiKind, ArenaConfig};

/// How a finished match was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecidedBy {
    /// The engine reported a single surviving player.
    Elimination,
    /// Turn cap reached; more hexes wins.
    HexCount,
    /// Turn cap reached with an exact hex tie.
    Draw,
}

/// Result of one match. `winner` is a raw player id; use `winning_ai` to
/// account for side swaps.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    pub seed: u64,
    pub swapped: bool,
    pub winner: Option<PlayerId>,
    pub decided_by: DecidedBy,
    pub turns: u32,
    pub hex_counts: [usize; 2],
}

impl MatchOutcome {
    /// Index (0 = first configured AI, 1 = second) of the winner.
    pub fn winning_ai(&self) -> Option<usize> {
        self.winner.map(|pid| {
            if self.swapped {
                1 - pid as usize
            } else {
                pid as usize
            }
        })
    }
}

/// Play one two-player match from a seed: generate the map, alternate
/// turns until the engine reports a winner or the turn cap hits, then
/// apply the hex-count tie-break. Deterministic apart from any wall-clock
/// search inside the players.
pub fn run_match(
    first: AiKind,
    second: AiKind,
    seed: u64,
    config: &ArenaConfig,
) -> Result<MatchOutcome, MapError> {
    let (width, height) = config.map_size.dimensions();
    let map_config = MapConfig::new(width, height, 2, seed)?;
    let mut state = generate_map(&map_config)?;
    state.start_turn();

    let mut players = [
        first.build(0, seed, config.ai_time_budget),
        second.build(1, seed, config.ai_time_budget),
    ];

    while !state.game_over() && state.turn() < config.max_turns {
        let idx = state.current_index();
        let report = players[idx].take_turn(&mut state);
        debug!(seed, player = idx, actions = report.actions, "turn done");
        if report.actions == 0 {
            // A stalled player still has to hand the turn over.
            let _ = apply_action(&mut state, Action::EndTurn);
        }
    }

    let hex_counts = [state.hex_count(0), state.hex_count(1)];
    let (winner, decided_by) = if state.game_over() && state.winner().is_some() {
        (state.winner(), DecidedBy::Elimination)
    } else if hex_counts[0] != hex_counts[1] {
        let leader = if hex_counts[0] > hex_counts[1] { 0 } else { 1 };
        (Some(leader), DecidedBy::HexCount)
    } else {
        (None, DecidedBy::Draw)
    };

    Ok(MatchOutcome {
        seed,
        swapped: false,
        winner,
        decided_by,
        turns: state.turn(),
        hex_counts,
    })
}
