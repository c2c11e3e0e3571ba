//! Board evaluation for the one-ply greedy player

use serde::{Deserialize, Serialize};

use crate::grid::PlayerId;
use crate::state::GameState;

/// Evaluation weights. The defaults are tuned so that buying a unit
/// (cost 10, wage 2, power 1) scores net positive and a captured hex
/// swings the total by +5.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Weights {
    pub own_hex: f32,
    pub own_income: f32,
    pub own_gold: f32,
    pub own_power: f32,
    pub enemy_hex: f32,
    pub enemy_power: f32,
    pub bankruptcy_penalty: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            own_hex: 3.0,
            own_income: 1.0,
            own_gold: 0.1,
            own_power: 5.0,
            enemy_hex: 2.0,
            enemy_power: 1.5,
            bankruptcy_penalty: 30.0,
        }
    }
}

/// Score the board from `pid`'s perspective; higher is better.
pub fn evaluate(state: &GameState, pid: PlayerId, weights: &Weights) -> f32 {
    let grid = state.grid();
    let mut score = 0.0f32;

    for territory in state.territories() {
        let power: i32 = territory
            .cells
            .iter()
            .map(|&c| i32::from(grid[c].unit.level()))
            .sum();
        if territory.owner == pid {
            let net = territory.net_income(grid);
            score += territory.size() as f32 * weights.own_hex
                + net as f32 * weights.own_income
                + territory.gold as f32 * weights.own_gold
                + power as f32 * weights.own_power;
            // Flag territories that will go under at the next settlement.
            if territory.gold + net < 0 {
                score -= weights.bankruptcy_penalty;
            }
        } else {
            score -= territory.size() as f32 * weights.enemy_hex
                + power as f32 * weights.enemy_power;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::units::Power;

    #[test]
    fn test_more_hexes_scores_higher() {
        let bigger = GameState::from_rows(&["0001"], 2);
        let smaller = GameState::from_rows(&["0011"], 2);
        let w = Weights::default();
        assert!(evaluate(&bigger, 0, &w) > evaluate(&smaller, 0, &w));
    }

    #[test]
    fn test_bankruptcy_risk_penalized() {
        let mut state = GameState::from_rows(&["00"], 1);
        let w = Weights::default();
        let safe = evaluate(&state, 0, &w);
        // A level-4 unit on two hexes of income settles deep underwater.
        state.grid_mut()[Coord::new(0, 0)].unit = Power::new(4).unwrap();
        state.refresh_territories();
        let risky = evaluate(&state, 0, &w);
        assert!(risky < safe + w.own_power * 4.0);
    }
}
