//! Legal-action enumeration and validated application
//!
//! Actions are plain data; the engine validates and executes them. The AI
//! picks from `legal_actions`, submits through `apply_action`, and a
//! rejection leaves the state untouched with a reason attached.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Coord, Structure, Terrain};
use crate::state::{GameState, Phase};
use crate::units::Power;

/// A player-visible action. Buy actions name a territory by its index in
/// the active player's territory list (refresh order).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    BuyUnit { territory: usize, at: Coord },
    BuyStructure { territory: usize, at: Coord },
    Move { from: Coord, to: Coord },
    Attack { from: Coord, to: Coord },
    EndTurn,
}

/// Why an action was rejected. The state is never mutated on `Err`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("the game is over")]
    GameOver,
    #[error("purchases are only allowed before the first move of the turn")]
    WrongPhase,
    #[error("the active player has no such territory")]
    UnknownTerritory,
    #[error("coordinate is not on the map")]
    UnknownCoord,
    #[error("territory holds {have} gold but needs {need}")]
    InsufficientGold { have: i32, need: i32 },
    #[error("target cell cannot take this placement")]
    CellOccupied,
    #[error("combining would exceed the power cap")]
    OverPowerCap,
    #[error("no unit of the active player at the source cell")]
    NoUnit,
    #[error("unit has already acted this turn")]
    UnitExhausted,
    #[error("destination is outside the unit's territory")]
    OutsideTerritory,
    #[error("target is not adjacent to the unit's territory")]
    NotAdjacent,
    #[error("target is not an enemy or neutral hex")]
    NotHostile,
    #[error("defense {defense} is not beaten by power {power}")]
    DefenseNotBeaten { power: u8, defense: u8 },
}

/// Enumerate every action valid right now, phase-filtered: purchases only
/// while buying, moves and attacks until the turn ends, end-turn always
/// and always last. The enumeration is finite and restartable.
pub fn legal_actions(state: &GameState) -> Vec<Action> {
    let mut actions = Vec::new();
    if state.game_over() {
        return actions;
    }
    let pid = state.current_player().id;
    let grid = state.grid();
    let buying = state.phase() == Phase::Buying;

    for (idx, territory) in state.territories_of(pid).enumerate() {
        if buying && territory.can_afford_unit() {
            for &at in &territory.cells {
                let cell = &grid[at];
                let eligible = if cell.has_unit() {
                    cell.unit.combine(Power::ONE).is_some()
                } else {
                    cell.is_open() || cell.has_tree() || cell.is_grave()
                };
                if eligible {
                    actions.push(Action::BuyUnit { territory: idx, at });
                }
            }
        }
        if buying && territory.can_afford_castle() {
            for &at in &territory.cells {
                let cell = &grid[at];
                if matches!(cell.terrain, Terrain::Plain | Terrain::Grave)
                    && !cell.has_unit()
                    && cell.structure == Structure::None
                {
                    actions.push(Action::BuyStructure { territory: idx, at });
                }
            }
        }

        for from in territory.movable_units(grid) {
            let power = grid[from].unit;
            for &to in &territory.cells {
                if to == from {
                    continue;
                }
                let cell = &grid[to];
                let eligible = if cell.has_unit() {
                    cell.unit.combine(power).is_some()
                } else {
                    cell.is_open() || cell.has_tree() || cell.is_grave()
                };
                if eligible {
                    actions.push(Action::Move { from, to });
                }
            }
            for to in territory.border(grid) {
                if grid[to].owner != Some(pid) && power.level() > grid.defense_bubble(to) {
                    actions.push(Action::Attack { from, to });
                }
            }
        }
    }

    actions.push(Action::EndTurn);
    actions
}

/// Validate and apply one action. All-or-nothing: a rejection reports the
/// reason and leaves the state exactly as it was.
pub fn apply_action(state: &mut GameState, action: Action) -> Result<(), IllegalAction> {
    if state.game_over() {
        return Err(IllegalAction::GameOver);
    }
    match action {
        Action::EndTurn => {
            state.end_turn();
            Ok(())
        }
        Action::BuyUnit { territory, at } => {
            if state.phase() != Phase::Buying {
                return Err(IllegalAction::WrongPhase);
            }
            state.buy_unit(territory, at)
        }
        Action::BuyStructure { territory, at } => {
            if state.phase() != Phase::Buying {
                return Err(IllegalAction::WrongPhase);
            }
            state.buy_structure(territory, at)
        }
        Action::Move { from, to } => {
            state.move_within(from, to)?;
            state.begin_acting();
            Ok(())
        }
        Action::Attack { from, to } => {
            state.attack(from, to)?;
            state.begin_acting();
            Ok(())
        }
    }
}
