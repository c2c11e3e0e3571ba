//! Seeded map generation: probabilistic island with cleanup passes
//!
//! Land probability falls off radially from the grid center. Cleanup
//! fills water holes, sinks isolated specks, and keeps only the largest
//! connected landmass; generation retries until enough land survives.
//! Everything draws from one ChaCha8 stream, so a seed fully determines
//! the map.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::grid::{Coord, HexGrid, PlayerId, Terrain};
use crate::state::GameState;

pub const MIN_DIMENSION: i16 = 4;
pub const MAX_DIMENSION: i16 = 64;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Gold staked to every starting territory.
const STARTING_GOLD: i32 = 10;

/// Chance for a land hex to stay unowned, fragmenting the start.
const NEUTRAL_CHANCE: f64 = 0.12;

/// Chance for an empty land hex to start with a tree.
const TREE_CHANCE: f64 = 0.08;

/// Island generation retries before settling for what came out.
const MAX_ATTEMPTS: u32 = 10;

/// Rejected before any state is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map dimensions {width}x{height} outside {MIN_DIMENSION}..={MAX_DIMENSION}")]
    BadDimensions { width: i16, height: i16 },
    #[error("player count {0} outside {MIN_PLAYERS}..={MAX_PLAYERS}")]
    BadPlayerCount(usize),
}

/// Map generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapConfig {
    pub width: i16,
    pub height: i16,
    pub players: usize,
    pub seed: u64,
}

impl MapConfig {
    pub fn new(width: i16, height: i16, players: usize, seed: u64) -> Result<Self, MapError> {
        let config = Self {
            width,
            height,
            players,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        let dims = MIN_DIMENSION..=MAX_DIMENSION;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(MapError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(MapError::BadPlayerCount(self.players));
        }
        Ok(())
    }
}

/// Generate a playable starting state: one contiguous landmass, scattered
/// ownership with neutral gaps, a sprinkling of trees, and every starting
/// territory staked. Deterministic for a given config.
pub fn generate_map(config: &MapConfig) -> Result<GameState, MapError> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let min_land = (config.width as usize * config.height as usize) / 4;
    let mut grid = HexGrid::new(config.width, config.height);

    for _ in 0..MAX_ATTEMPTS {
        grid = raise_island(config, &mut rng);
        fill_holes(&mut grid);
        sink_specks(&mut grid);
        keep_largest_landmass(&mut grid);
        if grid.land_count() >= min_land {
            break;
        }
    }

    // Scatter ownership; neutral gaps keep the early game fragmented.
    let land: Vec<Coord> = grid.land_coords().collect();
    for &c in &land {
        grid[c].owner = if rng.gen::<f64>() < NEUTRAL_CHANCE {
            None
        } else {
            Some(rng.gen_range(0..config.players) as PlayerId)
        };
    }

    for &c in &land {
        if grid[c].terrain == Terrain::Plain && rng.gen::<f64>() < TREE_CHANCE {
            grid[c].terrain = if grid.is_coastal(c) {
                Terrain::Palm
            } else {
                Terrain::Pine
            };
        }
    }

    let mut state = GameState::new(grid, config.players);
    state.stake_territories(STARTING_GOLD);
    Ok(state)
}

/// Radial probability island: likely land near the center, tapering to
/// open water at the edges.
fn raise_island(config: &MapConfig, rng: &mut ChaCha8Rng) -> HexGrid {
    let mut grid = HexGrid::new(config.width, config.height);
    let center_col = f64::from(config.width) / 2.0;
    let center_row = f64::from(config.height) / 2.0;
    let max_dist = f64::from(config.width.min(config.height)) * 0.55;

    for c in grid.coords().collect::<Vec<_>>() {
        let dc = f64::from(c.col) - center_col;
        let dr = f64::from(c.row) - center_row;
        let dist = (dc * dc + dr * dr).sqrt();
        let prob = (1.0 - (dist / max_dist).powf(1.5)).max(0.0);
        if rng.gen::<f64>() < prob * 0.85 + 0.05 {
            grid[c].terrain = Terrain::Plain;
        }
    }
    grid
}

/// Water cells nearly surrounded by land become land.
fn fill_holes(grid: &mut HexGrid) {
    for c in grid.coords().collect::<Vec<_>>() {
        if !grid[c].is_land() {
            let land_neighbors = grid.neighbors(c).filter(|&n| grid[n].is_land()).count();
            if land_neighbors >= 5 {
                grid[c].terrain = Terrain::Plain;
            }
        }
    }
}

/// Land cells with at most one land neighbor sink.
fn sink_specks(grid: &mut HexGrid) {
    for c in grid.coords().collect::<Vec<_>>() {
        if grid[c].is_land() {
            let land_neighbors = grid.neighbors(c).filter(|&n| grid[n].is_land()).count();
            if land_neighbors <= 1 {
                grid[c].terrain = Terrain::Water;
            }
        }
    }
}

/// Sink every landmass except the largest (first found wins ties).
fn keep_largest_landmass(grid: &mut HexGrid) {
    let mut visited: rustc_hash::FxHashSet<Coord> = rustc_hash::FxHashSet::default();
    let mut components: Vec<Vec<Coord>> = Vec::new();

    for c in grid.land_coords().collect::<Vec<_>>() {
        if visited.contains(&c) {
            continue;
        }
        let component = grid.flood_fill(c, |cell| cell.is_land());
        visited.extend(component.iter().copied());
        components.push(component);
    }

    let largest = components
        .iter()
        .enumerate()
        .max_by_key(|(i, comp)| (comp.len(), std::cmp::Reverse(*i)))
        .map(|(i, _)| i);
    for (i, component) in components.into_iter().enumerate() {
        if Some(i) != largest {
            for c in component {
                grid[c].terrain = Terrain::Water;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(MapConfig::new(16, 12, 2, 0).is_ok());
        assert_eq!(
            MapConfig::new(2, 12, 2, 0),
            Err(MapError::BadDimensions {
                width: 2,
                height: 12
            })
        );
        assert_eq!(
            MapConfig::new(16, 12, 1, 0),
            Err(MapError::BadPlayerCount(1))
        );
        assert_eq!(
            MapConfig::new(16, 12, 7, 0),
            Err(MapError::BadPlayerCount(7))
        );
    }

    #[test]
    fn test_same_seed_same_map() {
        let config = MapConfig::new(16, 12, 2, 42).unwrap();
        let a = generate_map(&config).unwrap();
        let b = generate_map(&config).unwrap();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_map(&MapConfig::new(16, 12, 2, 1).unwrap()).unwrap();
        let b = generate_map(&MapConfig::new(16, 12, 2, 2).unwrap()).unwrap();
        assert_ne!(a.grid(), b.grid());
    }

    #[test]
    fn test_single_landmass() {
        for seed in 0..5 {
            let state = generate_map(&MapConfig::new(16, 12, 2, seed).unwrap()).unwrap();
            let grid = state.grid();
            let land: Vec<Coord> = grid.land_coords().collect();
            assert!(!land.is_empty());
            let component = grid.flood_fill(land[0], |cell| cell.is_land());
            assert_eq!(component.len(), land.len(), "seed {seed} left fragments");
        }
    }

    #[test]
    fn test_starting_territories_are_staked() {
        let state = generate_map(&MapConfig::new(16, 12, 2, 7).unwrap()).unwrap();
        assert!(!state.territories().is_empty());
        for t in state.territories() {
            assert_eq!(t.gold, STARTING_GOLD);
        }
        state.assert_consistent();
    }

    #[test]
    fn test_growth_is_deterministic_across_runs() {
        let config = MapConfig::new(12, 8, 2, 11).unwrap();
        let run = || {
            let mut state = generate_map(&config).unwrap();
            state.start_turn();
            for _ in 0..6 {
                state.advance_turn();
            }
            state.grid().clone()
        };
        assert_eq!(run(), run());
    }
}
