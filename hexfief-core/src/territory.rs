//! Territories: connected same-owner regions sharing one treasury
//!
//! Territories are ephemeral. A single ownership flip can merge or split
//! arbitrarily many of them, so they are always rebuilt from scratch by
//! `GameState::refresh_territories` and never patched in place.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::grid::{Coord, HexGrid, PlayerId, Structure, Terrain};
use crate::units::{CASTLE_COST, UNIT_COST};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Territory {
    pub owner: PlayerId,
    /// Member coordinates in flood-fill discovery order.
    pub cells: Vec<Coord>,
    /// Signed treasury; settles once per turn and on purchases.
    pub gold: i32,
    pub capital: Option<Coord>,
}

impl Territory {
    pub fn new(owner: PlayerId, cells: Vec<Coord>) -> Self {
        Self {
            owner,
            cells,
            gold: 0,
            capital: None,
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    /// Gross income: one gold per member hex, trees and graves excluded.
    pub fn income(&self, grid: &HexGrid) -> i32 {
        self.cells.iter().filter(|&&c| grid[c].produces_income()).count() as i32
    }

    /// Total upkeep owed by the units stationed here.
    pub fn wages(&self, grid: &HexGrid) -> i32 {
        self.cells.iter().map(|&c| grid[c].unit.wage()).sum()
    }

    /// Income minus wages; can be negative.
    pub fn net_income(&self, grid: &HexGrid) -> i32 {
        self.income(grid) - self.wages(grid)
    }

    /// Member cells occupied by a unit that may still act this turn.
    pub fn movable_units<'a>(&'a self, grid: &'a HexGrid) -> impl Iterator<Item = Coord> + 'a {
        self.cells
            .iter()
            .copied()
            .filter(|&c| grid[c].has_unit() && !grid[c].acted)
    }

    /// Land hexes adjacent to the territory but not part of it: attack
    /// targets and expansion points.
    pub fn border(&self, grid: &HexGrid) -> Vec<Coord> {
        let members: FxHashSet<Coord> = self.cells.iter().copied().collect();
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for &c in &self.cells {
            for n in grid.neighbors(c) {
                if grid[n].is_land() && !members.contains(&n) && seen.insert(n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Border hexes held by another player.
    pub fn enemy_border(&self, grid: &HexGrid) -> Vec<Coord> {
        self.border(grid)
            .into_iter()
            .filter(|&c| grid[c].owner.is_some_and(|o| o != self.owner))
            .collect()
    }

    /// Border hexes nobody owns.
    pub fn neutral_border(&self, grid: &HexGrid) -> Vec<Coord> {
        self.border(grid)
            .into_iter()
            .filter(|&c| grid[c].owner.is_none())
            .collect()
    }

    pub fn can_afford_unit(&self) -> bool {
        self.gold >= UNIT_COST
    }

    pub fn can_afford_castle(&self) -> bool {
        self.gold >= CASTLE_COST
    }

    /// Apply one turn of income and wages. A negative balance bankrupts
    /// the territory on the spot: every unit dies to a grave and the
    /// treasury resets to exactly zero. Returns whether that happened.
    pub fn settle(&mut self, grid: &mut HexGrid) -> bool {
        self.gold += self.net_income(grid);
        if self.gold >= 0 {
            return false;
        }
        for &c in &self.cells {
            grid[c].kill_unit();
        }
        self.gold = 0;
        true
    }

    /// Territories of two or more hexes must carry a capital; single-hex
    /// territories carry none. `preferred` (a surviving capital chosen by
    /// the merge rule) wins outright. Otherwise the site is the open cell
    /// farthest from other players' land, steering clear of `avoid` when
    /// possible, ties broken by scan order. With no open cell a castle is
    /// demolished, then the strongest unit is disbanded, then a tree cell
    /// is cleared.
    pub(crate) fn ensure_capital(
        &mut self,
        grid: &mut HexGrid,
        avoid: Option<&FxHashSet<Coord>>,
        preferred: Option<Coord>,
    ) {
        if self.size() < 2 {
            for &c in &self.cells {
                if grid[c].structure == Structure::Capital {
                    grid[c].structure = Structure::None;
                }
            }
            self.capital = None;
            return;
        }

        if let Some(p) = preferred {
            if self.contains(p) {
                self.place_capital(grid, p);
                return;
            }
        }

        let mut candidates: Vec<Coord> = self
            .cells
            .iter()
            .copied()
            .filter(|&c| {
                !grid[c].has_unit() && grid[c].structure == Structure::None && !grid[c].has_tree()
            })
            .collect();
        if let Some(avoid) = avoid {
            let safe: Vec<Coord> = candidates
                .iter()
                .copied()
                .filter(|c| !avoid.contains(c))
                .collect();
            if !safe.is_empty() {
                candidates = safe;
            }
        }
        if !candidates.is_empty() {
            candidates.sort();
            let hostile: Vec<Coord> = grid
                .land_coords()
                .filter(|&c| grid[c].owner.is_some_and(|o| o != self.owner))
                .collect();
            let clearance =
                |c: Coord| hostile.iter().map(|&h| c.distance(h)).min().unwrap_or(i16::MAX);
            let mut best = candidates[0];
            let mut best_clearance = clearance(best);
            for &c in &candidates[1..] {
                let d = clearance(c);
                if d > best_clearance {
                    best = c;
                    best_clearance = d;
                }
            }
            self.place_capital(grid, best);
            return;
        }

        // No open cell: a castle makes way first.
        if let Some(&c) = self
            .cells
            .iter()
            .find(|&&c| grid[c].structure == Structure::Castle)
        {
            grid[c].structure = Structure::None;
            self.place_capital(grid, c);
            return;
        }

        // Then the strongest unit is disbanded.
        let strongest = self
            .cells
            .iter()
            .copied()
            .filter(|&c| grid[c].has_unit())
            .max_by_key(|&c| (grid[c].unit, std::cmp::Reverse(c)));
        if let Some(c) = strongest {
            grid[c].kill_unit();
            self.place_capital(grid, c);
            return;
        }

        // All that is left is trees; clear one.
        let c = self.cells[0];
        grid[c].terrain = Terrain::Plain;
        self.place_capital(grid, c);
    }

    fn place_capital(&mut self, grid: &mut HexGrid, c: Coord) {
        let cell = &mut grid[c];
        cell.structure = Structure::Capital;
        if cell.terrain == Terrain::Grave {
            cell.terrain = Terrain::Plain;
        }
        self.capital = Some(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexGrid;
    use crate::units::Power;

    fn owned_strip(len: i16, owner: PlayerId) -> (HexGrid, Territory) {
        let mut grid = HexGrid::new(len, 1);
        let mut cells = Vec::new();
        for col in 0..len {
            let c = Coord::new(col, 0);
            grid[c].terrain = Terrain::Plain;
            grid[c].owner = Some(owner);
            cells.push(c);
        }
        (grid, Territory::new(owner, cells))
    }

    #[test]
    fn test_income_excludes_trees_and_graves() {
        let (mut grid, t) = owned_strip(4, 0);
        grid[Coord::new(1, 0)].terrain = Terrain::Pine;
        grid[Coord::new(2, 0)].terrain = Terrain::Grave;
        assert_eq!(t.income(&grid), 2);
    }

    #[test]
    fn test_wages_sum_over_units() {
        let (mut grid, t) = owned_strip(4, 0);
        grid[Coord::new(0, 0)].unit = Power::new(1).unwrap();
        grid[Coord::new(1, 0)].unit = Power::new(3).unwrap();
        assert_eq!(t.wages(&grid), 2 + 18);
        assert_eq!(t.net_income(&grid), 4 - 20);
    }

    #[test]
    fn test_settle_accumulates() {
        let (mut grid, mut t) = owned_strip(4, 0);
        t.gold = 3;
        assert!(!t.settle(&mut grid));
        assert_eq!(t.gold, 7);
    }

    #[test]
    fn test_settle_bankruptcy_is_total() {
        let (mut grid, mut t) = owned_strip(3, 0);
        grid[Coord::new(0, 0)].unit = Power::new(4).unwrap();
        grid[Coord::new(1, 0)].unit = Power::new(1).unwrap();
        t.gold = 10; // 10 + (3 - 56) < 0
        assert!(t.settle(&mut grid));
        assert_eq!(t.gold, 0);
        for col in 0..3 {
            assert!(!grid[Coord::new(col, 0)].has_unit());
        }
        assert!(grid[Coord::new(0, 0)].is_grave());
        assert!(grid[Coord::new(1, 0)].is_grave());
    }

    #[test]
    fn test_border_partition() {
        let mut grid = HexGrid::new(3, 1);
        for col in 0..3 {
            grid[Coord::new(col, 0)].terrain = Terrain::Plain;
        }
        grid[Coord::new(0, 0)].owner = Some(0);
        grid[Coord::new(1, 0)].owner = Some(1);
        let t = Territory::new(0, vec![Coord::new(0, 0)]);

        assert_eq!(t.border(&grid), vec![Coord::new(1, 0)]);
        assert_eq!(t.enemy_border(&grid), vec![Coord::new(1, 0)]);
        assert!(t.neutral_border(&grid).is_empty());
    }

    #[test]
    fn test_single_hex_territory_has_no_capital() {
        let (mut grid, mut t) = owned_strip(1, 0);
        grid[Coord::new(0, 0)].structure = Structure::Capital;
        t.ensure_capital(&mut grid, None, None);
        assert_eq!(t.capital, None);
        assert_eq!(grid[Coord::new(0, 0)].structure, Structure::None);
    }

    #[test]
    fn test_capital_preferred_site_wins() {
        let (mut grid, mut t) = owned_strip(4, 0);
        t.ensure_capital(&mut grid, None, Some(Coord::new(2, 0)));
        assert_eq!(t.capital, Some(Coord::new(2, 0)));
        assert_eq!(grid[Coord::new(2, 0)].structure, Structure::Capital);
    }

    #[test]
    fn test_capital_avoids_danger_zone() {
        let (mut grid, mut t) = owned_strip(4, 0);
        let avoid: FxHashSet<Coord> = [Coord::new(0, 0), Coord::new(1, 0)].into_iter().collect();
        t.ensure_capital(&mut grid, Some(&avoid), None);
        let cap = t.capital.unwrap();
        assert!(!avoid.contains(&cap));
    }

    #[test]
    fn test_capital_maximizes_enemy_clearance() {
        let (mut grid, mut t) = owned_strip(4, 0);
        // Stretch the map so an enemy sits just past the strip.
        let mut grid5 = HexGrid::new(5, 1);
        for col in 0..5 {
            grid5[Coord::new(col, 0)].terrain = Terrain::Plain;
        }
        for col in 0..4 {
            grid5[Coord::new(col, 0)].owner = Some(0);
        }
        grid5[Coord::new(4, 0)].owner = Some(1);
        grid = grid5;
        t.ensure_capital(&mut grid, None, None);
        // Farthest open cell from the enemy at (4,0) is (0,0).
        assert_eq!(t.capital, Some(Coord::new(0, 0)));
    }

    #[test]
    fn test_capital_falls_back_to_disbanding() {
        let (mut grid, mut t) = owned_strip(2, 0);
        grid[Coord::new(0, 0)].unit = Power::new(1).unwrap();
        grid[Coord::new(1, 0)].unit = Power::new(3).unwrap();
        t.ensure_capital(&mut grid, None, None);
        // The stronger unit made way and no grave remains under the seat.
        assert_eq!(t.capital, Some(Coord::new(1, 0)));
        assert!(!grid[Coord::new(1, 0)].has_unit());
        assert_eq!(grid[Coord::new(1, 0)].terrain, Terrain::Plain);
        assert!(grid[Coord::new(0, 0)].has_unit());
    }
}
