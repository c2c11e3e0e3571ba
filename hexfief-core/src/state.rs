//! Full game state and turn engine
//!
//! Owns the grid, the (always rebuilt) territory partition, the players,
//! and the phase machine. Every turn runs buying -> acting -> ending;
//! turn-start effects (acted-flag reset, economy settlement, vegetation
//! growth) fire once before the player may act.

use std::cmp::Reverse;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::action::IllegalAction;
use crate::grid::{Coord, HexGrid, PlayerId, Structure, Terrain};
use crate::territory::Territory;
use crate::units::{Power, CASTLE_COST, UNIT_COST};

/// A participant. Ids equal turn-order indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub alive: bool,
}

/// Phases of the active player's turn. Purchases come first; the first
/// move or attack locks the turn into `Acting`, and the explicit end-turn
/// action passes through `Ending` to the next alive player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Buying,
    Acting,
    Ending,
}

/// Knobs for a territory rebuild triggered by a capture.
#[derive(Clone, Debug, Default)]
pub struct RefreshOptions {
    /// Source hex of the capturing unit; its old territory wins merge
    /// ties between equally sized territories.
    pub merge_priority: Option<Coord>,
    /// Dispossessed owner and the danger zone its replacement capital
    /// should avoid when another site exists.
    pub capital_avoid: Option<(PlayerId, FxHashSet<Coord>)>,
}

/// Per-player roll-up for logging and external harnesses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub alive: bool,
    pub territories: usize,
    pub hexes: usize,
    pub units: usize,
    pub gold: i32,
}

/// The full game: grid, territory partition, players, phase, turn.
///
/// `Clone` yields a fully independent deep copy sharing no mutable
/// storage, so speculative evaluation of a clone can never corrupt the
/// original.
#[derive(Clone, Debug)]
pub struct GameState {
    grid: HexGrid,
    territories: Vec<Territory>,
    players: Vec<Player>,
    current_idx: usize,
    phase: Phase,
    turn: u32,
    game_over: bool,
    winner: Option<PlayerId>,
}

impl GameState {
    /// Wrap a prepared grid. Callers kick the game off with `start_turn`.
    pub fn new(grid: HexGrid, players: usize) -> Self {
        let players = (0..players)
            .map(|i| Player {
                id: i as PlayerId,
                alive: true,
            })
            .collect();
        let mut state = Self {
            grid,
            territories: Vec::new(),
            players,
            current_idx: 0,
            phase: Phase::Buying,
            turn: 0,
            game_over: false,
            winner: None,
        };
        state.refresh_territories();
        state
    }

    /// Build a state from rows of map characters, for tests and tools:
    /// `~` water, `.` unowned land, digits owned land. Units and
    /// structures are placed afterwards through `grid_mut`.
    pub fn from_rows(rows: &[&str], players: usize) -> Self {
        let height = rows.len() as i16;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i16;
        let mut grid = HexGrid::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let c = Coord::new(col as i16, row as i16);
                match ch {
                    '~' => {}
                    '.' => grid[c].terrain = Terrain::Plain,
                    d if d.is_ascii_digit() => {
                        grid[c].terrain = Terrain::Plain;
                        grid[c].owner = Some(d as u8 - b'0');
                    }
                    _ => {}
                }
            }
        }
        Self::new(grid, players)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Mutable grid access for the in-place search path and scenario
    /// setup. Callers that change ownership must refresh territories.
    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_index(&self) -> usize {
        self.current_idx
    }

    pub fn current_player(&self) -> Player {
        self.players[self.current_idx]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_alive(&self, pid: PlayerId) -> bool {
        self.players
            .get(pid as usize)
            .is_some_and(|p| p.alive)
    }

    /// Territories owned by `pid`, in refresh order.
    pub fn territories_of(&self, pid: PlayerId) -> impl Iterator<Item = &Territory> + '_ {
        self.territories.iter().filter(move |t| t.owner == pid)
    }

    /// The `idx`-th territory of `pid` in refresh order.
    pub fn player_territory(&self, pid: PlayerId, idx: usize) -> Option<&Territory> {
        self.territories_of(pid).nth(idx)
    }

    pub fn hex_count(&self, pid: PlayerId) -> usize {
        self.grid
            .land_coords()
            .filter(|&c| self.grid[c].owner == Some(pid))
            .count()
    }

    pub fn unit_count(&self, pid: PlayerId) -> usize {
        self.grid
            .land_coords()
            .filter(|&c| self.grid[c].owner == Some(pid) && self.grid[c].has_unit())
            .count()
    }

    pub fn summaries(&self) -> Vec<PlayerSummary> {
        self.players
            .iter()
            .map(|p| PlayerSummary {
                id: p.id,
                alive: p.alive,
                territories: self.territories_of(p.id).count(),
                hexes: self.hex_count(p.id),
                units: self.unit_count(p.id),
                gold: self.territories_of(p.id).map(|t| t.gold).sum(),
            })
            .collect()
    }

    // ========================================================================
    // TERRITORY REFRESH
    // ========================================================================

    /// Rebuild the territory partition from scratch by flood-filling over
    /// land hexes. Merged territories pool their gold; split fragments
    /// keep gold only where the old capital still stands.
    pub fn refresh_territories(&mut self) {
        self.refresh_territories_with(RefreshOptions::default());
    }

    pub fn refresh_territories_with(&mut self, opts: RefreshOptions) {
        // Where capitals stood, and what they banked.
        let mut old_caps: FxHashMap<Coord, (PlayerId, i32, usize)> = FxHashMap::default();
        for t in &self.territories {
            if let Some(cap) = t.capital {
                old_caps.insert(cap, (t.owner, t.gold, t.size()));
            }
        }

        // Which old capital backs the capturing unit's home territory.
        let priority_cap = opts.merge_priority.and_then(|pos| {
            self.territories
                .iter()
                .find(|t| t.contains(pos))
                .and_then(|t| t.capital)
        });

        let land: Vec<Coord> = self.grid.land_coords().collect();
        for &c in &land {
            if self.grid[c].structure == Structure::Capital {
                self.grid[c].structure = Structure::None;
            }
        }

        let mut visited: FxHashSet<Coord> = FxHashSet::default();
        let mut territories = Vec::new();
        for &c in &land {
            if visited.contains(&c) {
                continue;
            }
            let owner = match self.grid[c].owner {
                Some(o) => o,
                None => continue,
            };
            let region = self.grid.owner_region(c);
            visited.extend(region.iter().copied());
            territories.push(Territory::new(owner, region));
        }

        for t in &mut territories {
            let mut merged: Vec<(Coord, i32, usize)> = t
                .cells
                .iter()
                .filter_map(|&c| {
                    old_caps
                        .get(&c)
                        .filter(|&&(owner, _, _)| owner == t.owner)
                        .map(|&(_, gold, size)| (c, gold, size))
                })
                .collect();
            t.gold = merged.iter().map(|&(_, gold, _)| gold).sum();

            // Largest merged territory keeps its capital; the capturing
            // side wins size ties, then scan order.
            merged.sort_by_key(|&(c, _, size)| {
                (Reverse(size), Reverse(priority_cap == Some(c)), c)
            });
            let preferred = merged.first().map(|&(c, _, _)| c);
            let avoid = opts
                .capital_avoid
                .as_ref()
                .filter(|(owner, _)| *owner == t.owner)
                .map(|(_, zone)| zone);
            t.ensure_capital(&mut self.grid, avoid, preferred);
        }

        self.territories = territories;
    }

    // ========================================================================
    // TURN PROGRESSION
    // ========================================================================

    /// Turn-start effects for the active player, applied once before any
    /// action: acted flags reset, economy settled (skipped on the opening
    /// round), vegetation grown, territories refreshed, eliminations and
    /// victory checked.
    pub fn start_turn(&mut self) {
        if self.game_over {
            return;
        }
        let player = self.players[self.current_idx];
        if !player.alive {
            self.advance_turn();
            return;
        }
        let pid = player.id;

        let land: Vec<Coord> = self.grid.land_coords().collect();
        for &c in &land {
            let cell = &mut self.grid[c];
            if cell.owner == Some(pid) && cell.has_unit() {
                cell.acted = false;
            }
        }

        if self.turn > 0 {
            for i in 0..self.territories.len() {
                if self.territories[i].owner == pid {
                    self.territories[i].settle(&mut self.grid);
                }
            }
        }

        self.grow_vegetation(pid);
        self.refresh_territories();

        if self.territories_of(pid).next().is_none() {
            self.players[self.current_idx].alive = false;
        }
        self.check_victory();
        if !self.game_over {
            self.phase = Phase::Buying;
            if !self.players[self.current_idx].alive {
                self.advance_turn();
            }
        }
    }

    /// Hand the turn to the next player and run their turn-start effects.
    pub fn advance_turn(&mut self) {
        if self.game_over {
            return;
        }
        self.phase = Phase::Ending;
        self.current_idx = (self.current_idx + 1) % self.players.len();
        if self.current_idx == 0 {
            self.turn += 1;
        }
        self.start_turn();
    }

    pub(crate) fn end_turn(&mut self) {
        self.advance_turn();
    }

    /// First move or attack of the turn closes the buying window.
    pub(crate) fn begin_acting(&mut self) {
        if !self.game_over && self.phase == Phase::Buying {
            self.phase = Phase::Acting;
        }
    }

    /// Deterministic vegetation growth, resolved against a snapshot taken
    /// before any change so new trees never cascade within one pass. The
    /// active player's graves sprout (palm on the coast, pine inland);
    /// trees of any owner spread onto the active player's open cells --
    /// one adjacent palm suffices on the coast, inland needs two pines.
    fn grow_vegetation(&mut self, pid: PlayerId) {
        let land: Vec<Coord> = self.grid.land_coords().collect();

        let mut palms = FxHashSet::default();
        let mut pines = FxHashSet::default();
        for &c in &land {
            match self.grid[c].terrain {
                Terrain::Palm => {
                    palms.insert(c);
                }
                Terrain::Pine => {
                    pines.insert(c);
                }
                _ => {}
            }
        }

        for &c in &land {
            if self.grid[c].owner != Some(pid) || self.grid[c].terrain != Terrain::Grave {
                continue;
            }
            let coastal = self.grid.is_coastal(c);
            self.grid[c].terrain = if coastal { Terrain::Palm } else { Terrain::Pine };
        }

        let mut sprouts: Vec<(Coord, Terrain)> = Vec::new();
        for &c in &land {
            let cell = &self.grid[c];
            if cell.owner != Some(pid) || !cell.is_open() {
                continue;
            }
            if self.grid.is_coastal(c) {
                if self.grid.neighbors(c).any(|n| palms.contains(&n)) {
                    sprouts.push((c, Terrain::Palm));
                }
            } else if self.grid.neighbors(c).filter(|n| pines.contains(n)).count() >= 2 {
                sprouts.push((c, Terrain::Pine));
            }
        }
        for (c, terrain) in sprouts {
            self.grid[c].terrain = terrain;
        }
    }

    /// Players stripped of their last hex are eliminated on the spot.
    fn mark_eliminated(&mut self) {
        let mut holds_land = vec![false; self.players.len()];
        for c in self.grid.land_coords() {
            if let Some(owner) = self.grid[c].owner {
                if let Some(flag) = holds_land.get_mut(owner as usize) {
                    *flag = true;
                }
            }
        }
        for p in &mut self.players {
            if p.alive && !holds_land[p.id as usize] {
                p.alive = false;
            }
        }
    }

    fn check_victory(&mut self) {
        let mut alive = self.players.iter().filter(|p| p.alive);
        let first = alive.next();
        if alive.next().is_none() {
            self.game_over = true;
            self.winner = first.map(|p| p.id);
            self.phase = Phase::Ending;
        }
    }

    // ========================================================================
    // MUTATING PRIMITIVES (validated; called by the action layer)
    // ========================================================================

    /// Global index of the active player's `idx`-th territory.
    fn resolve_territory(&self, pid: PlayerId, idx: usize) -> Result<usize, IllegalAction> {
        self.territories
            .iter()
            .enumerate()
            .filter(|(_, t)| t.owner == pid)
            .nth(idx)
            .map(|(i, _)| i)
            .ok_or(IllegalAction::UnknownTerritory)
    }

    /// Buy a level-1 unit onto a cell of the given territory: placed on an
    /// open, tree, or grave cell, or combined into a stationed unit.
    pub(crate) fn buy_unit(&mut self, territory: usize, at: Coord) -> Result<(), IllegalAction> {
        let pid = self.current_player().id;
        let t_idx = self.resolve_territory(pid, territory)?;
        if self.territories[t_idx].gold < UNIT_COST {
            return Err(IllegalAction::InsufficientGold {
                have: self.territories[t_idx].gold,
                need: UNIT_COST,
            });
        }
        if !self.territories[t_idx].contains(at) {
            return Err(IllegalAction::OutsideTerritory);
        }

        let cell = &mut self.grid[at];
        if cell.has_unit() {
            match cell.unit.combine(Power::ONE) {
                Some(combined) => cell.unit = combined,
                None => return Err(IllegalAction::OverPowerCap),
            }
        } else if cell.is_open() || cell.has_tree() || cell.is_grave() {
            cell.unit = Power::ONE;
            cell.terrain = Terrain::Plain;
        } else {
            return Err(IllegalAction::CellOccupied);
        }
        cell.acted = false;
        self.territories[t_idx].gold -= UNIT_COST;
        Ok(())
    }

    /// Buy a castle onto an open or grave cell of the given territory.
    pub(crate) fn buy_structure(
        &mut self,
        territory: usize,
        at: Coord,
    ) -> Result<(), IllegalAction> {
        let pid = self.current_player().id;
        let t_idx = self.resolve_territory(pid, territory)?;
        if self.territories[t_idx].gold < CASTLE_COST {
            return Err(IllegalAction::InsufficientGold {
                have: self.territories[t_idx].gold,
                need: CASTLE_COST,
            });
        }
        if !self.territories[t_idx].contains(at) {
            return Err(IllegalAction::OutsideTerritory);
        }

        let cell = &mut self.grid[at];
        let placeable = matches!(cell.terrain, Terrain::Plain | Terrain::Grave)
            && !cell.has_unit()
            && cell.structure == Structure::None;
        if !placeable {
            return Err(IllegalAction::CellOccupied);
        }
        cell.structure = Structure::Castle;
        cell.terrain = Terrain::Plain;
        self.territories[t_idx].gold -= CASTLE_COST;
        Ok(())
    }

    fn validate_unit_source(&self, from: Coord) -> Result<usize, IllegalAction> {
        let pid = self.current_player().id;
        let cell = self.grid.get(from).ok_or(IllegalAction::UnknownCoord)?;
        if cell.owner != Some(pid) || !cell.has_unit() {
            return Err(IllegalAction::NoUnit);
        }
        if cell.acted {
            return Err(IllegalAction::UnitExhausted);
        }
        self.territories
            .iter()
            .position(|t| t.owner == pid && t.contains(from))
            .ok_or(IllegalAction::NoUnit)
    }

    /// Reposition a unit inside its own territory. Landing on a tree chops
    /// it and on a grave clears it; landing on a friendly unit combines
    /// (rejected past the power cap). The unit's acted flag is set.
    pub(crate) fn move_within(&mut self, from: Coord, to: Coord) -> Result<(), IllegalAction> {
        let t_idx = self.validate_unit_source(from)?;
        if from == to || !self.territories[t_idx].contains(to) {
            return Err(IllegalAction::OutsideTerritory);
        }

        let unit = self.grid[from].unit;
        let target = self.grid[to];
        let landed = if target.has_unit() {
            target
                .unit
                .combine(unit)
                .ok_or(IllegalAction::OverPowerCap)?
        } else if target.is_open() || target.has_tree() || target.is_grave() {
            unit
        } else {
            return Err(IllegalAction::CellOccupied);
        };

        self.grid[to].unit = landed;
        self.grid[to].terrain = Terrain::Plain;
        self.grid[to].acted = true;
        self.grid[from].clear_unit();
        Ok(())
    }

    /// Capture an adjacent hostile hex: the attacker's power must strictly
    /// exceed the target's defense bubble. Structures on the target are
    /// destroyed (a lost capital forfeits its treasury), the attacking
    /// unit is spent, and the territory partition is rebuilt.
    pub(crate) fn attack(&mut self, from: Coord, to: Coord) -> Result<(), IllegalAction> {
        let pid = self.current_player().id;
        let t_idx = self.validate_unit_source(from)?;

        let target = *self.grid.get(to).ok_or(IllegalAction::UnknownCoord)?;
        if !target.is_land() || target.owner == Some(pid) {
            return Err(IllegalAction::NotHostile);
        }
        let adjacent = self.territories[t_idx]
            .cells
            .iter()
            .any(|&c| self.grid.neighbors(c).any(|n| n == to));
        if !adjacent {
            return Err(IllegalAction::NotAdjacent);
        }
        let power = self.grid[from].unit.level();
        let defense = self.grid.defense_bubble(to);
        if power <= defense {
            return Err(IllegalAction::DefenseNotBeaten { power, defense });
        }

        let old_owner = target.owner;
        let captured_capital = target.structure == Structure::Capital;

        let unit = self.grid[from].unit;
        let cell = &mut self.grid[to];
        cell.owner = Some(pid);
        cell.unit = unit;
        cell.structure = Structure::None;
        cell.terrain = Terrain::Plain;
        cell.acted = true;
        self.grid[from].clear_unit();

        let mut opts = RefreshOptions {
            merge_priority: Some(from),
            capital_avoid: None,
        };
        if captured_capital {
            if let Some(old) = old_owner {
                let mut zone: FxHashSet<Coord> = self.grid.neighbors(to).collect();
                zone.insert(to);
                opts.capital_avoid = Some((old, zone));
            }
        }
        self.refresh_territories_with(opts);
        self.mark_eliminated();
        self.check_victory();
        Ok(())
    }

    pub(crate) fn stake_territories(&mut self, gold: i32) {
        for t in &mut self.territories {
            t.gold = gold;
        }
    }

    // ========================================================================
    // VALIDATION (development / test builds)
    // ========================================================================

    /// Development-time check of the territory partition: every territory
    /// must be a maximal connected same-owner component, no cell may
    /// appear twice, and every owned land cell must be covered. Panics on
    /// violation; never part of the production flow.
    pub fn assert_consistent(&self) {
        let mut seen: FxHashSet<Coord> = FxHashSet::default();
        for t in &self.territories {
            for &c in &t.cells {
                assert!(
                    seen.insert(c),
                    "cell {c} appears in more than one territory"
                );
                assert_eq!(
                    self.grid[c].owner,
                    Some(t.owner),
                    "territory member {c} not owned by territory owner"
                );
            }
            for &c in &t.cells {
                for n in self.grid.neighbors(c) {
                    if self.grid[n].is_land() && self.grid[n].owner == Some(t.owner) {
                        assert!(
                            t.contains(n),
                            "territory of player {} is not maximal at {n}",
                            t.owner
                        );
                    }
                }
            }
        }
        for c in self.grid.land_coords() {
            if let Some(owner) = self.grid[c].owner {
                assert!(
                    seen.contains(&c),
                    "owned cell {c} (player {owner}) missing from every territory"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sided() -> GameState {
        // Player 0 on the left half, player 1 on the right.
        GameState::from_rows(&["00011", "00011", "00011"], 2)
    }

    #[test]
    fn test_refresh_builds_maximal_components() {
        let state = two_sided();
        assert_eq!(state.territories().len(), 2);
        state.assert_consistent();
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut state = two_sided();
        let before: Vec<(PlayerId, Vec<Coord>)> = state
            .territories()
            .iter()
            .map(|t| (t.owner, t.cells.clone()))
            .collect();
        state.refresh_territories();
        let after: Vec<(PlayerId, Vec<Coord>)> = state
            .territories()
            .iter()
            .map(|t| (t.owner, t.cells.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_split_keeps_gold_at_capital() {
        let mut state = GameState::from_rows(&["00000"], 1);
        state.territories[0].gold = 40;
        let cap = state.territories[0].capital.unwrap();
        // Sever the strip at (2,0): the fragment holding the capital keeps
        // the treasury, the other starts broke.
        state.grid_mut()[Coord::new(2, 0)].owner = None;
        state.refresh_territories();
        assert_eq!(state.territories().len(), 2);
        for t in state.territories() {
            if t.contains(cap) {
                assert_eq!(t.gold, 40);
            } else {
                assert_eq!(t.gold, 0);
            }
        }
    }

    #[test]
    fn test_merge_pools_gold() {
        let mut state = GameState::from_rows(&["00~00"], 1);
        assert_eq!(state.territories().len(), 2);
        for t in &mut state.territories {
            t.gold = 15;
        }
        // Bridge the gap.
        state.grid_mut()[Coord::new(2, 0)].terrain = Terrain::Plain;
        state.grid_mut()[Coord::new(2, 0)].owner = Some(0);
        state.refresh_territories();
        assert_eq!(state.territories().len(), 1);
        assert_eq!(state.territories()[0].gold, 30);
    }

    #[test]
    fn test_start_turn_resets_acted_flags() {
        let mut state = two_sided();
        let c = Coord::new(0, 0);
        state.grid_mut()[c].unit = Power::ONE;
        state.grid_mut()[c].acted = true;
        state.start_turn();
        assert!(!state.grid()[c].acted);
    }

    #[test]
    fn test_economy_settles_on_later_turns() {
        let mut state = two_sided();
        state.stake_territories(10);
        state.start_turn(); // turn 0: no settlement
        assert_eq!(state.territories_of(0).next().unwrap().gold, 10);

        state.advance_turn(); // player 1, still turn 0
        state.advance_turn(); // back to player 0, turn 1: income lands
        let t = state.territories_of(0).next().unwrap();
        assert_eq!(t.gold, 10 + 9);
    }

    #[test]
    fn test_graves_sprout_on_owners_turn() {
        let mut state = two_sided();
        let c = Coord::new(0, 0);
        state.grid_mut()[c].terrain = Terrain::Grave;
        state.start_turn();
        // (0,0) touches the map edge, so the sprout is a palm.
        assert_eq!(state.grid()[c].terrain, Terrain::Palm);
    }

    #[test]
    fn test_growth_does_not_cascade() {
        // A single palm on the coast spreads one ring per turn, not a
        // whole flood: cells adjacent only to NEW palms stay bare.
        let mut state = GameState::from_rows(&["0000"], 1);
        state.grid_mut()[Coord::new(0, 0)].terrain = Terrain::Palm;
        state.start_turn();
        assert_eq!(state.grid()[Coord::new(1, 0)].terrain, Terrain::Palm);
        assert_eq!(state.grid()[Coord::new(2, 0)].terrain, Terrain::Plain);
    }

    #[test]
    fn test_inland_pine_needs_two_sources() {
        // Interior cell of a 5x5 block with a single pine neighbor: no
        // spread. With two pine neighbors: spreads.
        let mut state = GameState::from_rows(&["00000", "00000", "00000", "00000", "00000"], 1);
        state.grid_mut()[Coord::new(1, 2)].terrain = Terrain::Pine;
        state.start_turn();
        assert_eq!(state.grid()[Coord::new(2, 2)].terrain, Terrain::Plain);

        let mut state = GameState::from_rows(&["00000", "00000", "00000", "00000", "00000"], 1);
        state.grid_mut()[Coord::new(1, 2)].terrain = Terrain::Pine;
        state.grid_mut()[Coord::new(3, 2)].terrain = Terrain::Pine;
        state.start_turn();
        assert_eq!(state.grid()[Coord::new(2, 2)].terrain, Terrain::Pine);
    }

    #[test]
    fn test_victory_single_survivor() {
        let mut state = two_sided();
        // Player 1 loses every hex.
        for c in state.grid().land_coords().collect::<Vec<_>>() {
            if state.grid()[c].owner == Some(1) {
                state.grid_mut()[c].owner = Some(0);
            }
        }
        state.refresh_territories();
        state.mark_eliminated();
        state.check_victory();
        assert!(state.game_over());
        assert_eq!(state.winner(), Some(0));
        assert_eq!(state.phase(), Phase::Ending);
    }

    #[test]
    fn test_clone_is_isolated() {
        let state = two_sided();
        let mut copy = state.clone();
        copy.grid_mut()[Coord::new(0, 0)].owner = Some(1);
        copy.refresh_territories();
        assert_eq!(state.grid()[Coord::new(0, 0)].owner, Some(0));
        assert_eq!(state.territories().len(), 2);
    }

    #[test]
    fn test_dead_players_are_skipped() {
        let mut state = GameState::from_rows(&["0011", "0011"], 3);
        // Player 2 owns nothing and dies at its first turn start.
        state.start_turn();
        state.advance_turn(); // to player 1
        assert_eq!(state.current_player().id, 1);
        state.advance_turn(); // player 2 is dead, turn passes to player 0
        assert_eq!(state.current_player().id, 0);
        assert!(!state.is_alive(2));
        assert!(!state.game_over());
    }

    #[test]
    fn test_summaries_roll_up() {
        let mut state = two_sided();
        state.stake_territories(10);
        state.grid_mut()[Coord::new(0, 0)].unit = Power::ONE;
        let sums = state.summaries();
        assert_eq!(sums.len(), 2);
        assert_eq!(sums[0].hexes, 9);
        assert_eq!(sums[0].units, 1);
        assert_eq!(sums[0].gold, 10);
        assert_eq!(sums[1].hexes, 6);
    }
}
