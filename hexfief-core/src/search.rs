//! Fast in-place search: apply/undo alpha-beta over a simplified move set
//!
//! The full engine rebuilds territories and settles economies on every
//! capture; none of that can run millions of times per turn. Search
//! therefore mutates the real grid through a reduced action alphabet --
//! adjacent captures, adjacent steps, end-turn -- and undoes every branch
//! on the way out, so no mutation is visible outside the top-level call.
//! For this subset the legality rules match the full engine exactly; the
//! caller re-validates the single chosen action against the full rules
//! before committing it.

use std::fmt;
use std::time::{Duration, Instant};

use crate::grid::{Coord, HexCell, HexGrid, PlayerId, Structure, Terrain};
use crate::units::Power;

const INF: i32 = 100_000;

/// Deadline is polled once per this many visited nodes.
const DEADLINE_CHECK_MASK: u64 = 4095;

/// Simplified action alphabet used during search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchAction {
    /// Take an adjacent hostile hex whose bubble the unit beats.
    Capture { from: Coord, to: Coord },
    /// Reposition onto an adjacent open cell of the same owner.
    Step { from: Coord, to: Coord },
    EndTurn,
}

impl fmt::Display for SearchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchAction::Capture { from, to } => write!(f, "CAPTURE {from}->{to}"),
            SearchAction::Step { from, to } => write!(f, "STEP {from}->{to}"),
            SearchAction::EndTurn => write!(f, "END_TURN"),
        }
    }
}

/// Inverse record for one applied action, opaque to callers. Cell
/// snapshots are written back verbatim, so undo is exact by construction.
pub struct Undo(UndoKind);

enum UndoKind {
    Cells {
        from: Coord,
        to: Coord,
        from_cell: HexCell,
        to_cell: HexCell,
    },
    EndTurn {
        refreshed: Vec<Coord>,
    },
}

/// Search tuning and validation switches.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Ceiling for iterative deepening.
    pub max_depth: u32,
    /// Snapshot the grid before searching and assert bit-identity after
    /// the full apply/undo sequence. Catches asymmetric apply/undo bugs;
    /// off in production flow.
    pub verify_integrity: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 20,
            verify_integrity: false,
        }
    }
}

/// Outcome of one search call.
#[derive(Clone, Copy, Debug)]
pub struct SearchReport {
    /// Best action from the deepest fully completed pass.
    pub action: SearchAction,
    /// Deepest pass that ran to completion (0 when even depth 1 was cut).
    pub depth: u32,
    pub nodes: u64,
    pub score: i32,
    pub elapsed: Duration,
}

/// Simplified legal actions for `pid`: captures first for better cutoff
/// ordering, steps after, end-turn always last.
pub fn search_actions(grid: &HexGrid, pid: PlayerId) -> Vec<SearchAction> {
    let mut captures = Vec::new();
    let mut steps = Vec::new();

    for from in grid.coords() {
        let cell = &grid[from];
        if cell.owner != Some(pid) || !cell.has_unit() || cell.acted {
            continue;
        }
        let power = cell.unit.level();
        for to in grid.neighbors(from) {
            let target = &grid[to];
            if !target.is_land() {
                continue;
            }
            if target.owner != Some(pid) {
                if power > grid.defense_bubble(to) {
                    captures.push(SearchAction::Capture { from, to });
                }
            } else if target.is_open() {
                steps.push(SearchAction::Step { from, to });
            }
        }
    }

    captures.extend(steps);
    captures.push(SearchAction::EndTurn);
    captures
}

/// Own land hexes minus all opponents' land hexes: the cheapest signal
/// that directly tracks the win condition.
pub fn eval_hex_balance(grid: &HexGrid, pid: PlayerId) -> i32 {
    let mut balance = 0;
    for c in grid.coords() {
        let cell = &grid[c];
        if !cell.is_land() {
            continue;
        }
        match cell.owner {
            Some(o) if o == pid => balance += 1,
            Some(_) => balance -= 1,
            None => {}
        }
    }
    balance
}

/// Apply one search action in place. Returns the next active player index
/// and the undo record. Player ids equal turn-order indices.
pub fn apply(
    grid: &mut HexGrid,
    current: usize,
    players: usize,
    action: SearchAction,
) -> (usize, Undo) {
    match action {
        SearchAction::Capture { from, to } => {
            let from_cell = grid[from];
            let to_cell = grid[to];
            grid[to] = HexCell {
                terrain: Terrain::Plain,
                owner: from_cell.owner,
                structure: Structure::None,
                unit: from_cell.unit,
                acted: true,
            };
            grid[from].unit = Power::NONE;
            grid[from].acted = false;
            (
                current,
                Undo(UndoKind::Cells {
                    from,
                    to,
                    from_cell,
                    to_cell,
                }),
            )
        }
        SearchAction::Step { from, to } => {
            let from_cell = grid[from];
            let to_cell = grid[to];
            grid[to].unit = from_cell.unit;
            grid[to].acted = true;
            grid[from].unit = Power::NONE;
            grid[from].acted = false;
            (
                current,
                Undo(UndoKind::Cells {
                    from,
                    to,
                    from_cell,
                    to_cell,
                }),
            )
        }
        SearchAction::EndTurn => {
            let next = (current + 1) % players;
            let pid = next as PlayerId;
            let mut refreshed = Vec::new();
            for col in 0..grid.width() {
                for row in 0..grid.height() {
                    let c = Coord::new(col, row);
                    let cell = &mut grid[c];
                    if cell.owner == Some(pid) && cell.has_unit() && cell.acted {
                        cell.acted = false;
                        refreshed.push(c);
                    }
                }
            }
            (next, Undo(UndoKind::EndTurn { refreshed }))
        }
    }
}

/// Restore the grid to its exact pre-apply state.
pub fn undo(grid: &mut HexGrid, undo: Undo) {
    match undo.0 {
        UndoKind::Cells {
            from,
            to,
            from_cell,
            to_cell,
        } => {
            grid[from] = from_cell;
            grid[to] = to_cell;
        }
        UndoKind::EndTurn { refreshed } => {
            for c in refreshed {
                grid[c].acted = true;
            }
        }
    }
}

struct Searcher<'a> {
    grid: &'a mut HexGrid,
    players: usize,
    max_pid: PlayerId,
    deadline: Instant,
    timed_out: bool,
    nodes: u64,
}

impl Searcher<'_> {
    /// Alpha-beta with max/min chosen by whose turn each node is, not by
    /// recursion parity: end-turn is the only action that flips sides.
    fn alphabeta(&mut self, current: usize, depth: u32, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;
        if self.nodes & DEADLINE_CHECK_MASK == 0 && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        if self.timed_out {
            return 0;
        }
        if depth == 0 {
            return eval_hex_balance(self.grid, self.max_pid);
        }

        let pid = current as PlayerId;
        let maximizing = pid == self.max_pid;
        let actions = search_actions(self.grid, pid);

        if maximizing {
            let mut value = -INF;
            for action in actions {
                let (next, record) = apply(self.grid, current, self.players, action);
                let v = self.alphabeta(next, depth - 1, alpha, beta);
                undo(self.grid, record);
                if self.timed_out {
                    return 0;
                }
                value = value.max(v);
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = INF;
            for action in actions {
                let (next, record) = apply(self.grid, current, self.players, action);
                let v = self.alphabeta(next, depth - 1, alpha, beta);
                undo(self.grid, record);
                if self.timed_out {
                    return 0;
                }
                value = value.min(v);
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        }
    }

    /// One full root pass at a fixed depth. Returns `None` when the
    /// deadline cut the pass short; partial passes never surface.
    fn root_pass(&mut self, current: usize, depth: u32) -> Option<(SearchAction, i32)> {
        let pid = current as PlayerId;
        let mut best = SearchAction::EndTurn;
        let mut best_score = -INF;
        let mut alpha = -INF;

        for action in search_actions(self.grid, pid) {
            let (next, record) = apply(self.grid, current, self.players, action);
            let score = self.alphabeta(next, depth - 1, alpha, INF);
            undo(self.grid, record);
            if self.timed_out {
                return None;
            }
            if score > best_score {
                best_score = score;
                best = action;
            }
            alpha = alpha.max(score);
        }
        Some((best, best_score))
    }
}

/// Iterative-deepening alpha-beta under a wall-clock budget. The result
/// is always the best action of the deepest pass that ran to completion;
/// on deadline expiry mid-pass the previous depth's answer stands.
pub fn search_best_action(
    grid: &mut HexGrid,
    current: usize,
    players: usize,
    pid: PlayerId,
    budget: Duration,
    config: &SearchConfig,
) -> SearchReport {
    let start = Instant::now();
    let deadline = start + budget;
    let snapshot = config.verify_integrity.then(|| grid.clone());

    let mut report = SearchReport {
        action: SearchAction::EndTurn,
        depth: 0,
        nodes: 0,
        score: -INF,
        elapsed: Duration::ZERO,
    };

    for depth in 1..=config.max_depth {
        let mut searcher = Searcher {
            grid: &mut *grid,
            players,
            max_pid: pid,
            deadline,
            timed_out: false,
            nodes: 0,
        };
        let pass = searcher.root_pass(current, depth);
        report.nodes += searcher.nodes;

        if let Some((action, score)) = pass {
            report.action = action;
            report.depth = depth;
            report.score = score;
        }
        if Instant::now() >= deadline {
            break;
        }
    }
    report.elapsed = start.elapsed();

    if let Some(snapshot) = snapshot {
        assert!(
            *grid == snapshot,
            "apply/undo asymmetry: grid diverged from its pre-search snapshot"
        );
    }
    report
}

/// Single pass at a fixed depth, no deepening. Benchmark entry point.
pub fn search_at_depth(
    grid: &mut HexGrid,
    current: usize,
    players: usize,
    pid: PlayerId,
    depth: u32,
    budget: Duration,
    config: &SearchConfig,
) -> SearchReport {
    let start = Instant::now();
    let snapshot = config.verify_integrity.then(|| grid.clone());

    let mut searcher = Searcher {
        grid,
        players,
        max_pid: pid,
        deadline: start + budget,
        timed_out: false,
        nodes: 0,
    };
    let pass = searcher.root_pass(current, depth);
    let nodes = searcher.nodes;

    let mut report = SearchReport {
        action: SearchAction::EndTurn,
        depth: 0,
        nodes,
        score: -INF,
        elapsed: start.elapsed(),
    };
    if let Some((action, score)) = pass {
        report.action = action;
        report.depth = depth;
        report.score = score;
    }

    if let Some(snapshot) = snapshot {
        assert!(
            *searcher.grid == snapshot,
            "apply/undo asymmetry: grid diverged from its pre-search snapshot"
        );
    }
    report
}
