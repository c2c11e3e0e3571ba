//! HEXFIEF Core - deterministic hex-territory conquest engine and AI
//!
//! This crate provides the whole headless game:
//! - Odd-q offset hex grid with flat arena storage
//! - Territories with treasuries, wages, and total bankruptcy
//! - Phase-driven turn engine with deterministic vegetation growth
//! - Validated, all-or-nothing action application
//! - Seeded probabilistic map generation
//! - Fast apply/undo alpha-beta search plus baseline players

pub mod action;
pub mod ai;
pub mod eval;
pub mod grid;
pub mod mapgen;
pub mod search;
pub mod state;
pub mod territory;
pub mod units;

// Re-exports for convenient access
pub use action::{apply_action, legal_actions, Action, IllegalAction};
pub use ai::{AiPlayer, AlphaBetaAi, GreedyAi, RandomAi, TurnReport};
pub use eval::{evaluate, Weights};
pub use grid::{Coord, HexCell, HexGrid, PlayerId, Structure, Terrain};
pub use mapgen::{generate_map, MapConfig, MapError};
pub use search::{
    search_actions, search_at_depth, search_best_action, SearchAction, SearchConfig, SearchReport,
};
pub use state::{GameState, Phase, Player, PlayerSummary, RefreshOptions};
pub use territory::Territory;
pub use units::{Power, CASTLE_COST, UNIT_COST};
