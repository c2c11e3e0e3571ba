//! Play command: one game with every decision printed

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;

use hexfief_arena::{AiKind, MapSize};
use hexfief_core::{apply_action, generate_map, Action, MapConfig};

#[derive(Args)]
pub struct PlayArgs {
    /// First AI: random, greedy, or alphabeta
    #[arg(long, default_value = "greedy")]
    ai1: String,
    /// Second AI
    #[arg(long, default_value = "random")]
    ai2: String,
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Map preset: small, medium, or large
    #[arg(long, default_value = "medium")]
    map_size: String,
    #[arg(long, default_value = "50")]
    max_turns: u32,
    /// Per-turn time budget for the alphabeta player, in milliseconds
    #[arg(long, default_value = "1000")]
    time_limit_ms: u64,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let ai1: AiKind = args.ai1.parse().map_err(|e: String| anyhow!(e))?;
    let ai2: AiKind = args.ai2.parse().map_err(|e: String| anyhow!(e))?;
    let map_size: MapSize = args.map_size.parse().map_err(|e: String| anyhow!(e))?;

    let (width, height) = map_size.dimensions();
    let mut state = generate_map(&MapConfig::new(width, height, 2, args.seed)?)?;
    state.start_turn();

    let budget = Duration::from_millis(args.time_limit_ms);
    let mut players = [ai1.build(0, args.seed, budget), ai2.build(1, args.seed, budget)];
    let names = [ai1.label(), ai2.label()];

    while !state.game_over() && state.turn() < args.max_turns {
        let idx = state.current_index();
        let turn = state.turn();
        let report = players[idx].take_turn(&mut state);
        println!("turn {turn:>3}  player {idx} ({})", names[idx]);
        for line in &report.log {
            println!("    {line}");
        }
        if report.actions == 0 {
            let _ = apply_action(&mut state, Action::EndTurn);
        }
    }

    println!();
    match state.winner() {
        Some(pid) => println!("winner: player {pid} ({})", names[pid as usize]),
        None => println!("turn cap reached without elimination"),
    }
    for s in state.summaries() {
        println!(
            "  player {}: alive={} territories={} hexes={} units={} gold={}",
            s.id, s.alive, s.territories, s.hexes, s.units, s.gold
        );
    }
    Ok(())
}
