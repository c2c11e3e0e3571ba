//! Benchmark command: search depth scaling on a fixed position

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;

use hexfief_arena::MapSize;
use hexfief_core::{
    apply_action, generate_map, legal_actions, search_at_depth, Action, MapConfig, SearchConfig,
};

#[derive(Args)]
pub struct BenchmarkArgs {
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Map preset: small, medium, or large
    #[arg(long, default_value = "medium")]
    map_size: String,
    #[arg(long, default_value = "8")]
    max_depth: u32,
    /// Per-depth time cap in seconds
    #[arg(long, default_value = "30")]
    time_cap_s: u64,
}

pub fn run(args: BenchmarkArgs) -> Result<()> {
    let map_size: MapSize = args.map_size.parse().map_err(|e: String| anyhow!(e))?;
    let (width, height) = map_size.dimensions();
    let mut state = generate_map(&MapConfig::new(width, height, 2, args.seed)?)?;
    state.start_turn();

    // Stock both sides with a few units so the position is representative.
    for _ in 0..2 {
        let buys: Vec<Action> = legal_actions(&state)
            .into_iter()
            .filter(|a| matches!(a, Action::BuyUnit { .. }))
            .take(4)
            .collect();
        for action in buys {
            let _ = apply_action(&mut state, action);
        }
        apply_action(&mut state, Action::EndTurn)?;
    }

    let pid = state.current_player().id;
    let current = state.current_index();
    let players = state.players().len();
    let land = state.grid().land_count();
    println!(
        "search benchmark (seed={}, map {width}x{height}, {land} land hexes)",
        args.seed
    );
    println!("{:-<56}", "");
    println!(
        "{:<7}{:<12}{:<11}{:<13}{:<8}score",
        "depth", "nodes", "time(s)", "nodes/s", "ebf"
    );

    let budget = Duration::from_secs(args.time_cap_s);
    let config = SearchConfig::default();
    let mut prev_nodes = 0u64;

    for depth in 1..=args.max_depth {
        let report = search_at_depth(state.grid_mut(), current, players, pid, depth, budget, &config);
        let secs = report.elapsed.as_secs_f64().max(1e-6);
        let nps = report.nodes as f64 / secs;
        let ebf = if prev_nodes > 0 {
            format!("{:.1}", report.nodes as f64 / prev_nodes as f64)
        } else {
            "--".to_string()
        };
        println!(
            "{depth:<7}{:<12}{secs:<11.3}{nps:<13.0}{ebf:<8}{:+}",
            report.nodes, report.score
        );
        prev_nodes = report.nodes;

        if report.elapsed >= budget {
            println!("(stopped: depth {depth} hit the {}s cap)", args.time_cap_s);
            break;
        }
    }
    Ok(())
}
