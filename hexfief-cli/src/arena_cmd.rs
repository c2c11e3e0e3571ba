//! Arena command: batch matches and a summary table

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;

use hexfief_arena::{run_arena, AiKind, ArenaConfig, ArenaSummary, MapSize};

#[derive(Args)]
pub struct ArenaArgs {
    /// First AI: random, greedy, or alphabeta
    #[arg(long, default_value = "greedy")]
    ai1: String,
    /// Second AI
    #[arg(long, default_value = "random")]
    ai2: String,
    /// Number of seeds to play, each played twice for side fairness
    #[arg(long, default_value = "10")]
    matches: usize,
    /// Comma-separated explicit seeds (overrides --matches)
    #[arg(long)]
    seeds: Option<String>,
    /// Map preset: small, medium, or large
    #[arg(long, default_value = "medium")]
    map_size: String,
    /// Turn cap before the hex-count tie-break
    #[arg(long, default_value = "50")]
    max_turns: u32,
    /// Per-turn time budget for the alphabeta player, in milliseconds
    #[arg(long, default_value = "1000")]
    time_limit_ms: u64,
    /// Run matches one at a time instead of across threads
    #[arg(long)]
    sequential: bool,
    /// Emit the summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ArenaArgs) -> Result<()> {
    let ai1: AiKind = args.ai1.parse().map_err(|e: String| anyhow!(e))?;
    let ai2: AiKind = args.ai2.parse().map_err(|e: String| anyhow!(e))?;
    let map_size: MapSize = args.map_size.parse().map_err(|e: String| anyhow!(e))?;
    let seeds = match &args.seeds {
        Some(list) => parse_seeds(list)?,
        None => (0..args.matches as u64).collect(),
    };

    let config = ArenaConfig {
        seeds,
        map_size,
        max_turns: args.max_turns,
        ai_time_budget: Duration::from_millis(args.time_limit_ms),
        parallel: !args.sequential,
    };
    let outcomes = run_arena(ai1, ai2, &config)?;
    let summary = ArenaSummary::from_outcomes(&outcomes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.render(ai1.label(), ai2.label()));
    }
    Ok(())
}

fn parse_seeds(list: &str) -> Result<Vec<u64>> {
    list.split(',')
        .map(|s| {
            s.trim()
                .parse::<u64>()
                .with_context(|| format!("bad seed '{}'", s.trim()))
        })
        .collect()
}
