//! HEXFIEF CLI - command-line interface
//!
//! Commands:
//! - arena: AI vs AI match batches with side swapping and aggregate stats
//! - play: one verbose game with each player's decision log
//! - benchmark: fixed-depth search scaling table

mod arena_cmd;
mod benchmark;
mod play_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hexfief")]
#[command(about = "Headless hex-territory conquest: engine, AIs, arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run AI vs AI matches, each seed played twice with sides swapped
    Arena(arena_cmd::ArenaArgs),
    /// Play a single game and print every decision
    Play(play_cmd::PlayArgs),
    /// Benchmark fixed-depth search scaling on one position
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Arena(args) => arena_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
        Commands::Benchmark(args) => benchmark::run(args),
    }
}
