//! Mus simulator CLI - bot-vs-bot games in memory.
//!
//! Runs complete games through the engine's public API and writes per-game
//! metrics for tuning the bots.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use metrics::build_game_metrics;
use mus_core::ai::{create_ai, MusAi};
use mus_core::Team;
use output::OutputWriter;
use rand::Rng;
use serde_json::json;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use types::{MetricsLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "mus-simulator")]
#[command(about = "In-memory Mus simulator for bot tuning")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Bot for all seats (shortcut to set all 4 seats to the same bot)
    #[arg(long, conflicts_with_all = ["seat0", "seat1", "seat2", "seat3"])]
    seats: Option<AiType>,

    /// Bot for seat 0 (equipo1)
    #[arg(long, default_value = "heuristic")]
    seat0: AiType,

    /// Bot for seat 1 (equipo2)
    #[arg(long, default_value = "heuristic")]
    seat1: AiType,

    /// Bot for seat 2 (equipo1)
    #[arg(long, default_value = "heuristic")]
    seat2: AiType,

    /// Bot for seat 3 (equipo2)
    #[arg(long, default_value = "heuristic")]
    seat3: AiType,

    /// Base seed; game N is dealt with `seed + N` and bots are seeded from it too
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the JSON output with gzip
    #[arg(long)]
    compress: bool,

    /// Metrics detail level
    #[arg(long, default_value = "detailed")]
    metrics_level: MetricsLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AiType {
    Heuristic,
    Random,
}

impl AiType {
    /// Name in the bot registry.
    fn name(self) -> &'static str {
        match self {
            AiType::Heuristic => "HeuristicPlayer",
            AiType::Random => "RandomPlayer",
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise silent apart from warnings
    let default_level = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seat_types = match args.seats {
        Some(all) => [all; 4],
        None => [args.seat0, args.seat1, args.seat2, args.seat3],
    };
    let ai_types = seat_types.map(|t| t.name().to_string());
    if args.show_output {
        info!(games = args.games, ?seat_types, output_dir = %args.output_dir, "starting simulator");
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;
    let base_seed = args.seed.unwrap_or_else(|| rand::rng().random());

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = base_seed.wrapping_add(game_num as u64);

        let outcome = create_seats(&seat_types, game_seed)
            .and_then(|ais| Simulator::new(game_seed).simulate_game(&ais).map_err(Into::into));

        match outcome {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    game_seed,
                    ai_types.clone(),
                    args.games,
                    &result,
                    duration_ms,
                    args.metrics_level,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {game_num}: {e}");
                }
                info!(game_num, winner = %result.winner, piedras = ?result.piedras, "game completed");
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {game_num} failed: {e}");
            }
        }
    }

    let elapsed = start.elapsed();
    let (json_path, csv_path) = output_writer.output_paths();
    let (json_path, csv_path) = (json_path.to_path_buf(), csv_path.to_path_buf());
    output_writer.finish()?;

    if args.show_output {
        info!("Detailed results written to: {}", json_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, &ai_types, errors, elapsed, args.games);
    }

    Ok(())
}

/// One bot per seat, each with its own seed derived from the game seed.
fn create_seats(
    seat_types: &[AiType; 4],
    game_seed: u64,
) -> Result<[Box<dyn MusAi>; 4], Box<dyn std::error::Error>> {
    let make = |seat: usize| -> Result<Box<dyn MusAi>, Box<dyn std::error::Error>> {
        let name = seat_types[seat].name();
        let config = json!({ "seed": game_seed.wrapping_mul(31).wrapping_add(seat as u64) });
        create_ai(name, Some(&config)).ok_or_else(|| format!("Unknown AI type: {name}").into())
    };
    Ok([make(0)?, make(1)?, make(2)?, make(3)?])
}

fn print_summary(
    results: &[GameResult],
    ai_types: &[String; 4],
    errors: u32,
    elapsed: Duration,
    total: u32,
) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    println!("Average time per game: {:?}", elapsed / results.len() as u32);

    let games = results.len() as f64;
    let ordagos = results.iter().filter(|r| r.ended_by_ordago).count();
    let rounds: usize = results.iter().map(|r| r.rounds.len()).sum();
    println!("Games ended by órdago: {ordagos}");
    println!("Average rounds per game: {:.1}", rounds as f64 / games);

    println!("\n=== Results by Team ===");
    for (team, seats) in [(Team::Equipo1, [0usize, 2]), (Team::Equipo2, [1, 3])] {
        let idx = match team {
            Team::Equipo1 => 0,
            Team::Equipo2 => 1,
        };
        let wins = results.iter().filter(|r| r.winner == team).count();
        let avg = results.iter().map(|r| r.piedras[idx] as f64).sum::<f64>() / games;
        println!(
            "{team} ({} + {}): wins={wins} ({:.1}%), avg piedras={avg:.1}",
            ai_types[seats[0]],
            ai_types[seats[1]],
            wins as f64 / games * 100.0
        );
    }

    println!("\n=== Results by Seat ===");
    for seat in 0..4 {
        let bets: u32 = results.iter().map(|r| r.bets[seat]).sum();
        let cuts: u32 = results.iter().map(|r| r.cuts[seat]).sum();
        let ordagos: u32 = results.iter().map(|r| r.ordagos[seat]).sum();
        println!(
            "Seat {seat} ({}): bets/game={:.1}, cuts/game={:.1}, ordagos={ordagos}",
            ai_types[seat],
            bets as f64 / games,
            cuts as f64 / games
        );
    }
}
