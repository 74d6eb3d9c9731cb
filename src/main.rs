//! Fight Tablebase - command-line driver
//!
//! Runs seeded forward-play fights, expands the position tree batch by
//! batch, reports store statistics and validates notation strings.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fight_tablebase::core::error::{FightError, Result};
use fight_tablebase::notation::{decode, encode};
use fight_tablebase::store::{JsonFileStore, StoreStats, TablebaseStore};
use fight_tablebase::{Engine, FightSimulator, Position, TreeExplorer};

/// Fight Tablebase - explore and play a two-fighter duel
#[derive(Parser, Debug)]
#[command(name = "fight-tablebase")]
#[command(about = "Build a deduplicated fight position tablebase and run seeded fights")]
struct Cli {
    /// Engine configuration (TOML); defaults apply to missing keys
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Move catalogue (TOML); the built-in catalogue when omitted
    #[arg(long, global = true)]
    moves: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run seeded forward-play fights against a store
    Simulate {
        /// Number of fights
        #[arg(long, default_value_t = 10)]
        fights: u64,

        /// First seed; fight i uses seed + i
        #[arg(long)]
        seed: Option<u64>,

        /// Store file
        #[arg(long, default_value = "tablebase.json")]
        store: PathBuf,

        /// Output format: json or text
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Expand the tree by a number of batches
    Expand {
        #[arg(long, default_value_t = 10)]
        batches: usize,

        /// Leaves per batch; the configured batch size when omitted
        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long, default_value = "tablebase.json")]
        store: PathBuf,
    },

    /// Report aggregate counts for a store
    Stats {
        #[arg(long, default_value = "tablebase.json")]
        store: PathBuf,
    },

    /// Validate a notation string and print its canonical form
    Decode { notation: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fight_tablebase=info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Simulate {
            fights,
            seed,
            store,
            format,
        } => {
            let engine = Engine::load(cli.config.as_deref(), cli.moves.as_deref())?;
            let store = JsonFileStore::open(&store)?;
            let first = seed.unwrap_or_else(rand::random);
            let seeds: Vec<u64> = (0..fights).map(|i| first.wrapping_add(i)).collect();

            tracing::info!("Running {} fights from seed {}", fights, first);
            let reports = FightSimulator::new(&engine, &store).run_many(&seeds)?;
            store.flush()?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
                _ => {
                    for report in &reports {
                        let winner = report
                            .verdict
                            .winner
                            .map_or("none".to_string(), |side| side.code().to_string());
                        println!(
                            "seed {:>20}  turns {:>3}  {:<16}  winner {}  damage A {:.2} B {:.2}",
                            report.seed,
                            report.turns,
                            report.verdict.reason.to_string(),
                            winner,
                            report.damage.a,
                            report.damage.b
                        );
                    }
                }
            }
        }

        Command::Expand {
            batches,
            batch_size,
            store,
        } => {
            let engine = Engine::load(cli.config.as_deref(), cli.moves.as_deref())?;
            let store = JsonFileStore::open(&store)?;
            let explorer = TreeExplorer::new(&engine, &store);
            explorer.seed_root(&Position::opening())?;

            let limit = batch_size.unwrap_or(engine.config.exploration.batch_size);
            let report = explorer.run(batches, limit)?;
            store.flush()?;

            println!(
                "{} batches, {} leaves ({} terminal, {} failed): +{} nodes, +{} transitions, +{} paths{}",
                report.batches,
                report.leaves,
                report.terminal_leaves,
                report.failed,
                report.new_nodes,
                report.new_transitions,
                report.new_paths,
                if report.exhausted { ", frontier exhausted" } else { "" }
            );
        }

        Command::Stats { store } => {
            let store = open_existing(&store)?;
            print_stats(&store.stats()?);
        }

        Command::Decode { notation } => {
            let state = decode(&notation)?;
            println!("{}", encode(&state));
            println!("hash {}", state.position.hash());
        }
    }
    Ok(())
}

fn open_existing(path: &Path) -> Result<JsonFileStore> {
    if !path.exists() {
        return Err(FightError::Store(format!(
            "no store at {}",
            path.display()
        )));
    }
    JsonFileStore::open(path)
}

fn print_stats(stats: &StoreStats) {
    println!("=== TABLEBASE ===");
    println!("Nodes:            {}", stats.nodes);
    println!("  terminal:       {}", stats.terminal_nodes);
    println!("  expanded:       {}", stats.expanded_nodes);
    println!("  failed:         {}", stats.failed_nodes);
    println!("Transitions:      {}", stats.transitions);
    println!("Paths:            {}", stats.paths);
    println!("  terminal:       {}", stats.terminal_paths);
    println!(
        "Node outcomes:    A {}  B {}  draw {}",
        stats.wins.a, stats.wins.b, stats.draws
    );
    println!();
    println!("=== FORWARD PLAY ===");
    println!("Fights:           {}", stats.fights);
    println!(
        "Fight outcomes:   A {}  B {}  draw {}",
        stats.fight_wins.a, stats.fight_wins.b, stats.fight_draws
    );
    println!("No-move incidents: {}", stats.no_move_incidents);
}
