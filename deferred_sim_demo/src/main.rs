// CLI entry point for the arena demo.
//
// Runs one headless bout and prints the chronicle. Logging goes through
// `tracing`; set `RUST_LOG` to change verbosity (e.g.
// `RUST_LOG=deferred_sim=trace` to see every schedule and fire).
//
// Usage:
//   arena [OPTIONS]
//     --ticks <N>        Maximum ticks to run (default: 60)
//     --config <PATH>    JSON SimConfig file
//     --arena <PATH>     JSON ArenaConfig file (rules and fighters)
//     --stamina <N>      Starting stamina for every fighter (default: 4)
//     --json             Print the summary as JSON instead of text

use std::path::PathBuf;

use deferred_sim::{SimConfig, Tick};
use deferred_sim_demo::{Arena, ArenaConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "deferred_sim=debug,deferred_sim_demo=info";

struct CliArgs {
    ticks: Tick,
    config_path: Option<PathBuf>,
    arena_path: Option<PathBuf>,
    stamina: u32,
    json: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            ticks: 60,
            config_path: None,
            arena_path: None,
            stamina: 4,
            json: false,
        }
    }
}

fn main() {
    init_tracing();
    let args = parse_args();

    let sim_config = match &args.config_path {
        Some(path) => SimConfig::from_file(path),
        None => Ok(SimConfig::default()),
    };
    let sim_config = sim_config.unwrap_or_else(|e| {
        eprintln!("Failed to load sim config: {e}");
        std::process::exit(1);
    });

    let arena_config = match &args.arena_path {
        Some(path) => ArenaConfig::from_file(path),
        None => Ok(ArenaConfig::default()),
    };
    let arena_config = arena_config.unwrap_or_else(|e| {
        eprintln!("Failed to load arena config: {e}");
        std::process::exit(1);
    });

    let mut arena = Arena::new(sim_config, &arena_config, Some(args.stamina));
    let summary = arena.run(args.ticks);

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize summary: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for entry in &summary.chronicle {
        println!("[{:>4}] {}", entry.tick, entry.text);
    }
    println!();
    println!(
        "{} ticks, {} fired, {} discarded, {} still pending",
        summary.ticks_run, summary.fired, summary.discarded, summary.pending
    );
    if summary.survivors.is_empty() {
        println!("No survivors.");
    } else {
        println!("Survivors: {}", summary.survivors.join(", "));
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching,
/// no clap dependency.
fn parse_args() -> CliArgs {
    let mut cli = CliArgs::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => {
                i += 1;
                cli.ticks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--ticks requires a valid number");
                    std::process::exit(1);
                });
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--config requires a path");
                    std::process::exit(1);
                }));
            }
            "--arena" => {
                i += 1;
                cli.arena_path = Some(args.get(i).map(PathBuf::from).unwrap_or_else(|| {
                    eprintln!("--arena requires a path");
                    std::process::exit(1);
                }));
            }
            "--stamina" => {
                i += 1;
                cli.stamina = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--stamina requires a valid number");
                    std::process::exit(1);
                });
            }
            "--json" => cli.json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_usage() {
    println!("Usage: arena [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --ticks <N>        Maximum ticks to run (default: 60)");
    println!("  --config <PATH>    JSON SimConfig file");
    println!("  --arena <PATH>     JSON ArenaConfig file (rules and fighters)");
    println!("  --stamina <N>      Starting stamina for every fighter (default: 4)");
    println!("  --json             Print the summary as JSON instead of text");
    println!("  --help, -h         Show this help");
    println!();
    println!("Log verbosity follows RUST_LOG (default: {DEFAULT_FILTER}).");
}
