// Standalone replay tool for analyzing 2048 debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --validate             Check logged moves against expected moves
//   --game <id>            Only consider entries from this game
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Grid.toml (default: Grid.toml)

use std::env;
use std::process;

use grid_2048::config::Config;
use grid_2048::replay::ReplayEngine;
use grid_2048::types::Direction;

enum Mode {
    All,
    Turns(Vec<u32>),
    Validate(Vec<(u32, Vec<Direction>)>),
}

fn print_usage() {
    eprintln!("2048 Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: turn:move,...)");
    eprintln!("  --game <id>             Only consider entries from this game");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Grid.toml (default: Grid.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay grid_debug.jsonl --all");
    eprintln!("  replay grid_debug.jsonl --game 2 --turns 5,10,15");
    eprintln!("  replay grid_debug.jsonl --validate 5:up,10:left|down");
}

fn parse_turns(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'turn:move'", pair));
            }

            let turn = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", parts[0], e))?;

            // Support multiple acceptable moves separated by '|'
            let moves: Result<Vec<Direction>, String> =
                parts[1].split('|').map(|m| m.trim().parse()).collect();

            Ok((turn, moves?))
        })
        .collect()
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn exit_on_err<T>(result: Result<T, String>, context: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error {}: {}", context, e);
        process::exit(1);
    })
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wants_help = args.iter().any(|a| a == "--help");

    if args.len() < 2 || wants_help {
        print_usage();
        process::exit(if wants_help { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Grid.toml".to_string();
    let mut verbose = false;
    let mut game_filter: Option<u32> = None;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                let value = option_value(&args, i, "--turns");
                mode = Some(Mode::Turns(exit_on_err(parse_turns(value), "parsing turns")));
                i += 1;
            }
            "--validate" => {
                let value = option_value(&args, i, "--validate");
                mode = Some(Mode::Validate(exit_on_err(
                    parse_expected_moves(value),
                    "parsing expected moves",
                )));
                i += 1;
            }
            "--game" => {
                let value = option_value(&args, i, "--game");
                let id = value
                    .parse::<u32>()
                    .map_err(|e| format!("Invalid game id '{}': {}", value, e));
                game_filter = Some(exit_on_err(id, "parsing game id"));
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --turns, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let mut entries = exit_on_err(engine.load_log_file(log_file), "loading log file");
    if let Some(game_id) = game_filter {
        entries.retain(|e| e.game_id == game_id);
    }

    if entries.is_empty() {
        eprintln!("Error: No log entries to replay");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} turns...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Turns(turns) => {
            println!("Replaying {} specific turn(s)...\n", turns.len());
            let results = exit_on_err(engine.replay_turns(&entries, &turns), "during replay");
            engine.print_report(&results);
        }
        Mode::Validate(expected_moves) => {
            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
