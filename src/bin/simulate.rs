//! Table Simulation - headless scripted pool session
//!
//! Plays one session with a random shot maker over the stand-in physics and prints the
//! serialized event log plus a summary.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --seed 7
//!   cargo run --bin simulate -- --seed 7 --replay --output session.evlog --json

use rand::Rng;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use poolhall::simulation::{SimConfig, run_session};

fn main() {
    let config = SimConfig::from_args();
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    let result = match &config.output_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                let mut writer = BufWriter::new(file);
                run_session(&config, seed, &mut writer).and_then(|s| writer.flush().map(|_| s))
            }
            Err(e) => {
                eprintln!("Failed to create {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            run_session(&config, seed, &mut lock)
        }
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        }
    } else {
        eprintln!("{}", summary.report());
    }
}
