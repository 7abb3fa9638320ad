//! Simulation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::tuning::TableTuning;

/// Configuration for a scripted headless session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Tuning file (None = `config/table_tuning.json` or built-in defaults)
    pub tuning_path: Option<String>,
    /// Object balls racked in front of the cue ball
    pub object_balls: u32,
    /// RNG seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Hard stop in ticks (None = time limit plus a few seconds)
    pub max_ticks: Option<u64>,
    /// Chance that a shot pockets each object ball still in play
    pub pot_chance: f64,
    /// Chance that a shot scratches the cue ball
    pub scratch_chance: f64,
    /// Record from the first tick and replay once the first shot settles
    pub replay_first_shot: bool,
    /// Event log path (None = stdout)
    pub output_file: Option<String>,
    /// Print the summary as JSON
    pub json: bool,
    /// Suppress the event log
    pub quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tuning_path: None,
            object_balls: 9,
            seed: None,
            max_ticks: None,
            pot_chance: 0.12,
            scratch_chance: 0.05,
            replay_first_shot: false,
            output_file: None,
            json: false,
            quiet: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Table tuning for this run
    pub fn tuning(&self) -> TableTuning {
        match &self.tuning_path {
            Some(path) => TableTuning::load_from_path(Path::new(path)),
            None => TableTuning::load(),
        }
    }

    /// Tick budget for one session
    pub fn tick_budget(&self, tuning: &TableTuning) -> u64 {
        self.max_ticks
            .unwrap_or_else(|| ((tuning.time_limit_secs + 5.0) * tuning.tick_rate_hz).ceil() as u64)
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse(&args[1..])
    }

    /// Parse configuration from arguments (program name excluded)
    pub fn parse(args: &[String]) -> Self {
        let mut config = Self::default();

        // A settings file is the base; flags override it
        if let Some(i) = args.iter().position(|a| a == "--settings") {
            if let Some(path) = args.get(i + 1) {
                match Self::from_file(path) {
                    Ok(loaded) => config = loaded,
                    Err(e) => eprintln!("Warning: {}", e),
                }
            }
        }

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => i += 1,
                "--tuning" => {
                    if let Some(v) = value {
                        config.tuning_path = Some(v.clone());
                        i += 1;
                    }
                }
                "--balls" => {
                    if let Some(v) = value {
                        config.object_balls = v.parse().unwrap_or(config.object_balls);
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = value {
                        config.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--max-ticks" => {
                    if let Some(v) = value {
                        config.max_ticks = v.parse().ok();
                        i += 1;
                    }
                }
                "--pot-chance" => {
                    if let Some(v) = value {
                        config.pot_chance = v.parse().unwrap_or(config.pot_chance);
                        i += 1;
                    }
                }
                "--scratch-chance" => {
                    if let Some(v) = value {
                        config.scratch_chance = v.parse().unwrap_or(config.scratch_chance);
                        i += 1;
                    }
                }
                "--replay" => config.replay_first_shot = true,
                "--output" => {
                    if let Some(v) = value {
                        config.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--json" => config.json = true,
                "--quiet" | "-q" => config.quiet = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => eprintln!("Warning: unknown argument {}", other),
            }
            i += 1;
        }

        config.pot_chance = config.pot_chance.clamp(0.0, 1.0);
        config.scratch_chance = config.scratch_chance.clamp(0.0, 1.0);
        config
    }
}

fn print_help() {
    println!(
        r#"Table Simulation - Headless scripted pool session

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>         Load settings from JSON file (flags override file settings)
    --tuning <FILE>           Table tuning JSON (default: config/table_tuning.json)
    --balls <N>               Object balls in the rack (default: 9)
    --seed <N>                RNG seed for reproducibility
    --max-ticks <N>           Stop after N ticks (default: time limit + 5s)
    --pot-chance <P>          Chance a shot pockets each object ball (default: 0.12)
    --scratch-chance <P>      Chance a shot scratches the cue ball (default: 0.05)
    --replay                  Record the first shot and replay it once it settles
    --output <FILE>           Write the event log to a file (default: stdout)
    --json                    Print the summary as JSON
    --quiet, -q               Suppress the event log
    --help, -h                Show this help

EXAMPLES:
    cargo run --bin simulate -- --seed 7
    cargo run --bin simulate -- --seed 7 --replay --output session.evlog --json
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_overrides() {
        let config = SimConfig::parse(&args(&[
            "--seed", "42", "--balls", "5", "--pot-chance", "3.0", "--replay", "-q",
        ]));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.object_balls, 5);
        assert_eq!(config.pot_chance, 1.0);
        assert!(config.replay_first_shot);
        assert!(config.quiet);
        assert!(!config.json);
    }

    #[test]
    fn test_bad_numbers_keep_defaults() {
        let config = SimConfig::parse(&args(&["--balls", "many", "--seed", "x"]));
        assert_eq!(config.object_balls, 9);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_tick_budget_covers_time_limit() {
        let config = SimConfig::default();
        let tuning = TableTuning::default();
        assert_eq!(config.tick_budget(&tuning), 185 * 60);
    }

    #[test]
    fn test_settings_json_is_partial() {
        let config: SimConfig = serde_json::from_str(r#"{ "object_balls": 4 }"#).unwrap();
        assert_eq!(config.object_balls, 4);
        assert_eq!(config.scratch_chance, 0.05);
    }
}
