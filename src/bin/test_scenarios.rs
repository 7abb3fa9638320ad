//! Table scenario runner CLI
//!
//! Usage:
//!   cargo run --bin test-scenarios                        # Run every scenario
//!   cargo run --bin test-scenarios -- pockets/            # Run one category
//!   cargo run --bin test-scenarios -- shooting/zero_force_shot
//!   cargo run --bin test-scenarios -- --list              # Show scenarios without running
//!   cargo run --bin test-scenarios -- --verbose           # Expected/actual on failure

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use poolhall::testing::{SCENARIOS_DIR, TestResult, parser::parse_test_file, runner::run_test};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut verbose = false;
    let mut list_only = false;
    let mut filter: Option<String> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--list" | "-l" => list_only = true,
            other if !other.starts_with('-') => filter = Some(other.to_string()),
            other => eprintln!("Warning: unknown flag {}", other),
        }
    }

    let scenarios_path = Path::new(SCENARIOS_DIR);
    if !scenarios_path.exists() {
        eprintln!("No scenarios directory found at {}", SCENARIOS_DIR);
        std::process::exit(1);
    }

    let scenarios = discover_scenarios(scenarios_path, filter.as_deref());
    if scenarios.is_empty() {
        eprintln!(
            "No scenario files found{}",
            filter.map(|f| format!(" matching '{}'", f)).unwrap_or_default()
        );
        std::process::exit(1);
    }

    if list_only {
        for path in &scenarios {
            let rel = path.strip_prefix(scenarios_path).unwrap_or(path);
            match parse_test_file(path) {
                Ok(def) => println!("{}  {}", rel.display(), def.name),
                Err(e) => println!("{}  (unparseable: {})", rel.display(), e),
            }
        }
        return;
    }

    println!("Table Scenarios");
    println!("===============\n");

    let mut passed = 0;
    let mut broken: Vec<String> = Vec::new();
    let mut current_category = String::new();

    for path in &scenarios {
        let rel_path = path.strip_prefix(scenarios_path).unwrap_or(path);

        if let Some(parent) = rel_path.parent() {
            let category = parent.to_string_lossy().to_string();
            if category != current_category && !category.is_empty() {
                if !current_category.is_empty() {
                    println!();
                }
                println!("{}/", category);
                current_category = category;
            }
        }

        let name = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let result = match parse_test_file(path) {
            Ok(def) => run_test(&def),
            Err(message) => TestResult::Error { message },
        };

        if result.is_pass() {
            passed += 1;
        } else {
            broken.push(rel_path.display().to_string());
        }
        print_result(&name, &result, verbose);
    }

    println!("\n===============");
    println!("Results: {} passed, {} failed or errored", passed, broken.len());
    for path in &broken {
        println!("  - {}", path);
    }

    if !broken.is_empty() {
        std::process::exit(1);
    }
}

fn discover_scenarios(base: &Path, filter: Option<&str>) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_scenarios(base, base, filter, &mut found);
    found.sort();
    found
}

fn collect_scenarios(base: &Path, current: &Path, filter: Option<&str>, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(current) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_scenarios(base, &path, filter, found);
        } else if path.extension().is_some_and(|e| e == "toml") {
            let rel = path.strip_prefix(base).unwrap_or(&path).to_string_lossy().to_string();
            if filter.is_none_or(|f| rel.contains(f)) {
                found.push(path);
            }
        }
    }
}

fn print_result(name: &str, result: &TestResult, verbose: bool) {
    let dots = ".".repeat(40 - name.len().min(39));

    match result {
        TestResult::Pass { ticks } => println!("  {} {} PASS ({} ticks)", name, dots, ticks),
        TestResult::Fail { error } => {
            println!("  {} {} FAIL", name, dots);
            if verbose {
                println!("    {}", error);
            } else {
                println!("    {}", error.message);
            }
        }
        TestResult::Error { message } => {
            println!("  {} {} ERROR", name, dots);
            println!("    {}", message);
        }
    }
}
