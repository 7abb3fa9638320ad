//! Scenario execution engine

use bevy::prelude::*;

use super::assertions::{
    AssertionError, BallSnapshot, CapturedEvent, TableState, check_counts, check_sequence,
    check_state,
};
use super::input::ScriptedInputs;
use super::parser::TestDefinition;
use crate::ball::{InPlay, LinearVelocity, TableRoster};
use crate::error::PoolError;
use crate::replay::ReplayEngine;
use crate::simulation::{HeadlessAppBuilder, TableHarness, spawn_rack};
use crate::tuning::TableTuning;

/// Ticks to run when a scenario names no later tick
const DEFAULT_TICKS: u64 = 60;

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { ticks: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let tuning = test.setup.tuning.clone().unwrap_or_default();
    if let Err(e) = tuning.validate() {
        return TestResult::Error {
            message: format!("Invalid tuning: {}", e),
        };
    }

    let mut scripted = ScriptedInputs::from_inputs(&test.input);
    scripted.set_max_tick(test.setup.ticks);
    for state in &test.expect.state {
        scripted.set_max_tick(state.after_tick);
    }
    for event in &test.expect.sequence {
        if let Some(max) = event.tick_max {
            scripted.set_max_tick(max);
        }
    }
    if scripted.max_tick() == 0 {
        scripted.set_max_tick(DEFAULT_TICKS);
    }

    let mut harness = match start_table(&tuning, test.setup.object_balls) {
        Ok(harness) => harness,
        Err(e) => {
            return TestResult::Error {
                message: format!("Table setup failed: {}", e),
            };
        }
    };

    let mut assertions = test.expect.state.clone();
    assertions.sort_by_key(|a| a.after_tick);
    let mut next_assertion = 0;

    // Checks at tick 0 see the table straight after startup
    while next_assertion < assertions.len() && assertions[next_assertion].after_tick == 0 {
        if let Err(error) = check_state(&assertions[next_assertion], &snapshot(&harness)) {
            return TestResult::Fail { error };
        }
        next_assertion += 1;
    }

    for tick in 1..=scripted.max_tick() {
        if let Err(message) = scripted.apply(tick, &mut harness) {
            return TestResult::Error { message };
        }
        harness.step();

        while next_assertion < assertions.len() && assertions[next_assertion].after_tick == tick {
            if let Err(mut error) = check_state(&assertions[next_assertion], &snapshot(&harness)) {
                error.message = format!("after tick {}: {}", tick, error.message);
                return TestResult::Fail { error };
            }
            next_assertion += 1;
        }
    }

    let captured: Vec<CapturedEvent> = harness
        .events()
        .iter()
        .map(CapturedEvent::from_bus_event)
        .collect();

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }
    if let Err(error) = check_counts(&test.expect.count, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass {
        ticks: scripted.max_tick(),
    }
}

fn start_table(tuning: &TableTuning, object_balls: u32) -> Result<TableHarness, PoolError> {
    let mut app = HeadlessAppBuilder::new()
        .with_tuning(tuning.clone())
        .with_minimal_threads()
        .build()?;
    spawn_rack(app.world_mut(), tuning, object_balls);
    Ok(TableHarness::start(app))
}

/// Read the assertion view of the table
fn snapshot(harness: &TableHarness) -> TableState {
    let world = harness.world();
    let session = harness.session();
    let lifecycle = harness.lifecycle();

    let balls = world
        .resource::<TableRoster>()
        .iter()
        .filter_map(|(id, entry)| {
            let transform = world.get::<Transform>(entry.entity)?;
            let speed = world
                .get::<LinearVelocity>(entry.entity)
                .map(|v| v.0.length())
                .unwrap_or(0.0);
            let in_play = world.get::<InPlay>(entry.entity).map(|f| f.0).unwrap_or(false);
            let position = transform.translation;
            Some((
                id.0,
                BallSnapshot {
                    x: position.x,
                    y: position.y,
                    z: position.z,
                    speed,
                    in_play,
                },
            ))
        })
        .collect();

    TableState {
        score: session.score(),
        pocketed: session.pocketed_count(),
        time_remaining: session.time_remaining(),
        over: session.is_over(),
        outcome: session.outcome().map(|o| format!("{:?}", o)),
        shot_state: format!("{:?}", lifecycle.state()),
        shots_taken: lifecycle.shots_taken(),
        replay_phase: format!("{:?}", world.resource::<ReplayEngine>().phase()),
        balls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parser::parse_test_str;

    fn run_scenario(content: &str) {
        let test = parse_test_str(content).unwrap();
        match run_test(&test) {
            TestResult::Pass { .. } => {}
            TestResult::Fail { error } => panic!("{} failed: {}", test.name, error),
            TestResult::Error { message } => panic!("{} errored: {}", test.name, message),
        }
    }

    #[test]
    fn scenario_seven_pockets() {
        run_scenario(include_str!("../../tests/scenarios/session/seven_pockets.toml"));
    }

    #[test]
    fn scenario_timer_runs_out() {
        run_scenario(include_str!("../../tests/scenarios/session/timer_runs_out.toml"));
    }

    #[test]
    fn scenario_zero_force_shot() {
        run_scenario(include_str!("../../tests/scenarios/shooting/zero_force_shot.toml"));
    }

    #[test]
    fn scenario_full_power_shot() {
        run_scenario(include_str!("../../tests/scenarios/shooting/full_power_shot.toml"));
    }

    #[test]
    fn scenario_press_while_moving() {
        run_scenario(include_str!("../../tests/scenarios/shooting/press_while_moving.toml"));
    }

    #[test]
    fn scenario_scratch_respawn() {
        run_scenario(include_str!("../../tests/scenarios/pockets/scratch_respawn.toml"));
    }

    #[test]
    fn scenario_replay_roundtrip() {
        run_scenario(include_str!("../../tests/scenarios/replay/record_and_replay.toml"));
    }

    #[test]
    fn test_failed_check_reports_tick() {
        let test = parse_test_str(
            r#"
name = "Wrong score"
[[expect.state]]
after_tick = 2
checks = ["score = 10"]
"#,
        )
        .unwrap();
        match run_test(&test) {
            TestResult::Fail { error } => assert!(error.message.starts_with("after tick 2")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_tuning_is_an_error() {
        let test = parse_test_str(
            r#"
name = "Bad tuning"
[setup.tuning]
tick_rate_hz = 0.0
"#,
        )
        .unwrap();
        assert!(matches!(run_test(&test), TestResult::Error { .. }));
    }
}
