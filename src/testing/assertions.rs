//! Assertion checking for scenario expectations

use std::collections::BTreeMap;

use super::parser::{ExpectedCount, ExpectedEvent, StateAssertion};
use crate::events::{BusEvent, GameEvent};

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub tick: u64,
    pub event_type: &'static str,
    pub ball: Option<u32>,
}

impl CapturedEvent {
    pub fn from_bus_event(event: &BusEvent) -> Self {
        let ball = match &event.event {
            GameEvent::BallPocketed { ball, .. }
            | GameEvent::CueBallScratched { ball, .. }
            | GameEvent::CueBallRespawned { ball }
            | GameEvent::RespawnCancelled { ball } => Some(ball.0),
            _ => None,
        };
        Self {
            tick: event.tick,
            event_type: event.event.name(),
            ball,
        }
    }
}

/// Check if captured events match the expected sequence
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            if cap.event_type != exp.event {
                return false;
            }
            if exp.ball.is_some() && cap.ball != exp.ball {
                return false;
            }
            true
        });

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.tick_min {
                    if cap.tick < min {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                            expected: format!("tick >= {}", min),
                            actual: format!("tick {}", cap.tick),
                        });
                    }
                }
                if let Some(max) = exp.tick_max {
                    if cap.tick > max {
                        return Err(AssertionError {
                            message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                            expected: format!("tick <= {}", max),
                            actual: format!("tick {}", cap.tick),
                        });
                    }
                }
                captured_idx += offset + 1;
            }
            None => {
                let ball_str = exp.ball.map(|b| format!(" (ball: #{})", b)).unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, ball_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..].iter().map(|e| e.event_type).collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Check exact event totals
pub fn check_counts(expected: &[ExpectedCount], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    for exp in expected {
        let actual = captured.iter().filter(|e| e.event_type == exp.event).count();
        if actual != exp.count {
            return Err(AssertionError {
                message: format!("Event '{}' count mismatch", exp.event),
                expected: exp.count.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

/// Table state for assertions
#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub score: u32,
    pub pocketed: u32,
    pub time_remaining: f32,
    pub over: bool,
    pub outcome: Option<String>,
    pub shot_state: String,
    pub shots_taken: u32,
    pub replay_phase: String,
    pub balls: BTreeMap<u32, BallSnapshot>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub speed: f32,
    pub in_play: bool,
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // >= before >, etc.
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against table state
pub fn check_state(assertion: &StateAssertion, state: &TableState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path = value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        let path_parts: Vec<&str> = path.split('.').collect();

        match path_parts.as_slice() {
            ["score"] => check_number(path, state.score as f32, operator, expected_value)?,
            ["pocketed"] => check_number(path, state.pocketed as f32, operator, expected_value)?,
            ["time_remaining"] => check_number(path, state.time_remaining, operator, expected_value)?,
            ["session", "over"] => check_text(path, &state.over.to_string(), operator, expected_value)?,
            ["session", "outcome"] => {
                let actual = state.outcome.as_deref().unwrap_or("none");
                check_text(path, actual, operator, expected_value)?
            }
            ["shot", "state"] => check_text(path, &state.shot_state, operator, expected_value)?,
            ["shot", "count"] => check_number(path, state.shots_taken as f32, operator, expected_value)?,
            ["replay", "phase"] => check_text(path, &state.replay_phase, operator, expected_value)?,
            ["ball", id, property] => {
                let ball = id
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| state.balls.get(&id))
                    .ok_or_else(|| AssertionError {
                        message: format!("Ball '{}' not found", id),
                        expected: format!("ball '{}'", id),
                        actual: format!("available: {:?}", state.balls.keys().collect::<Vec<_>>()),
                    })?;
                match *property {
                    "x" => check_number(path, ball.x, operator, expected_value)?,
                    "y" => check_number(path, ball.y, operator, expected_value)?,
                    "z" => check_number(path, ball.z, operator, expected_value)?,
                    "speed" => check_number(path, ball.speed, operator, expected_value)?,
                    "in_play" => check_text(path, &ball.in_play.to_string(), operator, expected_value)?,
                    _ => return Err(unknown_path(check)),
                }
            }
            _ => return Err(unknown_path(check)),
        }
    }

    Ok(())
}

fn unknown_path(check: &str) -> AssertionError {
    AssertionError {
        message: format!("Unknown check path: {}", check),
        expected: "score, pocketed, time_remaining, session.*, shot.*, replay.phase, ball.<id>.*"
            .to_string(),
        actual: check.to_string(),
    }
}

/// Check numeric comparison with operator
fn check_number(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 1e-3,
        "!=" => (actual - value).abs() >= 1e-3,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.3})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.3}", actual),
        });
    }

    Ok(())
}

/// Check string equality (only `=` and `!=` apply)
fn check_text(path: &str, actual: &str, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let expected = expected_str.trim_matches('"');
    let pass = match operator {
        "=" => actual == expected,
        "!=" => actual != expected,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' not supported for {}", operator, path),
                expected: "= or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {}", path, operator, expected),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}
