//! TOML scenario file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::director::DirectorCommand;
use crate::pockets::ZoneKind;
use crate::tuning::TableTuning;

/// Complete scenario definition from a TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<TickInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Table setup for a scenario
#[derive(Debug, Deserialize)]
pub struct TestSetup {
    /// Object balls racked in front of the cue ball (ids 1..=n)
    #[serde(default = "default_object_balls")]
    pub object_balls: u32,
    /// Partial tuning; missing fields take the table defaults
    #[serde(default)]
    pub tuning: Option<TableTuning>,
    /// Run at least this many ticks
    #[serde(default)]
    pub ticks: u64,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            object_balls: default_object_balls(),
            tuning: None,
            ticks: 0,
        }
    }
}

fn default_object_balls() -> u32 {
    3
}

/// Scripted collaborator input applied before the given tick runs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickInput {
    pub tick: u64,
    #[serde(default)]
    pub press: bool,
    #[serde(default)]
    pub release: bool,
    /// Slider write from the UI
    pub charge: Option<f32>,
    /// Pointer hit on the table plane
    pub aim: Option<[f32; 3]>,
    /// Velocity override for one ball, as the rigid-body engine would write it
    pub velocity: Option<VelocityDef>,
    #[serde(default)]
    pub pocket: Vec<PocketDef>,
    pub command: Option<CommandDef>,
    /// Used with `command = "set_replay_speed"`
    pub replay_speed: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VelocityDef {
    pub ball: u32,
    pub value: [f32; 3],
}

/// One trigger callback
#[derive(Debug, Clone, Deserialize)]
pub struct PocketDef {
    pub ball: u32,
    #[serde(default)]
    pub pocket: u32,
    #[serde(default)]
    pub kind: ZoneDef,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneDef {
    #[default]
    Object,
    Cue,
}

impl From<ZoneDef> for ZoneKind {
    fn from(zone: ZoneDef) -> Self {
        match zone {
            ZoneDef::Object => ZoneKind::ObjectBallPocket,
            ZoneDef::Cue => ZoneKind::CueBallPocket,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandDef {
    Restart,
    StartRecording,
    StopRecording,
    Replay,
    SetReplaySpeed,
    SpeedUp,
    SpeedDown,
}

impl TickInput {
    /// Director command for this tick, if any
    pub fn director_command(&self) -> Result<Option<DirectorCommand>, String> {
        let Some(command) = self.command else {
            return Ok(None);
        };
        let command = match command {
            CommandDef::Restart => DirectorCommand::RestartSession,
            CommandDef::StartRecording => DirectorCommand::StartRecording,
            CommandDef::StopRecording => DirectorCommand::StopRecording,
            CommandDef::Replay => DirectorCommand::Replay,
            CommandDef::SetReplaySpeed => {
                let speed = self.replay_speed.ok_or_else(|| {
                    format!("tick {}: set_replay_speed needs replay_speed", self.tick)
                })?;
                DirectorCommand::SetReplaySpeed(speed)
            }
            CommandDef::SpeedUp => DirectorCommand::SpeedUp,
            CommandDef::SpeedDown => DirectorCommand::SpeedDown,
        };
        Ok(Some(command))
    }
}

/// Expected scenario outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    /// Events that must appear in this order (others may be interleaved)
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Exact totals for an event over the whole run (uses [[expect.count]])
    #[serde(default)]
    pub count: Vec<ExpectedCount>,
    /// State checks at different ticks (uses [[expect.state]])
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    pub ball: Option<u32>,
    pub tick_min: Option<u64>,
    pub tick_max: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectedCount {
    pub event: String,
    pub count: usize,
}

/// State checks evaluated right after a tick
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_tick: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a scenario from TOML text
pub fn parse_test_str(content: &str) -> Result<TestDefinition, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Parse a scenario file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    parse_test_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let toml = r#"
name = "Test"
[setup]
object_balls = 2
[setup.tuning]
time_limit_secs = 5.0

[[input]]
tick = 3
pocket = [{ ball = 1, pocket = 4 }, { ball = 0, kind = "cue" }]

[[input]]
tick = 5
command = "set_replay_speed"
replay_speed = 2.0

[[expect.state]]
after_tick = 10
checks = ["score = 10"]
"#;
        let def = parse_test_str(toml).unwrap();
        assert_eq!(def.name, "Test");
        assert_eq!(def.setup.object_balls, 2);

        let tuning = def.setup.tuning.unwrap();
        assert_eq!(tuning.time_limit_secs, 5.0);
        assert_eq!(tuning.settle_ticks, TableTuning::default().settle_ticks);

        assert_eq!(def.input[0].pocket.len(), 2);
        assert_eq!(def.input[0].pocket[1].kind, ZoneDef::Cue);
        assert_eq!(
            def.input[1].director_command(),
            Ok(Some(DirectorCommand::SetReplaySpeed(2.0)))
        );
        assert_eq!(def.expect.state[0].after_tick, 10);
    }

    #[test]
    fn test_speed_command_needs_value() {
        let input = TickInput {
            tick: 7,
            command: Some(CommandDef::SetReplaySpeed),
            ..Default::default()
        };
        assert!(input.director_command().is_err());
    }

    #[test]
    fn test_unknown_command_fails_to_parse() {
        let toml = r#"
name = "Bad"
[[input]]
tick = 1
command = "rewind"
"#;
        assert!(parse_test_str(toml).is_err());
    }
}
