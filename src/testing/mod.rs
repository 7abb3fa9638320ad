//! Scenario testing for deterministic table runs
//!
//! Scripted collaborator input (pointer edges, slider writes, trigger callbacks,
//! director commands) is fed into a headless table tick by tick and checked against
//! expected event sequences and table state.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, TableState, check_counts, check_sequence, check_state};
pub use input::ScriptedInputs;
pub use parser::{
    ExpectedCount, ExpectedEvent, StateAssertion, TestDefinition, TestExpectations, TestSetup,
    TickInput,
};
pub use runner::{TestResult, run_test};

/// Default path for scenario files
pub const SCENARIOS_DIR: &str = "tests/scenarios";
