//! Headless simulation - app builder, stand-in physics, and a tick-stepping harness
//!
//! Runs the table without rendering or a real rigid-body engine, for the simulate
//! binary, the scenario runner, and integration tests.

pub mod app_builder;
pub mod config;
pub mod harness;
pub mod metrics;
pub mod runner;
pub mod stand_in;

#[cfg(test)]
mod table_tests;

pub use app_builder::HeadlessAppBuilder;
pub use config::SimConfig;
pub use harness::{TableHarness, spawn_ball, spawn_rack};
pub use metrics::SessionSummary;
pub use runner::{ScriptedPlayer, run_session};
pub use stand_in::{StandInPhysics, StandInPhysicsPlugin, step_stand_in_physics};
