//! Poolhall - turn coordination for a single-table pool minigame, built with Bevy
//!
//! Rest detection, the shot cycle, pocket routing with delayed cue respawn, session end
//! conditions, and trajectory record/replay. Rendering, audio, UI widgets, and the
//! rigid-body solver are outside collaborators that talk to the table through resources
//! and the event bus.

// Core modules
pub mod clock;
pub mod constants;
pub mod error;
pub mod events;
pub mod plugin;
pub mod stationarity;
pub mod tuning;

// Table logic modules
pub mod ball;
pub mod director;
pub mod input;
pub mod pockets;
pub mod replay;
pub mod session;
pub mod shooting;

// Headless runs and tests
pub mod simulation;
pub mod testing;

// Re-export commonly used types for convenience
pub use ball::{
    AngularVelocity, Ball, BallBody, BallId, BallRole, BodyMut, InPlay, KinematicBody,
    LinearVelocity, PendingImpulse, SpawnPose, TableRoster,
};
pub use clock::TableClock;
pub use constants::*;
pub use director::{DirectorCommand, DirectorQueue};
pub use error::PoolError;
pub use events::{BusEvent, EventBus, GameEvent, serialize_event};
pub use input::PointerInput;
pub use plugin::{PoolTablePlugin, TableSet};
pub use pockets::{
    PocketEvent, PocketEventRouter, PocketId, PocketInbox, PocketOutcome, PocketValues,
    RespawnQueue, ZoneKind,
};
pub use replay::{KinematicAuthority, ReplayBuffer, ReplayEngine, ReplayFrame, ReplayPhase};
pub use session::{
    GameOverBanner, ScoreDisplay, SessionController, SessionOutcome, SessionState, TimerDisplay,
};
pub use shooting::{CueControls, ShotLifecycle, ShotRejection, ShotState, shot_force};
pub use stationarity::StationarityOracle;
pub use tuning::TableTuning;
