//! Pockets module - trigger routing, scoring, and cue-ball respawn

mod respawn;
mod router;
mod systems;
mod types;

pub use respawn::*;
pub use router::*;
pub use systems::*;
pub use types::*;
