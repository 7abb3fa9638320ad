//! Shooting module - shot lifecycle, cue controls, and shot systems

mod controls;
mod lifecycle;
mod systems;

pub use controls::*;
pub use lifecycle::*;
pub use systems::*;
