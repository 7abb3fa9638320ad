//! Session module - score, pocket count, timer, and game-over handling

mod controller;
mod display;
mod systems;

pub use controller::*;
pub use display::*;
pub use systems::*;
