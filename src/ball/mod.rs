//! Ball module - components, body interface, and the table roster

mod body;
mod components;
mod roster;

pub use body::*;
pub use components::*;
pub use roster::*;
