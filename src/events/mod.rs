//! Outbound notifications
//!
//! The EventBus carries every notification the table emits (shot taken, all settled,
//! pockets, respawns, game over, replay transitions) to external collaborators, and
//! `serialize_event` renders them as compact log lines.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, EventBus, HISTORY_LIMIT, rotate_event_bus, stamp_event_bus};
pub use format::serialize_event;
pub use types::GameEvent;
