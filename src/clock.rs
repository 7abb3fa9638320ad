//! Logical fixed-step clock shared by every table system

use bevy::prelude::*;

/// Tick counter and step length for the table.
///
/// Table systems read `dt` from here instead of `Time`, so a tick means the same thing
/// whether the schedule is driven by `FixedUpdate` in a running app or stepped by hand.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TableClock {
    /// Index of the tick currently being processed (first tick is 1)
    pub tick: u64,
    /// Step length in seconds
    pub dt: f32,
}

impl TableClock {
    pub fn new(dt: f32) -> Self {
        Self { tick: 0, dt }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

impl Default for TableClock {
    fn default() -> Self {
        Self::new(1.0 / crate::constants::TICK_RATE_HZ)
    }
}

/// Advance the clock at the start of each fixed tick
pub fn advance_table_clock(mut clock: ResMut<TableClock>) {
    clock.advance();
}
