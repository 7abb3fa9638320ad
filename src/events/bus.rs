//! Event Bus - outbound notifications for collaborators
//!
//! Table systems emit notifications here during a tick. Collaborators (camera, audio,
//! UI sinks) read `peek()` from `Update`; it holds every tick run since the last frame.
//! At the end of each frame the pending events move to the bounded processed history.

use bevy::prelude::*;

use super::types::GameEvent;
use crate::clock::TableClock;

/// Processed events kept for inspection before the oldest are dropped
pub const HISTORY_LIMIT: usize = 4096;

/// Tick-stamped event
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Tick the event was emitted on
    pub tick: u64,
    /// The event data
    pub event: GameEvent,
}

/// Central outbound event bus
#[derive(Resource, Default)]
pub struct EventBus {
    /// Events emitted since the last frame ended, waiting to be consumed
    pending: Vec<BusEvent>,

    /// Events from earlier ticks (bounded by HISTORY_LIMIT)
    processed: Vec<BusEvent>,

    /// Current tick (for stamping)
    tick: u64,

    /// Whether the bus is enabled (for testing/simulation)
    enabled: bool,
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Create a disabled event bus (events are dropped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Update the stamping tick
    pub fn update_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            tick: self.tick,
            event,
        });
    }

    /// Emit multiple events at once
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    /// Get pending events for consumption (does not drain)
    pub fn peek(&self) -> &[BusEvent] {
        &self.pending
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.iter().cloned());
        if self.processed.len() > HISTORY_LIMIT {
            let excess = self.processed.len() - HISTORY_LIMIT;
            self.processed.drain(..excess);
        }
        events
    }

    /// Get processed events
    pub fn processed(&self) -> &[BusEvent] {
        &self.processed
    }

    /// Clear processed events
    pub fn clear_processed(&mut self) {
        self.processed.clear();
    }

    /// Get the number of pending events
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if the bus has any pending events
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Check if the bus is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the bus
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Stamp events emitted during this fixed tick
pub fn stamp_event_bus(mut bus: ResMut<EventBus>, clock: Res<TableClock>) {
    bus.update_tick(clock.tick);
}

/// Retire the frame's events once every reader has had a look (runs in `Last`)
pub fn rotate_event_bus(mut bus: ResMut<EventBus>) {
    bus.drain();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallId;

    #[test]
    fn test_emit_and_drain() {
        let mut bus = EventBus::new();
        bus.update_tick(42);

        bus.emit(GameEvent::AllSettled { shot: 1 });

        assert_eq!(bus.pending_count(), 1);
        assert!(bus.has_pending());

        let events = bus.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tick, 42);
        assert_eq!(bus.pending_count(), 0);
        assert_eq!(bus.processed().len(), 1);
    }

    #[test]
    fn test_disabled_bus() {
        let mut bus = EventBus::disabled();
        bus.emit(GameEvent::CueBallRespawned { ball: BallId(0) });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut bus = EventBus::new();
        for shot in 0..(HISTORY_LIMIT as u32 + 10) {
            bus.emit(GameEvent::AllSettled { shot });
        }
        bus.drain();

        assert_eq!(bus.processed().len(), HISTORY_LIMIT);
        assert_eq!(bus.processed()[0].event, GameEvent::AllSettled { shot: 10 });
    }
}
