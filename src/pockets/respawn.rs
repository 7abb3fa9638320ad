//! Delayed cue-ball respawns

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::ball::BallId;

/// Respawns armed by cue-ball pockets, keyed by ball.
///
/// At most one entry per ball: a second pocket while one is pending is ignored, so the
/// first-scheduled fire tick wins.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct RespawnQueue {
    pending: BTreeMap<BallId, u64>,
}

impl RespawnQueue {
    /// Arm a respawn. Returns false if one is already pending for the ball.
    pub fn schedule(&mut self, ball: BallId, fire_tick: u64) -> bool {
        if self.pending.contains_key(&ball) {
            return false;
        }
        self.pending.insert(ball, fire_tick);
        true
    }

    pub fn is_pending(&self, ball: BallId) -> bool {
        self.pending.contains_key(&ball)
    }

    pub fn fire_tick(&self, ball: BallId) -> Option<u64> {
        self.pending.get(&ball).copied()
    }

    /// Remove and return every entry due at `tick`
    pub fn take_due(&mut self, tick: u64) -> Vec<BallId> {
        let due: Vec<BallId> = self
            .pending
            .iter()
            .filter(|(_, fire)| **fire <= tick)
            .map(|(ball, _)| *ball)
            .collect();
        for ball in &due {
            self.pending.remove(ball);
        }
        due
    }

    /// Drop every pending entry, returning the balls that were waiting
    pub fn cancel_all(&mut self) -> Vec<BallId> {
        std::mem::take(&mut self.pending).into_keys().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_schedule_wins() {
        let mut queue = RespawnQueue::default();
        assert!(queue.schedule(BallId(0), 120));
        assert!(!queue.schedule(BallId(0), 150));
        assert_eq!(queue.fire_tick(BallId(0)), Some(120));
    }

    #[test]
    fn test_due_entries_fire_once() {
        let mut queue = RespawnQueue::default();
        queue.schedule(BallId(0), 10);

        assert!(queue.take_due(9).is_empty());
        assert_eq!(queue.take_due(10), vec![BallId(0)]);
        assert!(queue.take_due(11).is_empty());
        assert!(!queue.is_pending(BallId(0)));
    }

    #[test]
    fn test_cancel_all() {
        let mut queue = RespawnQueue::default();
        queue.schedule(BallId(0), 10);
        assert_eq!(queue.cancel_all(), vec![BallId(0)]);
        assert!(queue.is_empty());
        assert!(queue.take_due(100).is_empty());
    }
}
