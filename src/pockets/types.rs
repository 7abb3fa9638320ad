//! Pocket trigger types and the inbound trigger queue

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ball::BallId;
use crate::tuning::TableTuning;

/// Pocket identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PocketId(pub u32);

/// Which kind of body the trigger reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    ObjectBallPocket,
    CueBallPocket,
}

/// One trigger-entry callback from the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PocketEvent {
    pub ball: BallId,
    pub pocket: PocketId,
    pub kind: ZoneKind,
}

/// Trigger callbacks waiting for the Pockets set.
///
/// The physics collaborator pushes entries as its trigger callbacks fire; the router
/// drains the whole queue once per tick, before the session evaluates end conditions.
#[derive(Resource, Debug, Default)]
pub struct PocketInbox {
    events: Vec<PocketEvent>,
}

impl PocketInbox {
    pub fn push(&mut self, ball: BallId, pocket: PocketId, kind: ZoneKind) {
        self.events.push(PocketEvent { ball, pocket, kind });
    }

    pub fn drain(&mut self) -> Vec<PocketEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Score awarded by each pocket
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PocketValues {
    default_score: u32,
    overrides: BTreeMap<PocketId, u32>,
}

impl PocketValues {
    pub fn new(default_score: u32) -> Self {
        Self {
            default_score,
            overrides: BTreeMap::new(),
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        let mut values = Self::new(tuning.default_pocket_score);
        for (pocket, score) in &tuning.pocket_scores {
            values.set(PocketId(*pocket), *score);
        }
        values
    }

    pub fn set(&mut self, pocket: PocketId, score: u32) {
        self.overrides.insert(pocket, score);
    }

    pub fn score(&self, pocket: PocketId) -> u32 {
        self.overrides
            .get(&pocket)
            .copied()
            .unwrap_or(self.default_score)
    }
}

impl Default for PocketValues {
    fn default() -> Self {
        Self::from_tuning(&TableTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_drains_in_order() {
        let mut inbox = PocketInbox::default();
        inbox.push(BallId(2), PocketId(0), ZoneKind::ObjectBallPocket);
        inbox.push(BallId(0), PocketId(5), ZoneKind::CueBallPocket);

        let events = inbox.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ball, BallId(2));
        assert_eq!(events[1].kind, ZoneKind::CueBallPocket);
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_values_follow_tuning() {
        let mut tuning = TableTuning::default();
        tuning.pocket_scores.insert(4, 50);
        let values = PocketValues::from_tuning(&tuning);
        assert_eq!(values.score(PocketId(4)), 50);
        assert_eq!(values.score(PocketId(1)), 10);
    }
}
