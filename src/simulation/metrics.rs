//! Per-session summary collected from the event log

use serde::{Deserialize, Serialize};

use crate::events::{BusEvent, GameEvent};

/// Outcome figures for one simulated session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub seed: u64,
    pub ticks: u64,
    pub shots: u32,
    pub rejected_presses: u32,
    pub score: u32,
    pub pocketed: u32,
    pub scratches: u32,
    pub respawns: u32,
    /// "Cleared", "TimeUp", or None when the tick budget ran out first
    pub outcome: Option<String>,
    pub replayed_frames: Option<usize>,
    pub events: usize,
}

impl SessionSummary {
    /// Fold an event log into a summary
    pub fn from_events(seed: u64, ticks: u64, events: &[BusEvent]) -> Self {
        let mut summary = Self {
            seed,
            ticks,
            events: events.len(),
            ..Default::default()
        };

        for bus_event in events {
            match &bus_event.event {
                GameEvent::SessionStart { session_id, .. } => {
                    // A restart begins a new session; keep the latest id
                    summary.session_id = session_id.clone();
                }
                GameEvent::ShotTaken { .. } => summary.shots += 1,
                GameEvent::ShotRejected { .. } => summary.rejected_presses += 1,
                GameEvent::BallPocketed { score, .. } => {
                    summary.pocketed += 1;
                    summary.score = *score;
                }
                GameEvent::CueBallScratched { .. } => summary.scratches += 1,
                GameEvent::CueBallRespawned { .. } => summary.respawns += 1,
                GameEvent::SessionEnd { outcome, score, .. } => {
                    summary.outcome = Some(format!("{:?}", outcome));
                    summary.score = *score;
                }
                GameEvent::ReplayFinished { frames_played } => {
                    summary.replayed_frames = Some(*frames_played);
                }
                _ => {}
            }
        }
        summary
    }

    /// One-line human readable report
    pub fn report(&self) -> String {
        format!(
            "seed {} | {} ticks | {} shots ({} rejected) | score {} | {} pocketed | {} scratches | {}",
            self.seed,
            self.ticks,
            self.shots,
            self.rejected_presses,
            self.score,
            self.pocketed,
            self.scratches,
            self.outcome.as_deref().unwrap_or("unfinished")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallId;
    use crate::pockets::PocketId;
    use crate::session::SessionOutcome;

    fn at(tick: u64, event: GameEvent) -> BusEvent {
        BusEvent { tick, event }
    }

    #[test]
    fn test_summary_counts() {
        let events = vec![
            at(
                0,
                GameEvent::SessionStart {
                    session_id: "abc".to_string(),
                    timestamp: "t".to_string(),
                },
            ),
            at(
                3,
                GameEvent::BallPocketed {
                    ball: BallId(1),
                    pocket: PocketId(0),
                    points: 10,
                    score: 10,
                },
            ),
            at(
                4,
                GameEvent::CueBallScratched {
                    ball: BallId(0),
                    pocket: PocketId(2),
                    fire_tick: 124,
                },
            ),
            at(
                9,
                GameEvent::SessionEnd {
                    outcome: SessionOutcome::TimeUp,
                    score: 10,
                    pocketed: 1,
                    message: "Game Over!".to_string(),
                },
            ),
        ];

        let summary = SessionSummary::from_events(5, 9, &events);
        assert_eq!(summary.session_id, "abc");
        assert_eq!(summary.pocketed, 1);
        assert_eq!(summary.scratches, 1);
        assert_eq!(summary.score, 10);
        assert_eq!(summary.outcome.as_deref(), Some("TimeUp"));
        assert_eq!(summary.events, 4);
        assert!(summary.report().contains("TimeUp"));
    }
}
