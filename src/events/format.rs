//! Compact text format for event logs
//!
//! Format: `T:NNNNNN|CODE|data...`
//! - T:NNNNNN = tick index (6 digits, wraps at 999999)
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:000001|SE|1f0c...|2026-10-18T09:00:00+00:00
//! T:000034|ST|1|0.000,0.000,-1.000|640.0
//! T:000035|BP|#3|2|10|10
//! T:000180|CP|#0|4|300
//! T:010800|GO|TimeUp|40|4|Game Over!
//! ```

use bevy::prelude::*;

use super::types::GameEvent;

/// Format a float with fixed precision (1 decimal)
fn fmt_f1(v: f32) -> String {
    format!("{:.1}", v)
}

/// Format a direction with 3 decimals per axis
fn fmt_dir(v: Vec3) -> String {
    format!("{:.3},{:.3},{:.3}", v.x, v.y, v.z)
}

/// Serialize a GameEvent to compact text format
pub fn serialize_event(tick: u64, event: &GameEvent) -> String {
    let ts = format!("T:{:06}", tick % 1_000_000);
    let code = event.type_code();

    let data = match event {
        GameEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        GameEvent::Config(tuning) => {
            // Config as compact JSON for easy parsing
            serde_json::to_string(tuning).unwrap_or_else(|_| "{}".to_string())
        }
        GameEvent::SessionEnd {
            outcome,
            score,
            pocketed,
            message,
        } => format!("{:?}|{}|{}|{}", outcome, score, pocketed, message),
        GameEvent::ChargeStarted { shot } => shot.to_string(),
        GameEvent::ShotRejected { reason } => reason.clone(),
        GameEvent::ShotTaken {
            shot,
            direction,
            force,
        } => format!("{}|{}|{}", shot, fmt_dir(*direction), fmt_f1(*force)),
        GameEvent::ChargeAborted { shot } => shot.to_string(),
        GameEvent::AllSettled { shot } => shot.to_string(),
        GameEvent::BallPocketed {
            ball,
            pocket,
            points,
            score,
        } => format!("{}|{}|{}|{}", ball, pocket.0, points, score),
        GameEvent::CueBallScratched {
            ball,
            pocket,
            fire_tick,
        } => format!("{}|{}|{}", ball, pocket.0, fire_tick),
        GameEvent::CueBallRespawned { ball } => ball.to_string(),
        GameEvent::RespawnCancelled { ball } => ball.to_string(),
        GameEvent::RecordingStarted { balls } => balls.to_string(),
        GameEvent::RecordingStopped { frames } => frames.to_string(),
        GameEvent::ReplayStarted { frames, speed } => format!("{}|{:.2}", frames, speed),
        GameEvent::ReplayFinished { frames_played } => frames_played.to_string(),
    };

    format!("{}|{}|{}", ts, code, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball::BallId;
    use crate::pockets::PocketId;
    use crate::session::SessionOutcome;

    #[test]
    fn test_shot_line() {
        let line = serialize_event(
            34,
            &GameEvent::ShotTaken {
                shot: 1,
                direction: Vec3::NEG_Z,
                force: 640.0,
            },
        );
        assert_eq!(line, "T:000034|ST|1|0.000,0.000,-1.000|640.0");
    }

    #[test]
    fn test_pocket_and_end_lines() {
        let pocketed = serialize_event(
            35,
            &GameEvent::BallPocketed {
                ball: BallId(3),
                pocket: PocketId(2),
                points: 10,
                score: 10,
            },
        );
        assert_eq!(pocketed, "T:000035|BP|#3|2|10|10");

        let end = serialize_event(
            10_800,
            &GameEvent::SessionEnd {
                outcome: SessionOutcome::TimeUp,
                score: 40,
                pocketed: 4,
                message: "Game Over!".to_string(),
            },
        );
        assert_eq!(end, "T:010800|GO|TimeUp|40|4|Game Over!");
    }

    #[test]
    fn test_tick_wraps() {
        let line = serialize_event(1_000_005, &GameEvent::AllSettled { shot: 2 });
        assert!(line.starts_with("T:000005|AS|"));
    }
}
