//! Pocket systems: drain trigger callbacks, fire due respawns

use bevy::prelude::*;

use super::respawn::RespawnQueue;
use super::router::{PocketEventRouter, PocketIgnored, PocketOutcome};
use super::types::{PocketInbox, PocketValues, ZoneKind};
use crate::ball::{
    Ball, BallBody, BallBodyData, BallRole, BodyMut, InPlay, SpawnPose, TableRoster,
};
use crate::clock::TableClock;
use crate::events::{EventBus, GameEvent};
use crate::session::SessionController;

/// Route every trigger callback queued since the last tick
#[allow(clippy::too_many_arguments)]
pub fn route_pocket_events(
    clock: Res<TableClock>,
    router: Res<PocketEventRouter>,
    values: Res<PocketValues>,
    roster: Res<TableRoster>,
    mut inbox: ResMut<PocketInbox>,
    mut session: ResMut<SessionController>,
    mut respawns: ResMut<RespawnQueue>,
    mut event_bus: ResMut<EventBus>,
    mut in_play: Query<&mut InPlay, With<Ball>>,
) {
    for event in inbox.drain() {
        let entry = roster.get(event.ball);
        let current = entry.and_then(|entry| in_play.get(entry.entity).ok().map(|flag| flag.0));

        if let Some(entry) = entry {
            let expected = entry.role == BallRole::Cue;
            let reported = event.kind == ZoneKind::CueBallPocket;
            if expected != reported {
                warn!(
                    "Pocket {} reported {:?} for {} ({:?}); following the trigger",
                    event.pocket.0, event.kind, event.ball, entry.role
                );
            }
        }

        let outcome = router.on_ball_entered_pocket(
            event,
            clock.tick,
            current,
            &values,
            &mut session,
            &mut respawns,
        );

        match outcome {
            PocketOutcome::Scored {
                ball,
                pocket,
                points,
                score,
                ended,
            } => {
                if let Some(entry) = entry {
                    if let Ok(mut flag) = in_play.get_mut(entry.entity) {
                        flag.0 = false;
                    }
                }
                info!("{} pocketed in {} for {} (score {})", ball, pocket.0, points, score);
                event_bus.emit(GameEvent::BallPocketed {
                    ball,
                    pocket,
                    points,
                    score,
                });
                if let Some(outcome) = ended {
                    debug!("Pocket limit reached: {:?}", outcome);
                }
            }
            PocketOutcome::RespawnScheduled {
                ball,
                pocket,
                fire_tick,
            } => {
                info!("Cue ball {} scratched in {}, respawn at tick {}", ball, pocket.0, fire_tick);
                event_bus.emit(GameEvent::CueBallScratched {
                    ball,
                    pocket,
                    fire_tick,
                });
            }
            PocketOutcome::Ignored(PocketIgnored::UnknownBall) => {
                warn!("Pocket {} reported unknown ball {}", event.pocket.0, event.ball);
            }
            PocketOutcome::Ignored(reason) => {
                debug!("Pocket event for {} ignored: {:?}", event.ball, reason);
            }
        }
    }
}

/// Return cue balls whose respawn delay has elapsed to the spawn pose.
///
/// Nothing fires once the session is over; the end handler cancels what is left.
pub fn fire_due_respawns(
    clock: Res<TableClock>,
    pose: Res<SpawnPose>,
    roster: Res<TableRoster>,
    session: Res<SessionController>,
    mut respawns: ResMut<RespawnQueue>,
    mut event_bus: ResMut<EventBus>,
    mut bodies: Query<BallBodyData, With<Ball>>,
) {
    if session.is_over() {
        return;
    }
    for ball in respawns.take_due(clock.tick) {
        let Some(entry) = roster.get(ball) else {
            warn!("Respawn fired for unknown ball {}", ball);
            continue;
        };
        let Ok(item) = bodies.get_mut(entry.entity) else {
            error!("Respawn fired for {} but its body is gone", ball);
            continue;
        };
        BodyMut::from_item(item).reset_to(pose.position, pose.rotation);
        info!("{} respawned at {:?}", ball, pose.position);
        event_bus.emit(GameEvent::CueBallRespawned { ball });
    }
}

/// Drop trigger callbacks that arrive while replay owns the balls
pub fn discard_pocket_events(mut inbox: ResMut<PocketInbox>) {
    if !inbox.is_empty() {
        debug!("Discarding {} pocket events during playback", inbox.len());
        inbox.clear();
    }
}
