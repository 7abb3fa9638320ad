//! Session systems: start, timer, end handling, display sinks

use bevy::prelude::*;

use super::controller::SessionController;
use super::display::{GameOverBanner, ScoreDisplay, TimerDisplay};
use crate::clock::TableClock;
use crate::constants::GAME_OVER_MESSAGE;
use crate::events::{EventBus, GameEvent};
use crate::pockets::RespawnQueue;
use crate::shooting::{CueControls, ShotLifecycle};
use crate::tuning::TableTuning;

/// Start notification with a fresh session id and wall-clock timestamp
pub fn session_start_event() -> GameEvent {
    GameEvent::SessionStart {
        session_id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// Startup system: begin the first session
pub fn begin_session(
    tuning: Res<TableTuning>,
    mut session: ResMut<SessionController>,
    mut banner: ResMut<GameOverBanner>,
    mut event_bus: ResMut<EventBus>,
) {
    session.start();
    banner.0 = None;
    info!(
        "Session started: {} to pocket {} balls",
        session.timer_string(),
        session.max_pocketed_count()
    );
    event_bus.emit(session_start_event());
    event_bus.emit(GameEvent::Config(tuning.clone()));
}

/// Count down the session clock
pub fn tick_session_timer(clock: Res<TableClock>, mut session: ResMut<SessionController>) {
    if let Some(outcome) = session.tick(clock.dt) {
        debug!("Session timer ended the session: {:?}", outcome);
    }
}

/// React once to the end of a session: drop respawns, abort a charge, announce it
pub fn handle_session_end(
    mut session: ResMut<SessionController>,
    mut respawns: ResMut<RespawnQueue>,
    mut lifecycle: ResMut<ShotLifecycle>,
    mut controls: ResMut<CueControls>,
    mut banner: ResMut<GameOverBanner>,
    mut event_bus: ResMut<EventBus>,
) {
    let Some(outcome) = session.take_unreported_end() else {
        return;
    };

    for ball in respawns.cancel_all() {
        debug!("Respawn for {} cancelled by session end", ball);
        event_bus.emit(GameEvent::RespawnCancelled { ball });
    }

    if lifecycle.abort_charge() {
        controls.unlock();
        info!("Charge aborted: session over");
        event_bus.emit(GameEvent::ChargeAborted {
            shot: lifecycle.shots_taken() + 1,
        });
    }

    banner.0 = Some(GAME_OVER_MESSAGE.to_string());
    info!(
        "Session over ({:?}): score {}, {} pocketed, {} left",
        outcome,
        session.score(),
        session.pocketed_count(),
        session.timer_string()
    );
    event_bus.emit(GameEvent::SessionEnd {
        outcome,
        score: session.score(),
        pocketed: session.pocketed_count(),
        message: GAME_OVER_MESSAGE.to_string(),
    });
}

/// Refresh the timer and score readouts
pub fn update_session_displays(
    session: Res<SessionController>,
    mut timer: ResMut<TimerDisplay>,
    mut score: ResMut<ScoreDisplay>,
) {
    let next = TimerDisplay::from_session(&session);
    if *timer != next {
        *timer = next;
    }
    if score.0 != session.score() {
        score.0 = session.score();
    }
}

/// Run condition: the session is still in play
pub fn session_in_play(session: Res<SessionController>) -> bool {
    !session.is_over()
}
