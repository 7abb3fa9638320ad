//! Shot systems: aim, slider spring, lifecycle advance, press/release handling

use bevy::prelude::*;

use super::controls::CueControls;
use super::lifecycle::{ChargeGate, LifecycleStep, ShotLifecycle};
use crate::ball::{Ball, BallBody, BallBodyData, BodyMut, InPlay, LinearVelocity, TableRoster};
use crate::clock::TableClock;
use crate::events::{EventBus, GameEvent};
use crate::input::PointerInput;
use crate::pockets::RespawnQueue;
use crate::session::SessionController;
use crate::stationarity::StationarityOracle;

/// Point the cue at the pointer's table hit while the lifecycle allows aiming
pub fn update_cue_aim(
    input: Res<PointerInput>,
    lifecycle: Res<ShotLifecycle>,
    roster: Res<TableRoster>,
    mut controls: ResMut<CueControls>,
    balls: Query<&Transform, With<Ball>>,
) {
    if !lifecycle.can_aim() {
        return;
    }
    let Some(hit) = input.aim_point() else {
        return;
    };
    let Ok(cue) = balls.get(roster.cue_entity()) else {
        return;
    };
    controls.aim_at(cue.translation, hit);
}

/// Spring the power slider back toward no power
pub fn spring_charge_slider(clock: Res<TableClock>, mut controls: ResMut<CueControls>) {
    controls.spring(clock.dt);
}

/// Released -> Settling, and Settling -> Idle once every tracked ball has rested long
/// enough and no cue respawn is pending
pub fn advance_shot_lifecycle(
    oracle: Res<StationarityOracle>,
    roster: Res<TableRoster>,
    respawns: Res<RespawnQueue>,
    mut lifecycle: ResMut<ShotLifecycle>,
    mut controls: ResMut<CueControls>,
    mut event_bus: ResMut<EventBus>,
    balls: Query<(&InPlay, &LinearVelocity), With<Ball>>,
) {
    let tracked = balls
        .iter()
        .filter(|(in_play, _)| in_play.0)
        .map(|(_, velocity)| velocity.0);
    let settled = oracle.all_at_rest(tracked) && !respawns.is_pending(roster.cue_id());

    match lifecycle.advance(settled) {
        LifecycleStep::BeganSettling => {
            debug!("Shot {} settling", lifecycle.shots_taken());
        }
        LifecycleStep::Settled(shot) => {
            controls.unlock();
            info!("Shot {} settled, input open", shot);
            event_bus.emit(GameEvent::AllSettled { shot });
        }
        LifecycleStep::Unchanged => {}
    }
}

/// Consume pointer edges: press begins a charge, release fires the shot
#[allow(clippy::too_many_arguments)]
pub fn handle_shot_input(
    oracle: Res<StationarityOracle>,
    roster: Res<TableRoster>,
    session: Res<SessionController>,
    mut input: ResMut<PointerInput>,
    mut lifecycle: ResMut<ShotLifecycle>,
    mut controls: ResMut<CueControls>,
    mut event_bus: ResMut<EventBus>,
    mut balls: Query<BallBodyData, With<Ball>>,
) {
    let cue_entity = roster.cue_entity();

    if input.take_press() {
        let cue_at_rest = balls
            .get(cue_entity)
            .map(|(_, velocity, _, _)| oracle.is_velocity_at_rest(velocity.0))
            .unwrap_or(false);
        let gate = ChargeGate {
            cue_at_rest,
            session_over: session.is_over(),
            charge_enabled: controls.charge_interactable(),
        };
        let from = lifecycle.state();
        match lifecycle.begin_charge(gate) {
            Ok(()) => {
                controls.lock_for_charge();
                debug!("Charging shot {}", lifecycle.shots_taken() + 1);
                event_bus.emit(GameEvent::ChargeStarted {
                    shot: lifecycle.shots_taken() + 1,
                });
            }
            Err(rejection) => {
                warn!("Shot rejected: {}", rejection.into_error(from));
                event_bus.emit(GameEvent::ShotRejected {
                    reason: rejection.to_string(),
                });
            }
        }
    }

    if input.take_release() {
        let Some(impulse) = lifecycle.release(controls.charge_value(), controls.aim_forward())
        else {
            debug!("Pointer release with no charge in progress");
            return;
        };

        match balls.get_mut(cue_entity) {
            Ok(item) => {
                let mut body = BodyMut::from_item(item);
                body.apply_impulse(impulse.direction, impulse.force);
            }
            Err(e) => error!("Cue ball body unavailable for shot {}: {}", impulse.shot, e),
        }
        controls.lock_for_release();

        info!(
            "Shot {} taken: force {:.1} along ({:.2}, {:.2}, {:.2})",
            impulse.shot, impulse.force, impulse.direction.x, impulse.direction.y, impulse.direction.z
        );
        event_bus.emit(GameEvent::ShotTaken {
            shot: impulse.shot,
            direction: impulse.direction,
            force: impulse.force,
        });
    }
}
