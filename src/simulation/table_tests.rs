//! End-to-end tick tests on a headless table

use bevy::prelude::*;

use super::{HeadlessAppBuilder, TableHarness, spawn_ball, spawn_rack};
use crate::ball::BallRole;
use crate::director::DirectorCommand;
use crate::events::{EventBus, GameEvent};
use crate::input::PointerInput;
use crate::pockets::ZoneKind;
use crate::replay::{KinematicAuthority, ReplayEngine};
use crate::session::{GameOverBanner, SessionOutcome};
use crate::shooting::ShotState;
use crate::tuning::TableTuning;

fn table(tuning: TableTuning, object_balls: u32) -> TableHarness {
    let mut app = HeadlessAppBuilder::new()
        .with_tuning(tuning.clone())
        .with_minimal_threads()
        .build()
        .unwrap();
    spawn_rack(app.world_mut(), &tuning, object_balls);
    TableHarness::start(app)
}

fn shoot(harness: &mut TableHarness, charge: f32) {
    harness.press();
    harness.step();
    harness.set_charge(charge);
    harness.release();
    harness.step();
}

#[test]
fn test_startup_announces_session() {
    let harness = table(TableTuning::default(), 3);
    assert_eq!(harness.event_count("SessionStart"), 1);
    assert_eq!(harness.event_count("Config"), 1);
    assert!(!harness.session().is_over());
    assert_eq!(harness.session().time_remaining(), 180.0);
}

#[test]
#[should_panic]
fn test_table_without_cue_fails_fast() {
    let mut app = HeadlessAppBuilder::new()
        .with_tuning(TableTuning::default())
        .with_minimal_threads()
        .build()
        .unwrap();
    spawn_ball(app.world_mut(), 1, BallRole::Object, Vec3::ZERO);
    TableHarness::start(app);
}

#[test]
fn test_shot_cycle_moves_cue_and_settles() {
    let mut harness = table(TableTuning::default(), 3);
    let start = harness.position(0).unwrap();
    harness.aim_at(start + Vec3::new(0.0, -0.8, -2.0));
    harness.step();

    shoot(&mut harness, 0.0);
    assert_eq!(harness.lifecycle().state(), ShotState::Released);
    assert!(!harness.controls().charge_interactable());

    let shots: Vec<_> = harness
        .events()
        .iter()
        .filter_map(|e| match e.event {
            GameEvent::ShotTaken {
                direction, force, ..
            } => Some((direction, force)),
            _ => None,
        })
        .collect();
    assert_eq!(shots.len(), 1);
    assert!((shots[0].0 - Vec3::NEG_Z).length() < 1e-5);
    assert_eq!(shots[0].1, 1000.0);

    let ticks = harness.step_until_idle(2000).expect("table never settled");
    assert!(ticks > 10);
    assert!(harness.position(0).unwrap().z < start.z - 1.0);
    assert_eq!(harness.event_count("AllSettled"), 1);
    assert!(harness.controls().charge_interactable());
    assert_eq!(harness.controls().charge_value(), 1.0);
}

#[test]
fn test_zero_force_shot_returns_to_idle() {
    let mut harness = table(TableTuning::default(), 1);
    let start = harness.position(0).unwrap();

    shoot(&mut harness, 1.0);
    let ticks = harness.step_until_idle(50).expect("zero-force shot never settled");

    // Settling entry plus the debounce window
    assert_eq!(ticks, 1 + TableTuning::default().settle_ticks);
    assert_eq!(harness.position(0), Some(start));
    assert_eq!(harness.event_count("AllSettled"), 1);
}

#[test]
fn test_press_while_cue_moving_is_rejected() {
    let mut harness = table(TableTuning::default(), 1);
    harness.set_velocity(0, Vec3::new(2.0, 0.0, 0.0));
    harness.press();
    harness.step();

    assert_eq!(harness.lifecycle().state(), ShotState::Idle);
    assert_eq!(harness.event_count("ShotRejected"), 1);
    assert_eq!(harness.event_count("ChargeStarted"), 0);

    harness.release();
    harness.step();
    assert_eq!(harness.event_count("ShotTaken"), 0);
}

#[test]
fn test_second_press_during_settling_is_rejected() {
    let mut harness = table(TableTuning::default(), 1);
    shoot(&mut harness, 0.0);
    harness.step();
    assert_eq!(harness.lifecycle().state(), ShotState::Settling);

    shoot(&mut harness, 0.0);
    assert_eq!(harness.event_count("ShotTaken"), 1);
    assert_eq!(harness.event_count("ShotRejected"), 1);
}

#[test]
fn test_cue_scratch_respawns_once_after_delay() {
    let tuning = TableTuning::default();
    let delay = tuning.respawn_delay_ticks() as u32;
    let mut harness = table(tuning.clone(), 2);

    // First report plus repeats inside the delay window
    for _ in 0..10 {
        harness.pocket(0, 2, ZoneKind::CueBallPocket);
        harness.step();
    }
    assert_eq!(harness.event_count("CueBallScratched"), 1);

    let cue = harness.entity(0).unwrap();
    harness.world_mut().get_mut::<Transform>(cue).unwrap().translation = Vec3::new(9.0, -1.0, 9.0);

    harness.step_n(delay - 10);
    assert_eq!(harness.event_count("CueBallRespawned"), 0);

    harness.step();
    assert_eq!(harness.event_count("CueBallRespawned"), 1);
    assert_eq!(harness.position(0), Some(tuning.cue_spawn()));
    assert_eq!(harness.velocity(0), Some(Vec3::ZERO));

    harness.step_n(delay);
    assert_eq!(harness.event_count("CueBallRespawned"), 1);
}

#[test]
fn test_pending_respawn_holds_settling() {
    let tuning = TableTuning::default();
    let delay = tuning.respawn_delay_ticks() as u32;
    let mut harness = table(tuning, 1);

    shoot(&mut harness, 1.0);
    harness.pocket(0, 1, ZoneKind::CueBallPocket);
    harness.step_n(delay - 1);
    assert_eq!(harness.lifecycle().state(), ShotState::Settling);

    let ticks = harness.step_until_idle(100).expect("never settled after respawn");
    assert!(ticks >= 1);
    assert_eq!(harness.event_count("CueBallRespawned"), 1);
}

#[test]
fn test_seven_pockets_end_the_session() {
    let mut harness = table(TableTuning::default(), 9);
    for ball in 1..=7 {
        harness.pocket(ball, 0, ZoneKind::ObjectBallPocket);
        harness.step();
        assert_eq!(harness.in_play(ball), Some(false));
    }

    assert!(harness.session().is_over());
    assert_eq!(harness.session().score(), 70);
    assert_eq!(harness.session().outcome(), Some(SessionOutcome::Cleared));
    assert_eq!(
        harness.world().resource::<GameOverBanner>().0.as_deref(),
        Some("Game Over!")
    );

    harness.pocket(8, 0, ZoneKind::ObjectBallPocket);
    harness.step_n(5);
    assert_eq!(harness.session().score(), 70);
    assert_eq!(harness.session().pocketed_count(), 7);
    assert_eq!(harness.in_play(8), Some(true));
    assert_eq!(harness.event_count("SessionEnd"), 1);
}

#[test]
fn test_repeat_pocket_scores_once() {
    let mut harness = table(TableTuning::default(), 2);
    harness.pocket(1, 0, ZoneKind::ObjectBallPocket);
    harness.pocket(1, 0, ZoneKind::ObjectBallPocket);
    harness.pocket(42, 0, ZoneKind::ObjectBallPocket);
    harness.step();

    assert_eq!(harness.session().score(), 10);
    assert_eq!(harness.session().pocketed_count(), 1);
    assert_eq!(harness.event_count("BallPocketed"), 1);
}

#[test]
fn test_respawn_due_on_winning_tick_is_cancelled() {
    let tuning = TableTuning {
        max_pocketed_count: 1,
        ..Default::default()
    };
    let mut harness = table(tuning, 2);

    harness.pocket(0, 2, ZoneKind::CueBallPocket);
    harness.step();
    harness.step_n(119);
    assert_eq!(harness.event_count("CueBallRespawned"), 0);

    // Tick 121 both fires the respawn and ends the session
    harness.pocket(1, 0, ZoneKind::ObjectBallPocket);
    harness.step();

    assert!(harness.session().is_over());
    assert_eq!(harness.session().outcome(), Some(SessionOutcome::Cleared));
    assert_eq!(harness.event_count("CueBallRespawned"), 0);
    assert_eq!(harness.event_count("RespawnCancelled"), 1);

    harness.step_n(10);
    assert_eq!(harness.event_count("CueBallRespawned"), 0);
}

#[test]
fn test_time_up_aborts_charge_and_cancels_respawn() {
    let tuning = TableTuning {
        time_limit_secs: 1.0,
        ..Default::default()
    };
    let mut harness = table(tuning, 1);

    harness.press();
    harness.pocket(0, 3, ZoneKind::CueBallPocket);
    harness.step();
    assert_eq!(harness.lifecycle().state(), ShotState::Charging);

    harness.step_n(70);
    assert!(harness.session().is_over());
    assert_eq!(harness.session().time_remaining(), 0.0);
    assert_eq!(harness.session().outcome(), Some(SessionOutcome::TimeUp));
    assert_eq!(harness.lifecycle().state(), ShotState::Idle);
    assert_eq!(harness.event_count("ChargeAborted"), 1);
    assert_eq!(harness.event_count("RespawnCancelled"), 1);
    assert_eq!(harness.event_count("SessionEnd"), 1);

    harness.step_n(200);
    assert_eq!(harness.event_count("CueBallRespawned"), 0);

    harness.press();
    harness.step();
    assert_eq!(harness.lifecycle().state(), ShotState::Idle);
    assert_eq!(harness.event_count("ShotRejected"), 1);
}

#[test]
fn test_record_and_replay_reproduce_motion() {
    let tuning = TableTuning {
        // One recorded frame per tick
        replay_speed: 60.0,
        ..Default::default()
    };
    let mut harness = table(tuning, 2);
    shoot(&mut harness, 0.2);

    harness.command(DirectorCommand::StartRecording);
    let mut recorded = Vec::new();
    for _ in 0..20 {
        harness.step();
        recorded.push((harness.position(0).unwrap(), harness.velocity(0).unwrap()));
    }
    harness.command(DirectorCommand::StopRecording);
    harness.step();
    assert_eq!(harness.world().resource::<ReplayEngine>().frame_count(), 20);

    // Let the ball roll somewhere else first
    harness.step_n(30);

    harness.command(DirectorCommand::Replay);
    harness.pocket(1, 0, ZoneKind::ObjectBallPocket);
    for (position, velocity) in &recorded {
        harness.step();
        assert_eq!(harness.position(0), Some(*position));
        assert_eq!(harness.velocity(0), Some(*velocity));
    }

    let engine = harness.world().resource::<ReplayEngine>();
    assert_eq!(engine.authority(), KinematicAuthority::Physics);
    assert_eq!(engine.frames_played(), 20);
    assert_eq!(harness.event_count("ReplayFinished"), 1);
    // Trigger callbacks during playback are dropped
    assert_eq!(harness.session().score(), 0);
}

#[test]
fn test_replay_without_recording_is_refused() {
    let mut harness = table(TableTuning::default(), 1);
    harness.command(DirectorCommand::Replay);
    harness.step();
    assert_eq!(harness.event_count("ReplayStarted"), 0);
    assert_eq!(
        harness.world().resource::<ReplayEngine>().authority(),
        KinematicAuthority::Physics
    );
}

#[test]
fn test_restart_resets_table() {
    let mut harness = table(TableTuning::default(), 3);
    harness.pocket(1, 0, ZoneKind::ObjectBallPocket);
    harness.pocket(0, 0, ZoneKind::CueBallPocket);
    harness.step();
    assert_eq!(harness.session().score(), 10);

    harness.command(DirectorCommand::RestartSession);
    harness.step();

    assert_eq!(harness.session().score(), 0);
    assert_eq!(harness.in_play(1), Some(true));
    assert_eq!(harness.event_count("RespawnCancelled"), 1);
    assert_eq!(harness.event_count("SessionStart"), 2);
    assert_eq!(harness.lifecycle().state(), ShotState::Idle);
}

#[test]
fn test_press_during_playback_is_dropped() {
    let tuning = TableTuning {
        replay_speed: 60.0,
        ..Default::default()
    };
    let mut harness = table(tuning, 1);

    harness.command(DirectorCommand::StartRecording);
    harness.step_n(5);
    harness.command(DirectorCommand::StopRecording);
    harness.step();

    harness.command(DirectorCommand::Replay);
    harness.press();
    harness.step_n(10);
    assert_eq!(harness.event_count("ReplayFinished"), 1);

    harness.step_n(2);
    assert_eq!(harness.lifecycle().state(), ShotState::Idle);
    assert_eq!(harness.event_count("ChargeStarted"), 0);
}

#[test]
fn test_frame_readers_see_every_fixed_tick() {
    let mut app = HeadlessAppBuilder::new()
        .with_tuning(TableTuning::default())
        .with_minimal_threads()
        .build()
        .unwrap();
    spawn_rack(app.world_mut(), &TableTuning::default(), 1);
    app.finish();
    app.cleanup();
    let _ = app.world_mut().try_run_schedule(Startup);
    app.world_mut().run_schedule(PostStartup);

    // Two fixed ticks land in one frame
    app.world_mut().resource_mut::<PointerInput>().press();
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedUpdate);

    let names: Vec<_> = app
        .world()
        .resource::<EventBus>()
        .peek()
        .iter()
        .map(|e| (e.tick, e.event.name()))
        .collect();
    assert!(names.contains(&(0, "SessionStart")));
    assert!(names.contains(&(1, "ChargeStarted")));

    app.world_mut().run_schedule(Last);
    let bus = app.world().resource::<EventBus>();
    assert!(bus.peek().is_empty());
    assert!(bus.processed().iter().any(|e| e.event.name() == "ChargeStarted"));
}
