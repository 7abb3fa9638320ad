//! Table plugin - resources, startup, and the fixed-tick system order

use bevy::prelude::*;

use crate::ball::{SpawnPose, register_table_balls};
use crate::clock::{TableClock, advance_table_clock};
use crate::director::{DirectorQueue, apply_director_commands};
use crate::error::PoolError;
use crate::events::{EventBus, rotate_event_bus, stamp_event_bus};
use crate::input::{PointerInput, discard_pointer_edges};
use crate::pockets::{
    PocketEventRouter, PocketInbox, PocketValues, RespawnQueue, discard_pocket_events,
    fire_due_respawns, route_pocket_events,
};
use crate::replay::{
    ReplayEngine, physics_has_authority, play_replay_frame, record_replay_frame,
    replay_has_authority, replay_recording,
};
use crate::session::{
    GameOverBanner, ScoreDisplay, SessionController, TimerDisplay, begin_session,
    handle_session_end, tick_session_timer, update_session_displays,
};
use crate::shooting::{
    CueControls, ShotLifecycle, advance_shot_lifecycle, handle_shot_input, spring_charge_slider,
    update_cue_aim,
};
use crate::stationarity::StationarityOracle;
use crate::tuning::TableTuning;

/// Phases of one fixed tick, run in declaration order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSet {
    /// Clock, event stamping, director commands
    Director,
    /// Aim and slider spring
    Input,
    /// External rigid-body step (or the headless stand-in)
    Physics,
    /// Pocket routing and due respawns
    Pockets,
    /// Timer, end detection, display sinks
    Session,
    /// Lifecycle advance, then press/release handling
    Shot,
    /// Recording or playback
    Replay,
}

/// Registers the pool table's turn coordination.
///
/// Balls are spawned by the host app in `Startup`; the roster is built in `PostStartup`
/// and a table without exactly one cue ball fails there.
#[derive(Default)]
pub struct PoolTablePlugin {
    tuning: Option<TableTuning>,
}

impl PoolTablePlugin {
    /// Use explicit tuning instead of reading `config/table_tuning.json`.
    ///
    /// Tuning that fails validation is refused here, before any resource is built from it.
    pub fn with_tuning(tuning: TableTuning) -> Result<Self, PoolError> {
        tuning.validate()?;
        Ok(Self {
            tuning: Some(tuning),
        })
    }
}

impl Plugin for PoolTablePlugin {
    fn build(&self, app: &mut App) {
        let tuning = self.tuning.clone().unwrap_or_else(TableTuning::load);

        app.insert_resource(Time::<Fixed>::from_hz(tuning.tick_rate_hz as f64))
            .insert_resource(TableClock::new(tuning.tick_dt()))
            .insert_resource(StationarityOracle::from_tuning(&tuning))
            .insert_resource(ShotLifecycle::from_tuning(&tuning))
            .insert_resource(CueControls::from_tuning(&tuning))
            .insert_resource(PocketValues::from_tuning(&tuning))
            .insert_resource(PocketEventRouter::from_tuning(&tuning))
            .insert_resource(SpawnPose::from_tuning(&tuning))
            .insert_resource(SessionController::from_tuning(&tuning))
            .insert_resource(ReplayEngine::from_tuning(&tuning))
            .init_resource::<PointerInput>()
            .init_resource::<PocketInbox>()
            .init_resource::<RespawnQueue>()
            .init_resource::<TimerDisplay>()
            .init_resource::<ScoreDisplay>()
            .init_resource::<GameOverBanner>()
            .init_resource::<DirectorQueue>()
            .insert_resource(tuning);

        if !app.world().contains_resource::<EventBus>() {
            app.insert_resource(EventBus::new());
        }

        app.add_systems(PostStartup, (register_table_balls, begin_session).chain());
        app.add_systems(Last, rotate_event_bus);

        app.configure_sets(
            FixedUpdate,
            (
                TableSet::Director,
                TableSet::Input,
                TableSet::Physics,
                TableSet::Pockets,
                TableSet::Session,
                TableSet::Shot,
                TableSet::Replay,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (advance_table_clock, stamp_event_bus, apply_director_commands)
                    .chain()
                    .in_set(TableSet::Director),
                (update_cue_aim, spring_charge_slider)
                    .chain()
                    .in_set(TableSet::Input)
                    .run_if(physics_has_authority),
                discard_pointer_edges
                    .in_set(TableSet::Input)
                    .run_if(replay_has_authority),
                (route_pocket_events, fire_due_respawns)
                    .chain()
                    .in_set(TableSet::Pockets)
                    .run_if(physics_has_authority),
                discard_pocket_events
                    .in_set(TableSet::Pockets)
                    .run_if(replay_has_authority),
                (tick_session_timer, handle_session_end, update_session_displays)
                    .chain()
                    .in_set(TableSet::Session)
                    .run_if(physics_has_authority),
                (advance_shot_lifecycle, handle_shot_input)
                    .chain()
                    .in_set(TableSet::Shot)
                    .run_if(physics_has_authority),
                record_replay_frame
                    .in_set(TableSet::Replay)
                    .run_if(replay_recording),
                play_replay_frame
                    .in_set(TableSet::Replay)
                    .run_if(replay_has_authority),
            ),
        );
    }
}
