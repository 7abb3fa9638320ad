//! Tick-by-tick driver for a headless table app

use bevy::prelude::*;

use crate::ball::{Ball, BallId, BallRole, InPlay, LinearVelocity, TableRoster};
use crate::director::{DirectorCommand, DirectorQueue};
use crate::events::{BusEvent, EventBus};
use crate::input::PointerInput;
use crate::pockets::{PocketId, PocketInbox, ZoneKind};
use crate::session::SessionController;
use crate::shooting::{CueControls, ShotLifecycle, ShotState};
use crate::tuning::TableTuning;

/// Rack spacing between object ball rows and columns
const RACK_SPACING: f32 = 0.06;
/// Distance from the cue spawn to the rack apex
const RACK_APEX_DISTANCE: f32 = 1.2;

/// Spawn one ball entity
pub fn spawn_ball(world: &mut World, id: u32, role: BallRole, position: Vec3) -> Entity {
    world
        .spawn((Ball, BallId(id), role, Transform::from_translation(position)))
        .id()
}

/// Spawn the cue ball (id 0) at the tuned spawn pose and `object_count` object balls
/// (ids 1..) in a triangle rack in front of it
pub fn spawn_rack(world: &mut World, tuning: &TableTuning, object_count: u32) {
    let cue = tuning.cue_spawn();
    spawn_ball(world, 0, BallRole::Cue, cue);

    let mut id = 1;
    let mut row = 0u32;
    while id <= object_count {
        for column in 0..=row {
            if id > object_count {
                break;
            }
            let x = cue.x + (column as f32 - row as f32 / 2.0) * RACK_SPACING;
            let z = cue.z - RACK_APEX_DISTANCE - row as f32 * RACK_SPACING;
            spawn_ball(world, id, BallRole::Object, Vec3::new(x, cue.y, z));
            id += 1;
        }
        row += 1;
    }
}

/// Owns an app and steps its `FixedUpdate` schedule directly, collecting every event
pub struct TableHarness {
    app: App,
    log: Vec<BusEvent>,
}

impl TableHarness {
    /// Run startup on an app whose balls are already spawned
    pub fn start(mut app: App) -> Self {
        app.finish();
        app.cleanup();
        // Host apps without Startup systems have no Startup schedule
        if app.world_mut().try_run_schedule(Startup).is_err() {
            debug!("No Startup schedule registered");
        }
        app.world_mut().run_schedule(PostStartup);

        let mut harness = Self {
            app,
            log: Vec::new(),
        };
        harness.collect();
        harness
    }

    /// Run one fixed tick, treated as its own frame
    pub fn step(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
        self.collect();
    }

    pub fn step_n(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Step until the lifecycle is Idle again, up to `max_ticks`. Returns ticks taken.
    pub fn step_until_idle(&mut self, max_ticks: u32) -> Option<u32> {
        for tick in 1..=max_ticks {
            self.step();
            if self.lifecycle().state() == ShotState::Idle {
                return Some(tick);
            }
        }
        None
    }

    fn collect(&mut self) {
        let pending = self.app.world_mut().resource_mut::<EventBus>().drain();
        self.log.extend(pending);
    }

    pub fn app(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Every event emitted since startup
    pub fn events(&self) -> &[BusEvent] {
        &self.log
    }

    pub fn event_count(&self, name: &str) -> usize {
        self.log.iter().filter(|e| e.event.name() == name).count()
    }

    pub fn press(&mut self) {
        self.world_mut().resource_mut::<PointerInput>().press();
    }

    pub fn release(&mut self) {
        self.world_mut().resource_mut::<PointerInput>().release();
    }

    pub fn aim_at(&mut self, hit: Vec3) {
        self.world_mut().resource_mut::<PointerInput>().aim_hit = Some(hit);
    }

    pub fn set_charge(&mut self, value: f32) {
        self.world_mut()
            .resource_mut::<CueControls>()
            .set_charge_value(value);
    }

    pub fn pocket(&mut self, ball: u32, pocket: u32, kind: ZoneKind) {
        self.world_mut()
            .resource_mut::<PocketInbox>()
            .push(BallId(ball), PocketId(pocket), kind);
    }

    pub fn command(&mut self, command: DirectorCommand) {
        self.world_mut()
            .resource_mut::<DirectorQueue>()
            .push(command);
    }

    pub fn session(&self) -> &SessionController {
        self.world().resource::<SessionController>()
    }

    pub fn lifecycle(&self) -> &ShotLifecycle {
        self.world().resource::<ShotLifecycle>()
    }

    pub fn controls(&self) -> &CueControls {
        self.world().resource::<CueControls>()
    }

    pub fn entity(&self, ball: u32) -> Option<Entity> {
        self.world()
            .resource::<TableRoster>()
            .get(BallId(ball))
            .map(|entry| entry.entity)
    }

    pub fn position(&self, ball: u32) -> Option<Vec3> {
        let entity = self.entity(ball)?;
        self.world().get::<Transform>(entity).map(|t| t.translation)
    }

    pub fn velocity(&self, ball: u32) -> Option<Vec3> {
        let entity = self.entity(ball)?;
        self.world().get::<LinearVelocity>(entity).map(|v| v.0)
    }

    pub fn in_play(&self, ball: u32) -> Option<bool> {
        let entity = self.entity(ball)?;
        self.world().get::<InPlay>(entity).map(|flag| flag.0)
    }

    /// Overwrite a ball's velocity as the external engine would
    pub fn set_velocity(&mut self, ball: u32, velocity: Vec3) {
        if let Some(entity) = self.entity(ball) {
            if let Some(mut linear) = self.world_mut().get_mut::<LinearVelocity>(entity) {
                linear.0 = velocity;
            }
        }
    }
}
