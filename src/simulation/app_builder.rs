//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps running the table.
//! Used by the simulate binary, the scenario runner, and integration tests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use super::stand_in::StandInPhysicsPlugin;
use crate::error::PoolError;
use crate::events::EventBus;
use crate::plugin::PoolTablePlugin;
use crate::tuning::TableTuning;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    tuning: Option<TableTuning>,
    minimal_threads: bool,
    stand_in_physics: bool,
    event_bus: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            tuning: None,
            minimal_threads: false,
            stand_in_physics: true,
            event_bus: true,
        }
    }

    /// Use explicit tuning (otherwise `config/table_tuning.json` or defaults)
    pub fn with_tuning(mut self, tuning: TableTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Leave the Physics set empty so an external engine can be plugged in
    pub fn without_stand_in_physics(mut self) -> Self {
        self.stand_in_physics = false;
        self
    }

    /// Drop events instead of collecting them
    pub fn without_events(mut self) -> Self {
        self.event_bus = false;
        self
    }

    /// Build the app with minimal plugins and the table plugin
    ///
    /// Callers should spawn balls in `Startup`, then either call `App::run` or drive
    /// the schedules by hand through `TableHarness`. Explicit tuning that fails
    /// validation is returned as `PoolError::InvalidConfig`.
    pub fn build(self) -> Result<App, PoolError> {
        let tuning = self.tuning.unwrap_or_else(TableTuning::load);
        let table = PoolTablePlugin::with_tuning(tuning.clone())?;
        let tick = Duration::from_secs_f32(tuning.tick_dt());

        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(tick))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)));
        }

        if !self.event_bus {
            app.insert_resource(EventBus::disabled());
        }

        app.add_plugins(table);

        if self.stand_in_physics {
            app.add_plugins(StandInPhysicsPlugin);
        }

        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionController;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new()
            .with_tuning(TableTuning::default())
            .build()
            .unwrap();
        assert!(app.world().contains_resource::<SessionController>());
        assert!(app.world().resource::<EventBus>().is_enabled());
    }

    #[test]
    fn test_minimal_threads_without_events() {
        let app = HeadlessAppBuilder::new()
            .with_tuning(TableTuning::default())
            .with_minimal_threads()
            .without_events()
            .build()
            .unwrap();
        assert!(!app.world().resource::<EventBus>().is_enabled());
    }

    #[test]
    fn test_invalid_tuning_is_refused() {
        let tuning = TableTuning {
            tick_rate_hz: 0.0,
            ..Default::default()
        };
        let result = HeadlessAppBuilder::new().with_tuning(tuning).build();
        assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
    }
}
