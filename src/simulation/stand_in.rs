//! Stand-in physics for headless runs
//!
//! A damping integrator in place of the external rigid-body engine: it consumes the
//! commanded impulse, moves balls in a straight line, and bleeds speed until they stop.
//! No collisions or pocket triggers; scenarios script those.

use bevy::prelude::*;

use crate::ball::{AngularVelocity, Ball, InPlay, LinearVelocity, PendingImpulse};
use crate::clock::TableClock;
use crate::plugin::TableSet;
use crate::replay::physics_has_authority;

pub const STAND_IN_BALL_MASS: f32 = 170.0; // Impulse units per unit of speed
pub const STAND_IN_DAMPING: f32 = 1.5; // Fraction of speed lost per second
pub const STAND_IN_STOP_SPEED: f32 = 0.02; // Below this the ball is snapped to rest

/// Stand-in integrator settings
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StandInPhysics {
    pub mass: f32,
    pub damping: f32,
    pub stop_speed: f32,
}

impl Default for StandInPhysics {
    fn default() -> Self {
        Self {
            mass: STAND_IN_BALL_MASS,
            damping: STAND_IN_DAMPING,
            stop_speed: STAND_IN_STOP_SPEED,
        }
    }
}

impl StandInPhysics {
    /// Advance one body by `dt`; returns the new position
    pub fn integrate(
        &self,
        position: Vec3,
        velocity: &mut Vec3,
        angular: &mut Vec3,
        impulse: Vec3,
        dt: f32,
    ) -> Vec3 {
        if self.mass > 0.0 {
            *velocity += impulse / self.mass;
        }
        let next = position + *velocity * dt;

        let keep = (1.0 - self.damping * dt).max(0.0);
        *velocity *= keep;
        *angular *= keep;
        if velocity.length() < self.stop_speed {
            *velocity = Vec3::ZERO;
            *angular = Vec3::ZERO;
        }
        next
    }
}

/// Adds the stand-in step to the Physics set
pub struct StandInPhysicsPlugin;

impl Plugin for StandInPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StandInPhysics>();
        app.add_systems(
            FixedUpdate,
            step_stand_in_physics
                .in_set(TableSet::Physics)
                .run_if(physics_has_authority),
        );
    }
}

/// Integrate every ball still on the table
pub fn step_stand_in_physics(
    physics: Res<StandInPhysics>,
    clock: Res<TableClock>,
    mut balls: Query<
        (
            &InPlay,
            &mut Transform,
            &mut LinearVelocity,
            &mut AngularVelocity,
            &mut PendingImpulse,
        ),
        With<Ball>,
    >,
) {
    for (in_play, mut transform, mut linear, mut angular, mut impulse) in &mut balls {
        let impulse = impulse.take();
        if !in_play.0 {
            linear.0 = Vec3::ZERO;
            angular.0 = Vec3::ZERO;
            continue;
        }
        transform.translation =
            physics.integrate(transform.translation, &mut linear.0, &mut angular.0, impulse, clock.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_moves_then_stops() {
        let physics = StandInPhysics::default();
        let mut velocity = Vec3::ZERO;
        let mut angular = Vec3::ZERO;
        let mut position = Vec3::ZERO;

        position = physics.integrate(position, &mut velocity, &mut angular, Vec3::NEG_Z * 850.0, 1.0 / 60.0);
        assert!(position.z < 0.0);
        assert!(velocity.length() > 1.0);

        let mut ticks = 0;
        while velocity != Vec3::ZERO {
            position = physics.integrate(position, &mut velocity, &mut angular, Vec3::ZERO, 1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 10_000, "never stopped");
        }
        assert!(position.z < -1.0);
        assert_eq!(position.x, 0.0);
    }

    #[test]
    fn test_zero_impulse_stays_put() {
        let physics = StandInPhysics::default();
        let mut velocity = Vec3::ZERO;
        let mut angular = Vec3::ZERO;
        let position = physics.integrate(Vec3::ONE, &mut velocity, &mut angular, Vec3::ZERO, 1.0 / 60.0);
        assert_eq!(position, Vec3::ONE);
        assert_eq!(velocity, Vec3::ZERO);
    }
}
