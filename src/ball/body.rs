//! Body interface the table uses to query and command physics bodies

use bevy::prelude::*;

use super::components::{AngularVelocity, LinearVelocity, PendingImpulse};

/// Kinematic view of one rigid body.
///
/// The table never integrates motion itself. It reads velocities, writes poses during
/// replay and respawn, and commands impulses that the physics engine applies.
pub trait BallBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, velocity: Vec3);

    /// Queue an impulse along `direction` (normalized here) with the given magnitude
    fn apply_impulse(&mut self, direction: Vec3, magnitude: f32);

    /// Drop any impulse not yet consumed by physics
    fn clear_impulse(&mut self);

    /// Place the body at a pose with all motion removed
    fn reset_to(&mut self, position: Vec3, rotation: Quat) {
        self.set_position(position);
        self.set_rotation(rotation);
        self.set_linear_velocity(Vec3::ZERO);
        self.set_angular_velocity(Vec3::ZERO);
        self.clear_impulse();
    }
}

/// Query data that can be turned into a `BodyMut`
pub type BallBodyData = (
    &'static mut Transform,
    &'static mut LinearVelocity,
    &'static mut AngularVelocity,
    &'static mut PendingImpulse,
);

/// Mutable body backed by a ball entity's components
pub struct BodyMut<'a> {
    pub transform: &'a mut Transform,
    pub linear: &'a mut LinearVelocity,
    pub angular: &'a mut AngularVelocity,
    pub impulse: &'a mut PendingImpulse,
}

impl<'a> BodyMut<'a> {
    /// Wrap a `BallBodyData` query item
    pub fn from_item(
        (transform, linear, angular, impulse): (
            Mut<'a, Transform>,
            Mut<'a, LinearVelocity>,
            Mut<'a, AngularVelocity>,
            Mut<'a, PendingImpulse>,
        ),
    ) -> Self {
        Self {
            transform: transform.into_inner(),
            linear: linear.into_inner(),
            angular: angular.into_inner(),
            impulse: impulse.into_inner(),
        }
    }
}

impl BallBody for BodyMut<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear.0
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear.0 = velocity;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular.0
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular.0 = velocity;
    }

    fn apply_impulse(&mut self, direction: Vec3, magnitude: f32) {
        self.impulse.0 += direction.normalize_or_zero() * magnitude;
    }

    fn clear_impulse(&mut self) {
        self.impulse.0 = Vec3::ZERO;
    }
}

/// Standalone body with no ECS backing (tools and tests)
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub pending_impulse: Vec3,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            pending_impulse: Vec3::ZERO,
        }
    }
}

impl KinematicBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn moving(velocity: Vec3) -> Self {
        Self {
            linear_velocity: velocity,
            ..Default::default()
        }
    }
}

impl BallBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }

    fn apply_impulse(&mut self, direction: Vec3, magnitude: f32) {
        self.pending_impulse += direction.normalize_or_zero() * magnitude;
    }

    fn clear_impulse(&mut self) {
        self.pending_impulse = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_direction_is_normalized() {
        let mut body = KinematicBody::default();
        body.apply_impulse(Vec3::new(3.0, 0.0, 4.0), 10.0);
        assert!((body.pending_impulse - Vec3::new(6.0, 0.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn test_reset_to_clears_motion() {
        let mut body = KinematicBody::moving(Vec3::X);
        body.angular_velocity = Vec3::Y;
        body.apply_impulse(Vec3::Z, 5.0);

        body.reset_to(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);

        assert_eq!(body.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.linear_velocity, Vec3::ZERO);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
        assert_eq!(body.pending_impulse, Vec3::ZERO);
    }

    #[test]
    fn test_body_mut_writes_components() {
        let mut transform = Transform::default();
        let mut linear = LinearVelocity(Vec3::X);
        let mut angular = AngularVelocity::default();
        let mut impulse = PendingImpulse::default();
        {
            let mut body = BodyMut {
                transform: &mut transform,
                linear: &mut linear,
                angular: &mut angular,
                impulse: &mut impulse,
            };
            body.apply_impulse(Vec3::Z, 2.0);
            body.set_position(Vec3::ONE);
        }
        assert_eq!(transform.translation, Vec3::ONE);
        assert_eq!(impulse.take(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(impulse.0, Vec3::ZERO);
        assert_eq!(linear.0, Vec3::X);
    }
}
