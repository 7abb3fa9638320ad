//! Cue controls: aim direction and the power slider

use bevy::prelude::*;

use crate::constants::{AIM_DEFAULT_FORWARD, SLIDER_SPRING_SPEED, STICK_MOVE_DISTANCE};
use crate::tuning::TableTuning;

/// Aim and charge state shared with the UI collaborator.
///
/// The slider value is normalized with 1 meaning no power; the shot force is taken from
/// the inverted reading.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CueControls {
    aim_forward: Vec3,
    aim_enabled: bool,
    charge_value: f32,
    charge_interactable: bool,
    spring_enabled: bool,
    spring_speed: f32,       // Slider units per second back toward 1.0
    stick_move_distance: f32, // Pull-back at full charge
}

impl CueControls {
    pub fn new(spring_speed: f32, stick_move_distance: f32) -> Self {
        Self {
            aim_forward: AIM_DEFAULT_FORWARD,
            aim_enabled: true,
            charge_value: 1.0,
            charge_interactable: true,
            spring_enabled: true,
            spring_speed,
            stick_move_distance,
        }
    }

    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self::new(tuning.slider_spring_speed, tuning.stick_move_distance)
    }

    pub fn aim_forward(&self) -> Vec3 {
        self.aim_forward
    }

    pub fn aim_enabled(&self) -> bool {
        self.aim_enabled
    }

    pub fn charge_value(&self) -> f32 {
        self.charge_value
    }

    pub fn charge_interactable(&self) -> bool {
        self.charge_interactable
    }

    /// Point the cue from the cue ball toward a hit point on the table plane.
    /// Returns false when aim is locked or the direction is degenerate.
    pub fn aim_at(&mut self, cue_position: Vec3, hit: Vec3) -> bool {
        if !self.aim_enabled {
            return false;
        }
        let mut direction = hit - cue_position;
        direction.y = 0.0;
        match direction.try_normalize() {
            Some(forward) => {
                self.aim_forward = forward;
                true
            }
            None => false,
        }
    }

    /// Slider write from the UI collaborator; ignored while the slider is disabled
    pub fn set_charge_value(&mut self, value: f32) {
        if !self.charge_interactable || value.is_nan() {
            return;
        }
        self.charge_value = value.clamp(0.0, 1.0);
    }

    /// Move the slider back toward 1.0 (no power) unless a charge is in progress
    pub fn spring(&mut self, dt: f32) {
        if !self.spring_enabled || self.charge_value >= 1.0 {
            return;
        }
        self.charge_value = (self.charge_value + self.spring_speed * dt).min(1.0);
    }

    /// Cue stick pull-back offset for the rendering sink
    pub fn stick_offset(&self) -> f32 {
        (1.0 - self.charge_value) * self.stick_move_distance
    }

    /// Power gauge background: white at full power, black at none (sRGB)
    pub fn gauge_shade(&self) -> [f32; 3] {
        let level = 1.0 - self.charge_value;
        [level, level, level]
    }

    /// Entering Charging: aim locks and the slider holds its value
    pub fn lock_for_charge(&mut self) {
        self.aim_enabled = false;
        self.spring_enabled = false;
    }

    /// Entering Released: the slider stops accepting input and springs back
    pub fn lock_for_release(&mut self) {
        self.charge_interactable = false;
        self.spring_enabled = true;
    }

    /// Entering Idle: aim and charge input are open again
    pub fn unlock(&mut self) {
        self.aim_enabled = true;
        self.charge_interactable = true;
        self.spring_enabled = true;
    }

    /// Full reset for a new session (aim direction included)
    pub fn reset(&mut self) {
        *self = Self::new(self.spring_speed, self.stick_move_distance);
    }
}

impl Default for CueControls {
    fn default() -> Self {
        Self::new(SLIDER_SPRING_SPEED, STICK_MOVE_DISTANCE)
    }
}
