//! Input module - PointerInput resource written by the input collaborator

use bevy::prelude::*;

/// Buffered pointer state for the shot controls.
///
/// The input collaborator writes this between ticks. Edge flags accumulate until the
/// shot systems consume them, so a press that lands between two ticks is never lost.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PointerInput {
    pub down_pressed: bool, // Pointer went down - begin charging
    pub up_released: bool,  // Pointer went up - release the shot
    pub held: bool,         // Pointer currently down
    /// Where the aim ray hits the table's horizontal plane, if it hits at all
    pub aim_hit: Option<Vec3>,
    /// Pointer is over a UI element that blocks aiming
    pub over_ui: bool,
}

impl PointerInput {
    /// Record a pointer-down edge
    pub fn press(&mut self) {
        self.down_pressed = true;
        self.held = true;
    }

    /// Record a pointer-up edge
    pub fn release(&mut self) {
        self.up_released = true;
        self.held = false;
    }

    /// Consume the down edge, returning whether it was set
    pub fn take_press(&mut self) -> bool {
        std::mem::take(&mut self.down_pressed)
    }

    /// Consume the up edge, returning whether it was set
    pub fn take_release(&mut self) -> bool {
        std::mem::take(&mut self.up_released)
    }

    /// Aim point usable this tick (none while the pointer is over blocking UI)
    pub fn aim_point(&self) -> Option<Vec3> {
        if self.over_ui { None } else { self.aim_hit }
    }
}

/// Drop pointer edges that arrive while replay owns the balls, so a press made during
/// playback does not start a charge once live play resumes
pub fn discard_pointer_edges(mut input: ResMut<PointerInput>) {
    let pressed = input.take_press();
    let released = input.take_release();
    if pressed || released {
        debug!("Discarding pointer edges during playback");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_consumed_once() {
        let mut input = PointerInput::default();
        input.press();
        assert!(input.held);
        assert!(input.take_press());
        assert!(!input.take_press());

        input.release();
        assert!(!input.held);
        assert!(input.take_release());
        assert!(!input.take_release());
    }

    #[test]
    fn test_ui_blocks_aim() {
        let mut input = PointerInput {
            aim_hit: Some(Vec3::new(1.0, 0.0, 2.0)),
            ..Default::default()
        };
        assert_eq!(input.aim_point(), Some(Vec3::new(1.0, 0.0, 2.0)));
        input.over_ui = true;
        assert_eq!(input.aim_point(), None);
    }
}
