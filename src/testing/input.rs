//! Scripted input injection for scenarios

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::parser::TickInput;
use crate::simulation::TableHarness;

/// Scripted collaborator input keyed by the tick it precedes
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    ticks: BTreeMap<u64, Vec<TickInput>>,
    max_tick: u64,
}

impl ScriptedInputs {
    /// Create from parsed tick inputs (several entries may share a tick)
    pub fn from_inputs(inputs: &[TickInput]) -> Self {
        let mut ticks: BTreeMap<u64, Vec<TickInput>> = BTreeMap::new();
        let mut max_tick = 0;
        for input in inputs {
            max_tick = max_tick.max(input.tick);
            ticks.entry(input.tick).or_default().push(input.clone());
        }
        Self { ticks, max_tick }
    }

    pub fn max_tick(&self) -> u64 {
        self.max_tick
    }

    /// Extend the run to cover `tick`
    pub fn set_max_tick(&mut self, tick: u64) {
        self.max_tick = self.max_tick.max(tick);
    }

    /// Feed everything scripted for `tick` into the table before it steps
    pub fn apply(&self, tick: u64, harness: &mut TableHarness) -> Result<(), String> {
        let Some(inputs) = self.ticks.get(&tick) else {
            return Ok(());
        };
        for input in inputs {
            if let Some(aim) = input.aim {
                harness.aim_at(Vec3::from_array(aim));
            }
            if let Some(velocity) = &input.velocity {
                if harness.entity(velocity.ball).is_none() {
                    return Err(format!("tick {}: no ball {}", tick, velocity.ball));
                }
                harness.set_velocity(velocity.ball, Vec3::from_array(velocity.value));
            }
            if input.press {
                harness.press();
            }
            // While Idle the slider springs back before the press is handled; script
            // charges on a tick after the press
            if let Some(charge) = input.charge {
                harness.set_charge(charge);
            }
            if input.release {
                harness.release();
            }
            for pocket in &input.pocket {
                harness.pocket(pocket.ball, pocket.pocket, pocket.kind.into());
            }
            if let Some(command) = input.director_command()? {
                harness.command(command);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_group_by_tick() {
        let inputs = vec![
            TickInput {
                tick: 4,
                press: true,
                ..Default::default()
            },
            TickInput {
                tick: 9,
                release: true,
                ..Default::default()
            },
            TickInput {
                tick: 4,
                charge: Some(0.5),
                ..Default::default()
            },
        ];
        let mut scripted = ScriptedInputs::from_inputs(&inputs);
        assert_eq!(scripted.max_tick(), 9);
        assert_eq!(scripted.ticks[&4].len(), 2);

        scripted.set_max_tick(3);
        assert_eq!(scripted.max_tick(), 9);
        scripted.set_max_tick(30);
        assert_eq!(scripted.max_tick(), 30);
    }
}
