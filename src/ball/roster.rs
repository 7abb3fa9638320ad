//! Registry of the balls on the table

use bevy::ecs::error::BevyError;
use bevy::prelude::*;
use std::collections::BTreeMap;

use super::components::{Ball, BallId, BallRole};
use crate::error::PoolError;
use crate::tuning::TableTuning;

/// One registered ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterEntry {
    pub entity: Entity,
    pub role: BallRole,
}

/// Every ball on the table, keyed by id.
///
/// Built once at startup; a table without exactly one cue ball is rejected.
#[derive(Resource, Debug, Clone)]
pub struct TableRoster {
    cue: BallId,
    balls: BTreeMap<BallId, RosterEntry>,
}

impl TableRoster {
    /// Build the roster from (entity, id, role) triples
    pub fn from_balls(
        balls: impl IntoIterator<Item = (Entity, BallId, BallRole)>,
    ) -> Result<Self, PoolError> {
        let mut cue: Option<BallId> = None;
        let mut map = BTreeMap::new();

        for (entity, id, role) in balls {
            if role == BallRole::Cue {
                if let Some(first) = cue {
                    return Err(PoolError::DuplicateCueBall {
                        first: first.0,
                        second: id.0,
                    });
                }
                cue = Some(id);
            }
            if map.insert(id, RosterEntry { entity, role }).is_some() {
                return Err(PoolError::MissingCollaborator(format!(
                    "ball id {} registered twice",
                    id
                )));
            }
        }

        let cue = cue.ok_or_else(|| {
            PoolError::MissingCollaborator("no ball with the cue role on the table".to_string())
        })?;

        Ok(Self { cue, balls: map })
    }

    pub fn cue_id(&self) -> BallId {
        self.cue
    }

    pub fn cue_entity(&self) -> Entity {
        self.balls[&self.cue].entity
    }

    pub fn get(&self, id: BallId) -> Option<RosterEntry> {
        self.balls.get(&id).copied()
    }

    pub fn role(&self, id: BallId) -> Option<BallRole> {
        self.get(id).map(|entry| entry.role)
    }

    /// All balls ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (BallId, RosterEntry)> + '_ {
        self.balls.iter().map(|(id, entry)| (*id, *entry))
    }

    pub fn ids(&self) -> impl Iterator<Item = BallId> + '_ {
        self.balls.keys().copied()
    }

    pub fn object_count(&self) -> usize {
        self.balls.len() - 1
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }
}

/// Pose the cue ball is returned to after a scratch
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SpawnPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl SpawnPose {
    pub fn from_tuning(tuning: &TableTuning) -> Self {
        Self {
            position: tuning.cue_spawn(),
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for SpawnPose {
    fn default() -> Self {
        Self::from_tuning(&TableTuning::default())
    }
}

/// Startup system: register spawned balls and fail fast on a malformed table
pub fn register_table_balls(
    mut commands: Commands,
    balls: Query<(Entity, &BallId, &BallRole), With<Ball>>,
) -> Result<(), BevyError> {
    let roster = TableRoster::from_balls(balls.iter().map(|(e, id, role)| (e, *id, *role)))?;

    if roster.object_count() == 0 {
        warn!("Table has a cue ball but no object balls");
    }
    info!(
        "Registered table: cue ball {} and {} object balls",
        roster.cue_id(),
        roster.object_count()
    );

    commands.insert_resource(roster);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: usize) -> Vec<Entity> {
        let mut world = World::new();
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_roster_finds_cue() {
        let e = entities(3);
        let roster = TableRoster::from_balls([
            (e[0], BallId(0), BallRole::Cue),
            (e[1], BallId(1), BallRole::Object),
            (e[2], BallId(2), BallRole::Object),
        ])
        .unwrap();

        assert_eq!(roster.cue_id(), BallId(0));
        assert_eq!(roster.cue_entity(), e[0]);
        assert_eq!(roster.object_count(), 2);
        assert_eq!(roster.role(BallId(2)), Some(BallRole::Object));
        assert_eq!(roster.role(BallId(9)), None);
    }

    #[test]
    fn test_missing_cue_is_fatal() {
        let e = entities(1);
        let result = TableRoster::from_balls([(e[0], BallId(1), BallRole::Object)]);
        assert!(matches!(result, Err(PoolError::MissingCollaborator(_))));
    }

    #[test]
    fn test_second_cue_is_rejected() {
        let e = entities(2);
        let result = TableRoster::from_balls([
            (e[0], BallId(0), BallRole::Cue),
            (e[1], BallId(7), BallRole::Cue),
        ]);
        assert_eq!(
            result.unwrap_err(),
            PoolError::DuplicateCueBall { first: 0, second: 7 }
        );
    }
}
