//! Error type for the table core

use crate::shooting::ShotState;

/// Errors raised by table components.
///
/// `MissingCollaborator` and `DuplicateCueBall` are fatal at startup. `InvalidConfig` is
/// fatal for tuning handed to the app builder or plugin, but a bad config file is logged
/// and replaced with defaults. The rest are recovered where they occur and surface only as
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolError {
    /// A shot input arrived in a state that cannot accept it
    InvalidTransition { from: ShotState, reason: String },
    /// A required body or UI reference is absent at startup
    MissingCollaborator(String),
    /// More than one ball was registered with the cue role
    DuplicateCueBall { first: u32, second: u32 },
    /// Playback was requested with no recorded frames
    ReplayEmpty,
    /// Playback index ran past a buffer
    ReplayUnderrun { index: usize, len: usize },
    /// Tuning values failed validation
    InvalidConfig(String),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::InvalidTransition { from, reason } => {
                write!(f, "invalid shot transition from {:?}: {}", from, reason)
            }
            PoolError::MissingCollaborator(what) => {
                write!(f, "missing required collaborator: {}", what)
            }
            PoolError::DuplicateCueBall { first, second } => {
                write!(f, "table has more than one cue ball (ids {} and {})", first, second)
            }
            PoolError::ReplayEmpty => write!(f, "replay requested but no frames were recorded"),
            PoolError::ReplayUnderrun { index, len } => {
                write!(f, "replay index {} past buffer length {}", index, len)
            }
            PoolError::InvalidConfig(msg) => write!(f, "invalid table tuning: {}", msg),
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = PoolError::MissingCollaborator("cue ball".to_string());
        assert_eq!(err.to_string(), "missing required collaborator: cue ball");

        let err = PoolError::InvalidTransition {
            from: ShotState::Settling,
            reason: "balls still moving".to_string(),
        };
        assert!(err.to_string().contains("Settling"));
    }
}
