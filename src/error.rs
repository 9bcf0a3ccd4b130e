//! Error types

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "occupancy grid is {found:?} (lanes, distance, time) but the configuration requires {expected:?}"
    )]
    GridShape {
        expected: (usize, u32, u32),
        found: (usize, u32, u32),
    },

    #[error("occupancy grid of {lanes} lanes, distance {distance} and time {time} is too large")]
    GridTooLarge { lanes: usize, distance: u32, time: u32 },

    #[error("cell (lane {lane}, distance {distance}, time {time}) is outside the occupancy grid")]
    CellOutOfBounds { lane: usize, distance: u32, time: u32 },

    #[error("failed to render graph")]
    Render(#[from] std::io::Error),

    #[error("rendered graph is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Precondition violations detected by [`HighwayConfig::validate`](crate::HighwayConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("the highway has no lanes")]
    NoLanes,

    #[error("lane {lane} has no legal velocity")]
    NoVelocities { lane: usize },

    #[error("lane {lane} lists a zero velocity")]
    ZeroVelocity { lane: usize },

    #[error("max distance must be positive")]
    ZeroDistance,

    #[error("max time must be positive")]
    ZeroTime,

    #[error("initial lane {lane} is not one of the {lanes} lanes")]
    InitialLane { lane: usize, lanes: usize },

    #[error("initial state (distance {distance}, time {time}) is outside the grid")]
    InitialOutOfBounds { distance: u32, time: u32 },

    #[error("goal cell (lane {lane}, distance {distance}) is outside the grid")]
    GoalOutOfBounds { lane: usize, distance: u32 },
}
