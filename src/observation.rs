//! Observations of a single transition of the vehicle.

use crate::{
    config::HighwayConfig, occupancy::OccupancyGrid, transition::PhysicalState, Domain,
};

/// The alphabet read by the specification automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Observation {
    pub goal_reached: bool,
    pub collided: bool,
    pub speeding: bool,
}

impl Domain for Observation {}

impl Observation {
    #[must_use]
    pub const fn new(goal_reached: bool, collided: bool, speeding: bool) -> Self {
        Self {
            goal_reached,
            collided,
            speeding,
        }
    }

    /// Neither collided nor speeding.
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        !self.collided && !self.speeding
    }
}

/// Labels the transition `prev -> curr`.
///
/// `curr.prev_velocity` is the velocity chosen for the step. It has to be
/// legal in the lane the vehicle left and in the lane it entered. The cells
/// swept during the step are checked against the grid at the time step the
/// vehicle left: in each lane, from the departure distance up to and
/// including the distance the vehicle gains on traffic moving at that
/// lane's slowest velocity.
#[must_use]
pub fn observe(
    prev: &PhysicalState,
    curr: &PhysicalState,
    grid: &OccupancyGrid,
    config: &HighwayConfig,
) -> Observation {
    let velocity = curr.prev_velocity;
    let goal_reached = config.goal.contains(curr.lane, curr.distance);
    let speeding =
        !(config.is_legal(curr.prev_lane, velocity) && config.is_legal(curr.lane, velocity));
    let collided = swept_occupied(grid, config, curr.prev_lane, velocity, prev)
        || swept_occupied(grid, config, curr.lane, velocity, prev);

    Observation {
        goal_reached,
        collided,
        speeding,
    }
}

fn swept_occupied(
    grid: &OccupancyGrid,
    config: &HighwayConfig,
    lane: usize,
    velocity: u32,
    from: &PhysicalState,
) -> bool {
    let Some(slowest) = config.min_velocity(lane) else {
        return false;
    };
    (0..=velocity.saturating_sub(slowest)).any(|offset| {
        from.distance
            .checked_add(offset)
            .map_or(false, |distance| grid.occupied(lane, distance, from.time))
    })
}
