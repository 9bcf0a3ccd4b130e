//! The physical transition system of a vehicle on the highway.

use crate::{
    config::HighwayConfig,
    observation::{observe, Observation},
    occupancy::OccupancyGrid,
};
use std::fmt;

/// Position of the vehicle at one time step together with the lane and
/// velocity of the step that led there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalState {
    pub lane: usize,
    pub distance: u32,
    pub time: u32,
    pub prev_lane: usize,
    pub prev_velocity: u32,
}

impl PhysicalState {
    /// A state that has been travelling in `lane` at `velocity`.
    #[must_use]
    pub const fn initial(lane: usize, distance: u32, time: u32, velocity: u32) -> Self {
        Self {
            lane,
            distance,
            time,
            prev_lane: lane,
            prev_velocity: velocity,
        }
    }

    /// The state after one time step into `lane` at `velocity`.
    #[must_use]
    pub const fn advance(&self, lane: usize, velocity: u32) -> Self {
        Self {
            lane,
            distance: self.distance.saturating_add(velocity),
            time: self.time.saturating_add(1),
            prev_lane: self.lane,
            prev_velocity: velocity,
        }
    }
}

impl fmt::Display for PhysicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={} lane={} d={} v={}",
            self.time, self.lane, self.distance, self.prev_velocity
        )
    }
}

/// Successor relation over [`PhysicalState`]s for a fixed road and traffic.
///
/// From lane `l` the vehicle may keep its lane or move to a neighbouring
/// one, and pick any velocity that is legal in the lane it moves to.
/// Successors leaving the distance or time axis are dropped.
#[derive(Debug, Clone, Copy)]
pub struct TransitionSystem<'a> {
    config: &'a HighwayConfig,
    grid: &'a OccupancyGrid,
}

impl<'a> TransitionSystem<'a> {
    #[must_use]
    pub const fn new(config: &'a HighwayConfig, grid: &'a OccupancyGrid) -> Self {
        Self { config, grid }
    }

    #[must_use]
    pub const fn config(&self) -> &'a HighwayConfig {
        self.config
    }

    #[must_use]
    pub const fn grid(&self) -> &'a OccupancyGrid {
        self.grid
    }

    /// Lanes reachable from `lane` in one step, ascending.
    fn lane_choices(&self, lane: usize) -> impl Iterator<Item = usize> {
        let lanes = self.config.lanes();
        lane.saturating_sub(1)..(lane + 2).min(lanes)
    }

    /// Successors of `state` in lane-major, then velocity-table order, each
    /// labelled with the observation of the transition.
    #[must_use]
    pub fn expand(&self, state: &PhysicalState) -> Vec<(PhysicalState, Observation)> {
        self.lane_choices(state.lane)
            .flat_map(|lane| {
                self.config
                    .velocities(lane)
                    .iter()
                    .map(move |&velocity| (lane, velocity))
            })
            .map(|(lane, velocity)| state.advance(lane, velocity))
            .filter(|next| {
                next.distance < self.config.max_distance && next.time < self.config.max_time
            })
            .map(|next| (next, observe(state, &next, self.grid, self.config)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_neighbouring_lanes_and_their_velocities() {
        let config = HighwayConfig::reference();
        let grid = OccupancyGrid::for_config(&config).unwrap();
        let system = TransitionSystem::new(&config, &grid);

        let successors: Vec<_> = system
            .expand(&config.initial)
            .into_iter()
            .map(|(state, _)| (state.lane, state.prev_velocity))
            .collect();
        assert_eq!(
            successors,
            vec![(0, 30), (0, 40), (0, 50), (1, 40), (1, 50), (1, 60)]
        );

        let middle = PhysicalState::initial(1, 100, 0, 40);
        assert_eq!(system.expand(&middle).len(), 9);
    }

    #[test]
    fn successors_advance_one_time_step() {
        let config = HighwayConfig::reference();
        let grid = OccupancyGrid::for_config(&config).unwrap();
        let system = TransitionSystem::new(&config, &grid);

        for (next, _) in system.expand(&config.initial) {
            assert_eq!(next.time, 1);
            assert_eq!(next.prev_lane, 0);
            assert_eq!(next.distance, 150 + next.prev_velocity);
        }
    }

    #[test]
    fn drops_successors_off_the_axes() {
        let config = HighwayConfig::reference();
        let grid = OccupancyGrid::for_config(&config).unwrap();
        let system = TransitionSystem::new(&config, &grid);

        let near_end = PhysicalState::initial(2, 540, 3, 50);
        let distances: Vec<_> = system
            .expand(&near_end)
            .into_iter()
            .map(|(state, _)| state.distance)
            .collect();
        // lane 1: 580, 590; lane 2: 590
        assert_eq!(distances, vec![580, 590, 590]);

        let last_step = PhysicalState::initial(0, 150, 19, 30);
        assert!(system.expand(&last_step).is_empty());
    }

    #[test]
    fn expansion_is_deterministic() {
        let config = HighwayConfig::reference();
        let grid = OccupancyGrid::random(&config, 42).unwrap();
        let system = TransitionSystem::new(&config, &grid);
        let state = PhysicalState::initial(1, 200, 3, 50);
        assert_eq!(system.expand(&state), system.expand(&state));
    }

    #[test]
    fn edges_carry_observations() {
        let config = HighwayConfig::reference();
        let grid = OccupancyGrid::for_config(&config).unwrap();
        let system = TransitionSystem::new(&config, &grid);

        let speeding: Vec<_> = system
            .expand(&config.initial)
            .into_iter()
            .filter(|(_, obs)| obs.speeding)
            .map(|(state, _)| (state.lane, state.prev_velocity))
            .collect();
        assert_eq!(speeding, vec![(1, 60)]);
    }
}
