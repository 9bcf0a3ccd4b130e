//! Road description consumed by the transition system.

use crate::{error::ConfigError, transition::PhysicalState};
use std::collections::HashSet;

/// Set of `(lane, distance)` cells the vehicle has to reach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalRegion(HashSet<(usize, u32)>);

impl GoalRegion {
    #[must_use]
    pub fn new(cells: impl IntoIterator<Item = (usize, u32)>) -> Self {
        Self(cells.into_iter().collect())
    }

    /// All distances in `min..=max` of a single lane.
    #[must_use]
    pub fn lane_span(lane: usize, min: u32, max: u32) -> Self {
        Self::new((min..=max).map(|distance| (lane, distance)))
    }

    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.0.extend(other.0.iter().copied());
        self
    }

    #[must_use]
    pub fn contains(&self, lane: usize, distance: u32) -> bool {
        self.0.contains(&(lane, distance))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.0.iter().copied()
    }
}

/// A discretized highway: lanes with their legal velocities, a goal region
/// and the extent of the distance and time axes.
///
/// Lanes are numbered `0..lane_velocities.len()`. Distances and time steps
/// are exclusive upper bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighwayConfig {
    pub lane_velocities: Vec<Vec<u32>>,
    pub goal: GoalRegion,
    pub max_distance: u32,
    pub max_time: u32,
    pub initial: PhysicalState,
}

impl HighwayConfig {
    /// Creates a configuration whose vehicle starts at `distance` in `lane`
    /// at time 0, travelling at the slowest legal velocity of that lane.
    #[must_use]
    pub fn new(
        lane_velocities: Vec<Vec<u32>>,
        goal: GoalRegion,
        max_distance: u32,
        max_time: u32,
        lane: usize,
        distance: u32,
    ) -> Self {
        let velocity = lane_velocities
            .get(lane)
            .and_then(|velocities| velocities.iter().min().copied())
            .unwrap_or_default();
        Self {
            lane_velocities,
            goal,
            max_distance,
            max_time,
            initial: PhysicalState::initial(lane, distance, 0, velocity),
        }
    }

    /// Three lanes with increasing speed bands, an exit in lane 0 between
    /// 400 and 500 and a vehicle starting in lane 0 at distance 150.
    #[must_use]
    pub fn reference() -> Self {
        Self::new(
            vec![vec![30, 40, 50], vec![40, 50, 60], vec![50, 60, 70]],
            GoalRegion::lane_span(0, 400, 500),
            600,
            20,
            0,
            150,
        )
    }

    #[must_use]
    pub fn lanes(&self) -> usize {
        self.lane_velocities.len()
    }

    /// Legal velocities of `lane`, empty for unknown lanes.
    #[must_use]
    pub fn velocities(&self, lane: usize) -> &[u32] {
        self.lane_velocities.get(lane).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_legal(&self, lane: usize, velocity: u32) -> bool {
        self.velocities(lane).contains(&velocity)
    }

    #[must_use]
    pub fn min_velocity(&self, lane: usize) -> Option<u32> {
        self.velocities(lane).iter().min().copied()
    }

    /// `(lanes, max_distance, max_time)`, the shape an occupancy grid must have.
    #[must_use]
    pub fn dimensions(&self) -> (usize, u32, u32) {
        (self.lanes(), self.max_distance, self.max_time)
    }

    /// Checks the structural preconditions of a search.
    ///
    /// An empty goal region is accepted; it just makes every search exhaust.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_velocities.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        for (lane, velocities) in self.lane_velocities.iter().enumerate() {
            if velocities.is_empty() {
                return Err(ConfigError::NoVelocities { lane });
            }
            if velocities.contains(&0) {
                return Err(ConfigError::ZeroVelocity { lane });
            }
        }
        if self.max_distance == 0 {
            return Err(ConfigError::ZeroDistance);
        }
        if self.max_time == 0 {
            return Err(ConfigError::ZeroTime);
        }
        if self.initial.lane >= self.lanes() {
            return Err(ConfigError::InitialLane {
                lane: self.initial.lane,
                lanes: self.lanes(),
            });
        }
        if self.initial.distance >= self.max_distance || self.initial.time >= self.max_time {
            return Err(ConfigError::InitialOutOfBounds {
                distance: self.initial.distance,
                time: self.initial.time,
            });
        }
        if let Some((lane, distance)) = self
            .goal
            .iter()
            .find(|&(lane, distance)| lane >= self.lanes() || distance >= self.max_distance)
        {
            return Err(ConfigError::GoalOutOfBounds { lane, distance });
        }
        Ok(())
    }
}

/// Bounds on the work a single search may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of product nodes, the root included. `None` is unbounded.
    pub max_nodes: Option<usize>,
}

impl SearchLimits {
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { max_nodes: None }
    }

    #[must_use]
    pub const fn with_max_nodes(max_nodes: usize) -> Self {
        Self {
            max_nodes: Some(max_nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_is_valid() {
        let config = HighwayConfig::reference();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.dimensions(), (3, 600, 20));
        assert_eq!(config.goal.len(), 101);
        assert_eq!(config.initial.prev_velocity, 30);
        assert_eq!(config.initial.prev_lane, 0);
    }

    #[test]
    fn legality_per_lane() {
        let config = HighwayConfig::reference();
        assert!(config.is_legal(1, 60));
        assert!(!config.is_legal(0, 60));
        assert!(!config.is_legal(7, 30));
        assert_eq!(config.min_velocity(2), Some(50));
        assert_eq!(config.min_velocity(3), None);
    }

    #[test]
    fn rejects_empty_lane_set() {
        let mut config = HighwayConfig::reference();
        config.lane_velocities.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoLanes));
    }

    #[test]
    fn rejects_lane_without_velocities() {
        let mut config = HighwayConfig::reference();
        config.lane_velocities[1].clear();
        assert_eq!(config.validate(), Err(ConfigError::NoVelocities { lane: 1 }));
    }

    #[test]
    fn rejects_zero_velocity() {
        let mut config = HighwayConfig::reference();
        config.lane_velocities[2].push(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroVelocity { lane: 2 }));
    }

    #[test]
    fn rejects_non_positive_axes() {
        let mut config = HighwayConfig::reference();
        config.max_distance = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDistance));

        let mut config = HighwayConfig::reference();
        config.max_time = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTime));
    }

    #[test]
    fn rejects_initial_state_off_the_road() {
        let mut config = HighwayConfig::reference();
        config.initial.lane = 3;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InitialLane { lane: 3, lanes: 3 })
        );

        let mut config = HighwayConfig::reference();
        config.initial.distance = 600;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialOutOfBounds { distance: 600, .. })
        ));
    }

    #[test]
    fn rejects_goal_off_the_road() {
        let mut config = HighwayConfig::reference();
        config.goal = config.goal.union(&GoalRegion::new([(0, 700)]));
        assert_eq!(
            config.validate(),
            Err(ConfigError::GoalOutOfBounds {
                lane: 0,
                distance: 700
            })
        );
    }

    #[test]
    fn empty_goal_is_valid() {
        let mut config = HighwayConfig::reference();
        config.goal = GoalRegion::default();
        assert_eq!(config.validate(), Ok(()));
    }
}
