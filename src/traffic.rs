//! Random traffic for the occupancy grid.
//!
//! Other vehicles are placed along each lane at time 0 with random gaps and
//! then driven forward at the slowest legal velocity of their lane. The
//! generator never owns a random source; callers hand in a seeded [`Rng`] so
//! that a run can be reproduced.

use crate::{config::HighwayConfig, error::Result, occupancy::OccupancyGrid};
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficGenerator {
    /// Largest gap between two vehicles, in multiples of the lane's slowest velocity.
    pub spacing_factor: u32,
}

impl Default for TrafficGenerator {
    fn default() -> Self {
        Self { spacing_factor: 6 }
    }
}

impl TrafficGenerator {
    pub fn generate<R: Rng + ?Sized>(
        &self,
        config: &HighwayConfig,
        rng: &mut R,
    ) -> Result<OccupancyGrid> {
        let mut grid = OccupancyGrid::for_config(config)?;
        let (lanes, max_distance, max_time) = config.dimensions();
        if max_time == 0 {
            return Ok(grid);
        }

        for lane in 0..lanes {
            let Some(speed) = config.min_velocity(lane) else {
                continue;
            };
            let max_gap = speed.saturating_mul(self.spacing_factor).max(1);

            let mut distance = rng.gen_range(0..=max_gap);
            while distance < max_distance {
                mark(&mut grid, lane, distance, 0, true);
                distance = distance.saturating_add(rng.gen_range(1..=max_gap));
            }
            if lane == config.initial.lane {
                mark(&mut grid, lane, config.initial.distance, 0, false);
            }

            // every vehicle in the lane keeps the lane's slowest velocity
            for time in 1..max_time {
                let shift = time.saturating_mul(speed);
                for distance in shift..max_distance {
                    let occupied = grid.occupied(lane, distance - shift, 0);
                    mark(&mut grid, lane, distance, time, occupied);
                }
            }
        }

        debug!(
            occupied = grid.occupied_count(),
            lanes, max_distance, max_time, "generated traffic"
        );
        Ok(grid)
    }
}

fn mark(grid: &mut OccupancyGrid, lane: usize, distance: u32, time: u32, occupied: bool) {
    // the generator only writes inside the grid it allocated
    if grid.set(lane, distance, time, occupied).is_err() {
        debug!(lane, distance, time, "skipped traffic cell outside the grid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_seed_same_traffic() {
        let config = HighwayConfig::reference();
        let first = OccupancyGrid::random(&config, 7).unwrap();
        let second = OccupancyGrid::random(&config, 7).unwrap();
        assert_eq!(first, second);
        assert!(first.occupied_count() > 0);
    }

    #[test]
    fn initial_cell_is_clear() {
        let config = HighwayConfig::reference();
        for seed in 0..32 {
            let grid = OccupancyGrid::random(&config, seed).unwrap();
            assert!(!grid.occupied(0, 150, 0));
        }
    }

    #[test]
    fn traffic_moves_at_the_slowest_lane_velocity() {
        let config = HighwayConfig::reference();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let grid = TrafficGenerator::default().generate(&config, &mut rng).unwrap();

        for lane in 0..config.lanes() {
            let speed = config.min_velocity(lane).unwrap();
            for distance in 0..(600 - speed) {
                assert_eq!(
                    grid.occupied(lane, distance, 0),
                    grid.occupied(lane, distance + speed, 1),
                    "lane {lane} distance {distance}"
                );
            }
        }
    }

    #[test]
    fn traffic_stays_in_configured_shape() {
        let config = HighwayConfig::reference();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = TrafficGenerator { spacing_factor: 1 }.generate(&config, &mut rng).unwrap();
        assert_eq!(grid.dimensions(), config.dimensions());
    }
}
