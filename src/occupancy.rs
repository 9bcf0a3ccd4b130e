//! Occupancy of the road by other vehicles over time.

use crate::{
    config::HighwayConfig,
    error::{Error, Result},
    traffic::TrafficGenerator,
};
use bitvec::vec::BitVec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Dense boolean array indexed by `[lane][distance][time]`.
///
/// Reads outside the grid report the cell as free, so collision sweeps that
/// run off the end of the road never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    lanes: usize,
    distance: u32,
    time: u32,
    cells: BitVec,
}

impl OccupancyGrid {
    /// A grid with every cell free. Fails if the cell count overflows `usize`.
    pub fn empty(lanes: usize, distance: u32, time: u32) -> Result<Self> {
        Self::filled(lanes, distance, time, false)
    }

    pub fn full(lanes: usize, distance: u32, time: u32) -> Result<Self> {
        Self::filled(lanes, distance, time, true)
    }

    fn filled(lanes: usize, distance: u32, time: u32, value: bool) -> Result<Self> {
        let len = lanes
            .checked_mul(distance as usize)
            .and_then(|cells| cells.checked_mul(time as usize))
            .ok_or(Error::GridTooLarge {
                lanes,
                distance,
                time,
            })?;
        Ok(Self {
            lanes,
            distance,
            time,
            cells: BitVec::repeat(value, len),
        })
    }

    /// An empty grid shaped after `config`.
    pub fn for_config(config: &HighwayConfig) -> Result<Self> {
        let (lanes, distance, time) = config.dimensions();
        Self::empty(lanes, distance, time)
    }

    /// Random traffic for `config`, reproducible from `seed`.
    pub fn random(config: &HighwayConfig, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        TrafficGenerator::default().generate(config, &mut rng)
    }

    /// `(lanes, distance, time)`.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, u32, u32) {
        (self.lanes, self.distance, self.time)
    }

    fn index(&self, lane: usize, distance: u32, time: u32) -> Option<usize> {
        if lane >= self.lanes || distance >= self.distance || time >= self.time {
            return None;
        }
        let row = lane * self.distance as usize + distance as usize;
        Some(row * self.time as usize + time as usize)
    }

    #[must_use]
    pub fn occupied(&self, lane: usize, distance: u32, time: u32) -> bool {
        self.index(lane, distance, time)
            .and_then(|idx| self.cells.get(idx).map(|bit| *bit))
            .unwrap_or(false)
    }

    pub fn set(&mut self, lane: usize, distance: u32, time: u32, occupied: bool) -> Result<()> {
        let idx = self
            .index(lane, distance, time)
            .ok_or(Error::CellOutOfBounds {
                lane,
                distance,
                time,
            })?;
        self.cells.set(idx, occupied);
        Ok(())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_full() {
        let empty = OccupancyGrid::empty(2, 10, 4).unwrap();
        assert_eq!(empty.occupied_count(), 0);
        let full = OccupancyGrid::full(2, 10, 4).unwrap();
        assert_eq!(full.occupied_count(), 80);
        assert!(full.occupied(1, 9, 3));
    }

    #[test]
    fn out_of_range_reads_are_free() {
        let full = OccupancyGrid::full(2, 10, 4).unwrap();
        assert!(!full.occupied(2, 0, 0));
        assert!(!full.occupied(0, 10, 0));
        assert!(!full.occupied(0, 0, 4));
    }

    #[test]
    fn set_is_addressed_per_cell() {
        let mut grid = OccupancyGrid::empty(3, 50, 5).unwrap();
        grid.set(1, 20, 3, true).unwrap();
        assert!(grid.occupied(1, 20, 3));
        assert!(!grid.occupied(1, 20, 2));
        assert!(!grid.occupied(0, 20, 3));
        assert!(!grid.occupied(1, 21, 3));
        assert_eq!(grid.occupied_count(), 1);

        grid.set(1, 20, 3, false).unwrap();
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn set_out_of_range_is_an_error() {
        let mut grid = OccupancyGrid::empty(3, 50, 5).unwrap();
        assert!(matches!(
            grid.set(3, 0, 0, true),
            Err(Error::CellOutOfBounds { lane: 3, .. })
        ));
    }

    #[test]
    fn oversized_grid_is_an_error() {
        assert!(matches!(
            OccupancyGrid::empty(usize::MAX, 2, 2),
            Err(Error::GridTooLarge { distance: 2, time: 2, .. })
        ));
    }

    #[test]
    fn shaped_after_config() {
        let config = HighwayConfig::reference();
        assert_eq!(
            OccupancyGrid::for_config(&config).unwrap().dimensions(),
            (3, 600, 20)
        );
    }
}
