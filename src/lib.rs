//! # Reach-avoid synthesis from temporal specifications
//!
//! Synthesizes a trajectory for a vehicle on a discretized highway that
//! satisfies `G(!collided & !speeding) & F(goal)`.
//!
//! Synthesis steps:
//! * Observation predicates over transitions of the vehicle
//! * Deterministic specification automaton with BDD guards
//! * Product of the automaton with the physical transition system
//! * Breadth-first search for the first accepting product node
//!
//! ```
//! use telo_synth::{HighwayConfig, OccupancyGrid, ProductSearch, SpecificationAutomaton};
//!
//! let config = HighwayConfig::reference();
//! let grid = OccupancyGrid::random(&config, 17)?;
//! let automaton = SpecificationAutomaton::reach_avoid();
//! let synthesis = ProductSearch::new(&config, &grid, &automaton)?.run();
//! for state in synthesis.trajectory() {
//!     println!("{state}");
//! }
//! # Ok::<(), telo_synth::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]

pub mod automaton;
pub mod config;
pub mod error;
pub mod monitor;
pub mod observation;
pub mod occupancy;
pub mod predicate;
pub mod product;
pub mod search;
pub mod traffic;
pub mod transition;

pub use automaton::{Mode, ObservationPredicates, SpecificationAutomaton, REACH_AVOID};
pub use config::{GoalRegion, HighwayConfig, SearchLimits};
pub use error::{ConfigError, Error, Result};
pub use monitor::Monitor;
pub use observation::{observe, Observation};
pub use occupancy::OccupancyGrid;
pub use predicate::{ClosurePredicate, Predicate, PredicateId, Predicates};
pub use product::{NodeId, ProductGraph, ProductNode, ProductState};
pub use search::{ProductSearch, SearchOutcome, SearchStats, Synthesis};
pub use traffic::TrafficGenerator;
pub use transition::{PhysicalState, TransitionSystem};

/// Values that predicates can be evaluated on.
pub trait Domain: 'static {}
