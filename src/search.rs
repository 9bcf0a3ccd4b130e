//! Breadth-first search of the product graph.
//!
//! The search starts at `(initial state, initial mode)` and walks transition
//! system edges in FIFO order, feeding every edge's observation into the
//! specification automaton. Product states are visited at most once.
//! Branches entering [`Mode::Trap`] are pruned. The first node entering an
//! accepting mode ends the search; since all edges have unit cost this node
//! has the fewest transitions of all accepting nodes.

use crate::{
    automaton::{Mode, SpecificationAutomaton, REACH_AVOID},
    config::{HighwayConfig, SearchLimits},
    error::{Error, Result},
    monitor::Monitor,
    observation::Observation,
    occupancy::OccupancyGrid,
    product::{NodeId, ProductGraph, ProductNode, ProductState},
    transition::{PhysicalState, TransitionSystem},
};
use maplit::hashset;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, trace};

/// How a search terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The first accepting node in breadth-first order.
    Found(NodeId),
    /// Every reachable product state was visited without acceptance.
    Exhausted,
    /// The node budget ran out before the search finished.
    BudgetExceeded { nodes: usize },
}

impl SearchOutcome {
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Found(node) => Some(*node),
            Self::Exhausted | Self::BudgetExceeded { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Product nodes allocated, the root included.
    pub nodes: usize,
    /// Nodes whose successors were enqueued.
    pub expanded: usize,
    /// Nodes discarded because they entered the trap mode.
    pub pruned_trap: usize,
    /// Queue entries dropped because their product state was already visited.
    pub skipped_visited: usize,
    /// Largest number of transitions from the root to an allocated node.
    pub depth: u32,
}

/// A pending product edge: `parent` followed by the physical edge into `successor`.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    parent: NodeId,
    successor: PhysicalState,
    observation: Observation,
}

/// Synthesizes trajectories for one road, traffic and specification.
#[derive(Debug)]
pub struct ProductSearch<'a> {
    system: TransitionSystem<'a>,
    automaton: &'a SpecificationAutomaton,
    limits: SearchLimits,
}

impl<'a> ProductSearch<'a> {
    /// Checks `config` and that `grid` has the shape `config` describes.
    pub fn new(
        config: &'a HighwayConfig,
        grid: &'a OccupancyGrid,
        automaton: &'a SpecificationAutomaton,
    ) -> Result<Self> {
        config.validate()?;
        if grid.dimensions() != config.dimensions() {
            return Err(Error::GridShape {
                expected: config.dimensions(),
                found: grid.dimensions(),
            });
        }
        Ok(Self {
            system: TransitionSystem::new(config, grid),
            automaton,
            limits: SearchLimits::default(),
        })
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub const fn transition_system(&self) -> &TransitionSystem<'a> {
        &self.system
    }

    /// Runs the search to completion.
    #[must_use]
    pub fn run(&self) -> Synthesis<'a> {
        let initial = self.system.config().initial;
        info!(
            formula = REACH_AVOID,
            %initial,
            max_nodes = ?self.limits.max_nodes,
            "starting product search"
        );

        let mut graph = ProductGraph::new(self.automaton, initial);
        let mut stats = SearchStats {
            nodes: 1,
            ..SearchStats::default()
        };
        let outcome = self.explore(&mut graph, &mut stats);

        match outcome {
            SearchOutcome::Found(node) => info!(
                node = %node,
                transitions = graph[node].physical().time - initial.time,
                nodes = stats.nodes,
                "found accepting product node"
            ),
            SearchOutcome::Exhausted => info!(nodes = stats.nodes, "no accepting product node"),
            SearchOutcome::BudgetExceeded { nodes } => {
                info!(nodes, "node budget exhausted before acceptance");
            }
        }
        debug!(?stats, "product search finished");

        Synthesis {
            graph,
            outcome,
            stats,
        }
    }

    fn explore(&self, graph: &mut ProductGraph<'a>, stats: &mut SearchStats) -> SearchOutcome {
        let root = graph.root();
        if graph[root].is_accepting() {
            return SearchOutcome::Found(root);
        }

        let mut visited: HashSet<ProductState> = hashset! {*graph[root].state()};
        let mut queue = VecDeque::new();
        self.enqueue(&mut queue, &visited, &graph[root]);
        stats.expanded += 1;

        while let Some(Frontier {
            parent,
            successor,
            observation,
        }) = queue.pop_front()
        {
            let mode = self.automaton.step(graph[parent].mode(), &observation);
            if !visited.insert(ProductState {
                physical: successor,
                mode,
            }) {
                stats.skipped_visited += 1;
                continue;
            }

            if self.limits.max_nodes.map_or(false, |max| graph.len() >= max) {
                return SearchOutcome::BudgetExceeded { nodes: graph.len() };
            }
            let node = graph.join(parent, successor, observation);
            stats.nodes = graph.len();

            let depth = successor.time - graph[graph.root()].physical().time;
            if depth > stats.depth {
                stats.depth = depth;
                debug!(depth, nodes = stats.nodes, queued = queue.len(), "search deepened");
            }
            trace!(%node, %parent, state = %successor, mode = %graph[node].mode(), "joined");

            if graph[node].mode() == Mode::Trap {
                stats.pruned_trap += 1;
                continue;
            }
            if graph[node].is_accepting() {
                return SearchOutcome::Found(node);
            }
            self.enqueue(&mut queue, &visited, &graph[node]);
            stats.expanded += 1;
        }

        SearchOutcome::Exhausted
    }

    fn enqueue(
        &self,
        queue: &mut VecDeque<Frontier>,
        visited: &HashSet<ProductState>,
        node: &ProductNode,
    ) {
        for (successor, observation) in self.system.expand(node.physical()) {
            let mode = self.automaton.step(node.mode(), &observation);
            let state = ProductState {
                physical: successor,
                mode,
            };
            if !visited.contains(&state) {
                queue.push_back(Frontier {
                    parent: node.id(),
                    successor,
                    observation,
                });
            }
        }
    }
}

/// Result of a [`ProductSearch`]: the explored graph and how the search ended.
#[derive(Debug)]
pub struct Synthesis<'a> {
    graph: ProductGraph<'a>,
    outcome: SearchOutcome,
    stats: SearchStats,
}

impl<'a> Synthesis<'a> {
    #[must_use]
    pub const fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    #[must_use]
    pub const fn graph(&self) -> &ProductGraph<'a> {
        &self.graph
    }

    /// The accepting node, if one was found.
    #[must_use]
    pub fn accepting_node(&self) -> Option<&ProductNode> {
        self.outcome.node().map(|node| &self.graph[node])
    }

    /// Product nodes from the root to the accepting node; empty without a solution.
    #[must_use]
    pub fn path(&self) -> Vec<&ProductNode> {
        self.graph.extract_path(self.outcome.node())
    }

    /// The physical states along [`Synthesis::path`].
    #[must_use]
    pub fn trajectory(&self) -> Vec<PhysicalState> {
        self.path().into_iter().map(|node| *node.physical()).collect()
    }

    /// Replays the path through a fresh [`Monitor`].
    #[must_use]
    pub fn verify(&self) -> bool {
        Monitor::verify(self.graph.automaton(), &self.path())
    }
}
