//! Product of the physical transition system with the specification automaton.
//!
//! Nodes live in an append-only arena and refer to their parent by index.
//! A parent is always allocated before its children, so parent links form
//! a tree rooted at node 0.

use crate::{
    automaton::{Mode, SpecificationAutomaton},
    observation::Observation,
    transition::PhysicalState,
};
use std::fmt;

/// Index of a node in its [`ProductGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A physical state paired with the automaton mode it was reached in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductState {
    pub physical: PhysicalState,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductNode {
    id: NodeId,
    state: ProductState,
    accepting: bool,
    parent: Option<NodeId>,
    observation: Option<Observation>,
}

impl ProductNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn state(&self) -> &ProductState {
        &self.state
    }

    #[must_use]
    pub const fn physical(&self) -> &PhysicalState {
        &self.state.physical
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.state.mode
    }

    #[must_use]
    pub const fn is_accepting(&self) -> bool {
        self.accepting
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Label of the edge from the parent, `None` for the root.
    #[must_use]
    pub const fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }
}

/// Arena owning every product node discovered by one search.
#[derive(Debug)]
pub struct ProductGraph<'a> {
    automaton: &'a SpecificationAutomaton,
    nodes: Vec<ProductNode>,
}

impl<'a> ProductGraph<'a> {
    /// A graph holding only the root `(initial, automaton.initial())`.
    #[must_use]
    pub fn new(automaton: &'a SpecificationAutomaton, initial: PhysicalState) -> Self {
        let mode = automaton.initial();
        let root = ProductNode {
            id: NodeId(0),
            state: ProductState {
                physical: initial,
                mode,
            },
            accepting: automaton.is_accepting(mode),
            parent: None,
            observation: None,
        };
        Self {
            automaton,
            nodes: vec![root],
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub const fn automaton(&self) -> &'a SpecificationAutomaton {
        self.automaton
    }

    /// Creates the child of `parent` reached by taking the physical edge
    /// labelled `observation` into `successor`.
    pub fn join(
        &mut self,
        parent: NodeId,
        successor: PhysicalState,
        observation: Observation,
    ) -> NodeId {
        let mode = self.automaton.step(self[parent].mode(), &observation);
        let id = NodeId(self.nodes.len());
        self.nodes.push(ProductNode {
            id,
            state: ProductState {
                physical: successor,
                mode,
            },
            accepting: self.automaton.is_accepting(mode),
            parent: Some(parent),
            observation: Some(observation),
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ProductNode> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductNode> {
        self.nodes.iter()
    }

    /// Nodes from the root to `node`. `None` gives an empty path.
    #[must_use]
    pub fn extract_path(&self, node: Option<NodeId>) -> Vec<&ProductNode> {
        let mut path: Vec<_> = std::iter::successors(node.and_then(|id| self.get(id)), |node| {
            node.parent.and_then(|parent| self.get(parent))
        })
        .collect();
        path.reverse();
        path
    }
}

impl std::ops::Index<NodeId> for ProductGraph<'_> {
    type Output = ProductNode;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> PhysicalState {
        PhysicalState::initial(0, 150, 0, 30)
    }

    #[test]
    fn root_is_pending() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let graph = ProductGraph::new(&automaton, start());
        let root = &graph[graph.root()];
        assert_eq!(root.mode(), Mode::Pending);
        assert_eq!(root.parent(), None);
        assert_eq!(root.observation(), None);
        assert!(!root.is_accepting());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn join_applies_the_transition_function() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let mut graph = ProductGraph::new(&automaton, start());
        let root = graph.root();

        let cruise = graph.join(root, start().advance(0, 50), Observation::default());
        assert_eq!(graph[cruise].mode(), Mode::Pending);

        let arrive = graph.join(
            cruise,
            start().advance(0, 50).advance(0, 50),
            Observation::new(true, false, false),
        );
        assert_eq!(graph[arrive].mode(), Mode::Accepting);
        assert!(graph[arrive].is_accepting());

        let crash = graph.join(arrive, start(), Observation::new(false, true, false));
        assert_eq!(graph[crash].mode(), Mode::Trap);
    }

    #[test]
    fn ids_increase_with_allocation() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let mut graph = ProductGraph::new(&automaton, start());
        let a = graph.join(graph.root(), start().advance(0, 30), Observation::default());
        let b = graph.join(graph.root(), start().advance(0, 40), Observation::default());
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert_eq!(graph[b].id(), b);
        assert!(graph.get(NodeId(3)).is_none());
    }

    #[test]
    fn path_runs_from_root_to_node() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let mut graph = ProductGraph::new(&automaton, start());
        let first = graph.join(graph.root(), start().advance(0, 30), Observation::default());
        let _sibling = graph.join(graph.root(), start().advance(0, 40), Observation::default());
        let second = graph.join(
            first,
            start().advance(0, 30).advance(0, 30),
            Observation::default(),
        );

        let ids: Vec<_> = graph
            .extract_path(Some(second))
            .into_iter()
            .map(ProductNode::id)
            .collect();
        assert_eq!(ids, vec![graph.root(), first, second]);
    }

    #[test]
    fn no_node_no_path() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let graph = ProductGraph::new(&automaton, start());
        assert!(graph.extract_path(None).is_empty());
        assert_eq!(graph.extract_path(Some(graph.root())).len(), 1);
    }
}
