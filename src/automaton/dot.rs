//! Graphviz encoding of the specification automaton

use super::{Mode, SpecificationAutomaton};
use crate::error::Result;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy)]
pub(crate) enum DrawNode {
    Initial,
    State(Mode),
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum DrawEdge {
    ToInitial,
    /// The `usize` indexes the edge list of the source mode.
    Edge(Mode, usize, Mode),
}

type Nd = DrawNode;
type Ed = DrawEdge;

impl SpecificationAutomaton {
    /// Renders the automaton in the Graphviz `dot` language.
    pub fn to_dot(&self) -> Result<String> {
        let mut buffer = Vec::new();
        dot::render(self, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl<'a> dot::Labeller<'a, Nd, Ed> for SpecificationAutomaton {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new("specification").expect("valid graphviz identifier")
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        match n {
            DrawNode::Initial => dot::Id::new("_init").expect("valid graphviz identifier"),
            DrawNode::State(mode) => {
                dot::Id::new(mode.name()).expect("mode names are valid graphviz identifiers")
            }
        }
    }

    fn node_label(&'a self, n: &Nd) -> dot::LabelText<'a> {
        match n {
            DrawNode::Initial => dot::LabelText::LabelStr("".into()),
            DrawNode::State(mode) => dot::LabelText::LabelStr(mode.name().into()),
        }
    }

    fn node_style(&'a self, n: &Nd) -> dot::Style {
        match n {
            DrawNode::Initial => dot::Style::Invisible,
            DrawNode::State(mode) if self.is_accepting(*mode) => dot::Style::Filled,
            DrawNode::State(_) => dot::Style::None,
        }
    }

    fn edge_label(&'a self, e: &Ed) -> dot::LabelText<'a> {
        match *e {
            DrawEdge::ToInitial => dot::LabelText::LabelStr(String::new().into()),
            DrawEdge::Edge(source, idx, _) => {
                dot::LabelText::LabelStr(Cow::Borrowed(self.edges_from(source)[idx].label.as_str()))
            }
        }
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for SpecificationAutomaton {
    fn nodes(&'a self) -> dot::Nodes<'a, Nd> {
        Mode::ALL
            .into_iter()
            .map(DrawNode::State)
            .chain(std::iter::once(DrawNode::Initial))
            .collect()
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        Cow::Owned(
            Mode::ALL
                .into_iter()
                .flat_map(|source| {
                    self.edges_from(source)
                        .iter()
                        .enumerate()
                        .map(move |(idx, edge)| DrawEdge::Edge(source, idx, edge.target))
                })
                .chain(std::iter::once(DrawEdge::ToInitial))
                .collect(),
        )
    }

    fn source(&'a self, e: &Ed) -> Nd {
        match *e {
            DrawEdge::ToInitial => DrawNode::Initial,
            DrawEdge::Edge(source, _, _) => DrawNode::State(source),
        }
    }

    fn target(&'a self, e: &Ed) -> Nd {
        match *e {
            DrawEdge::ToInitial => DrawNode::State(self.initial),
            DrawEdge::Edge(_, _, target) => DrawNode::State(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_modes_and_edges() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let rendered = automaton.to_dot().unwrap();
        assert!(rendered.starts_with("digraph specification"));
        for mode in Mode::ALL {
            assert!(rendered.contains(mode.name()), "missing {mode}");
        }
        assert!(rendered.contains("_init -> pending"));
        assert!(rendered.contains("pending -> accepting"));
        assert!(rendered.contains("goal & !collided & !speeding"));
        // six automaton edges plus the initial marker
        assert_eq!(rendered.matches(" -> ").count(), 7);
    }

    #[test]
    fn only_accepting_mode_is_filled() {
        let automaton = SpecificationAutomaton::reach_avoid();
        let rendered = automaton.to_dot().unwrap();
        let filled: Vec<_> = rendered
            .lines()
            .filter(|line| line.contains("style=\"filled\""))
            .collect();
        assert_eq!(filled.len(), 1);
        assert!(filled[0].contains("accepting"));
    }
}
