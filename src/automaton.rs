//! Deterministic specification automaton over [`Observation`]s.
//!
//! The automaton is explicit data: each [`Mode`] owns a list of edges whose
//! guards are BDDs over the observation predicates. The built-in
//! [`SpecificationAutomaton::reach_avoid`] automaton tracks the formula
//! `G(!collided & !speeding) & F(goal)`.
//!
//! Acceptance is *first entry* into an accepting mode. This is only sound
//! because every run of the transition system is finite: time strictly
//! increases and is bounded. Unbounded horizons need genuine Büchi
//! acceptance instead.

mod dot;

use crate::{
    observation::Observation,
    predicate::{ClosurePredicate, PredicateId, Predicates},
};
use biodivine_lib_bdd::{Bdd, BddValuation};
use itertools::Itertools;
use maplit::hashset;
use std::{collections::HashSet, fmt};

/// The reach-avoid formula tracked by [`SpecificationAutomaton::reach_avoid`].
pub const REACH_AVOID: &str = "G(!collided & !speeding) & F(goal)";

/// States of the specification automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Safe so far, goal not yet reached.
    Pending,
    /// The safety part has been violated.
    Trap,
    /// Safe so far and the goal has been reached.
    Accepting,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Trap, Self::Accepting];

    const fn index(self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Trap => 1,
            Self::Accepting => 2,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Trap => "trap",
            Self::Accepting => "accepting",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) label: String,
    pub(crate) guard: Bdd,
    pub(crate) target: Mode,
}

/// Identifiers of the observation predicates inside [`SpecificationAutomaton::predicates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationPredicates {
    pub goal: PredicateId,
    pub collided: PredicateId,
    pub speeding: PredicateId,
}

pub struct SpecificationAutomaton {
    predicates: Predicates<Observation>,
    ids: ObservationPredicates,
    initial: Mode,
    transitions: [Vec<Edge>; 3],
    accepting: HashSet<Mode>,
}

impl SpecificationAutomaton {
    /// An automaton without edges or accepting modes over the three
    /// observation predicates.
    #[must_use]
    pub fn new(initial: Mode) -> Self {
        let mut builder = Predicates::builder();
        let ids = ObservationPredicates {
            goal: builder.new_predicate(ClosurePredicate::new("goal", |o: &Observation| {
                o.goal_reached
            })),
            collided: builder.new_predicate(ClosurePredicate::new(
                "collided",
                |o: &Observation| o.collided,
            )),
            speeding: builder.new_predicate(ClosurePredicate::new(
                "speeding",
                |o: &Observation| o.speeding,
            )),
        };
        Self {
            predicates: builder.build(),
            ids,
            initial,
            transitions: Default::default(),
            accepting: HashSet::default(),
        }
    }

    /// The automaton for `G(!collided & !speeding) & F(goal)`.
    ///
    /// | mode      | guard                         | target    |
    /// |-----------|-------------------------------|-----------|
    /// | pending   | goal & !collided & !speeding  | accepting |
    /// | pending   | collided \| speeding          | trap      |
    /// | pending   | !goal & !collided & !speeding | pending   |
    /// | trap      | true                          | trap      |
    /// | accepting | collided \| speeding          | trap      |
    /// | accepting | !collided & !speeding         | accepting |
    #[must_use]
    pub fn reach_avoid() -> Self {
        let mut automaton = Self::new(Mode::Pending);
        let goal = automaton.literal(automaton.ids.goal);
        let collided = automaton.literal(automaton.ids.collided);
        let speeding = automaton.literal(automaton.ids.speeding);

        let violation = collided.or(&speeding);
        let safe = violation.not();
        let always = automaton.predicates.bdd_manager().mk_true();

        automaton.add_edge(
            Mode::Pending,
            "goal & !collided & !speeding",
            goal.and(&safe),
            Mode::Accepting,
        );
        automaton.add_edge(
            Mode::Pending,
            "collided | speeding",
            violation.clone(),
            Mode::Trap,
        );
        automaton.add_edge(
            Mode::Pending,
            "!goal & !collided & !speeding",
            goal.not().and(&safe),
            Mode::Pending,
        );
        automaton.add_edge(Mode::Trap, "true", always, Mode::Trap);
        automaton.add_edge(Mode::Accepting, "collided | speeding", violation, Mode::Trap);
        automaton.add_edge(
            Mode::Accepting,
            "!collided & !speeding",
            safe,
            Mode::Accepting,
        );
        automaton.add_accepting(Mode::Accepting);
        automaton
    }

    /// The positive literal of `predicate`.
    #[must_use]
    pub fn literal(&self, predicate: PredicateId) -> Bdd {
        self.predicates
            .bdd_manager()
            .mk_literal(self.predicates.bdd_variable(predicate), true)
    }

    pub fn add_edge(&mut self, source: Mode, label: &str, guard: Bdd, target: Mode) {
        self.transitions[source.index()].push(Edge {
            label: label.to_string(),
            guard,
            target,
        });
    }

    pub fn add_accepting(&mut self, mode: Mode) {
        self.accepting.insert(mode);
    }

    #[must_use]
    pub const fn initial(&self) -> Mode {
        self.initial
    }

    #[must_use]
    pub fn is_accepting(&self, mode: Mode) -> bool {
        self.accepting.contains(&mode)
    }

    #[must_use]
    pub const fn predicates(&self) -> &Predicates<Observation> {
        &self.predicates
    }

    #[must_use]
    pub const fn predicate_ids(&self) -> ObservationPredicates {
        self.ids
    }

    pub(crate) fn edges_from(&self, mode: Mode) -> &[Edge] {
        &self.transitions[mode.index()]
    }

    /// Target of the first edge of `state` enabled under `valuation`.
    #[must_use]
    pub fn next_state(&self, state: Mode, valuation: &BddValuation) -> Option<Mode> {
        self.edges_from(state)
            .iter()
            .find(|edge| edge.guard.eval_in(valuation))
            .map(|edge| edge.target)
    }

    /// The transition function. A mode without an enabled edge rejects,
    /// which is modelled by moving to [`Mode::Trap`].
    #[must_use]
    pub fn step(&self, state: Mode, observation: &Observation) -> Mode {
        let valuation = self.predicates.evaluate(observation);
        self.next_state(state, &valuation).unwrap_or(Mode::Trap)
    }

    /// No two edges leaving the same mode are enabled together.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.transitions.iter().all(|edges| {
            edges
                .iter()
                .tuple_combinations()
                .all(|(lhs, rhs)| lhs.guard.and(&rhs.guard).is_false())
        })
    }

    /// Every mode has an enabled edge under every valuation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let set = self.predicates.bdd_manager();
        self.transitions.iter().all(|edges| {
            edges
                .iter()
                .fold(set.mk_false(), |covered, edge| covered.or(&edge.guard))
                .is_true()
        })
    }

    /// Modes that can never be left once entered.
    #[must_use]
    pub fn absorbing(&self) -> HashSet<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|&mode| {
                self.predicates.valuations().all(|valuation| {
                    self.next_state(mode, &valuation).unwrap_or(Mode::Trap) == mode
                })
            })
            .collect()
    }

    /// Modes reachable from the initial mode.
    #[must_use]
    pub fn reachable(&self) -> HashSet<Mode> {
        let mut seen = hashset! {self.initial};
        let mut stack = vec![self.initial];
        while let Some(mode) = stack.pop() {
            for edge in self.edges_from(mode) {
                if !edge.guard.is_false() && seen.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        seen
    }
}

impl fmt::Debug for SpecificationAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for mode in Mode::ALL {
            let edges: Vec<_> = self
                .edges_from(mode)
                .iter()
                .map(|edge| format!("{} -> {}", edge.label, edge.target))
                .collect();
            map.entry(&mode, &edges);
        }
        map.finish()
    }
}
