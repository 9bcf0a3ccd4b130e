use crate::{
    automaton::{Mode, SpecificationAutomaton},
    observation::Observation,
    product::ProductNode,
};

/// Runs the specification automaton alongside a stream of observations.
pub struct Monitor<'a> {
    automaton: &'a SpecificationAutomaton,
    state: Mode,
    trapped: bool,
}

impl<'a> Monitor<'a> {
    #[must_use]
    pub fn new(automaton: &'a SpecificationAutomaton) -> Self {
        let initial_state = automaton.initial();
        Self {
            automaton,
            state: initial_state,
            trapped: initial_state == Mode::Trap,
        }
    }

    /// Consumes one observation and returns the new mode.
    pub fn next_state(&mut self, observation: &Observation) -> Mode {
        self.state = self.automaton.step(self.state, observation);
        self.trapped |= self.state == Mode::Trap;
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.state
    }

    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.automaton.is_accepting(self.state)
    }

    /// Replays the observations on the edges of `path` (root first) and
    /// checks that the run never trapped and ends accepting. The modes
    /// recorded on the nodes have to agree with the replay.
    #[must_use]
    pub fn verify(automaton: &SpecificationAutomaton, path: &[&ProductNode]) -> bool {
        let Some((root, rest)) = path.split_first() else {
            return false;
        };
        let mut monitor = Monitor::new(automaton);
        if root.mode() != monitor.mode() {
            return false;
        }
        for node in rest {
            let Some(observation) = node.observation() else {
                return false;
            };
            if monitor.next_state(observation) != node.mode() {
                return false;
            }
        }
        !monitor.trapped && monitor.is_accepting()
    }
}
