//! Named predicates over a [`Domain`], each backed by a BDD variable.

use crate::Domain;
use biodivine_lib_bdd::{BddValuation, BddVariable, BddVariableSet, BddVariableSetBuilder};
use itertools::Itertools;

/// A predicate maps values from [`Domain`] to a boolean value.
pub trait Predicate<D: Domain>: 'static {
    fn eval(&self, value: &D) -> bool;
}

/// A predicate computed by the provided closure.
pub struct ClosurePredicate<D: Domain> {
    name: &'static str,
    closure: Box<dyn Fn(&D) -> bool + 'static>,
}

impl<D: Domain> ClosurePredicate<D> {
    pub fn new(name: &'static str, closure: impl Fn(&D) -> bool + 'static) -> Self {
        Self {
            name,
            closure: Box::new(closure),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<D: Domain> Predicate<D> for ClosurePredicate<D> {
    fn eval(&self, value: &D) -> bool {
        (self.closure)(value)
    }
}

impl<D: Domain> std::fmt::Display for ClosurePredicate<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<D: Domain> std::fmt::Debug for ClosurePredicate<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClosurePredicate").field(&self.name).finish()
    }
}

pub struct PredicatesBuilder<D: Domain>(Vec<ClosurePredicate<D>>);

/// An ordered set of predicates. Predicate `i` is bound to BDD variable `i`.
pub struct Predicates<D: Domain> {
    predicates: Vec<ClosurePredicate<D>>,
    variables: Vec<BddVariable>,
    manager: BddVariableSet,
}

impl<D: Domain> Default for PredicatesBuilder<D> {
    fn default() -> Self {
        Self(Vec::default())
    }
}

impl<D: Domain> Predicates<D> {
    #[must_use]
    pub fn builder() -> PredicatesBuilder<D> {
        PredicatesBuilder::default()
    }

    /// Evaluates every predicate on `observation`.
    pub fn evaluate(&self, observation: &D) -> BddValuation {
        BddValuation::new(
            self.predicates
                .iter()
                .map(|predicate| predicate.eval(observation))
                .collect(),
        )
    }

    /// Every assignment of the predicate variables, in lexicographic order
    /// with `false` first.
    pub fn valuations(&self) -> impl Iterator<Item = BddValuation> {
        (0..self.predicates.len())
            .map(|_| [false, true])
            .multi_cartesian_product()
            .map(BddValuation::new)
    }

    #[must_use]
    pub fn bdd_variable(&self, predicate: PredicateId) -> BddVariable {
        self.variables[predicate.0]
    }

    #[must_use]
    pub const fn bdd_manager(&self) -> &BddVariableSet {
        &self.manager
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<D: Domain> PredicatesBuilder<D> {
    pub fn new_predicate(&mut self, predicate: ClosurePredicate<D>) -> PredicateId {
        let id = PredicateId(self.0.len());
        self.0.push(predicate);
        id
    }

    #[must_use]
    pub fn build(self) -> Predicates<D> {
        let mut builder = BddVariableSetBuilder::new();
        let variables = self
            .0
            .iter()
            .map(|proposition| builder.make_variable(&format!("{proposition}")))
            .collect();
        Predicates {
            predicates: self.0,
            variables,
            manager: builder.build(),
        }
    }
}

impl<D: Domain> std::ops::Index<PredicateId> for Predicates<D> {
    type Output = ClosurePredicate<D>;

    fn index(&self, index: PredicateId) -> &Self::Output {
        &self.predicates[index.0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateId(usize);

impl PredicateId {
    #[cfg(test)]
    pub(crate) const fn new_unchecked(val: usize) -> Self {
        Self(val)
    }
}
