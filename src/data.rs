//! Variables, tests, assignments and branch labels.
//!
//! These are the primitive values every tree is keyed on. A [`Test`] asks
//! whether one [`Variable`] takes one value, so multi-valued variables are
//! split by several binary tests.
use crate::errors::FactreeError;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

/// A named variable with a finite domain `0..domain_size`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
}

impl Variable {
    pub fn new(name: impl Into<String>, domain_size: usize) -> Self {
        Variable {
            name: name.into(),
            domain_size,
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Variable::new(name, 2)
    }

    /// Every test that can be asked of this variable, one per domain value.
    pub fn tests(&self) -> impl Iterator<Item = Test> + '_ {
        (0..self.domain_size).map(move |value| Test::new(self.clone(), value))
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// "Does `variable` equal `value`?"
///
/// Ordering is lexicographic on `(variable, value)`, which is the
/// tie-break rule used whenever two candidate tests score the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Test {
    pub variable: Variable,
    pub value: usize,
}

impl Test {
    pub fn new(variable: Variable, value: usize) -> Self {
        Test { variable, value }
    }

    /// Evaluate the test against a full assignment.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool, FactreeError> {
        match assignment.get(&self.variable) {
            Some(v) => Ok(v == self.value),
            None => Err(FactreeError::MissingAssignment(self.variable.name.clone())),
        }
    }

    /// Evaluate the test, treating a missing variable as a failed test.
    pub fn passes(&self, assignment: &Assignment) -> bool {
        assignment.get(&self.variable) == Some(self.value)
    }
}

impl Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.variable.name, self.value)
    }
}

/// A (possibly partial) assignment of values to variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: HashMap<Variable, usize>,
}

impl Assignment {
    pub fn new() -> Self {
        Assignment { values: HashMap::new() }
    }

    pub fn from_pairs<I: IntoIterator<Item = (Variable, usize)>>(pairs: I) -> Self {
        Assignment {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, variable: &Variable) -> Option<usize> {
        self.values.get(variable).copied()
    }

    pub fn insert(&mut self, variable: Variable, value: usize) -> Option<usize> {
        self.values.insert(variable, value)
    }

    pub fn with(mut self, variable: Variable, value: usize) -> Self {
        self.values.insert(variable, value);
        self
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.values.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &usize)> {
        self.values.iter()
    }

    /// Every full assignment over `variables`, in odometer order with the
    /// last variable changing fastest.
    pub fn enumerate(variables: &[Variable]) -> Vec<Assignment> {
        let mut out = vec![Assignment::new()];
        for variable in variables {
            out = out
                .into_iter()
                .flat_map(|a| (0..variable.domain_size).map(move |v| a.clone().with(variable.clone(), v)))
                .collect();
        }
        out
    }
}

/// The conjunction of test outcomes on the path from the root to a node.
///
/// For a given variable the label holds at most one `true` entry and any
/// number of `false` entries, never both outcomes for the same test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BranchLabel {
    outcomes: BTreeMap<Test, bool>,
}

impl BranchLabel {
    pub fn new() -> Self {
        BranchLabel {
            outcomes: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I: IntoIterator<Item = (Test, bool)>>(pairs: I) -> Self {
        let mut label = BranchLabel::new();
        for (test, outcome) in pairs {
            label.insert(test, outcome);
        }
        label
    }

    pub fn get(&self, test: &Test) -> Option<bool> {
        self.outcomes.get(test).copied()
    }

    pub fn insert(&mut self, test: Test, outcome: bool) -> Option<bool> {
        self.outcomes.insert(test, outcome)
    }

    pub fn remove(&mut self, test: &Test) -> Option<bool> {
        self.outcomes.remove(test)
    }

    /// A copy of this label extended by one more outcome.
    pub fn with(&self, test: Test, outcome: bool) -> Self {
        let mut label = self.clone();
        label.insert(test, outcome);
        label
    }

    /// A copy of this label without the given test.
    pub fn without(&self, test: &Test) -> Self {
        let mut label = self.clone();
        label.remove(test);
        label
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Test, bool> {
        self.outcomes.iter()
    }

    /// The outcome of `test` forced by this label, if any.
    ///
    /// A test is forced when it was asked directly, when a different value
    /// of the same variable is already known to hold (forced false), or when
    /// every other value of the variable has been ruled out (forced true).
    pub fn implies(&self, test: &Test) -> Option<bool> {
        if let Some(outcome) = self.outcomes.get(test) {
            return Some(*outcome);
        }
        let mut ruled_out = 0;
        for (other, outcome) in self.same_variable(&test.variable) {
            if *outcome {
                // other.value != test.value, otherwise it would have been found above.
                return Some(false);
            }
            if other.value != test.value {
                ruled_out += 1;
            }
        }
        if test.variable.domain_size > 0 && ruled_out == test.variable.domain_size - 1 {
            Some(true)
        } else {
            None
        }
    }

    /// The partial assignment this label pins down: variables with a `true`
    /// entry, plus variables whose every other value is ruled out.
    pub fn to_assignment(&self) -> Assignment {
        let mut assignment = Assignment::new();
        let variables: BTreeSet<&Variable> = self.outcomes.keys().map(|t| &t.variable).collect();
        for variable in variables {
            if let Some(value) = (0..variable.domain_size)
                .find(|v| self.implies(&Test::new(variable.clone(), *v)) == Some(true))
            {
                assignment.insert(variable.clone(), value);
            }
        }
        assignment
    }

    /// Whether a full or partial assignment agrees with every outcome here.
    /// Variables absent from the assignment are treated as unknown, not failed.
    pub fn consistent_with(&self, assignment: &Assignment) -> bool {
        self.outcomes.iter().all(|(test, outcome)| match assignment.get(&test.variable) {
            Some(v) => (v == test.value) == *outcome,
            None => true,
        })
    }

    fn same_variable<'a>(&'a self, variable: &'a Variable) -> impl Iterator<Item = (&'a Test, &'a bool)> + 'a {
        let start = Test::new(variable.clone(), 0);
        self.outcomes
            .range(start..)
            .take_while(move |(t, _)| &t.variable == variable)
    }
}

impl Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .outcomes
            .iter()
            .map(|(t, o)| if *o { format!("{}", t) } else { format!("!{}", t) })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// The set of variables a tree may test on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    variables: BTreeSet<Variable>,
}

impl Vocabulary {
    pub fn new<I: IntoIterator<Item = Variable>>(variables: I) -> Self {
        Vocabulary {
            variables: variables.into_iter().collect(),
        }
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.variables.contains(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All candidate tests, in tie-break order.
    pub fn tests(&self) -> impl Iterator<Item = Test> + '_ {
        self.variables.iter().flat_map(|v| v.tests())
    }

    /// Variables in `self` that are not in `other`.
    pub fn difference(&self, other: &Vocabulary) -> Vocabulary {
        Vocabulary {
            variables: self.variables.difference(&other.variables).cloned().collect(),
        }
    }
}

impl FromIterator<Variable> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Vocabulary::new(iter)
    }
}
