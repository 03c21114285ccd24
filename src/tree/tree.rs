use crate::data::{Assignment, BranchLabel, Test, Variable};
use crate::errors::FactreeError;
use std::collections::BTreeSet;
use std::fmt::{self, Display};

/// A binary decision tree whose leaves hold values of type `T`.
///
/// `Decision` routes to `pass` when its test holds and to `fail` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionTree<T> {
    Leaf(T),
    Decision {
        test: Test,
        pass: Box<DecisionTree<T>>,
        fail: Box<DecisionTree<T>>,
    },
}

impl<T> DecisionTree<T> {
    pub fn leaf(value: T) -> Self {
        DecisionTree::Leaf(value)
    }

    pub fn decision(test: Test, pass: DecisionTree<T>, fail: DecisionTree<T>) -> Self {
        DecisionTree::Decision {
            test,
            pass: Box::new(pass),
            fail: Box::new(fail),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DecisionTree::Leaf(_))
    }

    /// The test at the root, if the root is a decision.
    pub fn root_test(&self) -> Option<&Test> {
        match self {
            DecisionTree::Leaf(_) => None,
            DecisionTree::Decision { test, .. } => Some(test),
        }
    }

    /// Transform every leaf value, keeping the structure.
    pub fn map<S, F>(&self, f: F) -> DecisionTree<S>
    where
        F: Fn(&T) -> S,
    {
        self.map_ref(&f)
    }

    fn map_ref<S, F>(&self, f: &F) -> DecisionTree<S>
    where
        F: Fn(&T) -> S,
    {
        match self {
            DecisionTree::Leaf(v) => DecisionTree::Leaf(f(v)),
            DecisionTree::Decision { test, pass, fail } => {
                DecisionTree::decision(test.clone(), pass.map_ref(f), fail.map_ref(f))
            }
        }
    }

    /// Same as `map`, but consumes the tree.
    pub fn map_into<S, F>(self, f: &F) -> DecisionTree<S>
    where
        F: Fn(T) -> S,
    {
        match self {
            DecisionTree::Leaf(v) => DecisionTree::Leaf(f(v)),
            DecisionTree::Decision { test, pass, fail } => {
                DecisionTree::decision(test, pass.map_into(f), fail.map_into(f))
            }
        }
    }

    /// Structural equality with a caller supplied leaf comparison.
    /// Both trees must ask the same tests in the same places.
    pub fn equals<F>(&self, other: &DecisionTree<T>, eq: &F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        match (self, other) {
            (DecisionTree::Leaf(a), DecisionTree::Leaf(b)) => eq(a, b),
            (
                DecisionTree::Decision { test: t1, pass: p1, fail: f1 },
                DecisionTree::Decision { test: t2, pass: p2, fail: f2 },
            ) => t1 == t2 && p1.equals(p2, eq) && f1.equals(f2, eq),
            _ => false,
        }
    }

    /// Walk from the root to the leaf selected by a full assignment.
    pub fn match_leaf(&self, assignment: &Assignment) -> Result<&T, FactreeError> {
        let mut node = self;
        loop {
            match node {
                DecisionTree::Leaf(v) => return Ok(v),
                DecisionTree::Decision { test, pass, fail } => {
                    node = if test.evaluate(assignment)? { &**pass } else { &**fail };
                }
            }
        }
    }

    /// Every leaf consistent with a partial assignment. Decisions on
    /// variables the assignment leaves open contribute both branches.
    pub fn match_all_leaves(&self, partial: &Assignment) -> Vec<&T> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                DecisionTree::Leaf(v) => out.push(v),
                DecisionTree::Decision { test, pass, fail } => match partial.get(&test.variable) {
                    Some(v) if v == test.value => stack.push(pass),
                    Some(_) => stack.push(fail),
                    None => {
                        stack.push(fail);
                        stack.push(pass);
                    }
                },
            }
        }
        out
    }

    /// Every leaf together with the branch label that leads to it,
    /// pass branches first.
    pub fn leaves_with_history(&self) -> Vec<(BranchLabel, &T)> {
        let mut out = Vec::new();
        let mut stack = vec![(BranchLabel::new(), self)];
        while let Some((label, node)) = stack.pop() {
            match node {
                DecisionTree::Leaf(v) => out.push((label, v)),
                DecisionTree::Decision { test, pass, fail } => {
                    stack.push((label.with(test.clone(), false), &**fail));
                    stack.push((label.with(test.clone(), true), &**pass));
                }
            }
        }
        out
    }

    /// Replace the value of the leaf reached by following `label`.
    /// Decisions the label says nothing about are left untouched on both sides.
    pub fn replace_leaf(&self, label: &BranchLabel, value: T) -> DecisionTree<T>
    where
        T: Clone,
    {
        match self {
            DecisionTree::Leaf(_) => DecisionTree::Leaf(value),
            DecisionTree::Decision { test, pass, fail } => match label.implies(test) {
                Some(true) => DecisionTree::decision(test.clone(), pass.replace_leaf(label, value), (**fail).clone()),
                Some(false) => DecisionTree::decision(test.clone(), (**pass).clone(), fail.replace_leaf(label, value)),
                None => DecisionTree::decision(
                    test.clone(),
                    pass.replace_leaf(label, value.clone()),
                    fail.replace_leaf(label, value),
                ),
            },
        }
    }

    /// Fold every leaf value, pass branches before fail branches.
    pub fn fold<S, F>(&self, init: S, f: F) -> S
    where
        F: Fn(S, &T) -> S,
    {
        let mut acc = init;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                DecisionTree::Leaf(v) => acc = f(acc, v),
                DecisionTree::Decision { pass, fail, .. } => {
                    stack.push(fail);
                    stack.push(pass);
                }
            }
        }
        acc
    }

    /// Every distinct test the tree asks.
    pub fn tests(&self) -> BTreeSet<Test> {
        let mut out = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let DecisionTree::Decision { test, pass, fail } = node {
                out.insert(test.clone());
                stack.push(pass);
                stack.push(fail);
            }
        }
        out
    }

    pub fn contains_test(&self, target: &Test) -> bool {
        match self {
            DecisionTree::Leaf(_) => false,
            DecisionTree::Decision { test, pass, fail } => {
                test == target || pass.contains_test(target) || fail.contains_test(target)
            }
        }
    }

    /// Every variable the tree tests on.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.tests().into_iter().map(|t| t.variable).collect()
    }

    pub fn n_leaves(&self) -> usize {
        self.fold(0, |n, _| n + 1)
    }

    pub fn n_nodes(&self) -> usize {
        match self {
            DecisionTree::Leaf(_) => 1,
            DecisionTree::Decision { pass, fail, .. } => 1 + pass.n_nodes() + fail.n_nodes(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            DecisionTree::Leaf(_) => 0,
            DecisionTree::Decision { pass, fail, .. } => 1 + pass.depth().max(fail.depth()),
        }
    }
}

impl<T: Display> Display for DecisionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<(usize, &str, &DecisionTree<T>)> = vec![(0, "", self)];
        let mut r = String::new();
        while let Some((depth, prefix, node)) = print_buffer.pop() {
            let indent = "    ".repeat(depth);
            match node {
                DecisionTree::Leaf(v) => r += format!("{}{}leaf={}\n", indent, prefix, v).as_str(),
                DecisionTree::Decision { test, pass, fail } => {
                    r += format!("{}{}[{}]\n", indent, prefix, test).as_str();
                    print_buffer.push((depth + 1, "no: ", &**fail));
                    print_buffer.push((depth + 1, "yes: ", &**pass));
                }
            }
        }
        write!(f, "{}", r)
    }
}
