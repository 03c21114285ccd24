//! Induction tree nodes.
//!
//! Every node keeps, for each candidate test, the class counts of the
//! examples below it that pass and fail the test. Leaves additionally keep
//! the examples themselves and their aggregated class counts.
use crate::data::{BranchLabel, Test};
use crate::score::{merge_counts, ClassCounts};
use std::collections::BTreeMap;

/// Class counts of the examples passing and failing one candidate test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestStats<C> {
    pub pass: ClassCounts<C>,
    pub fail: ClassCounts<C>,
}

impl<C> Default for TestStats<C> {
    fn default() -> Self {
        TestStats {
            pass: ClassCounts::new(),
            fail: ClassCounts::new(),
        }
    }
}

impl<C: Ord + Clone> TestStats<C> {
    pub fn new() -> Self {
        TestStats::default()
    }

    pub fn record(&mut self, passed: bool, class: C) {
        let side = if passed { &mut self.pass } else { &mut self.fail };
        *side.entry(class).or_insert(0) += 1;
    }

    /// Undo one `record`; `false` if there was nothing to undo.
    pub fn forget(&mut self, passed: bool, class: &C) -> bool {
        let side = if passed { &mut self.pass } else { &mut self.fail };
        crate::score::decrement(side, class)
    }

    pub fn merge(&mut self, other: &TestStats<C>) {
        merge_counts(&mut self.pass, &other.pass);
        merge_counts(&mut self.fail, &other.fail);
    }

    pub fn n_examples(&self) -> usize {
        self.pass.values().sum::<usize>() + self.fail.values().sum::<usize>()
    }
}

/// Statistics for every candidate test, iterated in tie-break order.
pub type CandidateStats<C> = BTreeMap<Test, TestStats<C>>;

/// Union of two sets of candidate statistics, adding counts of shared tests.
pub fn merge_candidates<C: Ord + Clone>(a: &CandidateStats<C>, b: &CandidateStats<C>) -> CandidateStats<C> {
    let mut merged = a.clone();
    for (test, stats) in b {
        merged.entry(test.clone()).or_default().merge(stats);
    }
    merged
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItiLeaf<T, C> {
    pub branch_label: BranchLabel,
    pub candidates: CandidateStats<C>,
    pub examples: Vec<T>,
    pub counts: ClassCounts<C>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItiDecision<T, C> {
    pub branch_label: BranchLabel,
    pub candidates: CandidateStats<C>,
    pub test: Test,
    pub pass: Box<ItiNode<T, C>>,
    pub fail: Box<ItiNode<T, C>>,
    pub stale: bool,
}

impl<T, C: Ord + Clone> ItiDecision<T, C> {
    /// Class counts of every example below this decision.
    pub fn class_totals(&self) -> ClassCounts<C> {
        let mut counts = ClassCounts::new();
        match self.candidates.get(&self.test) {
            Some(stats) => {
                merge_counts(&mut counts, &stats.pass);
                merge_counts(&mut counts, &stats.fail);
            }
            None => {
                merge_counts(&mut counts, &self.pass.class_totals());
                merge_counts(&mut counts, &self.fail.class_totals());
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItiNode<T, C> {
    Leaf(ItiLeaf<T, C>),
    Decision(ItiDecision<T, C>),
}

impl<T, C> ItiNode<T, C> {
    pub fn branch_label(&self) -> &BranchLabel {
        match self {
            ItiNode::Leaf(l) => &l.branch_label,
            ItiNode::Decision(d) => &d.branch_label,
        }
    }

    pub fn candidates(&self) -> &CandidateStats<C> {
        match self {
            ItiNode::Leaf(l) => &l.candidates,
            ItiNode::Decision(d) => &d.candidates,
        }
    }

    pub fn is_stale(&self) -> bool {
        match self {
            ItiNode::Leaf(l) => l.stale,
            ItiNode::Decision(d) => d.stale,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ItiNode::Leaf(_))
    }

    /// The test this node splits on, if it is a decision.
    pub fn current_test(&self) -> Option<&Test> {
        match self {
            ItiNode::Leaf(_) => None,
            ItiNode::Decision(d) => Some(&d.test),
        }
    }

    pub fn set_stale(&mut self, stale: bool) {
        match self {
            ItiNode::Leaf(l) => l.stale = stale,
            ItiNode::Decision(d) => d.stale = stale,
        }
    }

    /// Number of examples held by the leaves below this node.
    pub fn n_examples(&self) -> usize {
        self.collect_leaves().iter().map(|l| l.examples.len()).sum()
    }

    pub fn n_leaves(&self) -> usize {
        self.collect_leaves().len()
    }

    pub fn depth(&self) -> usize {
        match self {
            ItiNode::Leaf(_) => 0,
            ItiNode::Decision(d) => 1 + d.pass.depth().max(d.fail.depth()),
        }
    }

    /// Every leaf, pass branches first.
    pub fn collect_leaves(&self) -> Vec<&ItiLeaf<T, C>> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ItiNode::Leaf(l) => out.push(l),
                ItiNode::Decision(d) => {
                    stack.push(&*d.fail);
                    stack.push(&*d.pass);
                }
            }
        }
        out
    }

    /// Every example held below this node, pass branches first.
    pub fn all_examples(&self) -> Vec<&T> {
        self.collect_leaves().into_iter().flat_map(|l| l.examples.iter()).collect()
    }

    /// Consume the node, returning its examples pass branches first.
    pub fn into_examples(self) -> Vec<T> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ItiNode::Leaf(l) => out.extend(l.examples),
                ItiNode::Decision(d) => {
                    stack.push(*d.fail);
                    stack.push(*d.pass);
                }
            }
        }
        out
    }

    pub fn class_totals(&self) -> ClassCounts<C>
    where
        C: Ord + Clone,
    {
        match self {
            ItiNode::Leaf(l) => l.counts.clone(),
            ItiNode::Decision(d) => d.class_totals(),
        }
    }

    /// Whether every leaf's class counts add up to its retained examples and
    /// every candidate's counts add up to the examples below its node.
    pub fn counts_in_sync(&self) -> bool
    where
        C: Ord + Clone,
    {
        self.sync_check().is_some()
    }

    /// Number of examples below this node if everything below is in sync.
    fn sync_check(&self) -> Option<usize>
    where
        C: Ord + Clone,
    {
        let n = match self {
            ItiNode::Leaf(l) => {
                if l.counts.values().sum::<usize>() != l.examples.len() {
                    return None;
                }
                l.examples.len()
            }
            ItiNode::Decision(d) => d.pass.sync_check()? + d.fail.sync_check()?,
        };
        if self.candidates().values().all(|s| s.n_examples() == n) {
            Some(n)
        } else {
            None
        }
    }

    /// Rewrite the branch label of every node in this subtree, dropping
    /// `remove` and recording `add`. Touched nodes are marked stale since the
    /// set of candidates their label rules out may have changed.
    pub fn relabel(self, remove: Option<&Test>, add: Option<(&Test, bool)>) -> Self {
        let fix = |mut label: BranchLabel| {
            if let Some(test) = remove {
                label.remove(test);
            }
            if let Some((test, outcome)) = add {
                label.insert(test.clone(), outcome);
            }
            label
        };
        match self {
            ItiNode::Leaf(l) => ItiNode::Leaf(ItiLeaf {
                branch_label: fix(l.branch_label),
                stale: true,
                ..l
            }),
            ItiNode::Decision(d) => ItiNode::Decision(ItiDecision {
                branch_label: fix(d.branch_label),
                candidates: d.candidates,
                test: d.test,
                pass: Box::new(d.pass.relabel(remove, add)),
                fail: Box::new(d.fail.relabel(remove, add)),
                stale: true,
            }),
        }
    }
}
