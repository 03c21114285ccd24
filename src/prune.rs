//! Approximation by collapsing decisions whose leaves are close together.
use crate::tree::DecisionTree;
use log::trace;
use std::fmt::{self, Display};

/// A closed interval of values a collapsed leaf stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lower: f64,
    pub upper: f64,
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> Self {
        Range { lower, upper }
    }

    pub fn point(value: f64) -> Self {
        Range::new(value, value)
    }

    pub fn union(&self, other: &Range) -> Range {
        Range::new(self.lower.min(other.lower), self.upper.max(other.upper))
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Collapse, bottom-up, every decision whose two children are leaves and
/// whose combined range is narrower than `threshold`.
///
/// A threshold of zero returns the tree unchanged, and raising it never
/// adds leaves.
pub fn prune(tree: DecisionTree<Range>, threshold: f64) -> DecisionTree<Range> {
    match tree {
        DecisionTree::Leaf(_) => tree,
        DecisionTree::Decision { test, pass, fail } => {
            let pass = prune(*pass, threshold);
            let fail = prune(*fail, threshold);
            if let (DecisionTree::Leaf(p), DecisionTree::Leaf(f)) = (&pass, &fail) {
                let union = p.union(f);
                if union.width() < threshold {
                    trace!("prune: collapsing {} into {}", test, union);
                    return DecisionTree::Leaf(union);
                }
            }
            DecisionTree::decision(test, pass, fail)
        }
    }
}

/// Prune a tree of plain values: every leaf becomes a point range, the
/// ranges are pruned, and each surviving leaf takes its range's midpoint.
pub fn prune_values(tree: &DecisionTree<f64>, threshold: f64) -> DecisionTree<f64> {
    prune(tree.map(|v| Range::point(*v)), threshold).map(|r| r.midpoint())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Test, Variable};
    use approx::assert_relative_eq;

    fn t(name: &str) -> Test {
        Test::new(Variable::binary(name), 0)
    }

    fn sample() -> DecisionTree<f64> {
        DecisionTree::decision(
            t("A"),
            DecisionTree::decision(t("B"), DecisionTree::leaf(1.0), DecisionTree::leaf(1.5)),
            DecisionTree::decision(t("C"), DecisionTree::leaf(4.0), DecisionTree::leaf(9.0)),
        )
    }

    #[test]
    fn test_prune_zero_is_identity() {
        let ranges = sample().map(|v| Range::point(*v));
        assert_eq!(prune(ranges.clone(), 0.0), ranges);
    }

    #[test]
    fn test_prune_collapses_close_leaves() {
        let pruned = prune_values(&sample(), 1.0);
        let expected = DecisionTree::decision(
            t("A"),
            DecisionTree::leaf(1.25),
            DecisionTree::decision(t("C"), DecisionTree::leaf(4.0), DecisionTree::leaf(9.0)),
        );
        assert_eq!(pruned, expected);
    }

    #[test]
    fn test_prune_cascades_upwards() {
        let ranges = prune(sample().map(|v| Range::point(*v)), 10.0);
        match ranges {
            DecisionTree::Leaf(r) => {
                assert_relative_eq!(r.lower, 1.0);
                assert_relative_eq!(r.upper, 9.0);
            }
            DecisionTree::Decision { .. } => panic!("expected a single leaf"),
        }
    }

    #[test]
    fn test_prune_monotone_in_threshold() {
        let mut previous = usize::MAX;
        for threshold in [0.0, 0.4, 0.6, 5.0, 6.0, 8.0, 8.5, 100.0] {
            let leaves = prune_values(&sample(), threshold).n_leaves();
            assert!(leaves <= previous);
            previous = leaves;
        }
    }
}
