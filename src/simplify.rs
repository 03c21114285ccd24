//! Redundancy elimination.
//!
//! A decision is redundant when the branch label leading to it already
//! fixes its outcome (a repeated test, a different value of a variable
//! known to hold, or the last value left open for a variable), or when
//! both of its children end up equal.
use crate::data::BranchLabel;
use crate::tree::DecisionTree;

/// Remove every redundant decision, bottom-up, assuming `label` already
/// holds at the root of `tree`.
pub fn simplify<T, F>(tree: DecisionTree<T>, eq: &F, label: &BranchLabel) -> DecisionTree<T>
where
    F: Fn(&T, &T) -> bool,
{
    let mut label = label.clone();
    simplify_under(tree, eq, &mut label)
}

fn simplify_under<T, F>(tree: DecisionTree<T>, eq: &F, label: &mut BranchLabel) -> DecisionTree<T>
where
    F: Fn(&T, &T) -> bool,
{
    match tree {
        DecisionTree::Leaf(_) => tree,
        DecisionTree::Decision { test, pass, fail } => match label.implies(&test) {
            Some(true) => simplify_under(*pass, eq, label),
            Some(false) => simplify_under(*fail, eq, label),
            None => {
                label.insert(test.clone(), true);
                let pass = simplify_under(*pass, eq, label);
                label.insert(test.clone(), false);
                let fail = simplify_under(*fail, eq, label);
                label.remove(&test);
                if pass.equals(&fail, eq) {
                    pass
                } else {
                    DecisionTree::decision(test, pass, fail)
                }
            }
        },
    }
}

/// Copy `tree` as seen from below `label`, mapping every leaf through `f`.
///
/// Decisions whose outcome `label` fixes are skipped, and a decision whose
/// children come out equal collapses to one child. This is `simplify`
/// applied to `tree.map(f)` without building the redundant parts first.
pub fn graft<T, S, F, E>(tree: &DecisionTree<T>, f: &F, eq: &E, label: &mut BranchLabel) -> DecisionTree<S>
where
    F: Fn(&T) -> S,
    E: Fn(&S, &S) -> bool,
{
    match tree {
        DecisionTree::Leaf(v) => DecisionTree::Leaf(f(v)),
        DecisionTree::Decision { test, pass, fail } => match label.implies(test) {
            Some(true) => graft(pass, f, eq, label),
            Some(false) => graft(fail, f, eq, label),
            None => {
                label.insert(test.clone(), true);
                let p = graft(pass, f, eq, label);
                label.insert(test.clone(), false);
                let q = graft(fail, f, eq, label);
                label.remove(test);
                if p.equals(&q, eq) {
                    p
                } else {
                    DecisionTree::decision(test.clone(), p, q)
                }
            }
        },
    }
}

/// Copy of `tree` with only the decisions `label` leaves open. Unlike
/// `simplify` this never merges equal children, so the result has exactly
/// the shape of `tree` restricted to the label.
pub fn restrict<T: Clone>(tree: &DecisionTree<T>, label: &BranchLabel) -> DecisionTree<T> {
    match tree {
        DecisionTree::Leaf(v) => DecisionTree::Leaf(v.clone()),
        DecisionTree::Decision { test, pass, fail } => match label.implies(test) {
            Some(true) => restrict(pass, label),
            Some(false) => restrict(fail, label),
            None => DecisionTree::decision(
                test.clone(),
                restrict(pass, &label.with(test.clone(), true)),
                restrict(fail, &label.with(test.clone(), false)),
            ),
        },
    }
}
