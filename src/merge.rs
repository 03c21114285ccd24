//! Pointwise combination of trees.
//!
//! `append` grafts one tree under every leaf of another, so the size of
//! the result is bounded by the product of both trees' test counts. That
//! product is exponential in the number of distinct tests involved; callers
//! bound it by limiting the variables their trees test on.
use crate::data::{BranchLabel, Test};
use crate::errors::FactreeError;
use crate::simplify::graft;
use crate::tree::DecisionTree;
use log::trace;

/// A tree representing `merge_fn(t1(x), t2(x))` for every full assignment `x`.
///
/// The result is simplified: no decision repeats something its branch label
/// already determines, and decisions with `eq`-equal children are collapsed.
pub fn append<T, U, V, F, E>(t1: &DecisionTree<T>, t2: &DecisionTree<U>, merge_fn: &F, eq: &E) -> DecisionTree<V>
where
    F: Fn(&T, &U) -> V,
    E: Fn(&V, &V) -> bool,
{
    let mut label = BranchLabel::new();
    let merged = append_under(t1, t2, merge_fn, eq, &mut label);
    trace!(
        "append: {} x {} leaves -> {} leaves",
        t1.n_leaves(),
        t2.n_leaves(),
        merged.n_leaves()
    );
    merged
}

fn append_under<T, U, V, F, E>(
    t1: &DecisionTree<T>,
    t2: &DecisionTree<U>,
    merge_fn: &F,
    eq: &E,
    label: &mut BranchLabel,
) -> DecisionTree<V>
where
    F: Fn(&T, &U) -> V,
    E: Fn(&V, &V) -> bool,
{
    match t1 {
        DecisionTree::Leaf(a) => graft(t2, &|b: &U| merge_fn(a, b), eq, label),
        DecisionTree::Decision { test, pass, fail } => match label.implies(test) {
            Some(true) => append_under(pass, t2, merge_fn, eq, label),
            Some(false) => append_under(fail, t2, merge_fn, eq, label),
            None => {
                label.insert(test.clone(), true);
                let p = append_under(pass, t2, merge_fn, eq, label);
                label.insert(test.clone(), false);
                let q = append_under(fail, t2, merge_fn, eq, label);
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

/// Left fold of `append` over a non-empty collection of trees.
pub fn merge_all<T, F, E>(trees: &[DecisionTree<T>], merge_fn: &F, eq: &E) -> Result<DecisionTree<T>, FactreeError>
where
    T: Clone,
    F: Fn(&T, &T) -> T,
    E: Fn(&T, &T) -> bool,
{
    let (first, rest) = trees
        .split_first()
        .ok_or_else(|| FactreeError::EmptyInput("tree".to_string()))?;
    let mut acc = first.clone();
    for tree in rest {
        acc = append(&acc, tree, merge_fn, eq);
    }
    Ok(acc)
}

/// Combine any number of trees under a fixed global test order.
///
/// At every step the earliest test of `order` that sits at the root of any
/// of the trees becomes the next decision; each tree rooted on it descends
/// into the matching child, the others are passed down unchanged. Because
/// the result depends only on `order`, trees merged against the same order
/// line up leaf by leaf. The result is not simplified.
///
/// Fails with `UnorderedTest` when a root test is neither in the remaining
/// order nor already settled by the path taken so far.
pub fn ordered_merge<T, V, F>(order: &[Test], trees: &[DecisionTree<T>], merge_fn: &F) -> Result<DecisionTree<V>, FactreeError>
where
    F: Fn(&[&T]) -> V,
{
    let nodes: Vec<&DecisionTree<T>> = trees.iter().collect();
    let mut label = BranchLabel::new();
    ordered_merge_under(order, nodes, merge_fn, &mut label)
}

fn ordered_merge_under<T, V, F>(
    order: &[Test],
    nodes: Vec<&DecisionTree<T>>,
    merge_fn: &F,
    label: &mut BranchLabel,
) -> Result<DecisionTree<V>, FactreeError>
where
    F: Fn(&[&T]) -> V,
{
    let nodes: Vec<&DecisionTree<T>> = nodes.into_iter().map(|n| skip_settled(n, label)).collect();
    let roots: Vec<&Test> = nodes.iter().filter_map(|n| n.root_test()).collect();
    if roots.is_empty() {
        let leaves: Vec<&T> = nodes
            .iter()
            .filter_map(|n| match n {
                DecisionTree::Leaf(v) => Some(v),
                DecisionTree::Decision { .. } => None,
            })
            .collect();
        return Ok(DecisionTree::Leaf(merge_fn(&leaves)));
    }

    let position = order.iter().position(|t| roots.contains(&t));
    let idx = match position {
        Some(idx) => idx,
        None => {
            let missing = roots
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(FactreeError::UnorderedTest(missing));
        }
    };
    if let Some(skipped) = roots.iter().find(|t| !order[idx..].contains(**t)) {
        return Err(FactreeError::UnorderedTest(skipped.to_string()));
    }
    let split = &order[idx];
    let rest = &order[idx + 1..];

    let mut pass_nodes = Vec::with_capacity(nodes.len());
    let mut fail_nodes = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            DecisionTree::Decision { test, pass, fail } if test == split => {
                pass_nodes.push(&**pass);
                fail_nodes.push(&**fail);
            }
            _ => {
                pass_nodes.push(node);
                fail_nodes.push(node);
            }
        }
    }

    label.insert(split.clone(), true);
    let pass = ordered_merge_under(rest, pass_nodes, merge_fn, label);
    label.insert(split.clone(), false);
    let fail = ordered_merge_under(rest, fail_nodes, merge_fn, label);
    label.remove(split);
    Ok(DecisionTree::decision(split.clone(), pass?, fail?))
}

/// Follow decisions whose outcome `label` already settles.
fn skip_settled<'a, T>(mut node: &'a DecisionTree<T>, label: &BranchLabel) -> &'a DecisionTree<T> {
    while let DecisionTree::Decision { test, pass, fail } = node {
        match label.implies(test) {
            Some(true) => node = &**pass,
            Some(false) => node = &**fail,
            None => break,
        }
    }
    node
}
