//! Transposition of induction trees.
//!
//! Rotating a decision so that a different test sits at its root keeps
//! every example and every class count; only where they are stored moves.
use crate::data::Test;
use crate::errors::FactreeError;
use crate::iti::config::ItiConfig;
use crate::iti::models::ExampleModel;
use crate::iti::node::{CandidateStats, ItiDecision, ItiNode, TestStats};
use crate::iti::update::{add_classified, classes_of, create_stats, new_leaf, open_tests};
use log::debug;
use std::collections::BTreeSet;

/// How one child of the node being rotated relates to the replacement test.
enum Side<T, C> {
    /// The child's label already decides the replacement test.
    Constant(bool, ItiNode<T, C>),
    /// The child has been rotated so the replacement test is its root.
    Rooted(ItiDecision<T, C>),
    /// A leaf whose examples may fall either way.
    Open(ItiNode<T, C>),
}

impl<T, C> Side<T, C> {
    fn into_node(self) -> ItiNode<T, C> {
        match self {
            Side::Constant(_, node) | Side::Open(node) => node,
            Side::Rooted(d) => ItiNode::Decision(d),
        }
    }
}

/// Rotate `node` so that it splits on `replacement`.
///
/// Children are first rotated themselves. Then:
/// * when each child is either rooted on `replacement` or already decides
///   it, the grandchildren are regrouped under new decisions on the old
///   root test (or moved up whole when only one side contributes);
/// * when one child is rooted on `replacement` and the other is a leaf, the
///   leaf's examples are pushed into the rooted subtree, which loses the old
///   root test from its labels;
/// * otherwise every example below is split afresh on `replacement`.
///
/// Afterwards every node of the result carries statistics for exactly the
/// tests its new label leaves open, and all of them are stale. Leaves,
/// decisions already on `replacement` and decisions whose label decides
/// `replacement` come back unchanged.
pub fn transpose<T, M, S>(
    node: ItiNode<T, M::Class>,
    replacement: &Test,
    config: &ItiConfig<M, S>,
) -> Result<ItiNode<T, M::Class>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
{
    if !rotates(&node, replacement) {
        return Ok(node);
    }
    let rotated = rotate(node, replacement, config)?;
    rescope(rotated, config)
}

fn rotates<T, C>(node: &ItiNode<T, C>, replacement: &Test) -> bool {
    matches!(node, ItiNode::Decision(d) if rotates_decision(d, replacement))
}

fn rotates_decision<T, C>(decision: &ItiDecision<T, C>, replacement: &Test) -> bool {
    &decision.test != replacement && decision.branch_label.implies(replacement).is_none()
}

fn rotate<T, M, S>(
    node: ItiNode<T, M::Class>,
    replacement: &Test,
    config: &ItiConfig<M, S>,
) -> Result<ItiNode<T, M::Class>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
{
    let decision = match node {
        ItiNode::Decision(d) if rotates_decision(&d, replacement) => d,
        other => return Ok(other),
    };
    let ItiDecision {
        branch_label,
        candidates,
        test: root,
        pass,
        fail,
        ..
    } = decision;
    let pass_side = classify(*pass, replacement, config)?;
    let fail_side = classify(*fail, replacement, config)?;

    match (pass_side, fail_side) {
        (pass_side @ (Side::Constant(..) | Side::Rooted(_)), fail_side @ (Side::Constant(..) | Side::Rooted(_))) => {
            debug!("transpose {} -> {}: regrouping subtrees", root, replacement);
            let mut when_true = Vec::with_capacity(2);
            let mut when_false = Vec::with_capacity(2);
            // Pass-side parts go in first, so a regrouped decision keeps the old orientation.
            for side in [pass_side, fail_side] {
                match side {
                    Side::Constant(true, n) => when_true.push(n),
                    Side::Constant(false, n) => when_false.push(n),
                    Side::Rooted(d) => {
                        when_true.push(*d.pass);
                        when_false.push(*d.fail);
                    }
                    Side::Open(_) => {
                        return Err(FactreeError::InternalConsistency(
                            "open leaf reached subtree regrouping".to_string(),
                        ))
                    }
                }
            }
            let new_pass = regroup(when_true, &root, replacement, true)?;
            let new_fail = regroup(when_false, &root, replacement, false)?;
            Ok(ItiNode::Decision(ItiDecision {
                branch_label,
                candidates,
                test: replacement.clone(),
                pass: Box::new(new_pass),
                fail: Box::new(new_fail),
                stale: true,
            }))
        }
        (Side::Rooted(d), Side::Open(leaf)) | (Side::Open(leaf), Side::Rooted(d)) => {
            debug!("transpose {} -> {}: absorbing leaf into subtree", root, replacement);
            let examples = leaf.into_examples();
            let classes = classes_of(&examples, &config.model)?;
            let subtree = ItiNode::Decision(d).relabel(Some(&root), None);
            Ok(add_classified(subtree, examples, classes, &config.model))
        }
        (pass_side, fail_side) => {
            debug!("transpose {} -> {}: splitting afresh", root, replacement);
            let mut examples = pass_side.into_node().into_examples();
            examples.extend(fail_side.into_node().into_examples());
            let stats = candidates.get(replacement).cloned().ok_or_else(|| {
                FactreeError::InternalConsistency(format!("no statistics for replacement test {}", replacement))
            })?;
            let classes = classes_of(&examples, &config.model)?;
            let mut pass = (Vec::new(), Vec::new());
            let mut fail = (Vec::new(), Vec::new());
            for (example, class) in examples.into_iter().zip(classes) {
                let side = if config.model.passes(replacement, &example) { &mut pass } else { &mut fail };
                side.0.push(example);
                side.1.push(class);
            }
            let pass_leaf = new_leaf(branch_label.with(replacement.clone(), true), pass.0, &pass.1, stats.pass, config)?;
            let fail_leaf = new_leaf(branch_label.with(replacement.clone(), false), fail.0, &fail.1, stats.fail, config)?;
            Ok(ItiNode::Decision(ItiDecision {
                branch_label,
                candidates,
                test: replacement.clone(),
                pass: Box::new(pass_leaf),
                fail: Box::new(fail_leaf),
                stale: true,
            }))
        }
    }
}

fn classify<T, M, S>(
    child: ItiNode<T, M::Class>,
    replacement: &Test,
    config: &ItiConfig<M, S>,
) -> Result<Side<T, M::Class>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
{
    if let Some(outcome) = child.branch_label().implies(replacement) {
        return Ok(Side::Constant(outcome, child));
    }
    match child {
        ItiNode::Leaf(_) => Ok(Side::Open(child)),
        ItiNode::Decision(_) => match rotate(child, replacement, config)? {
            ItiNode::Decision(d) if &d.test == replacement => Ok(Side::Rooted(d)),
            _ => Err(FactreeError::InternalConsistency(format!(
                "subtree could not be rotated onto {}",
                replacement
            ))),
        },
    }
}

/// Build the subtree for one outcome of the replacement test from the parts
/// that land there: a lone part moves up whole, two parts (pass side first)
/// are rejoined under the old root test.
fn regroup<T, C: Ord + Clone>(
    mut parts: Vec<ItiNode<T, C>>,
    root: &Test,
    replacement: &Test,
    outcome: bool,
) -> Result<ItiNode<T, C>, FactreeError> {
    match parts.len() {
        1 => {
            let part = parts.remove(0);
            Ok(part.relabel(Some(root), Some((replacement, outcome))))
        }
        2 => {
            let fail = parts.remove(1);
            let pass = parts.remove(0);
            let pass = pass.relabel(None, Some((replacement, outcome)));
            let fail = fail.relabel(None, Some((replacement, outcome)));
            let branch_label = pass.branch_label().without(root);
            Ok(ItiNode::Decision(ItiDecision {
                branch_label,
                // Filled in by `rescope`.
                candidates: CandidateStats::new(),
                test: root.clone(),
                pass: Box::new(pass),
                fail: Box::new(fail),
                stale: true,
            }))
        }
        n => Err(FactreeError::InternalConsistency(format!(
            "{} subtrees for {}={} while transposing {}",
            n, replacement, outcome, root
        ))),
    }
}

/// Bring every node's statistics in line with its label after rotation.
///
/// Leaves keep the statistics of tests that are still open and compute the
/// newly opened ones from their examples. Decisions sum their children's
/// statistics where both children have them and count the examples below
/// for the rest.
fn rescope<T, M, S>(node: ItiNode<T, M::Class>, config: &ItiConfig<M, S>) -> Result<ItiNode<T, M::Class>, FactreeError>
where
    M: ExampleModel<T>,
{
    let model = &config.model;
    match node {
        ItiNode::Leaf(mut leaf) => {
            let open: BTreeSet<Test> = open_tests(&config.vocab, &leaf.branch_label).collect();
            leaf.candidates.retain(|test, _| open.contains(test));
            let missing: Vec<Test> = open.into_iter().filter(|t| !leaf.candidates.contains_key(t)).collect();
            if !missing.is_empty() {
                let classes = classes_of(&leaf.examples, model)?;
                let fresh = create_stats(missing.into_iter(), &leaf.examples, &classes, model);
                leaf.candidates.extend(fresh);
            }
            leaf.stale = true;
            Ok(ItiNode::Leaf(leaf))
        }
        ItiNode::Decision(d) => {
            let pass = rescope(*d.pass, config)?;
            let fail = rescope(*d.fail, config)?;
            let mut candidates = CandidateStats::new();
            let mut missing = CandidateStats::new();
            for test in open_tests(&config.vocab, &d.branch_label) {
                match (pass.candidates().get(&test), fail.candidates().get(&test)) {
                    (Some(p), Some(f)) => {
                        let mut stats = p.clone();
                        stats.merge(f);
                        candidates.insert(test, stats);
                    }
                    _ => {
                        missing.insert(test, TestStats::new());
                    }
                }
            }
            if !missing.is_empty() {
                for example in pass.all_examples().into_iter().chain(fail.all_examples()) {
                    let class = model.class_of(example)?;
                    for (test, stats) in missing.iter_mut() {
                        stats.record(model.passes(test, example), class.clone());
                    }
                }
                candidates.extend(missing);
            }
            Ok(ItiNode::Decision(ItiDecision {
                branch_label: d.branch_label,
                candidates,
                test: d.test,
                pass: Box::new(pass),
                fail: Box::new(fail),
                stale: true,
            }))
        }
    }
}
