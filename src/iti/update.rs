//! Growing, restructuring and shrinking induction trees.
//!
//! Every operation consumes the old node and hands back its replacement.
//! On error the consumed tree is gone. `ItiTree` checks its inputs first so
//! that bad input never gets that far.
use crate::constants::UNSCOREABLE;
use crate::data::{BranchLabel, Test, Vocabulary};
use crate::errors::FactreeError;
use crate::iti::config::ItiConfig;
use crate::iti::models::ExampleModel;
use crate::iti::node::{CandidateStats, ItiDecision, ItiLeaf, ItiNode, TestStats};
use crate::iti::transpose::transpose;
use crate::score::{decrement, increment, ClassCounts, SplitScorer};
use log::debug;

type Node<T, M> = ItiNode<T, <M as ExampleModel<T>>::Class>;

/// Candidate statistics for `tests` over a set of classified examples.
pub(crate) fn create_stats<T, M>(
    tests: impl Iterator<Item = Test>,
    examples: &[T],
    classes: &[M::Class],
    model: &M,
) -> CandidateStats<M::Class>
where
    M: ExampleModel<T>,
{
    tests
        .map(|test| {
            let mut stats = TestStats::new();
            for (example, class) in examples.iter().zip(classes) {
                stats.record(model.passes(&test, example), class.clone());
            }
            (test, stats)
        })
        .collect()
}

/// Tests from `vocab` that `label` leaves undecided.
pub(crate) fn open_tests<'a>(vocab: &'a Vocabulary, label: &'a BranchLabel) -> impl Iterator<Item = Test> + 'a {
    vocab.tests().filter(move |test| label.implies(test).is_none())
}

pub(crate) fn classes_of<T, M>(examples: &[T], model: &M) -> Result<Vec<M::Class>, FactreeError>
where
    M: ExampleModel<T>,
{
    examples.iter().map(|e| model.class_of(e)).collect()
}

pub(crate) fn class_counts<C: Ord + Clone>(classes: &[C]) -> ClassCounts<C> {
    let mut counts = ClassCounts::new();
    for class in classes {
        increment(&mut counts, class.clone());
    }
    counts
}

fn check_sync<T, C: Ord + Clone>(node: &ItiNode<T, C>, context: &str) -> Result<(), FactreeError> {
    if node.counts_in_sync() {
        Ok(())
    } else {
        Err(FactreeError::InternalConsistency(format!(
            "counts and examples out of sync {}",
            context
        )))
    }
}

/// A single stale leaf with no examples, already resolved by `ensure_best_test`.
pub fn empty_tree<T, M, S>(config: &ItiConfig<M, S>) -> Result<Node<T, M>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
    S: SplitScorer<M::Class>,
{
    let no_examples: &[T] = &[];
    let leaf = ItiNode::Leaf(ItiLeaf {
        branch_label: BranchLabel::new(),
        candidates: create_stats(config.vocab.tests(), no_examples, &[], &config.model),
        examples: Vec::new(),
        counts: ClassCounts::new(),
        stale: true,
    });
    ensure_best_test(leaf, config)
}

/// Absorb a batch of examples and restructure the tree around them.
///
/// Counts are checked before and after; a mismatch is an
/// `InternalConsistency` error and the tree must be discarded.
pub fn incremental_update<T, M, S>(
    node: Node<T, M>,
    examples: Vec<T>,
    config: &ItiConfig<M, S>,
) -> Result<Node<T, M>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
    S: SplitScorer<M::Class>,
{
    check_sync(&node, "before update")?;
    let node = add_examples(node, examples, config)?;
    check_sync(&node, "after adding examples")?;
    let node = ensure_best_test(node, config)?;
    check_sync(&node, "after restructuring")?;
    Ok(node)
}

/// Route examples to the leaves they belong to, updating the candidate
/// statistics of every node on the way and marking those nodes stale.
/// An empty batch leaves the tree untouched.
pub fn add_examples<T, M, S>(node: Node<T, M>, examples: Vec<T>, config: &ItiConfig<M, S>) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    if examples.is_empty() {
        return Ok(node);
    }
    let classes = classes_of(&examples, &config.model)?;
    Ok(add_classified(node, examples, classes, &config.model))
}

pub(crate) fn add_classified<T, M>(node: Node<T, M>, examples: Vec<T>, classes: Vec<M::Class>, model: &M) -> Node<T, M>
where
    M: ExampleModel<T>,
{
    if examples.is_empty() {
        return node;
    }
    match node {
        ItiNode::Leaf(mut leaf) => {
            for (test, stats) in leaf.candidates.iter_mut() {
                for (example, class) in examples.iter().zip(classes.iter()) {
                    stats.record(model.passes(test, example), class.clone());
                }
            }
            for class in classes {
                increment(&mut leaf.counts, class);
            }
            leaf.examples.extend(examples);
            leaf.stale = true;
            ItiNode::Leaf(leaf)
        }
        ItiNode::Decision(mut decision) => {
            for (test, stats) in decision.candidates.iter_mut() {
                for (example, class) in examples.iter().zip(classes.iter()) {
                    stats.record(model.passes(test, example), class.clone());
                }
            }
            let mut pass = (Vec::new(), Vec::new());
            let mut fail = (Vec::new(), Vec::new());
            for (example, class) in examples.into_iter().zip(classes) {
                let side = if model.passes(&decision.test, &example) { &mut pass } else { &mut fail };
                side.0.push(example);
                side.1.push(class);
            }
            decision.pass = Box::new(add_classified(*decision.pass, pass.0, pass.1, model));
            decision.fail = Box::new(add_classified(*decision.fail, fail.0, fail.1, model));
            decision.stale = true;
            ItiNode::Decision(decision)
        }
    }
}

/// The best-scoring candidate that the branch label leaves open.
///
/// Ties go to the first candidate in `Test` order; unscoreable candidates
/// are never chosen.
pub(crate) fn best_candidate<'a, C, S>(
    candidates: &'a CandidateStats<C>,
    label: &BranchLabel,
    scorer: &S,
) -> Option<(&'a Test, f64)>
where
    S: SplitScorer<C>,
{
    let mut best: Option<(&Test, f64)> = None;
    for (test, stats) in candidates {
        if label.implies(test).is_some() {
            continue;
        }
        let score = scorer.split_score(&stats.pass, &stats.fail);
        if !score.is_finite() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((test, score)),
        }
    }
    best
}

/// Make sure every stale node splits on its best test.
///
/// A node is judged on its examples alone. When its best candidate beats
/// the node's score as a single leaf by more than the split margin it must
/// be a decision: a leaf is split, and a decision whose test is beaten by
/// more than the margin (or tied by an earlier test) is transposed.
/// Otherwise it must be a leaf, and a decision collapses into one. The
/// children are resolved in turn and the node is no longer stale.
pub fn ensure_best_test<T, M, S>(node: Node<T, M>, config: &ItiConfig<M, S>) -> Result<Node<T, M>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
    S: SplitScorer<M::Class>,
{
    if !node.is_stale() {
        return Ok(node);
    }
    match node {
        ItiNode::Leaf(leaf) => {
            let best = best_candidate(&leaf.candidates, &leaf.branch_label, &config.scorer)
                .map(|(test, score)| (test.clone(), score));
            let leaf_score = config.scorer.leaf_score(&leaf.counts);
            match best {
                Some((test, score)) if score - leaf_score > config.split_thresh => split_leaf(leaf, test, config),
                _ => Ok(ItiNode::Leaf(ItiLeaf { stale: false, ..leaf })),
            }
        }
        ItiNode::Decision(decision) => {
            let best = best_candidate(&decision.candidates, &decision.branch_label, &config.scorer)
                .map(|(test, score)| (test.clone(), score));
            let leaf_score = config.scorer.leaf_score(&decision.class_totals());
            let (test, score) = match best {
                Some((test, score)) if score - leaf_score > config.split_thresh => (test, score),
                _ => return collapse(decision, &config.model),
            };
            let current_score = decision
                .candidates
                .get(&decision.test)
                .map(|s| config.scorer.split_score(&s.pass, &s.fail))
                .unwrap_or(UNSCOREABLE);
            let gain = score - current_score;
            let replace = test != decision.test
                && (gain > config.split_thresh || (gain == config.split_thresh && test < decision.test));
            let revised = if replace {
                debug!("transposing {} to {} under {}", decision.test, test, decision.branch_label);
                transpose(ItiNode::Decision(decision), &test, config)?
            } else {
                ItiNode::Decision(decision)
            };
            match revised {
                ItiNode::Decision(mut d) => {
                    d.pass = Box::new(ensure_best_test(*d.pass, config)?);
                    d.fail = Box::new(ensure_best_test(*d.fail, config)?);
                    d.stale = false;
                    Ok(ItiNode::Decision(d))
                }
                ItiNode::Leaf(_) => Err(FactreeError::InternalConsistency(
                    "transposition turned a decision into a leaf".to_string(),
                )),
            }
        }
    }
}

/// Fold a decision that no longer pays for itself back into a leaf.
fn collapse<T, M>(decision: ItiDecision<T, M::Class>, model: &M) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    let ItiDecision {
        branch_label,
        candidates,
        test,
        pass,
        fail,
        ..
    } = decision;
    debug!("collapsing decision on {} under {}", test, branch_label);
    let mut examples = pass.into_examples();
    examples.extend(fail.into_examples());
    let classes = classes_of(&examples, model)?;
    Ok(ItiNode::Leaf(ItiLeaf {
        branch_label,
        candidates,
        counts: class_counts(&classes),
        examples,
        stale: false,
    }))
}

fn split_leaf<T, M, S>(leaf: ItiLeaf<T, M::Class>, test: Test, config: &ItiConfig<M, S>) -> Result<Node<T, M>, FactreeError>
where
    T: Clone,
    M: ExampleModel<T>,
    S: SplitScorer<M::Class>,
{
    let ItiLeaf {
        branch_label,
        candidates,
        examples,
        ..
    } = leaf;
    let stats = candidates
        .get(&test)
        .cloned()
        .ok_or_else(|| FactreeError::InternalConsistency(format!("no statistics for chosen test {}", test)))?;
    let classes = classes_of(&examples, &config.model)?;
    debug!("splitting leaf {} on {} ({} examples)", branch_label, test, examples.len());

    let mut pass = (Vec::new(), Vec::new());
    let mut fail = (Vec::new(), Vec::new());
    for (example, class) in examples.into_iter().zip(classes) {
        let side = if config.model.passes(&test, &example) { &mut pass } else { &mut fail };
        side.0.push(example);
        side.1.push(class);
    }
    let pass_leaf = new_leaf(branch_label.with(test.clone(), true), pass.0, &pass.1, stats.pass, config)?;
    let fail_leaf = new_leaf(branch_label.with(test.clone(), false), fail.0, &fail.1, stats.fail, config)?;

    Ok(ItiNode::Decision(ItiDecision {
        branch_label,
        candidates,
        test,
        pass: Box::new(ensure_best_test(pass_leaf, config)?),
        fail: Box::new(ensure_best_test(fail_leaf, config)?),
        stale: false,
    }))
}

/// A fresh stale leaf. `counts` come from the parent's statistics and must
/// agree with the examples actually routed here.
pub(crate) fn new_leaf<T, M, S>(
    branch_label: BranchLabel,
    examples: Vec<T>,
    classes: &[M::Class],
    counts: ClassCounts<M::Class>,
    config: &ItiConfig<M, S>,
) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    if counts != class_counts(classes) {
        return Err(FactreeError::InternalConsistency(format!(
            "parent statistics disagree with the {} examples routed to {}",
            examples.len(),
            branch_label
        )));
    }
    let candidates = create_stats(open_tests(&config.vocab, &branch_label), &examples, classes, &config.model);
    Ok(ItiNode::Leaf(ItiLeaf {
        branch_label,
        candidates,
        examples,
        counts,
        stale: true,
    }))
}

/// Remove one occurrence of `example` from the tree.
///
/// Statistics along its path and at its leaf are decremented and the path
/// is marked stale, but nothing is restructured: the next
/// `ensure_best_test` (or `incremental_update`) revisits the path.
pub fn remove_example<T, M, S>(node: Node<T, M>, example: &T, config: &ItiConfig<M, S>) -> Result<Node<T, M>, FactreeError>
where
    T: PartialEq,
    M: ExampleModel<T>,
{
    if !holds_example(&node, example, &config.model) {
        return Err(FactreeError::ExampleNotFound);
    }
    let class = config.model.class_of(example)?;
    remove_classified(node, example, &class, &config.model)
}

pub(crate) fn holds_example<T: PartialEq, M: ExampleModel<T>>(node: &Node<T, M>, example: &T, model: &M) -> bool {
    let mut node = node;
    loop {
        match node {
            ItiNode::Leaf(l) => return l.examples.contains(example),
            ItiNode::Decision(d) => node = if model.passes(&d.test, example) { &*d.pass } else { &*d.fail },
        }
    }
}

fn forget_in<T, M: ExampleModel<T>>(
    candidates: &mut CandidateStats<M::Class>,
    example: &T,
    class: &M::Class,
    model: &M,
) -> Result<(), FactreeError> {
    for (test, stats) in candidates.iter_mut() {
        if !stats.forget(model.passes(test, example), class) {
            return Err(FactreeError::InternalConsistency(format!(
                "removing {:?} from {} left a negative count",
                class, test
            )));
        }
    }
    Ok(())
}

fn remove_classified<T, M>(node: Node<T, M>, example: &T, class: &M::Class, model: &M) -> Result<Node<T, M>, FactreeError>
where
    T: PartialEq,
    M: ExampleModel<T>,
{
    match node {
        ItiNode::Leaf(mut leaf) => {
            forget_in(&mut leaf.candidates, example, class, model)?;
            let position = leaf
                .examples
                .iter()
                .position(|e| e == example)
                .ok_or(FactreeError::ExampleNotFound)?;
            leaf.examples.remove(position);
            if !decrement(&mut leaf.counts, class) {
                return Err(FactreeError::InternalConsistency(format!(
                    "leaf {} holds no example of class {:?}",
                    leaf.branch_label, class
                )));
            }
            leaf.stale = true;
            Ok(ItiNode::Leaf(leaf))
        }
        ItiNode::Decision(mut decision) => {
            forget_in(&mut decision.candidates, example, class, model)?;
            if model.passes(&decision.test, example) {
                decision.pass = Box::new(remove_classified(*decision.pass, example, class, model)?);
            } else {
                decision.fail = Box::new(remove_classified(*decision.fail, example, class, model)?);
            }
            decision.stale = true;
            Ok(ItiNode::Decision(decision))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Assignment, Variable, Vocabulary};
    use crate::iti::convert::reward_tree;
    use crate::iti::models::{RewardModel, Trial};
    use crate::score::{total, EntropyScorer};
    use crate::tree::DecisionTree;
    use crate::utils::double_equality;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn a() -> Variable {
        Variable::binary("A")
    }

    fn b() -> Variable {
        Variable::binary("B")
    }

    fn config() -> ItiConfig<RewardModel, EntropyScorer> {
        ItiConfig::reward(Vocabulary::new([a(), b()]))
    }

    fn trial(b_value: usize, reward: f64) -> Trial {
        Trial::new(Assignment::from_pairs([(a(), 1), (b(), b_value)]), reward)
    }

    fn scenario() -> Vec<Trial> {
        vec![trial(0, 10.0), trial(0, 10.0), trial(1, 20.0), trial(1, 20.0)]
    }

    fn eq(x: &f64, y: &f64) -> bool {
        double_equality(*x, *y)
    }

    #[test]
    fn test_empty_tree_is_a_fresh_leaf() {
        let tree = empty_tree(&config()).unwrap();
        match &tree {
            ItiNode::Leaf(l) => {
                assert!(!l.stale);
                assert!(l.examples.is_empty());
                assert_eq!(l.candidates.len(), 4);
            }
            ItiNode::Decision(_) => panic!("empty tree should be a leaf"),
        }
    }

    #[test]
    fn test_scenario_splits_on_b() {
        let cfg = config();
        let tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        let b0 = Test::new(b(), 0);
        assert_eq!(tree.current_test(), Some(&b0));
        let expected = DecisionTree::decision(b0, DecisionTree::leaf(10.0), DecisionTree::leaf(20.0));
        assert!(reward_tree(&tree).equals(&expected, &eq));
        assert!(!reward_tree(&tree).variables().contains(&a()));
    }

    #[test]
    fn test_update_with_nothing_is_identity() {
        let cfg = config();
        let tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        let again = incremental_update(tree.clone(), Vec::new(), &cfg).unwrap();
        assert_eq!(again, tree);
    }

    #[test]
    fn test_one_at_a_time_matches_batch() {
        let cfg = config();
        let batch = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        let mut single = empty_tree(&cfg).unwrap();
        for t in scenario() {
            single = incremental_update(single, vec![t], &cfg).unwrap();
        }
        assert!(reward_tree(&single).equals(&reward_tree(&batch), &eq));
    }

    fn c() -> Variable {
        Variable::new("C", 3)
    }

    fn d() -> Variable {
        Variable::binary("D")
    }

    fn wide_config() -> ItiConfig<RewardModel, EntropyScorer> {
        ItiConfig::reward(Vocabulary::new([a(), c(), d()]))
    }

    /// Rewards driven by A, C and D with some noise, drawn from few enough
    /// values that score ties are common.
    fn random_trials(rng: &mut StdRng, n: usize) -> Vec<Trial> {
        (0..n)
            .map(|_| {
                let (av, cv, dv) = (rng.gen_range(0..2), rng.gen_range(0..3), rng.gen_range(0..2));
                let reward = if rng.gen_bool(0.25) {
                    rng.gen_range(0..3) as f64
                } else {
                    match (av, cv, dv) {
                        (0, 2, _) => 1.0,
                        (1, _, 0) => 2.0,
                        _ => 0.0,
                    }
                };
                Trial::new(Assignment::from_pairs([(a(), av), (c(), cv), (d(), dv)]), reward)
            })
            .collect()
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let cfg = wide_config();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials = random_trials(&mut rng, 30);
            let batch = incremental_update(empty_tree(&cfg).unwrap(), trials.clone(), &cfg).unwrap();

            let mut single = empty_tree(&cfg).unwrap();
            for t in trials.iter() {
                single = incremental_update(single, vec![t.clone()], &cfg).unwrap();
            }
            assert!(
                reward_tree(&single).equals(&reward_tree(&batch), &eq),
                "seed {}: one at a time\n{}\nbatch\n{}",
                seed,
                reward_tree(&single),
                reward_tree(&batch)
            );

            let mut shuffled = trials.clone();
            shuffled.shuffle(&mut rng);
            let mut chunked = empty_tree(&cfg).unwrap();
            while !shuffled.is_empty() {
                let n = rng.gen_range(1..6).min(shuffled.len());
                let chunk: Vec<Trial> = shuffled.drain(..n).collect();
                chunked = incremental_update(chunked, chunk, &cfg).unwrap();
            }
            assert!(reward_tree(&chunked).equals(&reward_tree(&batch), &eq), "seed {}: shuffled chunks", seed);
        }
    }

    #[test]
    fn test_counts_conserved_through_adds_and_removals() {
        let cfg = wide_config();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut tree = empty_tree(&cfg).unwrap();
            let mut held: Vec<Trial> = Vec::new();
            let (mut added, mut removed) = (0, 0);
            for _ in 0..12 {
                let n = rng.gen_range(0..6);
                let batch = random_trials(&mut rng, n);
                added += batch.len();
                held.extend(batch.iter().cloned());
                tree = incremental_update(tree, batch, &cfg).unwrap();

                let n_remove = rng.gen_range(0..3).min(held.len());
                for _ in 0..n_remove {
                    let victim = held.swap_remove(rng.gen_range(0..held.len()));
                    tree = remove_example(tree, &victim, &cfg).unwrap();
                    removed += 1;
                }
                assert!(tree.counts_in_sync(), "seed {}", seed);
                assert_eq!(tree.n_examples(), added - removed);
                let leaf_total: usize = tree.collect_leaves().iter().map(|l| total(&l.counts)).sum();
                assert_eq!(leaf_total, added - removed);
            }
            // Once resolved, the history of removals leaves no trace.
            let tree = incremental_update(tree, Vec::new(), &cfg).unwrap();
            let fresh = incremental_update(empty_tree(&cfg).unwrap(), held, &cfg).unwrap();
            assert!(reward_tree(&tree).equals(&reward_tree(&fresh), &eq), "seed {}", seed);
        }
    }

    #[test]
    fn test_decision_without_gain_collapses() {
        let cfg = config();
        let mut tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        assert!(!tree.is_leaf());
        for t in [trial(1, 20.0), trial(1, 20.0)] {
            tree = remove_example(tree, &t, &cfg).unwrap();
        }
        // The B split is kept until the tree is resolved again.
        assert!(!tree.is_leaf());
        let tree = ensure_best_test(tree, &cfg).unwrap();
        assert!(tree.is_leaf());
        assert!(!tree.is_stale());
        assert!(tree.counts_in_sync());
        assert_eq!(tree.candidates().len(), 4);
    }

    #[test]
    fn test_no_split_without_signal() {
        let cfg = config();
        let trials = vec![trial(0, 5.0), trial(1, 5.0), trial(0, 5.0)];
        let tree = incremental_update(empty_tree(&cfg).unwrap(), trials, &cfg).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.n_examples(), 3);
    }

    #[test]
    fn test_missing_variable_fails_test() {
        let cfg = config();
        let trials = vec![
            Trial::new(Assignment::from_pairs([(b(), 0)]), 1.0),
            Trial::new(Assignment::from_pairs([(b(), 1)]), 2.0),
        ];
        let tree = incremental_update(empty_tree(&cfg).unwrap(), trials, &cfg).unwrap();
        // A is never assigned, so every trial fails A=0 and A=1 alike.
        let stats = &tree.candidates()[&Test::new(a(), 0)];
        assert!(stats.pass.is_empty());
        assert_eq!(stats.n_examples(), 2);
    }

    #[test]
    fn test_remove_example() {
        let cfg = config();
        let tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        let tree = remove_example(tree, &trial(1, 20.0), &cfg).unwrap();
        assert!(tree.counts_in_sync());
        assert_eq!(tree.n_examples(), 3);
        assert!(tree.is_stale());
        assert_eq!(tree.current_test(), Some(&Test::new(b(), 0)));

        let missing = remove_example(tree, &trial(1, 99.0), &cfg);
        assert_eq!(missing, Err(FactreeError::ExampleNotFound));
    }

    #[test]
    fn test_remove_then_update_restructures() {
        let cfg = config();
        let mut tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        tree = remove_example(tree, &trial(1, 20.0), &cfg).unwrap();
        tree = remove_example(tree, &trial(1, 20.0), &cfg).unwrap();
        let tree = incremental_update(tree, Vec::new(), &cfg).unwrap();
        assert!(!tree.is_stale());
        assert_eq!(tree.n_examples(), 2);
        // Only B=0 trials remain, nothing left to separate.
        assert!(tree.is_leaf());
    }

    #[test]
    fn test_best_candidate_skips_implied_and_breaks_ties_in_order() {
        let cfg = config();
        let tree = incremental_update(empty_tree(&cfg).unwrap(), scenario(), &cfg).unwrap();
        let (test, _) = best_candidate(tree.candidates(), tree.branch_label(), &cfg.scorer).unwrap();
        assert_eq!(test, &Test::new(b(), 0));
        let label = BranchLabel::from_pairs([(Test::new(b(), 0), true)]);
        let open = best_candidate(tree.candidates(), &label, &cfg.scorer).map(|(t, _)| t.variable.clone());
        assert_eq!(open, Some(a()));
    }
}
