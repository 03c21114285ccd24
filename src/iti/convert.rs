//! Reading plain decision trees off induction trees.
use crate::iti::models::{Reward, SequentialTrial, Trial};
use crate::iti::node::{ItiLeaf, ItiNode};
use crate::score::{total, BdeuScorer};
use crate::tree::DecisionTree;

/// The induction tree's shape with each leaf replaced by `leaf_fn(leaf)`.
pub fn to_decision_tree<T, C, V, F>(node: &ItiNode<T, C>, leaf_fn: &F) -> DecisionTree<V>
where
    F: Fn(&ItiLeaf<T, C>) -> V,
{
    match node {
        ItiNode::Leaf(l) => DecisionTree::leaf(leaf_fn(l)),
        ItiNode::Decision(d) => DecisionTree::decision(
            d.test.clone(),
            to_decision_tree(&d.pass, leaf_fn),
            to_decision_tree(&d.fail, leaf_fn),
        ),
    }
}

/// Mean reward at every leaf, `0.0` where a leaf holds no trials.
pub fn reward_tree(node: &ItiNode<Trial, Reward>) -> DecisionTree<f64> {
    to_decision_tree(node, &|leaf: &ItiLeaf<Trial, Reward>| {
        if leaf.examples.is_empty() {
            0.0
        } else {
            leaf.examples.iter().map(|t| t.reward).sum::<f64>() / leaf.examples.len() as f64
        }
    })
}

/// Posterior-mean distribution over the target's values at every leaf.
///
/// With `n` trials, `n_v` of them reaching value `v`, a pseudo count `α`
/// and domain size `d`, value `v` gets `(n_v + α/d) / (n + α)`. A leaf
/// with nothing to go on gets the uniform distribution.
pub fn probability_tree(node: &ItiNode<SequentialTrial, usize>, scorer: &BdeuScorer) -> DecisionTree<Vec<f64>> {
    let d = scorer.domain_size;
    let alpha = scorer.pseudo_count;
    to_decision_tree(node, &|leaf: &ItiLeaf<SequentialTrial, usize>| {
        let denominator = total(&leaf.counts) as f64 + alpha;
        if d == 0 || denominator.is_nan() || denominator <= 0.0 {
            return vec![1.0 / d.max(1) as f64; d];
        }
        (0..d)
            .map(|v| {
                let n_v = leaf.counts.get(&v).copied().unwrap_or(0) as f64;
                (n_v + alpha / d as f64) / denominator
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Assignment, Variable, Vocabulary};
    use crate::iti::config::{ItiConfig, ItiSettings};
    use crate::iti::update::{empty_tree, incremental_update};
    use crate::utils::double_equality;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_reward_tree_of_empty_tree() {
        let config = ItiConfig::reward(Vocabulary::new([Variable::binary("A")]));
        let tree = reward_tree(&empty_tree(&config).unwrap());
        assert_eq!(tree, DecisionTree::leaf(0.0));
    }

    #[test]
    fn test_reward_tree_leaves_match_history() {
        let a = Variable::new("A", 3);
        let b = Variable::binary("B");
        let config = ItiConfig::reward(Vocabulary::new([a.clone(), b.clone()]));
        let trials: Vec<Trial> = Assignment::enumerate(&[a.clone(), b.clone()])
            .into_iter()
            .map(|s| {
                let reward = match (s.get(&a), s.get(&b)) {
                    (Some(2), _) => 3.0,
                    (_, Some(1)) => 1.0,
                    _ => 0.0,
                };
                Trial::new(s, reward)
            })
            .collect();
        let root = incremental_update(empty_tree(&config).unwrap(), trials.clone(), &config).unwrap();
        let tree = reward_tree(&root);

        let leaves = root.collect_leaves();
        let history = tree.leaves_with_history();
        assert_eq!(leaves.len(), history.len());
        for (label, value) in history {
            let leaf = leaves.iter().find(|l| l.branch_label == label).unwrap();
            let mean = leaf.examples.iter().map(|t| t.reward).sum::<f64>() / leaf.examples.len() as f64;
            assert_relative_eq!(*value, mean);
        }
        for t in trials.iter() {
            assert_relative_eq!(*tree.match_leaf(&t.assignment).unwrap(), t.reward);
        }
    }

    #[test]
    fn test_leaves_reinserted_along_their_labels_rebuild_the_tree() {
        let a = Variable::binary("A");
        let c = Variable::new("C", 3);
        let d = Variable::binary("D");
        let config = ItiConfig::reward(Vocabulary::new([a.clone(), c.clone(), d.clone()]));
        let eq = |x: &f64, y: &f64| double_equality(*x, *y);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trials: Vec<Trial> = (0..30)
                .map(|_| {
                    let (av, cv, dv) = (rng.gen_range(0..2), rng.gen_range(0..3), rng.gen_range(0..2));
                    let reward = if av == 1 && cv != 0 { 5.0 } else { dv as f64 };
                    Trial::new(Assignment::from_pairs([(a.clone(), av), (c.clone(), cv), (d.clone(), dv)]), reward)
                })
                .collect();
            let root = incremental_update(empty_tree(&config).unwrap(), trials, &config).unwrap();
            let held = to_decision_tree(&root, &|l: &ItiLeaf<Trial, Reward>| l.examples.clone());

            let mut rebuilt: DecisionTree<Vec<Trial>> = held.map(|_| Vec::new());
            for (label, examples) in held.leaves_with_history() {
                assert!(examples.iter().all(|t| label.consistent_with(&t.assignment)));
                rebuilt = rebuilt.replace_leaf(&label, examples.clone());
            }
            assert_eq!(rebuilt, held);

            let reinserted = rebuilt.fold(Vec::new(), |mut acc: Vec<Trial>, examples: &Vec<Trial>| {
                acc.extend(examples.iter().cloned());
                acc
            });
            let regrown = incremental_update(empty_tree(&config).unwrap(), reinserted, &config).unwrap();
            assert!(reward_tree(&regrown).equals(&reward_tree(&root), &eq), "seed {}", seed);
        }
    }

    #[test]
    fn test_probability_tree() {
        let x = Variable::new("X", 3);
        let config = ItiConfig::transition(x.clone(), Vocabulary::new([x.clone()]), &ItiSettings::default()).unwrap();
        let steps: Vec<SequentialTrial> = (0..3)
            .map(|v| {
                SequentialTrial::new(
                    Assignment::from_pairs([(x.clone(), v)]),
                    "stay",
                    Assignment::from_pairs([(x.clone(), 0)]),
                    0.0,
                )
            })
            .collect();
        let root = incremental_update(empty_tree(&config).unwrap(), steps, &config).unwrap();
        let tree = probability_tree(&root, &config.scorer);
        let dist = tree.match_leaf(&Assignment::from_pairs([(x.clone(), 1)])).unwrap();
        // Three trials all landing on 0 with alpha = 1 over three values.
        assert_relative_eq!(dist[0], (3.0 + 1.0 / 3.0) / 4.0);
        assert_relative_eq!(dist[1], (1.0 / 3.0) / 4.0);
        assert_relative_eq!(dist.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_probability_tree_uniform_without_evidence() {
        let x = Variable::new("X", 4);
        let config = ItiConfig::transition(x.clone(), Vocabulary::new([x.clone()]), &ItiSettings::default()).unwrap();
        let root = empty_tree(&config).unwrap();
        let tree = probability_tree(&root, &config.scorer);
        assert_eq!(tree, DecisionTree::leaf(vec![0.25; 4]));

        let degenerate = BdeuScorer::new(4, 0.0);
        assert_eq!(probability_tree(&root, &degenerate), DecisionTree::leaf(vec![0.25; 4]));
    }
}
