//! Rotations that change which test a tree asks first without changing
//! the function it represents.
use crate::data::{BranchLabel, Test};
use crate::errors::FactreeError;
use crate::simplify::restrict;
use crate::tree::DecisionTree;
use log::trace;

/// Rotate `tree` so that `replacement` becomes its root test.
///
/// The new pass child is the old tree as seen when `replacement` holds, the
/// fail child the old tree when it doesn't. When neither child of the old
/// root tests `replacement`, both new children are copies of the old root.
/// Leaves, and trees already rooted on `replacement`, come back unchanged.
pub fn transpose<T: Clone>(tree: &DecisionTree<T>, replacement: &Test) -> DecisionTree<T> {
    match tree {
        DecisionTree::Leaf(_) => tree.clone(),
        DecisionTree::Decision { test, .. } if test == replacement => tree.clone(),
        DecisionTree::Decision { .. } => DecisionTree::decision(
            replacement.clone(),
            restrict(tree, &BranchLabel::from_pairs([(replacement.clone(), true)])),
            restrict(tree, &BranchLabel::from_pairs([(replacement.clone(), false)])),
        ),
    }
}

/// Rearrange `tree` so every root-to-leaf path asks its tests in the order
/// given by `order`, transposing the earliest test each subtree uses to its
/// root. Redundant decisions are dropped along the way; decisions with equal
/// children are kept so the result still lines up with `ordered_merge`.
///
/// Fails with `UnorderedTest` if the tree uses a test `order` doesn't list.
pub fn set_order<T: Clone>(tree: &DecisionTree<T>, order: &[Test]) -> Result<DecisionTree<T>, FactreeError> {
    let mut label = BranchLabel::new();
    let reordered = reorder(restrict(tree, &label), order, &mut label)?;
    trace!("set_order: {} nodes -> {} nodes", tree.n_nodes(), reordered.n_nodes());
    Ok(reordered)
}

fn reorder<T: Clone>(tree: DecisionTree<T>, order: &[Test], label: &mut BranchLabel) -> Result<DecisionTree<T>, FactreeError> {
    if tree.is_leaf() {
        return Ok(tree);
    }
    let used = tree.tests();
    let idx = match order.iter().position(|t| used.contains(t)) {
        Some(idx) => idx,
        None => {
            let missing = used.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
            return Err(FactreeError::UnorderedTest(missing));
        }
    };
    let split = &order[idx];
    let rest = &order[idx + 1..];

    label.insert(split.clone(), true);
    let pass = reorder(restrict(&tree, label), rest, label);
    label.insert(split.clone(), false);
    let fail = reorder(restrict(&tree, label), rest, label);
    label.remove(split);
    Ok(DecisionTree::decision(split.clone(), pass?, fail?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Assignment, Variable};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn a0() -> Test {
        Test::new(Variable::binary("A"), 0)
    }

    fn b0() -> Test {
        Test::new(Variable::binary("B"), 0)
    }

    fn leaf(v: i32) -> DecisionTree<i32> {
        DecisionTree::leaf(v)
    }

    #[test]
    fn test_transpose_same_test() {
        let t = DecisionTree::decision(a0(), leaf(1), leaf(2));
        assert_eq!(transpose(&t, &a0()), t);
        assert_eq!(transpose(&leaf(3), &a0()), leaf(3));
    }

    #[test]
    fn test_transpose_two_leaves() {
        let t = DecisionTree::decision(a0(), leaf(1), leaf(2));
        let expected = DecisionTree::decision(b0(), t.clone(), t.clone());
        assert_eq!(transpose(&t, &b0()), expected);
    }

    #[test]
    fn test_transpose_decision_and_leaf() {
        let t = DecisionTree::decision(a0(), DecisionTree::decision(b0(), leaf(1), leaf(2)), leaf(3));
        let expected = DecisionTree::decision(
            b0(),
            DecisionTree::decision(a0(), leaf(1), leaf(3)),
            DecisionTree::decision(a0(), leaf(2), leaf(3)),
        );
        assert_eq!(transpose(&t, &b0()), expected);

        let mirrored = DecisionTree::decision(a0(), leaf(3), DecisionTree::decision(b0(), leaf(1), leaf(2)));
        let expected = DecisionTree::decision(
            b0(),
            DecisionTree::decision(a0(), leaf(3), leaf(1)),
            DecisionTree::decision(a0(), leaf(3), leaf(2)),
        );
        assert_eq!(transpose(&mirrored, &b0()), expected);
    }

    #[test]
    fn test_transpose_both_decisions_swaps_grandchildren() {
        let t = DecisionTree::decision(
            a0(),
            DecisionTree::decision(b0(), leaf(1), leaf(2)),
            DecisionTree::decision(b0(), leaf(3), leaf(4)),
        );
        let expected = DecisionTree::decision(
            b0(),
            DecisionTree::decision(a0(), leaf(1), leaf(3)),
            DecisionTree::decision(a0(), leaf(2), leaf(4)),
        );
        assert_eq!(transpose(&t, &b0()), expected);
    }

    fn random_tree(rng: &mut StdRng, variables: &[Variable], depth: usize) -> DecisionTree<i32> {
        if depth == 0 || rng.gen_bool(0.2) {
            return leaf(rng.gen_range(0..5));
        }
        let variable = &variables[rng.gen_range(0..variables.len())];
        let test = Test::new(variable.clone(), rng.gen_range(0..variable.domain_size));
        DecisionTree::decision(
            test,
            random_tree(rng, variables, depth - 1),
            random_tree(rng, variables, depth - 1),
        )
    }

    fn paths_follow_order(tree: &DecisionTree<i32>, order: &[Test], min: usize) -> bool {
        match tree {
            DecisionTree::Leaf(_) => true,
            DecisionTree::Decision { test, pass, fail } => match order.iter().position(|t| t == test) {
                Some(idx) if idx >= min => {
                    paths_follow_order(pass, order, idx + 1) && paths_follow_order(fail, order, idx + 1)
                }
                _ => false,
            },
        }
    }

    #[test]
    fn test_transpose_and_set_order_preserve_function() {
        let variables = vec![Variable::binary("A"), Variable::new("B", 3), Variable::binary("C")];
        let all = Assignment::enumerate(&variables);
        let mut order: Vec<Test> = variables.iter().flat_map(|v| v.tests()).collect();
        order.reverse();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..40 {
            let t = random_tree(&mut rng, &variables, 5);
            let rep = order[rng.gen_range(0..order.len())].clone();
            let transposed = transpose(&t, &rep);
            let ordered = set_order(&t, &order).unwrap();
            assert!(paths_follow_order(&ordered, &order, 0));
            for a in all.iter() {
                let expected = t.match_leaf(a).unwrap();
                assert_eq!(transposed.match_leaf(a).unwrap(), expected);
                assert_eq!(ordered.match_leaf(a).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_set_order_rejects_unknown_test() {
        let t = DecisionTree::decision(a0(), leaf(1), leaf(2));
        assert!(matches!(set_order(&t, &[b0()]), Err(FactreeError::UnorderedTest(_))));
    }
}
