//! Changing the set of variables an induction tree may test.
use crate::data::Vocabulary;
use crate::errors::FactreeError;
use crate::iti::config::ItiConfig;
use crate::iti::models::ExampleModel;
use crate::iti::node::{merge_candidates, CandidateStats, ItiDecision, ItiLeaf, ItiNode};
use crate::iti::update::{class_counts, classes_of, create_stats, open_tests};
use log::info;

type Node<T, M> = ItiNode<T, <M as ExampleModel<T>>::Class>;

fn retain_vocab<C>(mut candidates: CandidateStats<C>, vocab: &Vocabulary) -> CandidateStats<C> {
    candidates.retain(|test, _| vocab.contains(&test.variable));
    candidates
}

/// Switch the tree from `config.vocab` to `new_vocab`.
///
/// Statistics for dropped variables are discarded and a decision on a
/// dropped variable collapses into a leaf holding all of its examples.
/// Statistics for added variables are computed at the leaves and summed
/// upwards. Every touched node is left stale; run `ensure_best_test` to
/// restructure. The same vocabulary hands the tree back untouched.
pub fn change_allowed_vocab<T, M, S>(
    node: Node<T, M>,
    config: &ItiConfig<M, S>,
    new_vocab: &Vocabulary,
) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    revise_vocab(node, &config.model, &config.vocab, new_vocab)
}

pub(crate) fn revise_vocab<T, M>(
    node: Node<T, M>,
    model: &M,
    old_vocab: &Vocabulary,
    new_vocab: &Vocabulary,
) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    if new_vocab == old_vocab {
        return Ok(node);
    }
    let added = new_vocab.difference(old_vocab);
    info!(
        "changing vocabulary from {} to {} variables ({} added)",
        old_vocab.len(),
        new_vocab.len(),
        added.len()
    );
    revise(node, model, new_vocab, &added)
}

fn revise<T, M>(node: Node<T, M>, model: &M, vocab: &Vocabulary, added: &Vocabulary) -> Result<Node<T, M>, FactreeError>
where
    M: ExampleModel<T>,
{
    match node {
        ItiNode::Leaf(leaf) => {
            let classes = classes_of(&leaf.examples, model)?;
            let mut candidates = retain_vocab(leaf.candidates, vocab);
            candidates.extend(create_stats(
                open_tests(added, &leaf.branch_label),
                &leaf.examples,
                &classes,
                model,
            ));
            Ok(ItiNode::Leaf(ItiLeaf {
                candidates,
                stale: true,
                ..leaf
            }))
        }
        ItiNode::Decision(d) if !vocab.contains(&d.test.variable) => {
            info!("collapsing decision on {} under {}", d.test, d.branch_label);
            let ItiDecision {
                branch_label,
                candidates,
                pass,
                fail,
                ..
            } = d;
            let mut examples = pass.into_examples();
            examples.extend(fail.into_examples());
            let classes = classes_of(&examples, model)?;
            let mut candidates = retain_vocab(candidates, vocab);
            candidates.extend(create_stats(open_tests(added, &branch_label), &examples, &classes, model));
            Ok(ItiNode::Leaf(ItiLeaf {
                branch_label,
                candidates,
                counts: class_counts(&classes),
                examples,
                stale: true,
            }))
        }
        ItiNode::Decision(d) => {
            let pass = revise(*d.pass, model, vocab, added)?;
            let fail = revise(*d.fail, model, vocab, added)?;
            let mut candidates = retain_vocab(d.candidates, vocab);
            let grown = merge_candidates(
                &retain_vocab(pass.candidates().clone(), added),
                &retain_vocab(fail.candidates().clone(), added),
            );
            candidates.extend(grown);
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
