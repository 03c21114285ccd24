//! An owning handle around an induction tree.
use crate::data::{BranchLabel, Vocabulary};
use crate::errors::FactreeError;
use crate::iti::config::ItiConfig;
use crate::iti::convert::to_decision_tree;
use crate::iti::models::ExampleModel;
use crate::iti::node::{CandidateStats, ItiLeaf, ItiNode};
use crate::iti::update::{empty_tree, ensure_best_test, holds_example, incremental_update, remove_example};
use crate::iti::vocab::revise_vocab;
use crate::score::{ClassCounts, SplitScorer};
use crate::tree::DecisionTree;
use log::warn;

/// Owns an induction tree and its configuration.
///
/// Inputs are checked before the root is handed to an operation, so a call
/// rejected for bad input (an unclassifiable example, an example that is
/// not in the tree) leaves the tree as it was. Any failure after that
/// point means the tree was lost half way: it is poisoned and every
/// further call returns `InternalConsistency`.
#[derive(Debug, Clone)]
pub struct ItiTree<T, M: ExampleModel<T>, S> {
    root: ItiNode<T, M::Class>,
    config: ItiConfig<M, S>,
    poisoned: Option<String>,
}

/// Stands in for the root while an operation owns it.
fn vacant<T, C>() -> ItiNode<T, C> {
    ItiNode::Leaf(ItiLeaf {
        branch_label: BranchLabel::new(),
        candidates: CandidateStats::new(),
        examples: Vec::new(),
        counts: ClassCounts::new(),
        stale: true,
    })
}

impl<T, M, S> ItiTree<T, M, S>
where
    T: Clone + PartialEq,
    M: ExampleModel<T>,
    S: SplitScorer<M::Class>,
{
    pub fn new(config: ItiConfig<M, S>) -> Result<Self, FactreeError> {
        let root = empty_tree(&config)?;
        Ok(ItiTree {
            root,
            config,
            poisoned: None,
        })
    }

    pub fn root(&self) -> &ItiNode<T, M::Class> {
        &self.root
    }

    pub fn config(&self) -> &ItiConfig<M, S> {
        &self.config
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    fn check_poisoned(&self) -> Result<(), FactreeError> {
        match &self.poisoned {
            Some(reason) => Err(FactreeError::InternalConsistency(format!("tree is poisoned: {}", reason))),
            None => Ok(()),
        }
    }

    fn apply<F>(&mut self, op: F) -> Result<(), FactreeError>
    where
        F: FnOnce(ItiNode<T, M::Class>, &ItiConfig<M, S>) -> Result<ItiNode<T, M::Class>, FactreeError>,
    {
        self.check_poisoned()?;
        let root = std::mem::replace(&mut self.root, vacant());
        match op(root, &self.config) {
            Ok(root) => {
                self.root = root;
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("induction tree poisoned: {}", reason);
                self.poisoned = Some(reason);
                Err(e)
            }
        }
    }

    /// Absorb new examples and restructure.
    pub fn update(&mut self, examples: Vec<T>) -> Result<(), FactreeError> {
        self.check_poisoned()?;
        for example in examples.iter() {
            self.config.model.class_of(example)?;
        }
        self.apply(|root, config| incremental_update(root, examples, config))
    }

    /// Forget one example. The tree is not restructured until the next
    /// `update`.
    pub fn remove_example(&mut self, example: &T) -> Result<(), FactreeError> {
        self.check_poisoned()?;
        if !holds_example(&self.root, example, &self.config.model) {
            return Err(FactreeError::ExampleNotFound);
        }
        self.config.model.class_of(example)?;
        self.apply(|root, config| remove_example(root, example, config))
    }

    /// Switch to a new vocabulary and restructure around it, as one step.
    pub fn change_allowed_vocab(&mut self, vocab: Vocabulary) -> Result<(), FactreeError> {
        self.check_poisoned()?;
        if vocab == self.config.vocab {
            return Ok(());
        }
        let old_vocab = std::mem::replace(&mut self.config.vocab, vocab);
        self.apply(|root, config| {
            let root = revise_vocab(root, &config.model, &old_vocab, &config.vocab)?;
            ensure_best_test(root, config)
        })
    }

    pub fn to_decision_tree<V, F>(&self, leaf_fn: &F) -> Result<DecisionTree<V>, FactreeError>
    where
        F: Fn(&ItiLeaf<T, M::Class>) -> V,
    {
        self.check_poisoned()?;
        Ok(to_decision_tree(&self.root, leaf_fn))
    }
}
