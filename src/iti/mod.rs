//! Incremental tree induction.
//!
//! Trees are grown from a stream of examples and kept in the shape a batch
//! learner would produce: every node tracks class statistics for the
//! candidate tests its branch label leaves open, a node whose test is
//! overtaken by a better one is transposed in place rather than rebuilt,
//! and a split that stops paying for itself is folded back into a leaf.
pub mod config;
pub mod convert;
pub mod models;
pub mod node;
pub mod transpose;
pub mod tree;
pub mod update;
pub mod vocab;

pub use config::{ItiConfig, ItiSettings};
pub use convert::{probability_tree, reward_tree, to_decision_tree};
pub use models::{ExampleModel, Reward, RewardModel, SequentialTrial, TransitionModel, Trial};
pub use node::{CandidateStats, ItiDecision, ItiLeaf, ItiNode, TestStats};
pub use transpose::transpose;
pub use tree::ItiTree;
pub use update::{add_examples, empty_tree, ensure_best_test, incremental_update, remove_example};
pub use vocab::change_allowed_vocab;
