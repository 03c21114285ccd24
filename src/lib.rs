// Modules
pub mod constants;
pub mod data;
pub mod errors;
pub mod iti;
pub mod merge;
pub mod prune;
pub mod score;
pub mod simplify;
pub mod transpose;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::{Assignment, BranchLabel, Test, Variable, Vocabulary};
pub use errors::FactreeError;
pub use iti::{ItiConfig, ItiSettings, ItiTree};
pub use merge::{append, merge_all, ordered_merge};
pub use prune::{prune, prune_values, Range};
pub use score::{BdeuScorer, EntropyScorer, SplitScorer};
pub use simplify::{graft, restrict, simplify};
pub use transpose::{set_order, transpose};
pub use tree::DecisionTree;
