use super::tree::DecisionTree;
use crate::data::Assignment;
use crate::errors::FactreeError;
use rayon::prelude::*;

impl<T: Clone> DecisionTree<T> {
    fn predict_single_threaded(&self, assignments: &[Assignment]) -> Result<Vec<T>, FactreeError> {
        assignments.iter().map(|a| self.match_leaf(a).cloned()).collect()
    }

    fn predict_parallel(&self, assignments: &[Assignment]) -> Result<Vec<T>, FactreeError>
    where
        T: Send + Sync,
    {
        assignments.par_iter().map(|a| self.match_leaf(a).cloned()).collect()
    }

    /// Match a batch of full assignments. The tree is only read, so the
    /// parallel path is safe on any stable tree.
    pub fn predict(&self, assignments: &[Assignment], parallel: bool) -> Result<Vec<T>, FactreeError>
    where
        T: Send + Sync,
    {
        if parallel {
            self.predict_parallel(assignments)
        } else {
            self.predict_single_threaded(assignments)
        }
    }
}
