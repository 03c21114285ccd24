//! Errors
//!
//! Custom error types used throughout the `factree` crate.
use thiserror::Error;

/// Errors that can occur while building, combining or querying trees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FactreeError {
    /// A query assignment does not give a value for a variable the tree tests on.
    #[error("Assignment is missing a value for variable {0}, which the tree tests on.")]
    MissingAssignment(String),
    /// Counts and examples disagree, or some other structural invariant is broken.
    /// The tree that produced this error must not be used again.
    #[error("Internal consistency violated: {0}")]
    InternalConsistency(String),
    /// An example was removed from a tree that does not hold it.
    #[error("Trying to remove an example which is not present in the tree.")]
    ExampleNotFound,
    /// A tree tests something the supplied ordering does not mention.
    #[error("Test {0} does not appear in the supplied test order.")]
    UnorderedTest(String),
    /// An example does not carry the variable its class label is read from.
    #[error("Example has no value for class variable {0}.")]
    MissingClass(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Settings could not be decoded.
    #[error("Unable to parse settings: {0}")]
    Parse(String),
    /// An operation that needs at least one input received none.
    #[error("Expected at least one {0}, but none were provided.")]
    EmptyInput(String),
}
