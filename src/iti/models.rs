//! How examples are read by the induction engine.
//!
//! A model decides which class an example belongs to and whether it passes
//! a candidate test. The two shipped models learn reward trees from single
//! observations and transition trees from consecutive state pairs.
use crate::data::{Assignment, Test, Variable};
use crate::errors::FactreeError;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

pub trait ExampleModel<T> {
    type Class: Clone + Debug + Ord;

    /// The class label of an example.
    fn class_of(&self, example: &T) -> Result<Self::Class, FactreeError>;

    /// Whether an example passes a test. Examples that say nothing about the
    /// tested variable fail it.
    fn passes(&self, test: &Test, example: &T) -> bool;
}

/// A reward value usable as a class label.
///
/// Ordering and equality follow `f64::total_cmp`, so every value (NaN
/// included) has a place in the class counts.
#[derive(Debug, Clone, Copy)]
pub struct Reward(pub f64);

impl PartialEq for Reward {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Reward {}

impl PartialOrd for Reward {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reward {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Reward {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observed state together with the reward received in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub assignment: Assignment,
    pub reward: f64,
}

impl Trial {
    pub fn new(assignment: Assignment, reward: f64) -> Self {
        Trial { assignment, reward }
    }
}

/// Learns rewards: the class of a trial is its reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardModel;

impl ExampleModel<Trial> for RewardModel {
    type Class = Reward;

    fn class_of(&self, example: &Trial) -> Result<Reward, FactreeError> {
        Ok(Reward(example.reward))
    }

    fn passes(&self, test: &Test, example: &Trial) -> bool {
        test.passes(&example.assignment)
    }
}

/// A single step: the state before, the action taken, the state after and
/// the reward received.
#[derive(Debug, Clone, PartialEq)]
pub struct SequentialTrial {
    pub prev_state: Assignment,
    pub action: String,
    pub current_state: Assignment,
    pub reward: f64,
}

impl SequentialTrial {
    pub fn new(prev_state: Assignment, action: impl Into<String>, current_state: Assignment, reward: f64) -> Self {
        SequentialTrial {
            prev_state,
            action: action.into(),
            current_state,
            reward,
        }
    }
}

/// Learns how one variable evolves: tests look at the previous state and
/// the class is the value `target` takes in the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    pub target: Variable,
}

impl TransitionModel {
    pub fn new(target: Variable) -> Self {
        TransitionModel { target }
    }
}

impl ExampleModel<SequentialTrial> for TransitionModel {
    type Class = usize;

    fn class_of(&self, example: &SequentialTrial) -> Result<usize, FactreeError> {
        match example.current_state.get(&self.target) {
            Some(v) if v < self.target.domain_size => Ok(v),
            _ => Err(FactreeError::MissingClass(self.target.name.clone())),
        }
    }

    fn passes(&self, test: &Test, example: &SequentialTrial) -> bool {
        test.passes(&example.prev_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_reward_ordering() {
        let set: BTreeSet<Reward> = [Reward(2.0), Reward(-1.0), Reward(2.0), Reward(0.5)].into_iter().collect();
        let values: Vec<f64> = set.into_iter().map(|r| r.0).collect();
        assert_eq!(values, vec![-1.0, 0.5, 2.0]);
        assert_eq!(Reward(f64::NAN), Reward(f64::NAN));
    }

    #[test]
    fn test_transition_model_class() {
        let x = Variable::new("X", 3);
        let model = TransitionModel::new(x.clone());
        let prev = Assignment::from_pairs([(x.clone(), 0)]);
        let ok = SequentialTrial::new(prev.clone(), "move", Assignment::from_pairs([(x.clone(), 2)]), 0.0);
        assert_eq!(model.class_of(&ok), Ok(2));
        assert!(model.passes(&Test::new(x.clone(), 0), &ok));
        assert!(!model.passes(&Test::new(x.clone(), 2), &ok));

        let missing = SequentialTrial::new(prev.clone(), "move", Assignment::new(), 0.0);
        assert_eq!(model.class_of(&missing), Err(FactreeError::MissingClass("X".to_string())));
        let out_of_domain = SequentialTrial::new(prev, "move", Assignment::from_pairs([(x, 5)]), 0.0);
        assert!(model.class_of(&out_of_domain).is_err());
    }
}
