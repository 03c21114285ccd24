//! Induction configuration
//!
//! `ItiConfig` bundles everything the engine needs to grow one tree: how
//! examples are read, how splits are scored, the margin a candidate must
//! win by, and the variables it may test. `ItiSettings` holds the numeric
//! knobs in a form that can be read from JSON.
use crate::constants::{DEFAULT_PSEUDO_COUNT, DEFAULT_SPLIT_THRESH};
use crate::data::{Variable, Vocabulary};
use crate::errors::FactreeError;
use crate::iti::models::{RewardModel, TransitionModel};
use crate::score::{BdeuScorer, EntropyScorer};
use crate::utils::validate_positive_float_parameter;
use serde::{Deserialize, Serialize};

fn default_split_thresh() -> f64 {
    DEFAULT_SPLIT_THRESH
}
fn default_pseudo_count() -> f64 {
    DEFAULT_PSEUDO_COUNT
}

/// Numeric settings for an induction engine.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct ItiSettings {
    /// Margin by which a candidate test must beat the current choice.
    #[serde(default = "default_split_thresh")]
    pub split_thresh: f64,
    /// Dirichlet pseudo count for transition trees.
    #[serde(default = "default_pseudo_count")]
    pub pseudo_count: f64,
}

impl Default for ItiSettings {
    fn default() -> Self {
        ItiSettings {
            split_thresh: DEFAULT_SPLIT_THRESH,
            pseudo_count: DEFAULT_PSEUDO_COUNT,
        }
    }
}

impl ItiSettings {
    pub fn validate(&self) -> Result<(), FactreeError> {
        validate_positive_float_parameter(self.split_thresh, "split_thresh")?;
        validate_positive_float_parameter(self.pseudo_count, "pseudo_count")?;
        Ok(())
    }

    /// Read and validate settings from a JSON string. Missing fields take
    /// their defaults.
    pub fn from_json(json_str: &str) -> Result<Self, FactreeError> {
        let settings = serde_json::from_str::<Self>(json_str).map_err(|e| FactreeError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn json_dump(&self) -> Result<String, FactreeError> {
        serde_json::to_string(self).map_err(|e| FactreeError::Parse(e.to_string()))
    }
}

/// Everything the induction engine needs to grow one tree.
#[derive(Debug, Clone)]
pub struct ItiConfig<M, S> {
    pub model: M,
    pub scorer: S,
    pub split_thresh: f64,
    pub vocab: Vocabulary,
}

impl<M, S> ItiConfig<M, S> {
    pub fn new(model: M, scorer: S, split_thresh: f64, vocab: Vocabulary) -> Result<Self, FactreeError> {
        validate_positive_float_parameter(split_thresh, "split_thresh")?;
        Ok(ItiConfig {
            model,
            scorer,
            split_thresh,
            vocab,
        })
    }
}

impl ItiConfig<RewardModel, EntropyScorer> {
    /// Reward trees split on any entropy improvement at all.
    pub fn reward(vocab: Vocabulary) -> Self {
        ItiConfig {
            model: RewardModel,
            scorer: EntropyScorer,
            split_thresh: DEFAULT_SPLIT_THRESH,
            vocab,
        }
    }
}

impl ItiConfig<TransitionModel, BdeuScorer> {
    /// A tree predicting the next value of `target` from the previous state.
    pub fn transition(target: Variable, vocab: Vocabulary, settings: &ItiSettings) -> Result<Self, FactreeError> {
        settings.validate()?;
        let scorer = BdeuScorer::new(target.domain_size, settings.pseudo_count);
        ItiConfig::new(TransitionModel::new(target), scorer, settings.split_thresh, vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_from_json() {
        let settings = ItiSettings::from_json("{}").unwrap();
        assert_eq!(settings, ItiSettings::default());
        let settings = ItiSettings::from_json(r#"{"split_thresh": 2.5}"#).unwrap();
        assert_eq!(settings.split_thresh, 2.5);
        assert_eq!(settings.pseudo_count, DEFAULT_PSEUDO_COUNT);
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = ItiSettings {
            split_thresh: 0.25,
            pseudo_count: 4.0,
        };
        let json = settings.json_dump().unwrap();
        assert_eq!(ItiSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_settings_rejects_bad_values() {
        assert!(matches!(
            ItiSettings::from_json(r#"{"pseudo_count": -1.0}"#),
            Err(FactreeError::InvalidParameter(..))
        ));
        assert!(matches!(ItiSettings::from_json("not json"), Err(FactreeError::Parse(_))));
    }

    #[test]
    fn test_transition_config() {
        let x = Variable::new("X", 3);
        let vocab = Vocabulary::new([x.clone()]);
        let config = ItiConfig::transition(x, vocab, &ItiSettings::default()).unwrap();
        assert_eq!(config.scorer.domain_size, 3);
        assert!(ItiConfig::new(RewardModel, EntropyScorer, f64::NAN, Vocabulary::default()).is_err());
    }
}
