// ruleflow/src/core/data.rs

//! The `StepData<T>` container for pipeline arguments.
//!
//! Every pipeline argument (`x`, `y`, `sample_weight`) is either a single
//! table-like value shared by all steps, or a map from step tag to value
//! for pipelines whose steps consume heterogeneous per-step data.

use std::collections::HashMap;

use crate::error::{RuleflowError, RuleflowResult};

#[derive(Debug, Clone, PartialEq)]
pub enum StepData<T> {
  /// One value, handed to every step (subject to the input-selection rule).
  Single(T),
  /// A per-step map keyed by step tag.
  PerStep(HashMap<String, T>),
}

impl<T> StepData<T> {
  /// Resolves the value the step tagged `tag` should receive.
  ///
  /// A `PerStep` map without an entry for `tag` is a data error, reported
  /// before the step runs. `argument` names the pipeline argument being
  /// resolved (`x`, `y` or `sample_weight`) so the error is attributable.
  pub fn for_step(&self, tag: &str, argument: &'static str) -> RuleflowResult<&T> {
    match self {
      StepData::Single(value) => Ok(value),
      StepData::PerStep(map) => map.get(tag).ok_or_else(|| RuleflowError::StepDataMissing {
        tag: tag.to_string(),
        argument,
      }),
    }
  }
}

impl<T> From<T> for StepData<T> {
  fn from(value: T) -> Self {
    StepData::Single(value)
  }
}
