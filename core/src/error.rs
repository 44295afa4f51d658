// ruleflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleflowError {
  #[error("No pipeline step tagged '{tag}'")]
  StepNotFound { tag: String },

  #[error("Step '{tag}' has no attribute named '{attribute}'")]
  AttributeNotFound { tag: String, attribute: String },

  #[error("Attribute '{attribute}' on step '{tag}' is not of type {expected_type}")]
  TypeMismatch {
    tag: String,
    attribute: String,
    expected_type: String,
  },

  #[error("Pipeline is not fitted; call `fit` before `{operation}`")]
  NotFitted { operation: &'static str },

  #[error("Step '{tag}' does not support `{capability}`")]
  CapabilityMissing {
    tag: String,
    capability: &'static str,
  },

  #[error("No `{argument}` entry for step '{tag}' in the per-step data map")]
  StepDataMissing {
    tag: String,
    argument: &'static str,
  },

  #[error("Pipeline configuration error: {message}")]
  ConfigurationError { message: String },

  #[error("Error raised inside a pipeline step. Source: {source}")]
  Step {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal ruleflow error: {0}")]
  Internal(String),
}

// This is the key conversion ruleflow provides for step failures: steps
// report errors with anyhow, the pipeline propagates them unmodified
// inside the `Step` variant.
impl From<AnyhowError> for RuleflowError {
  fn from(err: AnyhowError) -> Self {
    RuleflowError::Step { source: err }
  }
}

pub type RuleflowResult<T, E = RuleflowError> = std::result::Result<T, E>;
