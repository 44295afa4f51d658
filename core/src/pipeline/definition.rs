// ruleflow/src/pipeline/definition.rs

//! Contains the `LinearPipeline<X, Y>` struct definition and methods for
//! its construction, configuration validation and post-fit introspection.

use std::collections::HashSet;

use crate::core::params::{AttributeValue, PipelineParams};
use crate::core::step::{PipelineStep, StepFactory};
use crate::error::{RuleflowError, RuleflowResult};

/// A fitted step instance retained after `fit`, tag-ordered.
pub type FittedStep<X, Y> = (String, Box<dyn PipelineStep<X, Y>>);

/// A strictly ordered sequence of tagged steps, driven sequentially through
/// their fit/transform/predict capabilities.
///
/// `X` is the table-like type flowing between steps; `Y` is the series-like
/// target/prediction type. Steps are registered as factories so every `fit`
/// starts from a fresh, unfitted instance; the fitted instances of the most
/// recent `fit` are retained for introspection and for
/// `transform`/`predict`.
pub struct LinearPipeline<X, Y>
where
  X: 'static,
  Y: 'static,
{
  /// Ordered (tag, factory) configuration. Immutable after construction.
  pub(crate) steps: Vec<(String, StepFactory<X, Y>)>,

  /// Tags of steps that must receive the pipeline's original input instead
  /// of the previous step's output.
  pub(crate) use_init_data: HashSet<String>,

  /// Fitted step instances from the most recent successful `fit`.
  pub(crate) steps_: Option<Vec<FittedStep<X, Y>>>,

  /// The rules artifact produced by the final step of the last `fit`.
  pub(crate) rules: Option<AttributeValue>,
}

impl<X, Y> std::fmt::Debug for LinearPipeline<X, Y>
where
  X: 'static,
  Y: 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LinearPipeline")
      .field("tags", &self.tags())
      .field("use_init_data", &self.use_init_data)
      .field("is_fitted", &self.is_fitted())
      .field("rules", &self.rules)
      .finish()
  }
}

impl<X, Y> LinearPipeline<X, Y>
where
  X: 'static,
  Y: 'static,
{
  /// Creates a pipeline from tagged step factories.
  ///
  /// Configuration is validated eagerly: the step list must be non-empty,
  /// tags must be unique, and every tag in `use_init_data` must name a
  /// configured step. Duplicate tags would silently shadow each other in
  /// tag-keyed lookups, so they are rejected outright.
  pub fn new(
    steps: Vec<(String, StepFactory<X, Y>)>,
    use_init_data: impl IntoIterator<Item = String>,
  ) -> RuleflowResult<Self> {
    if steps.is_empty() {
      return Err(RuleflowError::ConfigurationError {
        message: "a pipeline requires at least one step".to_string(),
      });
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (tag, _) in &steps {
      if !seen.insert(tag.as_str()) {
        return Err(RuleflowError::ConfigurationError {
          message: format!("duplicate step tag '{tag}'"),
        });
      }
    }

    let use_init_data: HashSet<String> = use_init_data.into_iter().collect();
    for tag in &use_init_data {
      if !seen.contains(tag.as_str()) {
        return Err(RuleflowError::ConfigurationError {
          message: format!("`use_init_data` names unknown step tag '{tag}'"),
        });
      }
    }

    Ok(Self {
      steps,
      use_init_data,
      steps_: None,
      rules: None,
    })
  }

  /// Step tags in execution order.
  pub fn tags(&self) -> Vec<&str> {
    self.steps.iter().map(|(tag, _)| tag.as_str()).collect()
  }

  /// Whether a successful `fit` has produced a fitted snapshot.
  pub fn is_fitted(&self) -> bool {
    self.steps_.is_some()
  }

  /// The fitted step instances of the most recent `fit`, tag-ordered.
  pub fn fitted_steps(&self) -> RuleflowResult<&[FittedStep<X, Y>]> {
    self.fitted("fitted_steps")
  }

  /// The rules artifact produced by the final step, once fitted.
  pub fn rules(&self) -> Option<&AttributeValue> {
    self.rules.as_ref()
  }

  /// Collects resolved pipeline state (tag to attribute namespace) from the
  /// fitted steps, in the shape `StepAttributeAccessor::resolve` expects.
  pub fn params(&self) -> RuleflowResult<PipelineParams> {
    let steps = self.fitted("params")?;
    Ok(
      steps
        .iter()
        .map(|(tag, step)| (tag.clone(), step.attributes()))
        .collect(),
    )
  }

  pub(crate) fn fitted(&self, operation: &'static str) -> RuleflowResult<&[FittedStep<X, Y>]> {
    self
      .steps_
      .as_deref()
      .ok_or(RuleflowError::NotFitted { operation })
  }
}
