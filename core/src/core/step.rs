// ruleflow/src/core/step.rs

//! The capability contract every pipeline step satisfies.

use std::sync::Arc;

use crate::core::params::{AttributeMap, AttributeValue};
use crate::error::{RuleflowError, RuleflowResult};

/// Capability flags the executor checks before dispatching to a step.
///
/// `fit` is mandatory and therefore not flagged. Every non-final step must
/// support `transform`; only a final step used for prediction needs
/// `predict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCapabilities {
  pub transform: bool,
  pub predict: bool,
}

impl Default for StepCapabilities {
  fn default() -> Self {
    StepCapabilities {
      transform: true,
      predict: false,
    }
  }
}

/// A stateful pipeline step, polymorphic over the table type `X` flowing
/// between steps and the series type `Y` used for targets, weights and
/// predictions.
///
/// Steps are instantiated fresh for every `fit` call (see [`StepFactory`]),
/// so implementations may freely mutate themselves while fitting.
pub trait PipelineStep<X, Y>: Send + Sync {
  /// Fits the step on `x`/`y`, mutating its internal attribute namespace.
  fn fit(&mut self, x: &X, y: &Y, sample_weight: Option<&Y>) -> RuleflowResult<()>;

  /// Transforms `x` using fitted state.
  ///
  /// Only dispatched to when `capabilities().transform` is set; the default
  /// body exists so fit/predict-only final steps need not write a stub.
  fn transform(&self, _x: &X) -> RuleflowResult<X> {
    Err(RuleflowError::Internal(format!(
      "`transform` invoked on {}, which does not support it",
      std::any::type_name::<Self>()
    )))
  }

  /// Fits on `x`/`y` and returns the transformed `x`.
  ///
  /// The default fits then transforms; steps whose algorithm already yields
  /// the transformed table while fitting may override to fuse the passes.
  fn fit_transform(&mut self, x: &X, y: &Y, sample_weight: Option<&Y>) -> RuleflowResult<X> {
    self.fit(x, y, sample_weight)?;
    self.transform(x)
  }

  /// Predicts a series from `x` using fitted state.
  ///
  /// Only dispatched to on the final step, and only when
  /// `capabilities().predict` is set.
  fn predict(&self, _x: &X) -> RuleflowResult<Y> {
    Err(RuleflowError::Internal(format!(
      "`predict` invoked on {}, which does not support it",
      std::any::type_name::<Self>()
    )))
  }

  /// The capability subset this step implements. The executor validates the
  /// needed subset up front so a missing capability surfaces as a
  /// descriptive error naming the step, never as a failure mid-run.
  fn capabilities(&self) -> StepCapabilities;

  /// The step's fitted attribute namespace, keyed by attribute name.
  fn attributes(&self) -> AttributeMap {
    AttributeMap::new()
  }

  /// The output artifact (rule-set) this step produced while fitting.
  fn rules(&self) -> Option<AttributeValue> {
    None
  }
}

/// Factory producing a fresh, unfitted step instance.
///
/// The pipeline never fits the configured steps themselves: every `fit`
/// call instantiates new steps from these factories, so repeated fits start
/// from the original configuration instead of compounding mutated state.
pub type StepFactory<X, Y> = Arc<dyn Fn() -> Box<dyn PipelineStep<X, Y>> + Send + Sync + 'static>;

/// Builds a `(tag, factory)` entry from a closure producing a concrete step.
pub fn step<X, Y, S, F>(tag: impl Into<String>, factory: F) -> (String, StepFactory<X, Y>)
where
  X: 'static,
  Y: 'static,
  S: PipelineStep<X, Y> + 'static,
  F: Fn() -> S + Send + Sync + 'static,
{
  (
    tag.into(),
    Arc::new(move || Box::new(factory()) as Box<dyn PipelineStep<X, Y>>),
  )
}
