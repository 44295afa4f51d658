// ruleflow/src/pipeline/execution.rs

//! Contains the fit/transform/predict drivers for `LinearPipeline`,
//! responsible for instantiating fitted steps, selecting each step's input
//! and dispatching to the step capabilities in order.

use std::collections::HashSet;

use tracing::{event, instrument, span, Level};

use crate::core::data::StepData;
use crate::error::{RuleflowError, RuleflowResult};
use crate::pipeline::definition::{FittedStep, LinearPipeline};

impl<X, Y> LinearPipeline<X, Y>
where
  X: Clone + 'static,
  Y: 'static,
{
  /// Fits the pipeline: every step except the last runs `fit_transform`,
  /// feeding its output forward; the last step runs `fit` only, and its
  /// rules artifact becomes the pipeline's own output artifact.
  ///
  /// Fresh step instances are built from the configured factories first, so
  /// repeated `fit` calls start from the original, unfitted configuration.
  /// A failed `fit` leaves the pipeline unfitted rather than exposing a
  /// half-fitted snapshot.
  #[instrument(
    name = "LinearPipeline::fit",
    skip_all,
    fields(num_steps = self.steps.len()),
    err(Display)
  )]
  pub fn fit(
    &mut self,
    x: &StepData<X>,
    y: &StepData<Y>,
    sample_weight: Option<&StepData<Y>>,
  ) -> RuleflowResult<()> {
    event!(Level::DEBUG, "Pipeline fit starting.");
    self.steps_ = None;
    self.rules = None;

    let mut fitted = self.instantiate_steps()?;
    let x_init = self.copy_init(x);
    let mut carried: Option<X> = None;
    let last = fitted.len() - 1;

    for (idx, (tag, step)) in fitted.iter_mut().enumerate() {
      let step_span = span!(Level::INFO, "pipeline_step", step_tag = %tag, step_index = idx);
      let _step_span_guard = step_span.enter();

      let input = select_input(&self.use_init_data, tag, carried.as_ref(), x, x_init.as_ref())?;
      let y_step = y.for_step(tag, "y")?;
      let sw_step = match sample_weight {
        Some(sw) => Some(sw.for_step(tag, "sample_weight")?),
        None => None,
      };

      if idx == last {
        event!(Level::DEBUG, "Fitting final step.");
        step.fit(input, y_step, sw_step)?;
      } else {
        event!(Level::DEBUG, "Fit-transforming step.");
        let output = step.fit_transform(input, y_step, sw_step)?;
        carried = Some(output);
      }
    }

    if let Some((_, final_step)) = fitted.last() {
      self.rules = final_step.rules();
    }
    self.steps_ = Some(fitted);
    event!(Level::DEBUG, "Pipeline fit completed.");
    Ok(())
  }

  /// Runs every step's `transform` in order, forwarding outputs and
  /// applying the same input-selection rule as `fit`, and returns the final
  /// transformed table. Requires a prior successful `fit`.
  #[instrument(name = "LinearPipeline::transform", skip_all, err(Display))]
  pub fn transform(&self, x: &StepData<X>) -> RuleflowResult<X> {
    let steps = self.fitted("transform")?;
    // `fit` only verified `transform` for the non-final steps; here the
    // final step needs it too, and the check runs before any step does.
    if let Some((tag, step)) = steps.last() {
      if !step.capabilities().transform {
        return Err(RuleflowError::CapabilityMissing {
          tag: tag.clone(),
          capability: "transform",
        });
      }
    }

    let x_init = self.copy_init(x);
    let mut carried: Option<X> = None;
    for (idx, (tag, step)) in steps.iter().enumerate() {
      let step_span = span!(Level::INFO, "pipeline_step", step_tag = %tag, step_index = idx);
      let _step_span_guard = step_span.enter();

      let input = select_input(&self.use_init_data, tag, carried.as_ref(), x, x_init.as_ref())?;
      carried = Some(step.transform(input)?);
    }

    carried.ok_or_else(|| RuleflowError::Internal("transform produced no output".to_string()))
  }

  /// Runs `transform` for every step but the last, then invokes the last
  /// step's `predict` on the selected input, returning the prediction
  /// series. Requires a prior successful `fit`.
  #[instrument(name = "LinearPipeline::predict", skip_all, err(Display))]
  pub fn predict(&self, x: &StepData<X>) -> RuleflowResult<Y> {
    let steps = self.fitted("predict")?;
    let Some(((final_tag, final_step), chain)) = steps.split_last() else {
      return Err(RuleflowError::Internal(
        "fitted pipeline has no steps".to_string(),
      ));
    };
    if !final_step.capabilities().predict {
      return Err(RuleflowError::CapabilityMissing {
        tag: final_tag.clone(),
        capability: "predict",
      });
    }

    let x_init = self.copy_init(x);
    let mut carried: Option<X> = None;
    for (idx, (tag, step)) in chain.iter().enumerate() {
      let step_span = span!(Level::INFO, "pipeline_step", step_tag = %tag, step_index = idx);
      let _step_span_guard = step_span.enter();

      let input = select_input(&self.use_init_data, tag, carried.as_ref(), x, x_init.as_ref())?;
      carried = Some(step.transform(input)?);
    }

    let input = select_input(
      &self.use_init_data,
      final_tag,
      carried.as_ref(),
      x,
      x_init.as_ref(),
    )?;
    final_step.predict(input)
  }

  /// `fit` then `transform` on the same original `x`.
  pub fn fit_transform(
    &mut self,
    x: &StepData<X>,
    y: &StepData<Y>,
    sample_weight: Option<&StepData<Y>>,
  ) -> RuleflowResult<X> {
    self.fit(x, y, sample_weight)?;
    self.transform(x)
  }

  /// `fit` then `predict` on the same original `x`.
  pub fn fit_predict(
    &mut self,
    x: &StepData<X>,
    y: &StepData<Y>,
    sample_weight: Option<&StepData<Y>>,
  ) -> RuleflowResult<Y> {
    self.fit(x, y, sample_weight)?;
    self.predict(x)
  }

  /// Builds fresh step instances from the configured factories and verifies
  /// the capability contract: every non-final step must support `transform`.
  /// Runs before any step executes, so a capability hole cannot abort a
  /// half-finished fit.
  fn instantiate_steps(&self) -> RuleflowResult<Vec<FittedStep<X, Y>>> {
    let fitted: Vec<FittedStep<X, Y>> = self
      .steps
      .iter()
      .map(|(tag, factory)| (tag.clone(), factory()))
      .collect();

    for (tag, step) in fitted.iter().take(fitted.len() - 1) {
      if !step.capabilities().transform {
        return Err(RuleflowError::CapabilityMissing {
          tag: tag.clone(),
          capability: "transform",
        });
      }
    }
    Ok(fitted)
  }

  /// Snapshots the original input when any step opts into it; skipped
  /// entirely otherwise so plain chained pipelines pay for no copy.
  fn copy_init(&self, x: &StepData<X>) -> Option<StepData<X>> {
    if self.use_init_data.is_empty() {
      None
    } else {
      Some(x.clone())
    }
  }
}

/// The input-selection rule: a step tagged in `use_init_data` receives the
/// pristine original input; otherwise it receives the previous step's
/// output, or the original input if it is the first step.
fn select_input<'a, X>(
  use_init_data: &HashSet<String>,
  tag: &str,
  carried: Option<&'a X>,
  x: &'a StepData<X>,
  x_init: Option<&'a StepData<X>>,
) -> RuleflowResult<&'a X> {
  if use_init_data.contains(tag) {
    // copy_init guarantees the snapshot exists whenever use_init_data is
    // non-empty.
    match x_init {
      Some(init) => init.for_step(tag, "x"),
      None => Err(RuleflowError::Internal(format!(
        "initial-data snapshot missing for step '{tag}'"
      ))),
    }
  } else {
    match carried {
      Some(previous_output) => Ok(previous_output),
      None => x.for_step(tag, "x"),
    }
  }
}
