// examples/basic_pipeline.rs

//! A two-step pipeline: a rule-generator step followed by a rule-estimator
//! step that re-consumes the pipeline's original input via `use_init_data`,
//! plus a `StepAttributeAccessor` pulling fitted state out of the first step.

use std::sync::Arc;

use ruleflow::{
  step, AttributeMap, AttributeValue, LinearPipeline, PipelineStep, RuleflowResult, StepAttributeAccessor,
  StepCapabilities, StepData,
};

type Frame = Vec<String>;
type Series = Vec<i64>;

/// Generates one candidate rule column from the columns it sees.
struct RuleGenerator {
  n_columns_seen: usize,
}

impl PipelineStep<Frame, Series> for RuleGenerator {
  fn fit(&mut self, x: &Frame, _y: &Series, _sample_weight: Option<&Series>) -> RuleflowResult<()> {
    self.n_columns_seen = x.len();
    Ok(())
  }

  fn transform(&self, x: &Frame) -> RuleflowResult<Frame> {
    let mut out = x.clone();
    out.push("generated_rule".to_string());
    Ok(out)
  }

  fn capabilities(&self) -> StepCapabilities {
    StepCapabilities {
      transform: true,
      predict: false,
    }
  }

  fn attributes(&self) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    attrs.insert(
      "n_columns_seen".to_string(),
      Arc::new(self.n_columns_seen) as AttributeValue,
    );
    attrs
  }
}

/// Optimises rules against the raw input and predicts the frame width.
struct RuleOptimiser {
  rules: Option<Arc<Vec<String>>>,
}

impl PipelineStep<Frame, Series> for RuleOptimiser {
  fn fit(&mut self, x: &Frame, _y: &Series, _sample_weight: Option<&Series>) -> RuleflowResult<()> {
    self.rules = Some(Arc::new(x.iter().map(|col| format!("{col} > 0")).collect()));
    Ok(())
  }

  fn predict(&self, x: &Frame) -> RuleflowResult<Series> {
    Ok(vec![x.len() as i64])
  }

  fn capabilities(&self) -> StepCapabilities {
    StepCapabilities {
      transform: false,
      predict: true,
    }
  }

  fn rules(&self) -> Option<AttributeValue> {
    self.rules.clone().map(|rules| rules as AttributeValue)
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let mut pipeline = LinearPipeline::new(
    vec![
      step("gen", || RuleGenerator { n_columns_seen: 0 }),
      step("opt", || RuleOptimiser { rules: None }),
    ],
    ["opt".to_string()], // the optimiser re-derives from the raw input
  )?;

  let x = StepData::Single(vec!["amount".to_string(), "country".to_string()]);
  let y = StepData::Single(vec![0, 1, 1]);

  pipeline.fit(&x, &y, None)?;

  let rules = pipeline.rules().expect("rules artifact after fit");
  let rules = Arc::clone(rules).downcast::<Vec<String>>().expect("rule-set type");
  println!("optimised rules: {rules:?}");

  let prediction = pipeline.predict(&x)?;
  println!("prediction: {prediction:?}");

  // Late-bound lookup into the generator's fitted state.
  let params = pipeline.params()?;
  let accessor = StepAttributeAccessor::new("gen", "n_columns_seen");
  let n_columns = accessor.resolve_as::<usize>(&params)?;
  println!("generator saw {n_columns} columns");

  Ok(())
}
