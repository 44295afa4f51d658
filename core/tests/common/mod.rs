// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use ruleflow::{AttributeMap, AttributeValue, PipelineStep, RuleflowResult, StepCapabilities};
use tracing::Level;

// --- Common data types ---
//
// A "table" is the ordered list of column names it carries, so a step's
// output is cheap to compare against the exact input a later step received.
pub type Frame = Vec<String>;
pub type Series = Vec<i64>;

pub fn frame(columns: &[&str]) -> Frame {
  columns.iter().map(|c| c.to_string()).collect()
}

// --- Shared per-step log ---
//
// Step instances are created fresh by their factory on every fit, so tests
// observe what a step saw through a log handle cloned into each instance.
#[derive(Default)]
struct StepLogInner {
  fit_x: Mutex<Vec<Frame>>,
  fit_y: Mutex<Vec<Series>>,
  fit_sample_weight: Mutex<Vec<Option<Series>>>,
}

#[derive(Clone, Default)]
pub struct StepLog(Arc<StepLogInner>);

impl StepLog {
  pub fn new() -> Self {
    Self::default()
  }

  fn record_fit(&self, x: &Frame, y: &Series, sample_weight: Option<&Series>) {
    self.0.fit_x.lock().unwrap().push(x.clone());
    self.0.fit_y.lock().unwrap().push(y.clone());
    self
      .0
      .fit_sample_weight
      .lock()
      .unwrap()
      .push(sample_weight.cloned());
  }

  pub fn fit_inputs(&self) -> Vec<Frame> {
    self.0.fit_x.lock().unwrap().clone()
  }

  pub fn fit_targets(&self) -> Vec<Series> {
    self.0.fit_y.lock().unwrap().clone()
  }

  pub fn fit_sample_weights(&self) -> Vec<Option<Series>> {
    self.0.fit_sample_weight.lock().unwrap().clone()
  }
}

// --- Transformer step ---

/// Appends a marker column to the frame; records what `fit` received.
pub struct AppendStep {
  marker: &'static str,
  log: StepLog,
  fit_count: usize,
}

impl AppendStep {
  pub fn new(marker: &'static str, log: StepLog) -> Self {
    AppendStep {
      marker,
      log,
      fit_count: 0,
    }
  }
}

impl PipelineStep<Frame, Series> for AppendStep {
  fn fit(&mut self, x: &Frame, y: &Series, sample_weight: Option<&Series>) -> RuleflowResult<()> {
    self.log.record_fit(x, y, sample_weight);
    self.fit_count += 1;
    Ok(())
  }

  fn transform(&self, x: &Frame) -> RuleflowResult<Frame> {
    let mut out = x.clone();
    out.push(self.marker.to_string());
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
      "marker".to_string(),
      Arc::new(self.marker.to_string()) as AttributeValue,
    );
    attrs.insert("fit_count".to_string(), Arc::new(self.fit_count) as AttributeValue);
    attrs
  }
}

// --- Final estimator step (fit + predict, no transform) ---

/// Builds one rule per column it was fitted on; predicts the frame width.
pub struct RuleEstimator {
  log: StepLog,
  rules: Option<Arc<Vec<String>>>,
  fail_on_fit: Option<&'static str>,
}

impl RuleEstimator {
  pub fn new(log: StepLog) -> Self {
    RuleEstimator {
      log,
      rules: None,
      fail_on_fit: None,
    }
  }

  pub fn failing(log: StepLog, message: &'static str) -> Self {
    RuleEstimator {
      log,
      rules: None,
      fail_on_fit: Some(message),
    }
  }
}

impl PipelineStep<Frame, Series> for RuleEstimator {
  fn fit(&mut self, x: &Frame, y: &Series, sample_weight: Option<&Series>) -> RuleflowResult<()> {
    self.log.record_fit(x, y, sample_weight);
    if let Some(message) = self.fail_on_fit {
      return Err(anyhow::anyhow!(message).into());
    }
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

  fn attributes(&self) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    if let Some(rules) = &self.rules {
      attrs.insert("rules".to_string(), Arc::clone(rules) as AttributeValue);
      attrs.insert("n_rules".to_string(), Arc::new(rules.len()) as AttributeValue);
    }
    attrs
  }

  fn rules(&self) -> Option<AttributeValue> {
    self.rules.clone().map(|rules| rules as AttributeValue)
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
