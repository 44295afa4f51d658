// ruleflow/src/accessor.rs

//! Late-bound cross-step parameter references.
//!
//! A `StepAttributeAccessor` lets a step be configured with a value that
//! only exists once an earlier step has been fitted: construct the accessor
//! up front with `(tag, attribute)`, then resolve it against a
//! `PipelineParams` snapshot at the point of use. Resolution is never
//! performed eagerly at construction.

use std::any::Any;
use std::sync::Arc;

use crate::core::params::{AttributeValue, PipelineParams};
use crate::error::{RuleflowError, RuleflowResult};

/// A resolvable reference to an attribute on a tagged step's fitted state.
///
/// The accessor caches nothing: resolution always runs against the state
/// mapping passed in, so one accessor may be resolved repeatedly against
/// different snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepAttributeAccessor {
  class_tag: String,
  class_attribute: String,
}

impl StepAttributeAccessor {
  pub fn new(class_tag: impl Into<String>, class_attribute: impl Into<String>) -> Self {
    Self {
      class_tag: class_tag.into(),
      class_attribute: class_attribute.into(),
    }
  }

  /// The tag of the step the attribute lives on.
  pub fn class_tag(&self) -> &str {
    &self.class_tag
  }

  /// The name of the attribute to extract.
  pub fn class_attribute(&self) -> &str {
    &self.class_attribute
  }

  /// Looks up `params[class_tag][class_attribute]`.
  ///
  /// A missing tag is an error naming the tag, never a silent default, so
  /// stale or unfitted-step state cannot be consumed by accident. A missing
  /// attribute on a present tag is reported as the namespace's own
  /// missing-key error.
  pub fn resolve<'a>(&self, params: &'a PipelineParams) -> RuleflowResult<&'a AttributeValue> {
    let namespace = params
      .get(&self.class_tag)
      .ok_or_else(|| RuleflowError::StepNotFound {
        tag: self.class_tag.clone(),
      })?;
    namespace
      .get(&self.class_attribute)
      .ok_or_else(|| RuleflowError::AttributeNotFound {
        tag: self.class_tag.clone(),
        attribute: self.class_attribute.clone(),
      })
  }

  /// Resolves the attribute and downcasts it to `T`.
  pub fn resolve_as<T>(&self, params: &PipelineParams) -> RuleflowResult<Arc<T>>
  where
    T: Any + Send + Sync,
  {
    let value = self.resolve(params)?;
    Arc::clone(value)
      .downcast::<T>()
      .map_err(|_| RuleflowError::TypeMismatch {
        tag: self.class_tag.clone(),
        attribute: self.class_attribute.clone(),
        expected_type: std::any::type_name::<T>().to_string(),
      })
  }
}
