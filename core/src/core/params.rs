// ruleflow/src/core/params.rs

//! The fitted-state attribute namespace exposed by steps.
//!
//! Steps publish their fitted state as an `AttributeMap`; the per-tag
//! collection of those namespaces (`PipelineParams`) is the snapshot a
//! `StepAttributeAccessor` resolves against.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// An opaque, shareable handle to a single fitted attribute, or to the
/// rules artifact a step produces. Consumers downcast to the concrete type
/// they expect.
pub type AttributeValue = Arc<dyn Any + Send + Sync>;

/// A step's attribute namespace after fitting: attribute name to value.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Resolved pipeline state: step tag to that step's attribute namespace.
///
/// Built externally (typically via `LinearPipeline::params`) and handed to
/// a `StepAttributeAccessor` at resolution time; the pipeline itself does
/// not own this mapping.
pub type PipelineParams = HashMap<String, AttributeMap>;
