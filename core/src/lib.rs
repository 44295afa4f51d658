// src/lib.rs

//! Ruleflow: a synchronous, type-safe linear pipeline for fit/transform/predict steps.
//!
//! Ruleflow chains stateful data-transformation steps (rule generators,
//! rule optimisers, rule combiners) into a strictly ordered pipeline:
//!  - Tagged steps exposing a `fit`/`transform`/`predict` capability contract.
//!  - Copy-on-fit step instantiation: steps are registered as factories, so
//!    every `fit` starts from a fresh, unfitted instance instead of
//!    accumulating state across fits.
//!  - A per-step override (`use_init_data`) that feeds a later step the
//!    pipeline's *original* input rather than the previous step's output.
//!  - Late-bound cross-step parameter references (`StepAttributeAccessor`):
//!    a `(tag, attribute)` handle resolved against fitted pipeline state
//!    only once that state exists.

// Declare modules according to the planned structure
pub mod accessor;
pub mod core;
pub mod error;
pub mod pipeline;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::data::StepData;
pub use crate::core::params::{AttributeMap, AttributeValue, PipelineParams};
pub use crate::core::step::{step, PipelineStep, StepCapabilities, StepFactory};

// The main pipeline struct
pub use crate::pipeline::definition::LinearPipeline;

// The deferred-attribute accessor
pub use crate::accessor::StepAttributeAccessor;

pub use crate::error::{RuleflowError, RuleflowResult};
