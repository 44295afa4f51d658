// ruleflow/src/pipeline/mod.rs

//! The linear pipeline: construction and introspection in `definition`,
//! the fit/transform/predict drivers in `execution`.

pub mod definition;
pub mod execution;
