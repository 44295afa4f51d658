// ruleflow/src/core/mod.rs

//! Core building blocks: the step capability contract, the data containers
//! flowing between steps, and the fitted-state attribute namespace.

pub mod data;
pub mod params;
pub mod step;
