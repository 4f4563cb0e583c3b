//! Core domain types and the return/metrics pipeline.

pub mod series;
pub mod frame;
pub mod returns;
pub mod signal;
pub mod position;
pub mod strategy_return;
pub mod metrics;
pub mod rolling;
pub mod config;
pub mod config_validation;
pub mod pipeline;
pub mod error;
