//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod console_report;
pub mod csv_adapter;
pub mod file_config_adapter;
