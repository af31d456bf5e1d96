pub mod approve;
pub mod calculator;
pub mod config;
pub mod log;
pub mod process;
pub mod recompute;
pub mod report;
pub mod settings;
