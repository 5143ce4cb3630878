pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod theme;
pub mod tui;
