//! CLI library components for the marketplace seeding tool.

pub mod cli;
pub mod logging;
pub mod progress;
pub mod summary;
