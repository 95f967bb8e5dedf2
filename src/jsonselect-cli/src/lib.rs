//! jsel library
//!
//! Provides the argument parser, Config and Executor behind the `jsel`
//! binary for programmatic use.

pub mod cli;
pub mod config;
pub mod executor;
pub mod output;

pub use config::Config;
pub use executor::Executor;
