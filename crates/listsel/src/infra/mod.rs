//! Infrastructure adapters for configuration.

pub mod config;
