//! Builders for constructing configuration values programmatically.

pub mod config;
