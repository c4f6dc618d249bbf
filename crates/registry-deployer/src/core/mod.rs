//! Artifact resolution, chain access and logging helpers

pub mod artifacts;
pub mod blockchain;
pub mod logging;
