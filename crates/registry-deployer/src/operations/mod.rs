//! Deployment operations

pub mod deploy;
