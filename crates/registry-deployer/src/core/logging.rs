//! Logging helpers for the deployment operation
//!
//! Combine user-facing terminal output with structured tracing records so
//! that the terminal stays clean while `RUST_LOG` exposes the details.

use crate::cli::output::Display;
use tracing::{error, info};

/// Log operation start with structured context
///
/// # Arguments
/// * `operation` - Name of the operation starting
/// * `context` - Additional context for the operation
pub fn operation_start(operation: &str, context: &str) {
	info!(operation = operation, context = context, "Operation started");
}

/// Progress step of a running operation, logged without terminal output
pub fn operation_progress(operation: &str, step: &str) {
	info!(operation = operation, step = step, "Operation step");
}

/// Log operation completion with timing information
///
/// # Arguments
/// * `operation` - Name of the completed operation
/// * `duration_ms` - Operation duration in milliseconds
pub fn operation_complete(operation: &str, duration_ms: u64) {
	info!(
		operation = operation,
		duration_ms = duration_ms,
		"Operation completed"
	);
}

/// Operation failure: the full error chain on stderr plus a tracing record
///
/// # Arguments
/// * `operation` - Name of the operation that failed
/// * `error` - Error that caused the failure
pub fn operation_error(operation: &str, error: &anyhow::Error) {
	Display::error(&format!("{} failed: {:#}", operation, error));
	error!(
		operation = operation,
		error = ?error,
		"Operation failed"
	);
}
