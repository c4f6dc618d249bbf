//! Terminal output utilities and formatting
//!
//! Results go to stdout and errors to stderr, each prefixed with a colored
//! status symbol. The message text itself is left uncolored on stdout so
//! it stays greppable.

use colored::Colorize;

/// Terminal display utilities for formatted CLI output
pub struct Display;

impl Display {
	/// Displays a success message with green checkmark
	///
	/// # Arguments
	/// * `message` - Success message to display
	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Displays an error message with red X symbol to stderr
	///
	/// # Arguments
	/// * `message` - Error message to display
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	/// Displays an informational message with blue info symbol
	///
	/// # Arguments
	/// * `message` - Information message to display
	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}
}
