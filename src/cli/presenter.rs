//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;

/// Presenter for CLI output formatting
#[derive(Debug, Default, Clone, Copy)]
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Redraw the in-place recording timer line
    pub fn timer(&self, display: &str) {
        eprint!("\r{} {}  ", "●".red(), display);
        let _ = io::stderr().flush();
    }

    /// Redraw the in-place playback progress line
    pub fn progress(&self, position: &str, duration: &str) {
        eprint!("\r{} {} / {}  ", "▶".green(), position, duration);
        let _ = io::stderr().flush();
    }

    /// End an in-place line
    pub fn end_line(&self) {
        eprintln!();
    }

    /// Print a result line to stdout (machine-readable output)
    pub fn output(&self, message: &str) {
        println!("{}", message);
    }
}
