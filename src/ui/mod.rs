//! User interface module - terminal output for the CLI.
//!
//! - `formatter` - Pure formatting of release summaries
//! - This module - Printing status, warnings and summaries

pub mod formatter;

pub use formatter::{format_release_line, format_type_counts};

use crate::boundary::BoundaryWarning;
use crate::domain::ReleaseGroup;
use console::style;
use std::path::PathBuf;

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a success message with a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a boundary warning with a yellow warning icon.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print one line per release group, newest first.
pub fn display_release_summary(groups: &[ReleaseGroup<'_>]) {
    if groups.is_empty() {
        return;
    }

    println!("\n{}", style("Releases:").bold());
    for group in groups {
        println!("  {}", format_release_line(group));
    }
}

/// List files written by a command.
pub fn display_written_files(paths: &[PathBuf]) {
    for path in paths {
        println!("  {}", style(path.display()).cyan());
    }
}
