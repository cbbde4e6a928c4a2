//! Handles all user-facing output for the CLI.
//!
//! stdout carries exactly one line: the JSON result. Everything else
//! (failures and logs) goes to stderr.

use std::io::Write;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints the serialized result.
pub fn print_result(json: &str) {
    println!("{json}");
}

/// Prints a colored failure heading followed by the rendered diagnostic.
pub fn print_failure(stage: &str, report: Report) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(stderr, "{stage} failed");
    let _ = stderr.reset();
    let _ = writeln!(stderr, "{report:?}");
}
