//! Defines the command-line arguments for the Funson CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "funson",
    version,
    about = "Evaluates a JSON document as a Funson program and prints the result as JSON."
)]
pub struct FunsonArgs {
    /// The path to the JSON program to evaluate.
    #[arg(required = true)]
    pub source: PathBuf,

    /// Maximum evaluation nesting depth.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_and_depth() {
        let args = FunsonArgs::try_parse_from(["funson", "prog.json", "--max-depth", "8"]).unwrap();
        assert_eq!(args.source, PathBuf::from("prog.json"));
        assert_eq!(args.max_depth, Some(8));
    }

    #[test]
    fn source_is_required() {
        assert!(FunsonArgs::try_parse_from(["funson"]).is_err());
    }
}
