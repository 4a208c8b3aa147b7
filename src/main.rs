//! `goindex`: CLI front-end that runs the whole-program analyzer over a
//! fixture program and prints a summary of the resulting type registry.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use goindex_core::{AnalysisResult, Analyzer, AnalyzerConfig};
use goindex_input::CheckedProgram;

mod demo;
mod report;

/// Runs the selector-promotion / implementation-matching pipeline over a
/// fixture program and prints a summary.
#[derive(Parser, Debug)]
#[command(name = "goindex", about, version)]
struct Cli {
    /// Path to a JSON-serialized `CheckedProgram` fixture. Omit to run the
    /// built-in demo program instead.
    #[arg(long, value_name = "FILE")]
    fixture: Option<PathBuf>,

    /// Import path of the builtin package's checker-internal universe copy,
    /// enabling the builtin/universe aliasing special case and runtime
    /// function position harvesting.
    #[arg(long, value_name = "IMPORT_PATH", default_value = "")]
    builtin_package: String,

    /// Treat any same-name overlap between embedded interfaces as fatal,
    /// even when the signatures agree (see `AnalyzerConfig`).
    #[arg(long)]
    strict_interface_overlap: bool,

    /// Print every type's direct selectors, promoted selectors, and
    /// implementation edges, not just exported named types.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    goindex_common::trace::init();

    let cli = Cli::parse();

    let program = match &cli.fixture {
        Some(path) => load_fixture(path)?,
        None => demo::build_demo_program(),
    };

    let config = AnalyzerConfig { strict_interface_overlap: cli.strict_interface_overlap, builtin_package_path: cli.builtin_package };

    let result = Analyzer::new(config).analyze(&program).context("analysis failed")?;

    report::print_summary(&result, cli.verbose);

    Ok(())
}

fn load_fixture(path: &PathBuf) -> Result<CheckedProgram> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing fixture {}", path.display()))
}
