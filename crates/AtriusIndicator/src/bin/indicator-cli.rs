//! Indicator expression CLI executable.
//!
//! Command-line access to validation, description, total expansion and
//! evaluation of indicator expression formulas.
//!
//! See the cli module documentation for detailed usage information.

use atrius_indicator_expr::cli::{Args, run_cli};
use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    run_cli(args)?;
    Ok(())
}
