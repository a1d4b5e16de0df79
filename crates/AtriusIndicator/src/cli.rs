//! # Indicator Expression CLI
//!
//! Command-line access to the expression engine: validate, describe,
//! explode or evaluate a formula against a metadata snapshot file and an
//! optional evaluation context file.
//!
//! ## Usage Examples
//!
//! ### Validate a formula
//! ```bash
//! indicator-cli -e "#{deA.cocA}+C{c1}" -m metadata.json --validate
//! ```
//!
//! ### Render its description
//! ```bash
//! indicator-cli -e "#{deA.cocA}+C{c1}" -m metadata.json --describe
//! ```
//!
//! ### Expand total references
//! ```bash
//! indicator-cli -e "#{deA}/[days]" -m metadata.json --explode
//! ```
//!
//! ### Evaluate against a context file
//! ```bash
//! indicator-cli -e "#{deA}/[days]" -m metadata.json -v context.json --days 30
//! ```
//!
//! The context file is a JSON [`ContextPayload`]: measured values,
//! optional constant and group-count overrides, and an optional day
//! count. Constants and group counts the formula references are seeded
//! from the snapshot when the file does not set them.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::debug;

use crate::arithmetic;
use crate::engine::IndicatorEngine;
use crate::error::ExpressionResult;
use crate::models::{
    ContextPayload, DescribeResponse, EvaluateResponse, ExplodeResponse, ValidateResponse,
};
use crate::registry::MetadataSnapshot;
use atrius_indicator_support::{IndicatorExpression, MissingValuePolicy};

#[derive(Parser, Debug)]
#[command(name = "indicator-cli")]
#[command(about = "Validate, describe, expand and evaluate indicator expressions")]
#[command(
    long_about = "Operate on indicator expression formulas against a metadata snapshot file.\nWithout a mode flag the formula is evaluated against the supplied context."
)]
pub struct Args {
    /// Formula text to operate on
    #[arg(short, long)]
    pub expression: String,

    /// Path to the metadata snapshot JSON file
    #[arg(short, long)]
    pub metadata: PathBuf,

    /// Path to the evaluation context JSON file
    #[arg(short = 'v', long)]
    pub values: Option<PathBuf>,

    /// Missing-value policy applied during evaluation
    #[arg(long, default_value = "NEVER_SKIP")]
    pub policy: MissingValuePolicy,

    /// Days in the reporting period (overrides the context file)
    #[arg(long)]
    pub days: Option<i64>,

    /// Validate the formula and report the outcome
    #[arg(long)]
    pub validate: bool,

    /// Render the formula description
    #[arg(long)]
    pub describe: bool,

    /// Expand total references and print the exploded formula
    #[arg(long)]
    pub explode: bool,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Main CLI execution function.
pub fn run_cli(args: Args) -> ExpressionResult<()> {
    let json = fs::read_to_string(&args.metadata)?;
    let snapshot = MetadataSnapshot::from_json(&json)?;
    let engine = IndicatorEngine::from_snapshot(snapshot);

    if args.validate {
        let response = match engine.validate(&args.expression) {
            Ok(()) => ValidateResponse::valid(engine.describe(&args.expression)?),
            Err(violation) => ValidateResponse::invalid(&violation),
        };
        return write_output(&response, args.output.as_deref());
    }

    if args.describe {
        let description = engine.describe(&args.expression)?;
        return write_output(&DescribeResponse { description }, args.output.as_deref());
    }

    if args.explode {
        let exploded = engine.explode(&args.expression)?;
        return write_output(&ExplodeResponse { exploded }, args.output.as_deref());
    }

    // Default mode: evaluate.
    let mut payload = match &args.values {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            serde_json::from_str::<ContextPayload>(&json)?
        }
        None => ContextPayload::default(),
    };
    if args.days.is_some() {
        payload.days = args.days;
    }

    let exploded = engine.explode(&args.expression)?;
    let expression =
        IndicatorExpression::new(args.expression, args.policy).with_exploded(exploded);

    let mut context = payload.into_context();
    engine.seed_context(expression.evaluation_text(), &mut context);

    let response = match engine.generate(&expression, &context) {
        None => EvaluateResponse {
            value: None,
            generated: None,
            skipped: true,
        },
        Some(generated) => {
            let value = match arithmetic::evaluate(&generated) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(error = %err, "no result for this context");
                    None
                }
            };
            EvaluateResponse {
                value,
                generated: Some(generated),
                skipped: false,
            }
        }
    };
    write_output(&response, args.output.as_deref())
}

/// Serialize a response as pretty JSON to the output target.
fn write_output<T: Serialize>(value: &T, output: Option<&std::path::Path>) -> ExpressionResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            writeln!(file, "{}", json)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }
    Ok(())
}
