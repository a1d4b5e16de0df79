//! Bulk validation and evaluation.
//!
//! The engine defines no cross-formula ordering, so bulk work is
//! embarrassingly parallel: one formula (or one context) per unit of
//! work, fanned out with rayon. Results are per-item; a failing item
//! never fails the batch.

use crate::engine::IndicatorEngine;
use crate::generator::EvaluationContext;
use atrius_indicator_support::{IndicatorExpression, Violation};
use rayon::prelude::*;

/// Validate many formulas against one universe.
///
/// Intended for dataset-wide checks with a snapshot-backed engine, where
/// lookups are in-memory and the work parallelizes cleanly.
pub fn validate_all(
    engine: &IndicatorEngine,
    expressions: &[String],
) -> Vec<Result<(), Violation>> {
    expressions
        .par_iter()
        .map(|expression| engine.validate(expression))
        .collect()
}

/// Evaluate one formula across many contexts (organisation units,
/// periods, ...).
///
/// Each slot in the result matches the context at the same index; `None`
/// means the policy skipped it or the evaluator produced no result.
pub fn evaluate_all(
    engine: &IndicatorEngine,
    expression: &IndicatorExpression,
    contexts: &[EvaluationContext],
) -> Vec<Option<f64>> {
    contexts
        .par_iter()
        .map(|context| engine.evaluate(expression, context))
        .collect()
}
