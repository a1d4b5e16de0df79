//! Value substitution under a missing-value policy.
//!
//! Turns formula text plus an evaluation context into a pure-arithmetic
//! string, or decides to skip the evaluation altogether. Missing values
//! are an expected runtime condition here, not an error: the policy says
//! whether they skip the formula or substitute the `null` marker that the
//! arithmetic evaluator later rejects.

use crate::scanner;
use crate::tokens::{
    self, CONSTANT_PATTERN, DAYS_PATTERN, NULL_MARKER, OPERAND_PATTERN, ORG_UNIT_GROUP_PATTERN,
};
use atrius_indicator_support::{DataElementOperand, MissingValuePolicy};
use std::collections::{HashMap, HashSet};

/// Per-evaluation data: measured values, constants, group counts and the
/// day count for one (organisation unit, period, ...) combination.
///
/// The context has no persistent identity; callers build one per
/// evaluation call. Measured values may be sparse, and a present value
/// can be marked *incomplete* by the caller (e.g. aggregated from partial
/// reporting), in which case it counts as missing for policy purposes.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    values: HashMap<DataElementOperand, f64>,
    incomplete: HashSet<DataElementOperand>,
    constants: HashMap<String, f64>,
    org_unit_group_counts: HashMap<String, i64>,
    days: Option<i64>,
}

impl EvaluationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measured value at an operand coordinate.
    pub fn set_value(&mut self, operand: DataElementOperand, value: f64) {
        self.values.insert(operand, value);
    }

    /// Flag an operand's value as incomplete; it will count as missing.
    pub fn mark_incomplete(&mut self, operand: DataElementOperand) {
        self.incomplete.insert(operand);
    }

    /// Record a constant value.
    pub fn set_constant(&mut self, id: impl Into<String>, value: f64) {
        self.constants.insert(id.into(), value);
    }

    /// Record an organisation-unit group member count.
    pub fn set_group_count(&mut self, id: impl Into<String>, count: i64) {
        self.org_unit_group_counts.insert(id.into(), count);
    }

    /// Set the number of days in the evaluated period.
    pub fn set_days(&mut self, days: i64) {
        self.days = Some(days);
    }

    /// The usable value at an operand coordinate: `None` when absent or
    /// flagged incomplete.
    pub fn value(&self, operand: &DataElementOperand) -> Option<f64> {
        if self.incomplete.contains(operand) {
            return None;
        }
        self.values.get(operand).copied()
    }

    /// The value of a constant, if known.
    pub fn constant(&self, id: &str) -> Option<f64> {
        self.constants.get(id).copied()
    }

    /// The member count of a group, if known.
    pub fn group_count(&self, id: &str) -> Option<i64> {
        self.org_unit_group_counts.get(id).copied()
    }

    /// The day count, if supplied.
    pub fn days(&self) -> Option<i64> {
        self.days
    }
}

/// Render a measured value or constant as arithmetic text.
///
/// Values always carry a fractional part (`10` becomes `10.0`) so the
/// generated text reads as decimal arithmetic; counts and day numbers are
/// substituted as plain integers elsewhere.
pub fn numeric_literal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Substitute context values into a formula, yielding arithmetic text or
/// `None` for "skip this evaluation".
///
/// The operand pass runs first and alone decides skipping: under
/// [`MissingValuePolicy::SkipIfAnyMissing`] one missing operand aborts
/// before any substitution; under
/// [`MissingValuePolicy::SkipIfAllMissing`] the formula is skipped when
/// it contains operand references and every one of them is missing.
/// Whatever proceeds substitutes the `null` marker for each missing
/// operand, unknown constant, unknown group and unsupplied day count.
pub fn generate(
    expression: &str,
    context: &EvaluationContext,
    policy: MissingValuePolicy,
) -> Option<String> {
    // Resolve all operand matches up front so the policy decision happens
    // before any rewriting.
    let lookups: Vec<Option<f64>> = scanner::collect(expression, &OPERAND_PATTERN, |caps| {
        context.value(&tokens::operand_from_captures(caps))
    });
    let total = lookups.len();
    let present = lookups.iter().filter(|value| value.is_some()).count();

    match policy {
        MissingValuePolicy::SkipIfAnyMissing if present < total => return None,
        MissingValuePolicy::SkipIfAllMissing if total > 0 && present == 0 => return None,
        _ => {}
    }

    let mut next = 0;
    let text = scanner::rewrite(expression, &OPERAND_PATTERN, |_caps| {
        let value = lookups[next];
        next += 1;
        match value {
            Some(v) => numeric_literal(v),
            None => NULL_MARKER.to_string(),
        }
    });

    let text = scanner::rewrite(&text, &CONSTANT_PATTERN, |caps| {
        match context.constant(&caps[1]) {
            Some(v) => numeric_literal(v),
            None => NULL_MARKER.to_string(),
        }
    });

    let text = scanner::rewrite(&text, &ORG_UNIT_GROUP_PATTERN, |caps| {
        match context.group_count(&caps[1]) {
            Some(count) => count.to_string(),
            None => NULL_MARKER.to_string(),
        }
    });

    let text = scanner::rewrite(&text, &DAYS_PATTERN, |_| match context.days() {
        Some(days) => days.to_string(),
        None => NULL_MARKER.to_string(),
    });

    Some(text)
}
