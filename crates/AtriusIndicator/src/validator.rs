//! Referential-integrity validation of formula text.
//!
//! Validation is *result-typed*: user-authored formulas fail often, so
//! every failure is a [`Violation`] value, cheap to produce and to check
//! in bulk. The function is pure - same formula, same universe, same
//! outcome - and never mutates the formula.
//!
//! The identifier universe is whatever the supplied providers answer for:
//! a live registry, or an in-memory snapshot (see [`crate::registry`])
//! when validating many formulas without per-reference lookups.

use crate::arithmetic;
use crate::scanner;
use crate::tokens::{
    self, CONSTANT_PATTERN, DAYS_PATTERN, DUMMY_LITERAL, OPERAND_PATTERN, ORG_UNIT_GROUP_PATTERN,
};
use atrius_indicator_support::{
    CategoryOptionComboProvider, ConstantProvider, DataElementProvider, OrgUnitGroupProvider,
    Violation,
};

/// Validate a formula against the supplied identifier universe.
///
/// Runs the four scanner passes in their fixed order; the first
/// unresolved reference short-circuits with its specific violation. When
/// every reference resolves, the residual text (references replaced by a
/// dummy literal) must parse as arithmetic.
pub fn validate(
    expression: &str,
    data_elements: &dyn DataElementProvider,
    combos: &dyn CategoryOptionComboProvider,
    constants: &dyn ConstantProvider,
    org_unit_groups: &dyn OrgUnitGroupProvider,
) -> Result<(), Violation> {
    if expression.trim().is_empty() {
        return Err(Violation::EmptyExpression);
    }

    // Pass 1: operands. Both halves of the coordinate must resolve; the
    // combo half only exists for value-form references.
    let text = scanner::try_rewrite(expression, &OPERAND_PATTERN, |caps| {
        let operand = tokens::operand_from_captures(caps);
        if !data_elements.exists(&operand.data_element) {
            return Err(Violation::DataElementNotFound(operand.data_element));
        }
        if let Some(combo) = operand.category_option_combo {
            if !combos.exists(&combo) {
                return Err(Violation::CategoryOptionComboNotFound(combo));
            }
        }
        Ok(DUMMY_LITERAL.to_string())
    })?;

    // Pass 2: constants.
    let text = scanner::try_rewrite(&text, &CONSTANT_PATTERN, |caps| {
        let id = &caps[1];
        if !constants.exists(id) {
            return Err(Violation::ConstantNotFound(id.to_string()));
        }
        Ok(DUMMY_LITERAL.to_string())
    })?;

    // Pass 3: org unit groups.
    let text = scanner::try_rewrite(&text, &ORG_UNIT_GROUP_PATTERN, |caps| {
        let id = &caps[1];
        if !org_unit_groups.exists(id) {
            return Err(Violation::OrgUnitGroupNotFound(id.to_string()));
        }
        Ok(DUMMY_LITERAL.to_string())
    })?;

    // Pass 4: days placeholder, no identifier to check.
    let text = scanner::rewrite(&text, &DAYS_PATTERN, |_| DUMMY_LITERAL.to_string());

    arithmetic::check_syntax(&text).map_err(Violation::MalformedArithmetic)
}
