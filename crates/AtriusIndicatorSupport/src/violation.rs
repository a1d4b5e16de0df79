//! Validation and contract-violation outcomes.
//!
//! Two distinct error philosophies live here on purpose:
//!
//! - [`Violation`] is *result-typed*: user-authored formulas fail
//!   validation all the time, so every failure is an ordinary value that
//!   is cheap to produce and check in bulk.
//! - [`DescriptionError`] and [`ExplodeError`] are *fail-fast*: those
//!   operations assume an already-validated formula, and an unresolved
//!   reference there means the caller broke the contract (stale universe,
//!   formula edited after validation).

use crate::operand::ReferenceKind;
use std::fmt;

/// A validation failure for a stored formula.
///
/// Returned by the validator as a value, never raised. The first
/// unresolved reference short-circuits, so a validation run reports at
/// most one violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The formula text is empty or whitespace.
    EmptyExpression,
    /// An operand references a data element the universe does not know.
    DataElementNotFound(String),
    /// An operand references a category-option combo the universe does
    /// not know.
    CategoryOptionComboNotFound(String),
    /// A constant reference does not resolve.
    ConstantNotFound(String),
    /// An organisation-unit group reference does not resolve.
    OrgUnitGroupNotFound(String),
    /// All references resolved but the residual text is not valid
    /// arithmetic.
    MalformedArithmetic(String),
}

impl Violation {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::EmptyExpression => "empty_expression",
            Violation::DataElementNotFound(_) => "data_element_not_found",
            Violation::CategoryOptionComboNotFound(_) => "category_option_combo_not_found",
            Violation::ConstantNotFound(_) => "constant_not_found",
            Violation::OrgUnitGroupNotFound(_) => "org_unit_group_not_found",
            Violation::MalformedArithmetic(_) => "malformed_arithmetic",
        }
    }
}

impl std::error::Error for Violation {}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::EmptyExpression => write!(f, "Expression is empty"),
            Violation::DataElementNotFound(id) => {
                write!(f, "Data element not found: {}", id)
            }
            Violation::CategoryOptionComboNotFound(id) => {
                write!(f, "Category option combo not found: {}", id)
            }
            Violation::ConstantNotFound(id) => write!(f, "Constant not found: {}", id),
            Violation::OrgUnitGroupNotFound(id) => {
                write!(f, "Organisation unit group not found: {}", id)
            }
            Violation::MalformedArithmetic(detail) => {
                write!(f, "Expression is not valid arithmetic: {}", detail)
            }
        }
    }
}

/// Failure while rendering a formula description.
///
/// Description rendering runs against formulas that already passed
/// validation; any unresolved reference here is a hard caller error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    /// A reference could not be resolved to a display name.
    UnresolvedReference {
        /// Which grammar the reference belongs to.
        kind: ReferenceKind,
        /// The identifier that failed to resolve.
        id: String,
    },
}

impl std::error::Error for DescriptionError {}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionError::UnresolvedReference { kind, id } => {
                write!(f, "Unresolved {} reference: {}", kind, id)
            }
        }
    }
}

/// Failure while expanding total references.
///
/// Exploding assumes every referenced data element exists and has at
/// least one category-option combo; violating either is a caller error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplodeError {
    /// A total reference names a data element the provider does not know.
    UnknownDataElement(String),
    /// The referenced data element has no category-option combos; an
    /// empty sum is not well-formed arithmetic.
    NoCategoryCombos(String),
}

impl std::error::Error for ExplodeError {}

impl fmt::Display for ExplodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplodeError::UnknownDataElement(id) => {
                write!(f, "Unknown data element in total reference: {}", id)
            }
            ExplodeError::NoCategoryCombos(id) => {
                write!(f, "Data element has no category option combos: {}", id)
            }
        }
    }
}
