//! Error type for arithmetic evaluation failures.

use std::fmt;

/// Failure modes of the arithmetic evaluator.
///
/// These are runtime conditions of a single evaluation, distinct from
/// validation ([`crate::Violation`]) and from caller contract violations
/// ([`crate::DescriptionError`], [`crate::ExplodeError`]). Callers treat
/// any of these as "no result for this context" and continue the batch;
/// nothing here is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The generated text does not parse under the arithmetic grammar.
    ///
    /// Example: unbalanced parentheses, or a reference token left literal
    /// because it never matched a scanner grammar.
    MalformedExpression(String),
    /// A `null` marker was evaluated: at least one referenced value was
    /// absent under the `NeverSkip` policy.
    MissingValue,
    /// Division by zero.
    DivisionByZero,
    /// The result is not a finite number (overflow, 0/0).
    NonFinite,
}

impl std::error::Error for EvaluationError {}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::MalformedExpression(detail) => {
                write!(f, "Malformed expression: {}", detail)
            }
            EvaluationError::MissingValue => write!(f, "Missing value in expression"),
            EvaluationError::DivisionByZero => write!(f, "Division by zero"),
            EvaluationError::NonFinite => write!(f, "Result is not a finite number"),
        }
    }
}
