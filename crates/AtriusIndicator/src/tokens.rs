//! Token grammar for indicator formula references.
//!
//! Four reference grammars are recognized in formula text, each scanned by
//! its own pass (see [`crate::scanner`]):
//!
//! | Kind                  | Shape            | Example        |
//! |-----------------------|------------------|----------------|
//! | Operand (value)       | `#{de.coc}`      | `#{fbfb3f.Gx1}`|
//! | Operand (total)       | `#{de}`          | `#{fbfb3f}`    |
//! | Constant              | `C{id}`          | `C{penta1}`    |
//! | Org unit group count  | `OUG{id}`        | `OUG{rural}`   |
//! | Days in period        | `[days]`         | `[days]`       |
//!
//! Identifiers are a letter followed by letters and digits. Text that does
//! not match any grammar is never an error at scan time; it passes through
//! literally and is rejected, if at all, by the arithmetic grammar
//! downstream.

use atrius_indicator_support::DataElementOperand;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// The days-in-period placeholder literal.
pub const DAYS_TOKEN: &str = "[days]";

/// Human phrase substituted for `[days]` in descriptions.
pub const DAYS_DESCRIPTION: &str = "Number of days";

/// Non-numeric literal substituted for absent values.
///
/// The arithmetic grammar parses this token, and evaluating it fails with
/// `EvaluationError::MissingValue` - absent data surfaces as "no result"
/// instead of silently reading zero.
pub const NULL_MARKER: &str = "null";

/// Dummy numeric literal used when validating residual arithmetic.
pub const DUMMY_LITERAL: &str = "1";

/// Matches `#{de}` and `#{de.coc}`. Group 1 is the data element, group 2
/// the optional category-option combo.
pub static OPERAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\{([A-Za-z][A-Za-z0-9]*)(?:\.([A-Za-z][A-Za-z0-9]*))?\}")
        .expect("operand pattern")
});

/// Matches `C{id}`. Group 1 is the constant identifier.
pub static CONSTANT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"C\{([A-Za-z][A-Za-z0-9]*)\}").expect("constant pattern"));

/// Matches `OUG{id}`. Group 1 is the group identifier.
pub static ORG_UNIT_GROUP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"OUG\{([A-Za-z][A-Za-z0-9]*)\}").expect("org unit group pattern"));

/// Matches the `[days]` placeholder.
pub static DAYS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[days\]").expect("days pattern"));

/// Build an operand from a match of [`OPERAND_PATTERN`].
pub fn operand_from_captures(caps: &Captures<'_>) -> DataElementOperand {
    let data_element = caps[1].to_string();
    let combo = caps.get(2).map(|m| m.as_str().to_string());
    DataElementOperand {
        data_element,
        category_option_combo: combo,
    }
}
