//! Expression value type and missing-value policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Governs what happens when a formula references values that are absent
/// from the evaluation context.
///
/// - `NeverSkip` forces generation through: absent values substitute the
///   `null` marker and the arithmetic evaluation surfaces them as
///   "no result" instead of silently reading zero.
/// - `SkipIfAnyMissing` skips the whole evaluation when any operand
///   reference is missing.
/// - `SkipIfAllMissing` skips only when *every* operand reference is
///   missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingValuePolicy {
    /// Always substitute; absent values become the `null` marker.
    #[default]
    NeverSkip,
    /// Skip the evaluation if any operand reference is missing.
    SkipIfAnyMissing,
    /// Skip the evaluation if all operand references are missing.
    SkipIfAllMissing,
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValuePolicy::NeverSkip => write!(f, "NEVER_SKIP"),
            MissingValuePolicy::SkipIfAnyMissing => write!(f, "SKIP_IF_ANY_MISSING"),
            MissingValuePolicy::SkipIfAllMissing => write!(f, "SKIP_IF_ALL_MISSING"),
        }
    }
}

impl FromStr for MissingValuePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEVER_SKIP" => Ok(MissingValuePolicy::NeverSkip),
            "SKIP_IF_ANY_MISSING" => Ok(MissingValuePolicy::SkipIfAnyMissing),
            "SKIP_IF_ALL_MISSING" => Ok(MissingValuePolicy::SkipIfAllMissing),
            other => Err(format!("unknown missing value policy: {}", other)),
        }
    }
}

/// A stored indicator or validation-rule formula.
///
/// Holds the raw formula text, the missing-value policy, and optionally a
/// cached *exploded* form (total references rewritten into explicit
/// per-combo sums). The exploded text is derived data owned by the caller:
/// it goes stale when the referenced data elements' combo sets change, and
/// regeneration is the caller's responsibility (see the engine crate's
/// exploded cache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorExpression {
    /// The raw formula text.
    pub expression: String,

    /// Cached exploded formula text, if the caller has materialized it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploded: Option<String>,

    /// Policy applied when referenced values are absent at evaluation time.
    #[serde(default)]
    pub missing_value_policy: MissingValuePolicy,
}

impl IndicatorExpression {
    /// Create an expression with the given policy and no exploded cache.
    pub fn new(expression: impl Into<String>, policy: MissingValuePolicy) -> Self {
        IndicatorExpression {
            expression: expression.into(),
            exploded: None,
            missing_value_policy: policy,
        }
    }

    /// Attach a precomputed exploded form.
    pub fn with_exploded(mut self, exploded: impl Into<String>) -> Self {
        self.exploded = Some(exploded.into());
        self
    }

    /// The text evaluation should run against: the exploded form when
    /// present, the raw text otherwise.
    pub fn evaluation_text(&self) -> &str {
        self.exploded.as_deref().unwrap_or(&self.expression)
    }
}
