//! Data models for the indicator server and CLI.
//!
//! Request/response DTOs for the expression endpoints plus the evaluation
//! context payload shared by the server and the CLI context file format.

use crate::generator::EvaluationContext;
use atrius_indicator_support::{MissingValuePolicy, Violation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request carrying a bare formula (validate, describe, explode).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExpressionRequest {
    /// The formula text.
    pub expression: String,
}

/// Outcome of a validation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// `VALID` or `ERROR`.
    pub status: String,
    /// Violation code when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Rendered description when valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValidateResponse {
    /// Response for a formula that passed validation.
    pub fn valid(description: String) -> Self {
        ValidateResponse {
            status: "VALID".to_string(),
            code: None,
            message: "Valid".to_string(),
            description: Some(description),
        }
    }

    /// Response for a formula that failed validation.
    pub fn invalid(violation: &Violation) -> Self {
        ValidateResponse {
            status: "ERROR".to_string(),
            code: Some(violation.code().to_string()),
            message: violation.to_string(),
            description: None,
        }
    }
}

/// Response carrying a rendered description.
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    /// The formula with references replaced by display names.
    pub description: String,
}

/// Response carrying exploded formula text.
#[derive(Debug, Serialize)]
pub struct ExplodeResponse {
    /// The formula with total references expanded.
    pub exploded: String,
}

/// One measured value in a context payload.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValueEntry {
    /// Data element identifier.
    pub data_element: String,
    /// Category-option-combo identifier; absent for a total coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_option_combo: Option<String>,
    /// The measured value.
    pub value: f64,
    /// Whether the value is complete; incomplete values count as missing
    /// under the skip policies.
    #[serde(default = "default_complete")]
    pub complete: bool,
}

fn default_complete() -> bool {
    true
}

/// Wire form of an evaluation context.
///
/// Constants and group counts may be omitted; the server and CLI seed
/// them from the metadata snapshot for every reference the formula makes
/// (explicit entries here win).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextPayload {
    /// Measured values.
    #[serde(default)]
    pub values: Vec<DataValueEntry>,
    /// Constant values by identifier.
    #[serde(default)]
    pub constants: HashMap<String, f64>,
    /// Group member counts by identifier.
    #[serde(default)]
    pub org_unit_group_counts: HashMap<String, i64>,
    /// Days in the reporting period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

impl ContextPayload {
    /// Build the engine-side evaluation context.
    pub fn into_context(self) -> EvaluationContext {
        let mut context = EvaluationContext::new();
        for entry in self.values {
            let operand = atrius_indicator_support::DataElementOperand {
                data_element: entry.data_element,
                category_option_combo: entry.category_option_combo,
            };
            context.set_value(operand.clone(), entry.value);
            if !entry.complete {
                context.mark_incomplete(operand);
            }
        }
        for (id, value) in self.constants {
            context.set_constant(id, value);
        }
        for (id, count) in self.org_unit_group_counts {
            context.set_group_count(id, count);
        }
        if let Some(days) = self.days {
            context.set_days(days);
        }
        context
    }
}

/// Request for an evaluation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    /// The formula text.
    pub expression: String,
    /// Missing-value policy; defaults to `NEVER_SKIP`.
    #[serde(default)]
    pub missing_value_policy: MissingValuePolicy,
    /// Measured values and reference data for this evaluation.
    #[serde(default)]
    pub context: ContextPayload,
}

/// Outcome of an evaluation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    /// The numeric result; absent when the evaluation was skipped or
    /// produced no result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// The generated arithmetic text, when generation ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    /// Whether the missing-value policy skipped this evaluation.
    pub skipped: bool,
}
