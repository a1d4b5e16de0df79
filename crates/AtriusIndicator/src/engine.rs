//! Indicator expression engine.
//!
//! [`IndicatorEngine`] composes the scanner-based stages (validate,
//! describe, explode, generate) with the arithmetic evaluator behind a
//! single facade over injected metadata providers.
//!
//! The engine is stateless across calls: every operation is a pure
//! function of formula text, evaluation context and whatever the
//! providers answer. It holds no locks and spawns no work, so it is safe
//! for unlimited concurrent use as long as the providers themselves are
//! safe for concurrent reads - a requirement delegated outward, not
//! enforced here. The engine is cheap to clone (shared `Arc` references).

use crate::generator::EvaluationContext;
use crate::registry::MetadataSnapshot;
use crate::scanner;
use crate::tokens::{CONSTANT_PATTERN, ORG_UNIT_GROUP_PATTERN};
use crate::{arithmetic, description, explode, generator, validator};
use atrius_indicator_support::{
    CategoryOptionComboProvider, ConstantProvider, DataElementProvider, DescriptionError,
    ExplodeError, IndicatorExpression, OrgUnitGroupProvider, Violation,
};
use std::sync::Arc;
use tracing::debug;

/// Metadata collaborators for an [`IndicatorEngine`].
#[derive(Clone)]
pub struct EngineConfig {
    /// Data element lookups.
    pub data_elements: Arc<dyn DataElementProvider>,
    /// Category-option-combo lookups.
    pub category_option_combos: Arc<dyn CategoryOptionComboProvider>,
    /// Constant lookups.
    pub constants: Arc<dyn ConstantProvider>,
    /// Organisation-unit group lookups.
    pub org_unit_groups: Arc<dyn OrgUnitGroupProvider>,
}

/// The expression engine facade.
#[derive(Clone)]
pub struct IndicatorEngine {
    config: EngineConfig,
}

impl IndicatorEngine {
    /// Create an engine over explicit providers.
    pub fn new(config: EngineConfig) -> Self {
        IndicatorEngine { config }
    }

    /// Create an engine where one metadata snapshot answers all four
    /// provider roles.
    pub fn from_snapshot(snapshot: MetadataSnapshot) -> Self {
        let shared = Arc::new(snapshot);
        IndicatorEngine {
            config: EngineConfig {
                data_elements: shared.clone(),
                category_option_combos: shared.clone(),
                constants: shared.clone(),
                org_unit_groups: shared,
            },
        }
    }

    /// Validate a formula against the configured universe.
    pub fn validate(&self, expression: &str) -> Result<(), Violation> {
        validator::validate(
            expression,
            self.config.data_elements.as_ref(),
            self.config.category_option_combos.as_ref(),
            self.config.constants.as_ref(),
            self.config.org_unit_groups.as_ref(),
        )
    }

    /// Render a validated formula for display.
    pub fn describe(&self, expression: &str) -> Result<String, DescriptionError> {
        description::describe(
            expression,
            self.config.data_elements.as_ref(),
            self.config.category_option_combos.as_ref(),
            self.config.constants.as_ref(),
            self.config.org_unit_groups.as_ref(),
        )
    }

    /// Expand total references into explicit per-combo sums.
    pub fn explode(&self, expression: &str) -> Result<String, ExplodeError> {
        explode::explode(expression, self.config.data_elements.as_ref())
    }

    /// Substitute context values, yielding arithmetic text or `None` for
    /// "skip". Uses the expression's exploded form when present.
    pub fn generate(
        &self,
        expression: &IndicatorExpression,
        context: &EvaluationContext,
    ) -> Option<String> {
        generator::generate(
            expression.evaluation_text(),
            context,
            expression.missing_value_policy,
        )
    }

    /// Fill constant values and group member counts referenced by the
    /// formula into the context from the configured providers, without
    /// overwriting anything the caller already set.
    ///
    /// Measured operand values always come from the caller; this only
    /// seeds the reference data the providers own.
    pub fn seed_context(&self, expression: &str, context: &mut EvaluationContext) {
        for id in scanner::collect(expression, &CONSTANT_PATTERN, |caps| caps[1].to_string()) {
            if context.constant(&id).is_none() {
                if let Some(value) = self.config.constants.value(&id) {
                    context.set_constant(id, value);
                }
            }
        }
        for id in scanner::collect(expression, &ORG_UNIT_GROUP_PATTERN, |caps| {
            caps[1].to_string()
        }) {
            if context.group_count(&id).is_none() {
                if let Some(count) = self.config.org_unit_groups.member_count(&id) {
                    context.set_group_count(id, count);
                }
            }
        }
    }

    /// Evaluate a formula for one context: generate, then run the
    /// arithmetic evaluator.
    ///
    /// Returns `None` both when the policy skips the evaluation and when
    /// the evaluator rejects the generated text (missing value under
    /// `NeverSkip`, division by zero, malformed residue). Either way
    /// there is no result for this context; the condition is logged at
    /// debug level and the caller continues its batch.
    pub fn evaluate(
        &self,
        expression: &IndicatorExpression,
        context: &EvaluationContext,
    ) -> Option<f64> {
        let generated = self.generate(expression, context)?;
        match arithmetic::evaluate(&generated) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(
                    expression = expression.expression.as_str(),
                    generated = generated.as_str(),
                    error = %err,
                    "no result for this context"
                );
                None
            }
        }
    }
}
