//! Human-readable rendering of formula text.
//!
//! Every reference is replaced by its referent's display name; literal
//! arithmetic passes through untouched. Unlike validation this is
//! *fail-fast*: description runs against formulas that already passed
//! validation, so an unresolvable reference means the caller broke the
//! contract (stale universe, formula edited after validation) and is a
//! hard [`DescriptionError`], never a silent degrade.

use crate::scanner;
use crate::tokens::{
    self, CONSTANT_PATTERN, DAYS_DESCRIPTION, DAYS_PATTERN, OPERAND_PATTERN,
    ORG_UNIT_GROUP_PATTERN,
};
use atrius_indicator_support::{
    CategoryOptionComboProvider, ConstantProvider, DataElementProvider, DescriptionError,
    OrgUnitGroupProvider, ReferenceKind,
};

/// Render a validated formula for display or audit.
///
/// Value operands render as `data-element name:combo name`, totals as the
/// data-element name alone, and `[days]` as a fixed phrase.
pub fn describe(
    expression: &str,
    data_elements: &dyn DataElementProvider,
    combos: &dyn CategoryOptionComboProvider,
    constants: &dyn ConstantProvider,
    org_unit_groups: &dyn OrgUnitGroupProvider,
) -> Result<String, DescriptionError> {
    let unresolved = |kind: ReferenceKind, id: &str| DescriptionError::UnresolvedReference {
        kind,
        id: id.to_string(),
    };

    let text = scanner::try_rewrite(expression, &OPERAND_PATTERN, |caps| {
        let operand = tokens::operand_from_captures(caps);
        let element_name = data_elements
            .display_name(&operand.data_element)
            .ok_or_else(|| unresolved(ReferenceKind::Operand, &operand.data_element))?;
        match operand.category_option_combo {
            Some(combo) => {
                let combo_name = combos
                    .display_name(&combo)
                    .ok_or_else(|| unresolved(ReferenceKind::Operand, &combo))?;
                Ok(format!("{}:{}", element_name, combo_name))
            }
            None => Ok(element_name),
        }
    })?;

    let text = scanner::try_rewrite(&text, &CONSTANT_PATTERN, |caps| {
        constants
            .display_name(&caps[1])
            .ok_or_else(|| unresolved(ReferenceKind::Constant, &caps[1]))
    })?;

    let text = scanner::try_rewrite(&text, &ORG_UNIT_GROUP_PATTERN, |caps| {
        org_unit_groups
            .display_name(&caps[1])
            .ok_or_else(|| unresolved(ReferenceKind::OrgUnitGroup, &caps[1]))
    })?;

    Ok(scanner::rewrite(&text, &DAYS_PATTERN, |_| {
        DAYS_DESCRIPTION.to_string()
    }))
}
