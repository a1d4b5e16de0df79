//! Reference model for indicator formula tokens.
//!
//! A formula references measured data through four token grammars. This
//! module defines the value-level model for those references: the operand
//! coordinate type and the closed set of reference kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (data element, category-option-combo) coordinate.
///
/// This is the atomic unit of measured-value lookup. The combo part is
/// optional: an operand without a combo is a **total** reference, meaning
/// "this data element summed across all its category-option combos".
///
/// # Examples
///
/// ```rust
/// use atrius_indicator_support::DataElementOperand;
///
/// let value = DataElementOperand::value("deA", "cocA");
/// assert!(!value.is_total());
///
/// let total = DataElementOperand::total("deA");
/// assert!(total.is_total());
/// assert_eq!(total.to_string(), "#{deA}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElementOperand {
    /// Identifier of the referenced data element.
    pub data_element: String,

    /// Identifier of the category-option combo, or `None` for a total
    /// reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_option_combo: Option<String>,
}

impl DataElementOperand {
    /// Create a value operand at a specific combo coordinate.
    pub fn value(data_element: impl Into<String>, combo: impl Into<String>) -> Self {
        DataElementOperand {
            data_element: data_element.into(),
            category_option_combo: Some(combo.into()),
        }
    }

    /// Create a total reference over a data element.
    pub fn total(data_element: impl Into<String>) -> Self {
        DataElementOperand {
            data_element: data_element.into(),
            category_option_combo: None,
        }
    }

    /// A reference is total-form iff its combo part is absent.
    pub fn is_total(&self) -> bool {
        self.category_option_combo.is_none()
    }
}

/// Renders the operand in its source token form (`#{de.coc}` or `#{de}`).
impl fmt::Display for DataElementOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category_option_combo {
            Some(combo) => write!(f, "#{{{}.{}}}", self.data_element, combo),
            None => write!(f, "#{{{}}}", self.data_element),
        }
    }
}

/// The closed set of reference grammars recognized in formula text.
///
/// Each kind has exactly one scanner pass and one substitution handler;
/// there is no runtime type inspection beyond this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    /// `#{de.coc}` or `#{de}` - a measured value or total.
    Operand,
    /// `C{id}` - a named constant.
    Constant,
    /// `OUG{id}` - an organisation-unit group member count.
    OrgUnitGroup,
    /// `[days]` - number of days in the reporting period.
    Days,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Operand => write!(f, "data element operand"),
            ReferenceKind::Constant => write!(f, "constant"),
            ReferenceKind::OrgUnitGroup => write!(f, "organisation unit group"),
            ReferenceKind::Days => write!(f, "days"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_form_iff_combo_absent() {
        assert!(DataElementOperand::total("deA").is_total());
        assert!(!DataElementOperand::value("deA", "cocA").is_total());
    }

    #[test]
    fn display_round_trips_token_form() {
        assert_eq!(
            DataElementOperand::value("deA", "cocA").to_string(),
            "#{deA.cocA}"
        );
        assert_eq!(DataElementOperand::total("deA").to_string(), "#{deA}");
    }
}
