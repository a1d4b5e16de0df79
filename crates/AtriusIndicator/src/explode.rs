//! Total-reference expansion.
//!
//! Rewrites every total-form operand (`#{de}`) into a parenthesized sum
//! over the data element's category-option combos
//! (`(#{de.cocA}+#{de.cocB}+...)`), so evaluation only ever sees explicit
//! coordinates. Value-form operands and all non-operand text pass through
//! unchanged, which makes expansion idempotent: exploded text contains no
//! total references left to expand.
//!
//! Expansion is done once per formula, ahead of repeated evaluation. The
//! result is derived data: when a data element's combo set changes, any
//! cached exploded text is stale. [`ExplodedCache`] gives callers an
//! explicit place to own that lifecycle, keyed by metadata snapshot
//! version - the expression value itself is never mutated in place.

use crate::scanner;
use crate::tokens::{self, OPERAND_PATTERN};
use atrius_indicator_support::{DataElementProvider, ExplodeError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Expand total references in a formula.
///
/// Precondition: every total reference names an existing data element
/// with at least one category-option combo. Violations are hard errors -
/// an unknown element is [`ExplodeError::UnknownDataElement`], and an
/// empty combo set is [`ExplodeError::NoCategoryCombos`] because an empty
/// sum is not well-formed arithmetic.
pub fn explode(
    expression: &str,
    data_elements: &dyn DataElementProvider,
) -> Result<String, ExplodeError> {
    scanner::try_rewrite(expression, &OPERAND_PATTERN, |caps| {
        let operand = tokens::operand_from_captures(caps);
        if !operand.is_total() {
            return Ok(caps[0].to_string());
        }
        let combos = data_elements
            .category_option_combos(&operand.data_element)
            .ok_or_else(|| ExplodeError::UnknownDataElement(operand.data_element.clone()))?;
        if combos.is_empty() {
            return Err(ExplodeError::NoCategoryCombos(operand.data_element.clone()));
        }
        let sum = combos
            .iter()
            .map(|combo| format!("#{{{}.{}}}", operand.data_element, combo))
            .collect::<Vec<_>>()
            .join("+");
        Ok(format!("({})", sum))
    })
}

/// Caller-owned cache of exploded formula text.
///
/// Entries are keyed by (formula text, metadata snapshot version); a
/// version bump naturally misses the cache, and [`purge_stale`] drops
/// entries from older snapshots. The cache holds no reference to any
/// provider - it is plain shared state, safe for concurrent use.
///
/// [`purge_stale`]: ExplodedCache::purge_stale
#[derive(Debug, Default)]
pub struct ExplodedCache {
    entries: RwLock<HashMap<(String, u64), String>>,
}

impl ExplodedCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached exploded text for this formula and snapshot
    /// version, expanding and storing it on a miss.
    pub fn get_or_explode(
        &self,
        expression: &str,
        snapshot_version: u64,
        data_elements: &dyn DataElementProvider,
    ) -> Result<String, ExplodeError> {
        let key = (expression.to_string(), snapshot_version);
        if let Some(hit) = self.entries.read().get(&key) {
            return Ok(hit.clone());
        }
        let exploded = explode(expression, data_elements)?;
        self.entries.write().insert(key, exploded.clone());
        Ok(exploded)
    }

    /// Drop entries cached under snapshot versions older than `current`.
    pub fn purge_stale(&self, current: u64) {
        self.entries
            .write()
            .retain(|(_, version), _| *version == current);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
