//! Provider traits through which the engine reaches metadata.
//!
//! The engine itself is runtime-agnostic and stateless; every lookup goes
//! through one of these interfaces. Implementations may be backed by a
//! live registry, a database, or an in-memory snapshot (the engine crate
//! ships a snapshot implementation for bulk validation).
//!
//! All interfaces are synchronous. Implementations that front an async
//! store may block internally or pre-load; the engine never imposes a
//! runtime. Returning `None` from a lookup means "unknown" - the caller
//! decides how to degrade (validation reports a violation, description
//! rendering fails fast, generation substitutes the null marker).
//!
//! Providers must be safe for concurrent read access (`Send + Sync`);
//! the engine delegates that requirement outward rather than enforcing it
//! with its own locking.

/// Data element lookups.
pub trait DataElementProvider: Send + Sync {
    /// Whether the identifier names a known data element.
    fn exists(&self, id: &str) -> bool;

    /// Display name for the data element, or `None` if unknown.
    fn display_name(&self, id: &str) -> Option<String>;

    /// All category-option-combo identifiers applicable to this data
    /// element, or `None` if the data element is unknown.
    ///
    /// Used by total expansion. An empty set is a legal return and is
    /// handled as a distinguished error by the expander.
    fn category_option_combos(&self, id: &str) -> Option<Vec<String>>;
}

/// Category-option-combo lookups.
pub trait CategoryOptionComboProvider: Send + Sync {
    /// Whether the identifier names a known combo.
    fn exists(&self, id: &str) -> bool;

    /// Display name for the combo, or `None` if unknown.
    fn display_name(&self, id: &str) -> Option<String>;
}

/// Constant lookups.
pub trait ConstantProvider: Send + Sync {
    /// Whether the identifier names a known constant.
    fn exists(&self, id: &str) -> bool;

    /// Display name for the constant, or `None` if unknown.
    fn display_name(&self, id: &str) -> Option<String>;

    /// The constant's numeric value, or `None` if unknown.
    fn value(&self, id: &str) -> Option<f64>;
}

/// Organisation-unit group lookups.
pub trait OrgUnitGroupProvider: Send + Sync {
    /// Whether the identifier names a known group.
    fn exists(&self, id: &str) -> bool;

    /// Display name for the group, or `None` if unknown.
    fn display_name(&self, id: &str) -> Option<String>;

    /// Number of organisation units in the group, or `None` if unknown.
    fn member_count(&self, id: &str) -> Option<i64>;
}
