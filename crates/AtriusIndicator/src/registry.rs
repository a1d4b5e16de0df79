//! In-memory metadata snapshot.
//!
//! [`MetadataSnapshot`] is the "closed universe" implementation of all
//! four provider traits: a serde-loadable bundle of known identifiers and
//! display data. It is what bulk validation runs against (no
//! per-reference registry round-trips), what the CLI and server load from
//! a file at startup, and what tests build inline.
//!
//! The snapshot carries a `version` so derived data (exploded formula
//! text) can be cache-keyed against it; bump it whenever the snapshot
//! content changes.

use atrius_indicator_support::{
    CategoryOptionComboProvider, ConstantProvider, DataElementProvider, OrgUnitGroupProvider,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A data element known to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElementRecord {
    /// Display name.
    pub name: String,
    /// Identifiers of all category-option combos applicable to this
    /// element, in presentation order.
    #[serde(default)]
    pub category_option_combos: Vec<String>,
}

/// A constant known to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstantRecord {
    /// Display name.
    pub name: String,
    /// Fixed numeric value.
    pub value: f64,
}

/// An organisation-unit group known to the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitGroupRecord {
    /// Display name.
    pub name: String,
    /// Number of organisation units in the group.
    pub member_count: i64,
}

/// A closed identifier universe with display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSnapshot {
    /// Monotonic content version, used to key derived-data caches.
    #[serde(default)]
    version: u64,
    #[serde(default)]
    data_elements: HashMap<String, DataElementRecord>,
    /// Combo id to display name.
    #[serde(default)]
    category_option_combos: HashMap<String, String>,
    #[serde(default)]
    constants: HashMap<String, ConstantRecord>,
    #[serde(default)]
    org_unit_groups: HashMap<String, OrgUnitGroupRecord>,
}

impl MetadataSnapshot {
    /// Create an empty snapshot at version 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Current content version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump the content version, invalidating caches keyed on it.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// Add a data element with its applicable combo identifiers.
    pub fn with_data_element(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        combos: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.data_elements.insert(
            id.into(),
            DataElementRecord {
                name: name.into(),
                category_option_combos: combos.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Add a category-option combo.
    pub fn with_category_option_combo(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        self.category_option_combos.insert(id.into(), name.into());
        self
    }

    /// Add a constant.
    pub fn with_constant(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        self.constants.insert(
            id.into(),
            ConstantRecord {
                name: name.into(),
                value,
            },
        );
        self
    }

    /// Add an organisation-unit group.
    pub fn with_org_unit_group(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        member_count: i64,
    ) -> Self {
        self.org_unit_groups.insert(
            id.into(),
            OrgUnitGroupRecord {
                name: name.into(),
                member_count,
            },
        );
        self
    }

    /// Remove a data element (its combos stay registered).
    pub fn remove_data_element(&mut self, id: &str) {
        self.data_elements.remove(id);
    }
}

impl DataElementProvider for MetadataSnapshot {
    fn exists(&self, id: &str) -> bool {
        self.data_elements.contains_key(id)
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.data_elements.get(id).map(|record| record.name.clone())
    }

    fn category_option_combos(&self, id: &str) -> Option<Vec<String>> {
        self.data_elements
            .get(id)
            .map(|record| record.category_option_combos.clone())
    }
}

impl CategoryOptionComboProvider for MetadataSnapshot {
    fn exists(&self, id: &str) -> bool {
        self.category_option_combos.contains_key(id)
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.category_option_combos.get(id).cloned()
    }
}

impl ConstantProvider for MetadataSnapshot {
    fn exists(&self, id: &str) -> bool {
        self.constants.contains_key(id)
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.constants.get(id).map(|record| record.name.clone())
    }

    fn value(&self, id: &str) -> Option<f64> {
        self.constants.get(id).map(|record| record.value)
    }
}

impl OrgUnitGroupProvider for MetadataSnapshot {
    fn exists(&self, id: &str) -> bool {
        self.org_unit_groups.contains_key(id)
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.org_unit_groups.get(id).map(|record| record.name.clone())
    }

    fn member_count(&self, id: &str) -> Option<i64> {
        self.org_unit_groups.get(id).map(|record| record.member_count)
    }
}
