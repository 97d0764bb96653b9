// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute names, search categories and thresholds used by the pipeline.
//!
//! The defaults match what Revit-authored models expose through a viewer.
//! Models exported with localized attribute names can override any field from
//! JSON; missing fields keep their defaults.

use mep_systems_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemsConfig {
    /// Label of the root node.
    pub root_name: String,
    /// Path of the root node; every other path extends it.
    pub root_path: String,

    /// Member attribute grouping electrical circuits.
    pub system_type_property: String,
    /// Member/leaf attribute naming the system(s) an element belongs to.
    pub system_name_property: String,
    /// Member/leaf attribute holding an electrical circuit number.
    pub circuit_number_property: String,
    /// Multi-valued attribute listing a system's member element ids.
    pub child_property: String,
    /// Hidden attribute holding a system's family name ("Duct System", ...).
    pub family_name_property: String,
    /// Attribute holding an element's category.
    pub category_property: String,
    /// Pseudo-attribute requesting the element name in bulk fetches.
    pub name_property: String,

    /// Hidden attribute searched for system categories.
    pub category_attribute: String,
    /// Categories searched for system entities, in order.
    pub system_categories: Vec<String>,
    /// Category searched again for circuit instances.
    pub electrical_category: String,
    /// Category value identifying system family types.
    pub family_type_category: String,
    /// Category value excluded from the circuit instance pass.
    pub host_category: String,

    /// Leaf records with fewer properties are not grouped.
    pub min_leaf_properties: usize,
    /// Separator of multi-system lists in the system name attribute.
    pub list_separator: char,
}

impl Default for SystemsConfig {
    fn default() -> Self {
        Self {
            root_name: "Systems".into(),
            root_path: "systems".into(),
            system_type_property: "System Type".into(),
            system_name_property: "System Name".into(),
            circuit_number_property: "Circuit Number".into(),
            child_property: "child".into(),
            family_name_property: "_RFN".into(),
            category_property: "Category".into(),
            name_property: "name".into(),
            category_attribute: "_RC".into(),
            system_categories: vec![
                "Duct Systems".into(),
                "Piping Systems".into(),
                "Electrical Circuits".into(),
            ],
            electrical_category: "Electrical Circuits".into(),
            family_type_category: "Revit Family Type".into(),
            host_category: "Revit".into(),
            min_leaf_properties: 2,
            list_separator: ',',
        }
    }
}

impl SystemsConfig {
    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Properties fetched for system members and for leaf elements.
    pub(crate) fn membership_properties(&self) -> [&str; 4] {
        [
            self.system_type_property.as_str(),
            self.system_name_property.as_str(),
            self.circuit_number_property.as_str(),
            self.name_property.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_revit_attribute_names() {
        let config = SystemsConfig::default();
        assert_eq!(config.root_name, "Systems");
        assert_eq!(config.root_path, "systems");
        assert_eq!(config.family_name_property, "_RFN");
        assert_eq!(config.system_categories.len(), 3);
        assert_eq!(config.min_leaf_properties, 2);
        assert_eq!(config.list_separator, ',');
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SystemsConfig::from_json(
            r#"{ "system_name_property": "Systemname", "min_leaf_properties": 1 }"#,
        )
        .unwrap();
        assert_eq!(config.system_name_property, "Systemname");
        assert_eq!(config.min_leaf_properties, 1);
        assert_eq!(config.circuit_number_property, "Circuit Number");
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            SystemsConfig::from_json("[1, 2]"),
            Err(Error::Serialization(_))
        ));
    }
}
