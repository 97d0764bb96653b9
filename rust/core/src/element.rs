// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element identifiers and property records returned by bulk queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of an element in the loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(ElementId)
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        ElementId(id)
    }
}

/// A single property as reported by the model host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Attribute name used for lookups (e.g. "System Name", "_RFN").
    pub name: String,
    /// Value formatted for display.
    pub display_value: String,
    /// Property group the value belongs to (e.g. "Mechanical", "Identity Data").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Internal attribute, only returned when hidden properties are requested.
    #[serde(default)]
    pub hidden: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, display_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_value: display_value.into(),
            category: None,
            hidden: false,
        }
    }

    /// Creates an internal attribute (`_RFN`, `_RC`, ...).
    pub fn hidden(name: impl Into<String>, display_value: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(name, display_value)
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// An element together with the subset of its properties a query returned.
///
/// Hosts may return fewer properties than requested, so every lookup is
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceElement {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl SourceElement {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns the display value of the first property named `name`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.display_value.as_str())
    }

    /// Returns the display values of every property named `name`, in order.
    ///
    /// Multi-valued attributes such as `child` appear once per value.
    pub fn property_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| p.display_value.as_str())
    }

    /// Returns `true` if some property named `name` satisfies `predicate`.
    pub fn has_property_where(&self, name: &str, predicate: impl Fn(&str) -> bool) -> bool {
        self.property_values(name).any(predicate)
    }
}
