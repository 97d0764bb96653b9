// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model host.
//!
//! [`MemoryModel`] answers [`ModelQuery`] calls from a flat list of elements
//! with parent links. It backs the test suites and the CLI, which loads it from
//! a JSON snapshot:
//!
//! ```json
//! {
//!   "elements": [
//!     { "id": 1, "name": "Model" },
//!     { "id": 2, "name": "Duct [2]", "parent": 1,
//!       "properties": [{ "name": "System Name", "display_value": "Supply Air" }] }
//!   ]
//! }
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::element::{ElementId, Property, SourceElement};
use crate::error::{Error, Result};
use crate::query::{ModelQuery, ObjectTree, PropertyRequest, SearchOptions};

/// An element stored by [`MemoryModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryElement {
    pub id: ElementId,
    pub name: String,
    /// Parent in the object tree; `None` for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl MemoryElement {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: None,
            properties: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    pub fn with_hidden_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push(Property::hidden(name, value));
        self
    }
}

/// Serializable form of a [`MemoryModel`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub elements: Vec<MemoryElement>,
}

/// A model held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    elements: Vec<MemoryElement>,
    index: FxHashMap<ElementId, usize>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ModelSnapshot) -> Self {
        let mut model = Self::new();
        for element in snapshot.elements {
            model.insert(element);
        }
        model
    }

    /// Parses a JSON [`ModelSnapshot`].
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ModelSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn to_json(&self) -> Result<String> {
        let snapshot = ModelSnapshot {
            elements: self.elements.clone(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Adds an element, replacing any element with the same id in place.
    pub fn insert(&mut self, element: MemoryElement) {
        match self.index.get(&element.id) {
            Some(&slot) => self.elements[slot] = element,
            None => {
                self.index.insert(element.id, self.elements.len());
                self.elements.push(element);
            }
        }
    }

    pub fn with(mut self, element: MemoryElement) -> Self {
        self.insert(element);
        self
    }

    pub fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.index.get(&id).map(|&slot| &self.elements[slot])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Builds the object tree from parent links. The first element without a
    /// parent is the root.
    pub fn build_tree(&self) -> Result<MemoryObjectTree> {
        let root = self
            .elements
            .iter()
            .find(|e| e.parent.is_none())
            .map(|e| e.id)
            .ok_or(Error::MissingRoot)?;

        let mut children: FxHashMap<ElementId, Vec<ElementId>> = FxHashMap::default();
        for element in &self.elements {
            if let Some(parent) = element.parent {
                children.entry(parent).or_default().push(element.id);
            }
        }

        Ok(MemoryObjectTree {
            root,
            children,
            known: self.index.keys().copied().collect(),
        })
    }
}

impl ModelQuery for MemoryModel {
    type Tree = MemoryObjectTree;

    async fn search(
        &self,
        text: &str,
        attribute_names: &[&str],
        options: SearchOptions,
    ) -> Result<Vec<ElementId>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .elements
            .iter()
            .filter(|element| {
                element.properties.iter().any(|p| {
                    (options.include_hidden || !p.hidden)
                        && (attribute_names.is_empty() || attribute_names.contains(&p.name.as_str()))
                        && p.display_value.to_lowercase().contains(&needle)
                })
            })
            .map(|element| element.id)
            .collect();
        Ok(hits)
    }

    async fn bulk_properties(
        &self,
        ids: &[ElementId],
        request: &PropertyRequest,
    ) -> Result<Vec<SourceElement>> {
        let records = ids
            .iter()
            .filter_map(|&id| self.element(id))
            .map(|element| SourceElement {
                id: element.id,
                name: element.name.clone(),
                properties: element
                    .properties
                    .iter()
                    .filter(|p| request.accepts(&p.name, p.hidden))
                    .cloned()
                    .collect(),
            })
            .collect();
        Ok(records)
    }

    async fn object_tree(&self) -> Result<MemoryObjectTree> {
        self.build_tree()
    }
}

/// Object tree derived from a [`MemoryModel`]'s parent links.
#[derive(Debug, Clone)]
pub struct MemoryObjectTree {
    root: ElementId,
    children: FxHashMap<ElementId, Vec<ElementId>>,
    known: FxHashSet<ElementId>,
}

impl MemoryObjectTree {
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ObjectTree for MemoryObjectTree {
    fn root_id(&self) -> ElementId {
        self.root
    }

    fn child_count(&self, id: ElementId) -> usize {
        self.children(id).len()
    }

    fn enumerate_descendants(
        &self,
        id: ElementId,
        visit: &mut dyn FnMut(ElementId),
        recursive: bool,
    ) -> Result<()> {
        if !self.known.contains(&id) {
            return Err(Error::UnknownElement(id));
        }

        if !recursive {
            self.children(id).iter().copied().for_each(|c| visit(c));
            return Ok(());
        }

        // Pre-order walk; the visited set keeps malformed parent cycles finite.
        let mut visited = FxHashSet::default();
        visited.insert(id);
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            visit(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        Ok(())
    }
}
