// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contracts a model host provides to the systems pipeline.
//!
//! The pipeline never talks to a viewer directly. Everything it needs from the
//! loaded model goes through [`ModelQuery`] (search and bulk property lookup)
//! and the [`ObjectTree`] handle it hands out. Hosts decide how those calls
//! are served; the pipeline awaits each one in turn and treats any error as
//! terminal.

use crate::element::{ElementId, SourceElement};
use crate::error::Result;

/// Options for [`ModelQuery::search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Also match against hidden (internal) attributes such as `_RC`.
    pub include_hidden: bool,
}

impl SearchOptions {
    pub fn hidden() -> Self {
        Self {
            include_hidden: true,
        }
    }
}

/// Parameters for [`ModelQuery::bulk_properties`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRequest {
    /// Attribute names to return. Empty means every property.
    pub property_filter: Vec<String>,
    /// Return hidden (internal) attributes as well.
    pub include_hidden: bool,
}

impl PropertyRequest {
    /// Requests the named properties, hidden attributes included.
    pub fn filtered<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property_filter: names.into_iter().map(Into::into).collect(),
            include_hidden: true,
        }
    }

    pub fn without_hidden(mut self) -> Self {
        self.include_hidden = false;
        self
    }

    /// Returns `true` if a property with this name and visibility passes the request.
    pub fn accepts(&self, name: &str, hidden: bool) -> bool {
        if hidden && !self.include_hidden {
            return false;
        }
        self.property_filter.is_empty() || self.property_filter.iter().any(|f| f == name)
    }
}

/// Query surface of a loaded model.
#[allow(async_fn_in_trait)]
pub trait ModelQuery {
    /// Tree handle returned by [`ModelQuery::object_tree`].
    type Tree: ObjectTree;

    /// Finds elements whose attributes named in `attribute_names` match `text`.
    async fn search(
        &self,
        text: &str,
        attribute_names: &[&str],
        options: SearchOptions,
    ) -> Result<Vec<ElementId>>;

    /// Fetches properties for many elements at once.
    ///
    /// Unknown ids are omitted and elements may come back with fewer
    /// properties than requested.
    async fn bulk_properties(
        &self,
        ids: &[ElementId],
        request: &PropertyRequest,
    ) -> Result<Vec<SourceElement>>;

    /// Returns the model's object (instance) tree.
    async fn object_tree(&self) -> Result<Self::Tree>;
}

/// Hierarchical object tree of a loaded model.
pub trait ObjectTree {
    fn root_id(&self) -> ElementId;

    /// Number of direct children of `id`; zero for unknown ids.
    fn child_count(&self, id: ElementId) -> usize;

    /// Calls `visit` for every child of `id`, and for their descendants too
    /// when `recursive` is set. Each element is visited once.
    fn enumerate_descendants(
        &self,
        id: ElementId,
        visit: &mut dyn FnMut(ElementId),
        recursive: bool,
    ) -> Result<()>;
}
