// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Systems Core
//!
//! Element and property records plus the query contracts a model host
//! implements for the systems browser.
//!
//! ## Overview
//!
//! - **Elements**: [`ElementId`], [`Property`] and [`SourceElement`] mirror
//!   what a viewer's bulk property query returns. Lookups return `Option`
//!   because hosts routinely omit properties that do not apply.
//! - **Queries**: [`ModelQuery`] (category search, bulk properties, object
//!   tree) and [`ObjectTree`] (root, child counts, descendant enumeration).
//! - **In-memory host**: [`MemoryModel`] serves those queries from a JSON
//!   snapshot, for tests and offline tooling.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mep_systems_core::{MemoryElement, MemoryModel, ModelQuery, PropertyRequest};
//!
//! let model = MemoryModel::new()
//!     .with(MemoryElement::new(1, "Model"))
//!     .with(MemoryElement::new(2, "Duct [2]").with_parent(1).with_property("System Name", "SA 1"));
//!
//! let records = model
//!     .bulk_properties(&[2.into()], &PropertyRequest::filtered(["System Name"]))
//!     .await?;
//! assert_eq!(records[0].property("System Name"), Some("SA 1"));
//! ```

pub mod element;
pub mod error;
pub mod memory;
pub mod query;

pub use element::{ElementId, Property, SourceElement};
pub use error::{Error, Result};
pub use memory::{MemoryElement, MemoryModel, MemoryObjectTree, ModelSnapshot};
pub use query::{ModelQuery, ObjectTree, PropertyRequest, SearchOptions};
