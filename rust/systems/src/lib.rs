// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # MEP-Systems
//!
//! Builds a browsable tree of the duct, piping and electrical systems in a
//! building model.
//!
//! ## Overview
//!
//! - **Discovery**: [`discover_systems`] finds system entities through the
//!   model's category search.
//! - **Leaves**: [`collect_leaf_elements`] walks the object tree for childless
//!   elements; [`fetch_leaf_records`] loads their membership attributes.
//! - **Aggregation**: [`build_systems_tree`] groups everything into
//!   `Systems → discipline → system → system type → element` (electrical:
//!   `Systems → Electrical → system type → circuit → element`) and rolls
//!   element ids up every level.
//! - **Presentation**: [`SystemsTreeDelegate`] adapts the result to a tree
//!   widget and isolates a clicked node's elements in a [`Viewport`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mep_systems::{load_systems_tree, SystemsConfig};
//! use mep_systems_core::MemoryModel;
//!
//! let model = MemoryModel::from_json(&std::fs::read_to_string("model.json")?)?;
//! let root = load_systems_tree(&model, &SystemsConfig::default()).await?;
//! for discipline in &root.children {
//!     println!("{}: {} elements", discipline.name, discipline.member_ids.len());
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod discipline;
pub mod discovery;
pub mod leaves;
pub mod presentation;
pub mod tree;

pub use aggregate::{build_systems_tree, load_systems_tree};
pub use config::SystemsConfig;
pub use discipline::{Discipline, DisciplineStrategy, EndElementMatch, MemberProperty};
pub use discovery::discover_systems;
pub use leaves::{collect_leaf_elements, fetch_leaf_records};
pub use presentation::{NodeClass, SystemsTreeDelegate, TreeDelegate, Viewport};
pub use tree::{GroupNode, MemberSet, NodeKey, TreeBuilder};
