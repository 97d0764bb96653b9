// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary between the systems tree and whatever displays it.
//!
//! A tree widget asks a [`TreeDelegate`] how to show each [`GroupNode`] and
//! forwards clicks to it. [`SystemsTreeDelegate`] answers from the node itself
//! and turns a click into an isolate-and-fit on a [`Viewport`].

use mep_systems_core::ElementId;

use crate::tree::GroupNode;

/// Row style of a node in a tree widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Group,
    Leaf,
}

impl NodeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeClass::Group => "group",
            NodeClass::Leaf => "leaf",
        }
    }
}

/// The 3D view a delegate drives.
pub trait Viewport {
    /// Shows only `ids`, ghosting or hiding everything else.
    fn isolate(&mut self, ids: &[ElementId]);

    /// Frames the currently visible elements.
    fn fit_to_view(&mut self);
}

/// What a tree widget needs to know about a node.
pub trait TreeDelegate {
    fn is_group(&self, node: &GroupNode) -> bool;

    /// Stable id of the node within the widget.
    fn node_id<'n>(&self, node: &'n GroupNode) -> &'n str;

    fn label<'n>(&self, node: &'n GroupNode) -> &'n str;

    fn node_class(&self, node: &GroupNode) -> NodeClass {
        if self.is_group(node) {
            NodeClass::Group
        } else {
            NodeClass::Leaf
        }
    }

    fn for_each_child(&self, node: &GroupNode, callback: &mut dyn FnMut(&GroupNode));

    fn on_click(&mut self, node: &GroupNode);
}

/// Delegate that isolates a clicked node's members in a viewport.
#[derive(Debug)]
pub struct SystemsTreeDelegate<V> {
    viewport: V,
}

impl<V: Viewport> SystemsTreeDelegate<V> {
    pub fn new(viewport: V) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn into_viewport(self) -> V {
        self.viewport
    }

    /// Dispatches a click on the node at `path`. Returns `false` if no node
    /// has that path.
    pub fn click_path(&mut self, root: &GroupNode, path: &str) -> bool {
        match root.find(path) {
            Some(node) => {
                self.on_click(node);
                true
            }
            None => {
                tracing::debug!(path = path, "Click on unknown node");
                false
            }
        }
    }
}

impl<V: Viewport> TreeDelegate for SystemsTreeDelegate<V> {
    fn is_group(&self, node: &GroupNode) -> bool {
        node.is_group()
    }

    fn node_id<'n>(&self, node: &'n GroupNode) -> &'n str {
        &node.path
    }

    fn label<'n>(&self, node: &'n GroupNode) -> &'n str {
        &node.name
    }

    fn for_each_child(&self, node: &GroupNode, callback: &mut dyn FnMut(&GroupNode)) {
        for child in &node.children {
            callback(child);
        }
    }

    fn on_click(&mut self, node: &GroupNode) {
        tracing::debug!(
            path = %node.path,
            members = node.member_ids.len(),
            "Isolating systems node"
        );
        self.viewport.isolate(node.member_ids.as_slice());
        self.viewport.fit_to_view();
    }
}
