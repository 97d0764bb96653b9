// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text rendering of the systems tree and a console-backed viewport.

use mep_systems::{GroupNode, NodeClass, TreeDelegate, Viewport};
use mep_systems_core::ElementId;

/// Renders the tree as an indented outline, one node per line.
pub fn render_outline<D: TreeDelegate>(delegate: &D, root: &GroupNode) -> String {
    let mut lines = Vec::new();
    render_node(delegate, root, 0, &mut lines);
    lines.join("\n")
}

fn render_node<D: TreeDelegate>(delegate: &D, node: &GroupNode, depth: usize, lines: &mut Vec<String>) {
    let marker = match delegate.node_class(node) {
        NodeClass::Group => '+',
        NodeClass::Leaf => '-',
    };
    let label = match delegate.label(node) {
        "" => "(unnamed)",
        label => label,
    };
    lines.push(format!(
        "{}{} {} [{}]",
        "  ".repeat(depth),
        marker,
        label,
        node.member_ids.len()
    ));
    delegate.for_each_child(node, &mut |child| render_node(delegate, child, depth + 1, lines));
}

/// Viewport that records what it was asked to show.
#[derive(Debug, Default)]
pub struct ConsoleViewport {
    pub isolated: Vec<ElementId>,
    pub fitted: bool,
}

impl Viewport for ConsoleViewport {
    fn isolate(&mut self, ids: &[ElementId]) {
        tracing::info!(elements = ids.len(), "Isolating elements");
        self.isolated = ids.to_vec();
    }

    fn fit_to_view(&mut self) {
        self.fitted = true;
    }
}

impl ConsoleViewport {
    /// Space-separated list of isolated ids.
    pub fn summary(&self) -> String {
        self.isolated
            .iter()
            .map(ElementId::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
