// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The grouping tree handed to the presentation layer, and the arena used to
//! build it.
//!
//! Aggregation needs to reach a node and all of its ancestors at once, which
//! an owned `Vec<GroupNode>` tree makes awkward. [`TreeBuilder`] keeps nodes in
//! a slot map addressed by [`NodeKey`], with a name → child index next to each
//! ordered child list, and converts to an owned [`GroupNode`] tree at the end.

use mep_systems_core::ElementId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Serialize, Serializer};
use slotmap::{new_key_type, SlotMap};

/// Set of element ids that iterates in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    order: Vec<ElementId>,
    seen: FxHashSet<ElementId>,
}

impl MemberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id`; returns `false` if it was already present.
    pub fn insert(&mut self, id: ElementId) -> bool {
        if !self.seen.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.order
    }

    pub fn is_superset(&self, other: &MemberSet) -> bool {
        other.iter().all(|id| self.contains(id))
    }
}

impl FromIterator<ElementId> for MemberSet {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        let mut set = MemberSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<ElementId> for MemberSet {
    fn extend<I: IntoIterator<Item = ElementId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl Serialize for MemberSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.order)
    }
}

/// A node of the systems tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNode {
    /// Display label. Empty when the grouping attribute was missing.
    pub name: String,
    /// Slash-separated path from the root; the node's id in the tree view.
    pub path: String,
    /// Elements isolated when the node is selected.
    pub member_ids: MemberSet,
    pub children: Vec<GroupNode>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            member_ids: MemberSet::new(),
            children: Vec::new(),
        }
    }

    /// A node is a group iff it has children.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&GroupNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows `names` down from this node.
    pub fn descend<'a, I>(&self, names: I) -> Option<&GroupNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .try_fold(self, |node, name| node.child(name))
    }

    /// Finds the first node in pre-order whose path equals `path`.
    pub fn find(&self, path: &str) -> Option<&GroupNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }

    /// Number of edges on the longest path down to a descendant.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(GroupNode::node_count).sum::<usize>()
    }

    /// Visits every node in pre-order with its depth below this node.
    pub fn walk<F: FnMut(&GroupNode, usize)>(&self, visit: &mut F) {
        self.walk_at(0, visit);
    }

    fn walk_at<F: FnMut(&GroupNode, usize)>(&self, depth: usize, visit: &mut F) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

new_key_type! {
    /// Key for a node held by a [`TreeBuilder`].
    pub struct NodeKey;
}

#[derive(Debug)]
struct NodeData {
    name: String,
    path: String,
    members: MemberSet,
    children: Vec<NodeKey>,
    child_index: FxHashMap<String, NodeKey>,
}

impl NodeData {
    fn new(name: String, path: String) -> Self {
        Self {
            name,
            path,
            members: MemberSet::new(),
            children: Vec::new(),
            child_index: FxHashMap::default(),
        }
    }
}

/// Arena that owns a tree while it is being aggregated.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: SlotMap<NodeKey, NodeData>,
    root: NodeKey,
}

impl TreeBuilder {
    pub fn new(root_name: &str, root_path: &str) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(root_name.to_string(), root_path.to_string()));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn name(&self, key: NodeKey) -> &str {
        &self.nodes[key].name
    }

    pub fn path(&self, key: NodeKey) -> &str {
        &self.nodes[key].path
    }

    /// Returns the child of `parent` named exactly `name`.
    pub fn child(&self, parent: NodeKey, name: &str) -> Option<NodeKey> {
        self.nodes[parent].child_index.get(name).copied()
    }

    pub fn child_count(&self, key: NodeKey) -> usize {
        self.nodes[key].children.len()
    }

    /// Appends a new child; its path is the parent's path plus `name`.
    pub fn add_child(&mut self, parent: NodeKey, name: &str) -> NodeKey {
        let path = format!("{}/{}", self.nodes[parent].path, name);
        let key = self.nodes.insert(NodeData::new(name.to_string(), path));
        let parent_data = &mut self.nodes[parent];
        parent_data.children.push(key);
        parent_data.child_index.insert(name.to_string(), key);
        key
    }

    pub fn find_or_create(&mut self, parent: NodeKey, name: &str) -> NodeKey {
        match self.child(parent, name) {
            Some(key) => key,
            None => self.add_child(parent, name),
        }
    }

    /// Adds `id` to a node's members; returns `false` if already present.
    pub fn add_member(&mut self, key: NodeKey, id: ElementId) -> bool {
        self.nodes[key].members.insert(id)
    }

    /// Detaches and drops `key` from `parent` if it has no children.
    ///
    /// Returns `true` if the node was removed.
    pub fn remove_if_empty(&mut self, parent: NodeKey, key: NodeKey) -> bool {
        if self.nodes.get(key).map_or(true, |n| !n.children.is_empty()) {
            return false;
        }
        let parent_data = &mut self.nodes[parent];
        let Some(position) = parent_data.children.iter().position(|&c| c == key) else {
            return false;
        };
        parent_data.children.remove(position);
        if let Some(data) = self.nodes.remove(key) {
            self.nodes[parent].child_index.remove(&data.name);
        }
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Converts the arena into an owned tree rooted at the root node.
    pub fn build(mut self) -> GroupNode {
        let root = self.root;
        take_node(&mut self.nodes, root).unwrap_or_else(|| GroupNode::new("", ""))
    }
}

fn take_node(nodes: &mut SlotMap<NodeKey, NodeData>, key: NodeKey) -> Option<GroupNode> {
    let data = nodes.remove(key)?;
    let children = data
        .children
        .into_iter()
        .filter_map(|child| take_node(nodes, child))
        .collect();
    Some(GroupNode {
        name: data.name,
        path: data.path,
        member_ids: data.members,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_set_ignores_duplicates() {
        let mut set = MemberSet::new();
        assert!(set.insert(ElementId(3)));
        assert!(set.insert(ElementId(1)));
        assert!(!set.insert(ElementId(3)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), &[ElementId(3), ElementId(1)]);
    }

    #[test]
    fn member_set_superset() {
        let all: MemberSet = [1, 2, 3].into_iter().map(ElementId).collect();
        let some: MemberSet = [3, 1].into_iter().map(ElementId).collect();
        assert!(all.is_superset(&some));
        assert!(!some.is_superset(&all));
        assert!(some.is_superset(&MemberSet::new()));
    }

    #[test]
    fn member_set_serializes_as_list() {
        let set: MemberSet = [5, 4, 5].into_iter().map(ElementId).collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), "[5,4]");
    }

    #[test]
    fn find_or_create_reuses_exact_names() {
        let mut builder = TreeBuilder::new("Systems", "systems");
        let root = builder.root();
        let a = builder.find_or_create(root, "Mechanical");
        let b = builder.find_or_create(root, "Mechanical");
        let c = builder.find_or_create(root, "mechanical");
        let d = builder.find_or_create(root, "Mechanical ");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(builder.child_count(root), 3);
        assert_eq!(builder.path(a), "systems/Mechanical");
    }

    #[test]
    fn empty_names_are_valid_keys() {
        let mut builder = TreeBuilder::new("Systems", "systems");
        let root = builder.root();
        let unnamed = builder.find_or_create(root, "");
        assert_eq!(builder.find_or_create(root, ""), unnamed);
        assert_eq!(builder.path(unnamed), "systems/");
        assert_eq!(builder.name(unnamed), "");
    }

    #[test]
    fn remove_if_empty_keeps_populated_nodes() {
        let mut builder = TreeBuilder::new("Systems", "systems");
        let root = builder.root();
        let kept = builder.add_child(root, "Electrical");
        builder.add_child(kept, "Lighting");
        let dropped = builder.add_child(root, "Piping");

        assert!(!builder.remove_if_empty(root, kept));
        assert!(builder.remove_if_empty(root, dropped));
        assert!(!builder.remove_if_empty(root, dropped));
        assert_eq!(builder.child(root, "Piping"), None);

        let recreated = builder.find_or_create(root, "Piping");
        assert_ne!(recreated, dropped);

        let tree = builder.build();
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Electrical", "Piping"]);
    }

    #[test]
    fn build_preserves_insertion_order_and_members() {
        let mut builder = TreeBuilder::new("Systems", "systems");
        let root = builder.root();
        let piping = builder.add_child(root, "Piping");
        let mechanical = builder.add_child(root, "Mechanical");
        builder.add_member(mechanical, ElementId(9));
        builder.add_member(root, ElementId(9));
        builder.add_child(piping, "Domestic Cold Water");
        assert_eq!(builder.node_count(), 4);

        let tree = builder.build();
        assert_eq!(tree.name, "Systems");
        assert_eq!(tree.children[0].name, "Piping");
        assert_eq!(tree.children[1].member_ids.as_slice(), &[ElementId(9)]);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 4);
        assert!(tree.is_group());
        assert!(!tree.children[1].is_group());
    }

    #[test]
    fn lookup_by_path_and_names() {
        let mut builder = TreeBuilder::new("Systems", "systems");
        let root = builder.root();
        let mechanical = builder.add_child(root, "Mechanical");
        builder.add_child(mechanical, "Duct System 1");
        let tree = builder.build();

        let by_path = tree.find("systems/Mechanical/Duct System 1").unwrap();
        let by_names = tree.descend(["Mechanical", "Duct System 1"]).unwrap();
        assert_eq!(by_path, by_names);
        assert!(tree.find("systems/Piping").is_none());
        assert!(tree.descend(["Piping"]).is_none());

        let mut visited = Vec::new();
        tree.walk(&mut |node, depth| visited.push((node.name.clone(), depth)));
        assert_eq!(
            visited,
            vec![
                ("Systems".to_string(), 0),
                ("Mechanical".to_string(), 1),
                ("Duct System 1".to_string(), 2),
            ]
        );
    }
}
