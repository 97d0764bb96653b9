// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System aggregation: turns system entities and leaf property records into
//! the grouping tree.
//!
//! For every system entity the aggregator
//!
//! 1. classifies it by family name and finds or creates its classification
//!    node (and, for duct/piping systems, a node named after the system),
//! 2. fetches the membership attributes of the entity's `child` elements,
//! 3. groups each member under a system-type node (plus a circuit-number node
//!    for electrical circuits),
//! 4. attaches the leaf elements matching that innermost node and adds their
//!    ids to every node on the path up to the root,
//! 5. drops circuit-number nodes that attracted no leaf element.
//!
//! Node lookups are exact, case-sensitive name matches within one parent, and
//! children keep the order in which they were first seen. A missing attribute
//! groups under the empty name instead of dropping the member, but such a node
//! never attracts end elements.

use std::time::Instant;

use mep_systems_core::{ElementId, ModelQuery, PropertyRequest, Result, SourceElement};

use crate::config::SystemsConfig;
use crate::discipline::{Discipline, DisciplineStrategy};
use crate::discovery::discover_systems;
use crate::leaves::{collect_leaf_elements, fetch_leaf_records};
use crate::tree::{GroupNode, NodeKey, TreeBuilder};

/// Runs the whole pipeline against a model: system discovery, leaf collection,
/// leaf property fetch and aggregation.
pub async fn load_systems_tree<M: ModelQuery>(model: &M, config: &SystemsConfig) -> Result<GroupNode> {
    let load_start = Instant::now();

    let systems = discover_systems(model, config).await?;
    let tree = model.object_tree().await?;
    let leaf_ids = collect_leaf_elements(&tree)?;
    let leaves = fetch_leaf_records(model, &leaf_ids, config).await?;

    tracing::info!(
        systems = systems.len(),
        leaf_elements = leaf_ids.len(),
        leaf_records = leaves.len(),
        "Collected systems and leaf elements"
    );

    let root = build_systems_tree(model, &systems, &leaves, config).await?;

    tracing::info!(
        nodes = root.node_count(),
        members = root.member_ids.len(),
        load_time_ms = load_start.elapsed().as_millis(),
        "Systems tree ready"
    );
    Ok(root)
}

/// Builds the systems tree from system entities and pre-filtered leaf records.
///
/// `model` is only used to fetch the membership attributes of each system's
/// members, one bulk query per system, awaited in order. The first failing
/// query aborts the build.
pub async fn build_systems_tree<M: ModelQuery>(
    model: &M,
    systems: &[SourceElement],
    leaves: &[SourceElement],
    config: &SystemsConfig,
) -> Result<GroupNode> {
    let build_start = Instant::now();
    let member_request = PropertyRequest::filtered(config.membership_properties());
    let mut aggregator = Aggregator::new(leaves, config);

    for system in systems {
        let discipline =
            Discipline::classify(system.property(&config.family_name_property));
        let member_ids = aggregator.member_ids(system);
        let members = model.bulk_properties(&member_ids, &member_request).await?;
        let attached = aggregator.add_system(system, discipline, &members);

        tracing::debug!(
            system = %system.name,
            discipline = %discipline,
            members = members.len(),
            attached = attached,
            "Aggregated system"
        );
    }

    let node_count = aggregator.builder.node_count();
    let root = aggregator.builder.build();
    tracing::debug!(
        systems = systems.len(),
        nodes = node_count,
        build_time_ms = build_start.elapsed().as_millis(),
        "Built systems tree"
    );
    Ok(root)
}

/// Mutable state of one tree build.
struct Aggregator<'a> {
    builder: TreeBuilder,
    leaves: &'a [SourceElement],
    config: &'a SystemsConfig,
}

/// Nodes that receive the ids of matched end elements.
struct Ancestry {
    classification: NodeKey,
    system: NodeKey,
}

impl<'a> Aggregator<'a> {
    fn new(leaves: &'a [SourceElement], config: &'a SystemsConfig) -> Self {
        Self {
            builder: TreeBuilder::new(&config.root_name, &config.root_path),
            leaves,
            config,
        }
    }

    /// Parses the system's `child` values. Values that are not element ids
    /// are skipped.
    fn member_ids(&self, system: &SourceElement) -> Vec<ElementId> {
        system
            .property_values(&self.config.child_property)
            .filter_map(|value| match value.parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(
                        system = %system.name,
                        value = value,
                        "Skipping non-numeric child reference"
                    );
                    None
                }
            })
            .collect()
    }

    /// Places one system and its members. Returns the number of end-element
    /// matches.
    fn add_system(
        &mut self,
        system: &SourceElement,
        discipline: Discipline,
        members: &[SourceElement],
    ) -> usize {
        let strategy = discipline.strategy();
        let root = self.builder.root();
        let classification = self.builder.find_or_create(root, discipline.as_str());
        let system_node = if strategy.system_level {
            self.builder.find_or_create(classification, &system.name)
        } else {
            classification
        };

        let ancestry = Ancestry {
            classification,
            system: system_node,
        };
        members
            .iter()
            .map(|member| self.add_member(strategy, &ancestry, member))
            .sum()
    }

    fn add_member(
        &mut self,
        strategy: &DisciplineStrategy,
        ancestry: &Ancestry,
        member: &SourceElement,
    ) -> usize {
        let config = self.config;
        let type_key = strategy.grouping_property.key(member, config);
        let type_name = type_key.unwrap_or_default();
        let system_type = self.builder.find_or_create(ancestry.system, type_name);

        let Some(circuit_property) = strategy.circuit_property else {
            if type_key.is_none() {
                return 0;
            }
            return self.attach_end_elements(strategy, ancestry, system_type, None);
        };

        let circuit_key = circuit_property.key(member, config);
        let circuit_number = circuit_key.unwrap_or_default();
        let circuit = self.builder.find_or_create(system_type, circuit_number);
        let attached = if circuit_key.is_some() {
            self.attach_end_elements(strategy, ancestry, circuit, Some(system_type))
        } else {
            0
        };

        if self.builder.remove_if_empty(system_type, circuit) {
            tracing::trace!(
                system_type = type_name,
                circuit = circuit_number,
                "Dropped circuit without end elements"
            );
        }
        attached
    }

    /// Attaches every leaf matching `current` and propagates its id upward.
    fn attach_end_elements(
        &mut self,
        strategy: &DisciplineStrategy,
        ancestry: &Ancestry,
        current: NodeKey,
        parent_level: Option<NodeKey>,
    ) -> usize {
        let leaves = self.leaves;
        let config = self.config;
        let key = self.builder.name(current).to_string();
        let root = self.builder.root();

        let mut attached = 0;
        for leaf in leaves
            .iter()
            .filter(|leaf| strategy.end_element_match.matches(leaf, &key, config))
        {
            if self.builder.child(current, &leaf.name).is_none() {
                let end_element = self.builder.add_child(current, &leaf.name);
                self.builder.add_member(end_element, leaf.id);
            }

            let path = [
                Some(current),
                parent_level,
                Some(ancestry.system),
                Some(ancestry.classification),
                Some(root),
            ];
            for node in path.into_iter().flatten() {
                self.builder.add_member(node, leaf.id);
            }
            attached += 1;
        }
        attached
    }
}
