// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Leaf element collection and the leaf property fetch.

use mep_systems_core::{ElementId, ModelQuery, ObjectTree, PropertyRequest, Result, SourceElement};

use crate::config::SystemsConfig;

/// Returns every element below the tree root that has no children.
///
/// Ids come back in enumeration order. Enumeration errors are returned as-is.
pub fn collect_leaf_elements<T: ObjectTree + ?Sized>(tree: &T) -> Result<Vec<ElementId>> {
    let mut leaves = Vec::new();
    tree.enumerate_descendants(
        tree.root_id(),
        &mut |id| {
            if tree.child_count(id) == 0 {
                leaves.push(id);
            }
        },
        true,
    )?;
    Ok(leaves)
}

/// Fetches membership properties for leaf elements.
///
/// Records carrying fewer than `min_leaf_properties` properties are dropped:
/// without at least a category and one membership attribute there is nothing
/// to group them by.
pub async fn fetch_leaf_records<M: ModelQuery>(
    model: &M,
    leaf_ids: &[ElementId],
    config: &SystemsConfig,
) -> Result<Vec<SourceElement>> {
    let mut names: Vec<&str> = config.membership_properties().to_vec();
    names.push(&config.category_property);
    let request = PropertyRequest::filtered(names);

    let records = model.bulk_properties(leaf_ids, &request).await?;
    let fetched = records.len();
    let kept: Vec<SourceElement> = records
        .into_iter()
        .filter(|r| r.properties.len() >= config.min_leaf_properties)
        .collect();

    tracing::debug!(
        leaves = leaf_ids.len(),
        fetched = fetched,
        kept = kept.len(),
        "Fetched leaf element properties"
    );
    Ok(kept)
}
