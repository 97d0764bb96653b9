// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finds the system entities of a model.
//!
//! Two passes run against the model's hidden category attribute:
//!
//! 1. For every configured system category, the hits whose `Category` is the
//!    family-type category (`"Revit Family Type"`) are kept, together with
//!    their family name so they can be classified.
//! 2. Circuit instances are searched once more without the family name and
//!    kept when their `Category` differs from the host category (`"Revit"`).
//!
//! Results keep search order. An entity found by both passes is kept once,
//! with its first record.

use mep_systems_core::{ModelQuery, PropertyRequest, Result, SearchOptions, SourceElement};
use rustc_hash::FxHashSet;

use crate::config::SystemsConfig;

pub async fn discover_systems<M: ModelQuery>(
    model: &M,
    config: &SystemsConfig,
) -> Result<Vec<SourceElement>> {
    let attributes = [config.category_attribute.as_str()];
    let mut systems = Vec::new();
    let mut seen = FxHashSet::default();

    let family_request = PropertyRequest::filtered([
        config.family_name_property.as_str(),
        config.child_property.as_str(),
        config.category_property.as_str(),
        config.name_property.as_str(),
    ]);
    for category in &config.system_categories {
        let ids = model
            .search(category, &attributes, SearchOptions::hidden())
            .await?;
        let records = model.bulk_properties(&ids, &family_request).await?;

        let before = systems.len();
        for record in records {
            let is_family_type = !record.properties.is_empty()
                && record.has_property_where(&config.category_property, |v| {
                    v == config.family_type_category
                });
            if is_family_type && seen.insert(record.id) {
                systems.push(record);
            }
        }
        tracing::debug!(
            category = %category,
            hits = ids.len(),
            systems = systems.len() - before,
            "Searched system category"
        );
    }

    let circuit_request = PropertyRequest::filtered([
        config.child_property.as_str(),
        config.category_property.as_str(),
        config.name_property.as_str(),
    ]);
    let ids = model
        .search(&config.electrical_category, &attributes, SearchOptions::hidden())
        .await?;
    let records = model.bulk_properties(&ids, &circuit_request).await?;

    let before = systems.len();
    for record in records {
        let is_instance = !record.properties.is_empty()
            && record.has_property_where(&config.category_property, |v| v != config.host_category);
        if is_instance && seen.insert(record.id) {
            systems.push(record);
        }
    }
    tracing::debug!(
        hits = ids.len(),
        systems = systems.len() - before,
        "Searched circuit instances"
    );

    Ok(systems)
}
