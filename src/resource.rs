//! Canonical resources for every top-level definition.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::classifier::Classifier;
use crate::error::GenerateError;
use crate::model::Resource;
use crate::resolver::resolve;
use crate::schema::definitions;

/// Build one primary [`Resource`] per top-level definition.
///
/// # Errors
///
/// Returns the first classification failure wrapped in
/// `GenerateError::InProperty`, or `GenerateError::InvalidSchema` when the
/// document has no definitions.
pub fn build_resources(root: &Value) -> Result<BTreeMap<String, Resource>, GenerateError> {
    let mut resources = BTreeMap::new();

    for (id, definition) in definitions(root)? {
        let definition = resolve(definition, root).map_err(|source| GenerateError::InProperty {
            definition: id.to_string(),
            property: "$ref".to_string(),
            source: Box::new(source),
        })?;

        let mut classifier = Classifier::new(root);
        let mut properties = Vec::new();
        for (name, raw) in definition.properties() {
            let property = classifier
                .classify(name, raw, definition)
                .map_err(|source| GenerateError::InProperty {
                    definition: id.to_string(),
                    property: name.to_string(),
                    source: Box::new(source),
                })?;
            properties.push(property);
        }
        properties.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(definition = id, properties = properties.len(), "built resource");
        resources.insert(
            id.to_string(),
            Resource {
                name: id.to_string(),
                title: definition.title().map(str::to_string),
                properties,
                is_primary: true,
                reference: None,
            },
        );
    }

    tracing::info!(count = resources.len(), "resources built");
    Ok(resources)
}
