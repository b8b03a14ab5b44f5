//! Regex validators derived from classified properties, and payload checks
//! against link request schemas.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::action::decode_href;
use crate::error::{GenerateError, PayloadError, ValidateError};
use crate::model::{Property, Resource, Validator};
use crate::resolver::resolve;
use crate::schema::definitions;
use crate::types::DEFAULT_METHOD;

/// Collect one [`Validator`] per patterned scalar property name.
///
/// Inline properties are scanned too. Validators are name-scoped, so a later
/// property with the same name replaces an earlier one.
pub fn derive_validators<'r, I>(resources: I) -> BTreeMap<String, Validator>
where
    I: IntoIterator<Item = &'r Resource>,
{
    let mut validators = BTreeMap::new();
    for resource in resources {
        collect(&resource.name, &resource.properties, &mut validators);
    }
    tracing::info!(count = validators.len(), "validators derived");
    validators
}

fn collect(owner: &str, properties: &[Property], validators: &mut BTreeMap<String, Validator>) {
    for property in properties {
        if property.is_pattern_candidate() {
            if let Some(pattern) = &property.pattern {
                let validator = Validator::new(&property.name, pattern);
                if let Some(previous) = validators.insert(property.name.clone(), validator) {
                    if &previous.regexp_string != pattern {
                        tracing::warn!(
                            name = %property.name,
                            resource = owner,
                            previous = %previous.regexp_string,
                            current = %pattern,
                            "validator pattern replaced by a later property"
                        );
                    }
                }
            }
        }
        collect(owner, property.inline_properties(), validators);
    }
}

/// Check a payload against the request schema of a definition's link.
///
/// The document's `definitions` are in scope for `$ref`. A link without a
/// request schema accepts any payload. Links are deduplicated by
/// `(method, href)` exactly as action extraction does, then the first
/// survivor in `(method, href)` order with a matching rel is used.
///
/// # Errors
///
/// Returns `ValidateError::UnknownLink` if no link matches, or
/// `ValidateError::Invalid` with every violation found.
pub fn check_payload(
    root: &Value,
    definition: &str,
    rel: &str,
    payload: &Value,
) -> Result<(), ValidateError> {
    let unknown = || ValidateError::UnknownLink {
        definition: definition.to_string(),
        rel: rel.to_string(),
    };

    let node = definitions(root)?
        .into_iter()
        .find(|(id, _)| *id == definition)
        .map(|(_, node)| node)
        .ok_or_else(unknown)?;
    let node = resolve(node, root)?;

    let link = node
        .links()
        .and_then(Value::as_array)
        .and_then(|links| select_link(links, rel))
        .ok_or_else(unknown)?;

    match link.get("schema") {
        Some(schema @ Value::Object(_)) => validate_link_payload(
            definition,
            rel,
            &link_schema_document(root, schema),
            payload,
        ),
        _ => Ok(()),
    }
}

/// The link `extract_actions` would keep for `rel`.
fn select_link<'v>(links: &'v [Value], rel: &str) -> Option<&'v Value> {
    let mut by_route: BTreeMap<(String, String), &Value> = BTreeMap::new();
    for link in links {
        let method = link
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_METHOD);
        let href = link.get("href").and_then(Value::as_str).unwrap_or_default();
        let href = decode_href(href).unwrap_or_else(|_| href.to_string());
        by_route.insert((method.to_string(), href), link);
    }
    by_route
        .into_values()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some(rel))
}

/// A standalone schema for a link: its own keywords plus the root definitions.
pub fn link_schema_document(root: &Value, schema: &Value) -> Value {
    let mut document = Map::new();
    if let Some(map) = schema.as_object() {
        for (key, value) in map {
            if key != "$schema" {
                document.insert(key.clone(), value.clone());
            }
        }
    }
    if let Some(defs) = root.get("definitions") {
        document.insert("definitions".to_string(), defs.clone());
    }
    Value::Object(document)
}

/// Validate a payload against the standalone schema of `definition`'s `rel` link.
///
/// Violations are reported sorted by instance path, `/` for the payload root.
pub fn validate_link_payload(
    definition: &str,
    rel: &str,
    schema: &Value,
    payload: &Value,
) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ValidateError::Generate(GenerateError::InvalidSchema {
            message: format!("{} link {}: {}", definition, rel, e),
        })
    })?;

    let mut errors: Vec<PayloadError> = validator
        .iter_errors(payload)
        .map(|e| {
            let path = e.instance_path.to_string();
            PayloadError {
                path: if path.is_empty() { "/".to_string() } else { path },
                message: e.to_string(),
            }
        })
        .collect();
    errors.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(definition, rel, errors = errors.len(), "payload checked");

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}
