//! Actions extracted from hyper-schema `links`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::classifier::Classifier;
use crate::error::GenerateError;
use crate::model::{Action, Resource};
use crate::resolver::resolve;
use crate::schema::{definitions, SchemaNode};
use crate::types::{json_type_name, DEFAULT_ENCODING, DEFAULT_METHOD};

/// A link descriptor as it appears in the document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Link {
    href: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    rel: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    enc_type: Option<String>,
    #[serde(default)]
    schema: Option<Value>,
    #[serde(default)]
    target_schema: Option<Value>,
}

/// Build the actions of every definition, keyed by definition id.
///
/// Each list is deduplicated and ordered by `(method, href)`. Definitions
/// without links map to an empty list.
///
/// # Errors
///
/// Returns `GenerateError::MalformedLink` for unparsable link blocks,
/// `GenerateError::MissingResource` when a link without `targetSchema` has
/// no canonical resource, and classification failures wrapped in
/// `GenerateError::InLink`.
pub fn extract_actions(
    root: &Value,
    resources: &BTreeMap<String, Resource>,
) -> Result<BTreeMap<String, Vec<Action>>, GenerateError> {
    let mut out = BTreeMap::new();

    for (id, definition) in definitions(root)? {
        let definition = resolve(definition, root).map_err(|source| GenerateError::InProperty {
            definition: id.to_string(),
            property: "$ref".to_string(),
            source: Box::new(source),
        })?;

        let mut actions: BTreeMap<(String, String), Action> = BTreeMap::new();
        for link in parse_links(id, definition)? {
            let action = build_action(id, link, root, resources)?;
            let key = (action.method.clone(), action.href.clone());
            if actions.insert(key, action).is_some() {
                tracing::debug!(definition = id, "duplicate link replaced");
            }
        }

        tracing::debug!(definition = id, actions = actions.len(), "extracted actions");
        out.insert(id.to_string(), actions.into_values().collect::<Vec<_>>());
    }

    tracing::info!(
        count = out.values().map(Vec::len).sum::<usize>(),
        "actions extracted"
    );
    Ok(out)
}

fn parse_links(id: &str, definition: SchemaNode<'_>) -> Result<Vec<Link>, GenerateError> {
    let malformed = |message: String| GenerateError::MalformedLink {
        definition: id.to_string(),
        message,
    };

    let links = match definition.links() {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(links)) => links,
        Some(other) => {
            return Err(malformed(format!(
                "links must be an array, got {}",
                json_type_name(other)
            )))
        }
    };

    links
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let link: Link = serde_path_to_error::deserialize(value).map_err(|e| {
                let path = e.path().to_string();
                let location = if path == "." {
                    format!("links[{}]", index)
                } else {
                    format!("links[{}].{}", index, path)
                };
                malformed(format!("{}: {}", location, e.inner()))
            })?;
            for (key, schema) in [("schema", &link.schema), ("targetSchema", &link.target_schema)] {
                if let Some(schema) = schema {
                    if !schema.is_object() {
                        return Err(malformed(format!(
                            "links[{}].{} must be an object, got {}",
                            index,
                            key,
                            json_type_name(schema)
                        )));
                    }
                }
            }
            Ok(link)
        })
        .collect()
}

fn build_action(
    id: &str,
    link: Link,
    root: &Value,
    resources: &BTreeMap<String, Resource>,
) -> Result<Action, GenerateError> {
    let href = decode_href(&link.href).map_err(|message| GenerateError::MalformedLink {
        definition: id.to_string(),
        message,
    })?;
    let rel = link.rel.unwrap_or_default();
    let in_link = |source: GenerateError| GenerateError::InLink {
        definition: id.to_string(),
        rel: rel.clone(),
        href: href.clone(),
        source: Box::new(source),
    };

    let request = match &link.schema {
        Some(schema) => Some(synthesize(id, schema, root).map_err(in_link)?),
        None => None,
    };

    let response = match &link.target_schema {
        Some(schema) => synthesize(id, schema, root).map_err(in_link)?,
        None => resources
            .get(id)
            .cloned()
            .ok_or_else(|| GenerateError::MissingResource { id: id.to_string() })?,
    };

    Ok(Action {
        method: link.method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
        encoding: link.enc_type.unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
        title: link.title.filter(|t| !t.is_empty()),
        href,
        rel,
        request,
        response,
    })
}

/// Classify a link schema into a non-primary resource named after `id`.
fn synthesize(id: &str, schema: &Value, root: &Value) -> Result<Resource, GenerateError> {
    let raw = SchemaNode::new(schema);
    let resolved = resolve(raw, root)?;
    let properties = Classifier::new(root).classify_all(resolved)?;

    Ok(Resource {
        name: id.to_string(),
        title: raw.title().or_else(|| resolved.title()).map(str::to_string),
        properties,
        is_primary: false,
        reference: raw.reference().map(str::to_string),
    })
}

/// Decode an href with query-unescape rules: `+` is a space, `%XX` a byte.
pub fn decode_href(href: &str) -> Result<String, String> {
    let bytes = href.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(format!("invalid escape in href \"{}\"", href));
            }
        }
    }

    urlencoding::decode(&href.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| format!("invalid href \"{}\": {}", href, e))
}
