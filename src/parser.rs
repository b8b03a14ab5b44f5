//! The generation pipeline: resources, actions, validators, rendered source.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::action::extract_actions;
use crate::emitter::{render_types, render_validators};
use crate::error::GenerateError;
use crate::model::{Action, Resource, Validator};
use crate::resource::build_resources;
use crate::types::FormatOptions;
use crate::validator::derive_validators;

/// Everything extracted from one hyper-schema document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSchema {
    pub resources: BTreeMap<String, Resource>,
    pub actions: BTreeMap<String, Vec<Action>>,
    pub validators: BTreeMap<String, Validator>,
}

/// Run every extraction phase over a loaded document.
///
/// Validators are collected from primary resources first, then action
/// requests, then synthesized responses, so later sources win on name clashes.
/// Responses that reuse a primary resource are not scanned twice.
///
/// # Errors
///
/// Fails on the first malformed definition, property, or link.
pub fn parse_document(root: &Value) -> Result<ParsedSchema, GenerateError> {
    let resources = build_resources(root)?;
    let actions = extract_actions(root, &resources)?;

    let requests = actions.values().flatten().filter_map(|a| a.request.as_ref());
    let responses = actions
        .values()
        .flatten()
        .map(|a| &a.response)
        .filter(|r| !r.is_primary);
    let validators = derive_validators(resources.values().chain(requests).chain(responses));

    Ok(ParsedSchema {
        resources,
        actions,
        validators,
    })
}

/// Generate Rust type declarations for a document.
///
/// # Errors
///
/// Returns the first [`GenerateError`] hit while parsing. Nothing is rendered
/// on failure.
pub fn generate_types(root: &Value, options: &FormatOptions) -> Result<String, GenerateError> {
    let parsed = parse_document(root)?;
    Ok(render_types(&parsed.resources, &parsed.actions, options))
}

/// Generate the regex validators module for a document.
///
/// # Errors
///
/// Returns the first [`GenerateError`] hit while parsing.
pub fn generate_validators(root: &Value) -> Result<String, GenerateError> {
    let parsed = parse_document(root)?;
    Ok(render_validators(&parsed.validators))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "definitions": {
                "task": {
                    "title": "Task",
                    "type": "object",
                    "required": ["id"],
                    "properties": {
                        "id": { "type": "string", "pattern": "^t-[0-9]+$" }
                    },
                    "links": [
                        {
                            "href": "/tasks",
                            "method": "POST",
                            "rel": "create",
                            "schema": {
                                "properties": {
                                    "id": { "type": "string", "pattern": "^new-[0-9]+$" }
                                }
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn parse_collects_all_phases() {
        let parsed = parse_document(&doc()).unwrap();
        assert_eq!(parsed.resources.len(), 1);
        assert_eq!(parsed.actions["task"].len(), 1);
        assert_eq!(parsed.validators.len(), 1);
    }

    #[test]
    fn request_validators_override_resource_validators() {
        let parsed = parse_document(&doc()).unwrap();
        assert_eq!(parsed.validators["id"].regexp_string, "^new-[0-9]+$");
    }

    #[test]
    fn generate_is_deterministic() {
        let root = doc();
        let options = FormatOptions::default();
        let first = generate_types(&root, &options).unwrap();
        let second = generate_types(&root, &options).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("pub struct Task {"));
        assert!(first.contains("pub struct TaskCreateRequest {"));
    }

    #[test]
    fn generate_fails_without_output() {
        let root = json!({ "definitions": { "bad": { "properties": { "x": { "oneOf": [] } } } } });
        assert!(generate_types(&root, &FormatOptions::default()).is_err());
        assert!(generate_validators(&root).is_err());
    }
}
