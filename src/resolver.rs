//! Reference resolution against the document root.

use serde_json::Value;

use crate::error::GenerateError;
use crate::schema::SchemaNode;
use crate::types::DEFINITIONS_PREFIX;

/// Follow `$ref` pointers until a concrete node is reached.
///
/// A node without `$ref` is returned unchanged. Chains are followed
/// iteratively; visiting the same pointer twice is a cycle.
///
/// # Errors
///
/// Returns `GenerateError::UnresolvedReference` if a pointer has no target,
/// or `GenerateError::CyclicReference` if the chain loops.
pub fn resolve<'a>(node: SchemaNode<'a>, root: &'a Value) -> Result<SchemaNode<'a>, GenerateError> {
    let mut current = node;
    let mut visited: Vec<String> = Vec::new();

    while let Some(reference) = current.reference() {
        if visited.iter().any(|v| v == reference) {
            visited.push(reference.to_string());
            return Err(GenerateError::CyclicReference { chain: visited });
        }
        visited.push(reference.to_string());
        current = SchemaNode::new(lookup(reference, root)?);
    }

    Ok(current)
}

/// Look up a single pointer without following further references.
///
/// Only same-document pointers (`#` or `#/...`) are supported.
pub fn lookup<'a>(reference: &str, root: &'a Value) -> Result<&'a Value, GenerateError> {
    let unresolved = || GenerateError::UnresolvedReference {
        reference: reference.to_string(),
    };

    let pointer = reference.strip_prefix('#').ok_or_else(unresolved)?;
    if pointer.is_empty() {
        return Ok(root);
    }
    if !pointer.starts_with('/') {
        return Err(unresolved());
    }
    root.pointer(pointer).ok_or_else(unresolved)
}

/// Whether a pointer names a top-level definition directly.
///
/// `#/definitions/user` does; `#/definitions/user/definitions/id` and
/// pointers outside `definitions` do not.
pub fn is_ref_to_main_resource(reference: &str) -> bool {
    match reference.strip_prefix(DEFINITIONS_PREFIX) {
        Some(name) => !name.is_empty() && !name.contains('/'),
        None => false,
    }
}

/// The definition id a pointer refers to, with the definitions prefix stripped.
pub fn ref_to_resource_name(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .unwrap_or(reference)
}
