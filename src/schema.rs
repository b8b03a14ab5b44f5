//! Read-only view over a schema node inside a parsed document.

use serde_json::Value;

use crate::error::GenerateError;
use crate::types::{json_type_name, PrimitiveType, TypeSet, UNSUPPORTED_KEYWORDS};

/// A borrowed schema node.
///
/// Accessors read keywords straight from the underlying JSON; nothing is
/// copied until a [`crate::Property`] is built.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    value: &'a Value,
}

impl<'a> SchemaNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    fn str_keyword(&self, key: &str) -> Option<&'a str> {
        self.value.get(key).and_then(Value::as_str)
    }

    /// The raw `$ref` pointer, if present.
    pub fn reference(&self) -> Option<&'a str> {
        self.str_keyword("$ref").filter(|r| !r.is_empty())
    }

    pub fn format(&self) -> Option<&'a str> {
        self.str_keyword("format").filter(|f| !f.is_empty())
    }

    pub fn pattern(&self) -> Option<&'a str> {
        self.str_keyword("pattern").filter(|p| !p.is_empty())
    }

    pub fn title(&self) -> Option<&'a str> {
        self.str_keyword("title").filter(|t| !t.is_empty())
    }

    /// Primitive types declared by `type`, either a single tag or a list.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidSchema` for unknown tags or a `type`
    /// that is neither string nor array of strings.
    pub fn types(&self) -> Result<TypeSet, GenerateError> {
        let parse = |tag: &Value| -> Result<PrimitiveType, GenerateError> {
            tag.as_str()
                .and_then(PrimitiveType::parse)
                .ok_or_else(|| GenerateError::InvalidSchema {
                    message: format!("unknown type tag {}", tag),
                })
        };

        match self.value.get("type") {
            None => Ok(TypeSet::default()),
            Some(tag @ Value::String(_)) => Ok(TypeSet::new([parse(tag)?])),
            Some(Value::Array(tags)) => tags.iter().map(parse).collect(),
            Some(other) => Err(GenerateError::InvalidSchema {
                message: format!(
                    "expected string or array for type, got {}",
                    json_type_name(other)
                ),
            }),
        }
    }

    /// Child property schemas, sorted by name.
    pub fn properties(&self) -> Vec<(&'a str, SchemaNode<'a>)> {
        let mut props: Vec<(&'a str, SchemaNode<'a>)> = self
            .value
            .get("properties")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(name, schema)| (name.as_str(), SchemaNode::new(schema)))
                    .collect()
            })
            .unwrap_or_default();
        props.sort_by(|a, b| a.0.cmp(b.0));
        props
    }

    pub fn has_properties(&self) -> bool {
        self.value
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|map| !map.is_empty())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.value
            .get("required")
            .and_then(Value::as_array)
            .is_some_and(|required| required.iter().any(|r| r.as_str() == Some(name)))
    }

    /// The single item schema of an array node.
    ///
    /// `items` may be a schema or a one-element list of schemas.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::UnsupportedArrayShape` when `items` is missing
    /// or lists more than one schema.
    pub fn single_item(&self) -> Result<SchemaNode<'a>, GenerateError> {
        match self.value.get("items") {
            Some(item @ Value::Object(_)) => Ok(SchemaNode::new(item)),
            Some(Value::Array(items)) if items.len() == 1 => Ok(SchemaNode::new(&items[0])),
            Some(Value::Array(items)) => {
                Err(GenerateError::UnsupportedArrayShape { found: items.len() })
            }
            _ => Err(GenerateError::UnsupportedArrayShape { found: 0 }),
        }
    }

    /// First combinator keyword present on this node, if any.
    pub fn combinator(&self) -> Option<&'static str> {
        UNSUPPORTED_KEYWORDS
            .iter()
            .copied()
            .find(|kw| self.value.get(*kw).is_some())
    }

    /// The hyper-schema `links` block, if present.
    pub fn links(&self) -> Option<&'a Value> {
        self.value.get("links")
    }
}

/// Top-level definitions of a document, sorted by id.
///
/// # Errors
///
/// Returns `GenerateError::InvalidSchema` if the root is not an object or
/// has no `definitions` object.
pub fn definitions(root: &Value) -> Result<Vec<(&str, SchemaNode<'_>)>, GenerateError> {
    let root_map = root.as_object().ok_or_else(|| GenerateError::InvalidSchema {
        message: format!("document root must be an object, got {}", json_type_name(root)),
    })?;

    let defs = root_map
        .get("definitions")
        .and_then(Value::as_object)
        .ok_or_else(|| GenerateError::InvalidSchema {
            message: "document has no top-level definitions object".to_string(),
        })?;

    let mut out: Vec<(&str, SchemaNode<'_>)> = defs
        .iter()
        .map(|(id, schema)| (id.as_str(), SchemaNode::new(schema)))
        .collect();
    out.sort_by(|a, b| a.0.cmp(b.0));
    Ok(out)
}
