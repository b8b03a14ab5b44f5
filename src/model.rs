//! Canonical type model derived from a hyper-schema document.

use serde::Serialize;

use crate::naming;
use crate::types::{PrimitiveType, TypeSet};

/// Shape tag of a classified property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropType {
    Scalar,
    Array,
    Object,
}

/// Element description of an array property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrayItems {
    /// Items are a named top-level resource.
    Reference { reference: String, types: TypeSet },
    /// Items are primitive values.
    Primitive {
        types: TypeSet,
        format: Option<String>,
    },
    /// Items are anonymous objects.
    Inline(Vec<Property>),
}

/// Payload of an object property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectShape {
    /// Named top-level resource, emitted by name.
    Reference(String),
    /// Anonymous object flattened into its use site.
    Inline(Vec<Property>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKind {
    Scalar,
    Array(ArrayItems),
    Object(ObjectShape),
}

/// A classified field of a resource or inline object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    /// Resolved primitive types of the property node itself.
    pub types: TypeSet,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub required: bool,
    pub kind: PropertyKind,
}

impl Property {
    pub fn prop_type(&self) -> PropType {
        match self.kind {
            PropertyKind::Scalar => PropType::Scalar,
            PropertyKind::Array(_) => PropType::Array,
            PropertyKind::Object(_) => PropType::Object,
        }
    }

    /// Element types of a non-inline array.
    pub fn second_types(&self) -> Option<&TypeSet> {
        match &self.kind {
            PropertyKind::Array(ArrayItems::Reference { types, .. })
            | PropertyKind::Array(ArrayItems::Primitive { types, .. }) => Some(types),
            _ => None,
        }
    }

    /// Unresolved pointer of an object property naming a resource.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Object(ObjectShape::Reference(reference)) => Some(reference),
            _ => None,
        }
    }

    /// Unresolved item pointer of an array of resources.
    pub fn second_reference(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Array(ArrayItems::Reference { reference, .. }) => Some(reference),
            _ => None,
        }
    }

    /// Child properties of an inline object or inline array item.
    pub fn inline_properties(&self) -> &[Property] {
        match &self.kind {
            PropertyKind::Array(ArrayItems::Inline(props))
            | PropertyKind::Object(ObjectShape::Inline(props)) => props,
            _ => &[],
        }
    }

    /// Scalar property whose value can be checked against a regex.
    pub fn is_pattern_candidate(&self) -> bool {
        matches!(self.kind, PropertyKind::Scalar)
            && !self.types.contains(PrimitiveType::Object)
            && !self.types.contains(PrimitiveType::Array)
            && self.pattern.is_some()
    }
}

/// A record type: a top-level definition or a link's request/response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Definition id this resource belongs to.
    pub name: String,
    pub title: Option<String>,
    /// Sorted by name.
    pub properties: Vec<Property>,
    /// True for top-level definitions, false for shapes synthesized from links.
    pub is_primary: bool,
    /// Raw `$ref` of a link schema, kept to alias named resources.
    pub reference: Option<String>,
}

/// One hypermedia link of a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    /// Percent-decoded URL template.
    pub href: String,
    pub method: String,
    pub rel: String,
    pub title: Option<String>,
    pub encoding: String,
    pub request: Option<Resource>,
    pub response: Resource,
}

/// A named regex constraint on string fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validator {
    /// Property name the pattern was found on.
    pub name: String,
    pub regexp_string: String,
}

impl Validator {
    pub fn new(name: impl Into<String>, regexp_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regexp_string: regexp_string.into(),
        }
    }

    pub fn pattern_const_name(&self) -> String {
        format!("{}_PATTERN", naming::to_screaming_snake_case(&self.name))
    }

    pub fn regex_static_name(&self) -> String {
        format!("{}_REGEX", naming::to_screaming_snake_case(&self.name))
    }

    pub fn function_name(&self) -> String {
        format!("{}_validator", naming::to_snake_case(&self.name))
    }
}
