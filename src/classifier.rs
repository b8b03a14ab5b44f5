//! Property classification: turns raw property schemas into [`Property`] values.

use serde_json::Value;

use crate::error::GenerateError;
use crate::model::{ArrayItems, ObjectShape, Property, PropertyKind};
use crate::resolver::{is_ref_to_main_resource, resolve};
use crate::schema::SchemaNode;
use crate::types::{PrimitiveType, TypeSet};

/// Classify one property schema against the document root.
///
/// `owner` is the schema whose `required` list decides `Property::required`.
pub fn classify<'a>(
    name: &str,
    raw: SchemaNode<'a>,
    owner: SchemaNode<'a>,
    root: &'a Value,
) -> Result<Property, GenerateError> {
    Classifier::new(root).classify(name, raw, owner)
}

/// Stateful classifier tracking which nested pointers are being inlined.
pub struct Classifier<'a> {
    root: &'a Value,
    inlining: Vec<String>,
}

impl<'a> Classifier<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            inlining: Vec::new(),
        }
    }

    /// Classify every property of `node` in name order, failing on the first error.
    pub fn classify_all(&mut self, node: SchemaNode<'a>) -> Result<Vec<Property>, GenerateError> {
        node.properties()
            .into_iter()
            .map(|(name, raw)| self.classify(name, raw, node))
            .collect()
    }

    pub fn classify(
        &mut self,
        name: &str,
        raw: SchemaNode<'a>,
        owner: SchemaNode<'a>,
    ) -> Result<Property, GenerateError> {
        let resolved = resolve(raw, self.root)?;
        if let Some(keyword) = resolved.combinator() {
            return Err(GenerateError::UnsupportedKeyword {
                keyword: keyword.to_string(),
            });
        }

        let types = resolved.types()?;
        let pattern = match resolved.pattern() {
            Some(p) => {
                regex::Regex::new(p).map_err(|source| GenerateError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })?;
                Some(p.to_string())
            }
            None => None,
        };

        check_single_type(&types)?;
        let kind = if types.contains(PrimitiveType::Array) {
            PropertyKind::Array(self.classify_items(resolved)?)
        } else if is_object_like(&types, resolved) {
            PropertyKind::Object(self.classify_object(raw, resolved)?)
        } else {
            PropertyKind::Scalar
        };

        Ok(Property {
            name: name.to_string(),
            types,
            format: resolved.format().map(str::to_string),
            pattern,
            required: owner.is_required(name),
            kind,
        })
    }

    fn classify_items(&mut self, array: SchemaNode<'a>) -> Result<ArrayItems, GenerateError> {
        let item = array.single_item()?;
        let item_ref = item.reference();
        let resolved_item = resolve(item, self.root)?;
        if let Some(keyword) = resolved_item.combinator() {
            return Err(GenerateError::UnsupportedKeyword {
                keyword: keyword.to_string(),
            });
        }
        let item_types = resolved_item.types()?;
        check_single_type(&item_types)?;

        match item_ref {
            Some(reference)
                if is_ref_to_main_resource(reference)
                    && is_object_like(&item_types, resolved_item) =>
            {
                Ok(ArrayItems::Reference {
                    reference: reference.to_string(),
                    types: item_types,
                })
            }
            _ if resolved_item.has_properties() => Ok(ArrayItems::Inline(
                self.inline(item_ref, resolved_item)?,
            )),
            _ => Ok(ArrayItems::Primitive {
                types: item_types,
                format: resolved_item.format().map(str::to_string),
            }),
        }
    }

    fn classify_object(
        &mut self,
        raw: SchemaNode<'a>,
        resolved: SchemaNode<'a>,
    ) -> Result<ObjectShape, GenerateError> {
        match raw.reference() {
            Some(reference) if !raw.has_properties() && is_ref_to_main_resource(reference) => {
                Ok(ObjectShape::Reference(reference.to_string()))
            }
            reference => Ok(ObjectShape::Inline(self.inline(reference, resolved)?)),
        }
    }

    /// Classify the children of an anonymous object.
    ///
    /// A nested pointer already on the inlining stack would expand forever,
    /// so it is reported as a cycle.
    fn inline(
        &mut self,
        reference: Option<&str>,
        node: SchemaNode<'a>,
    ) -> Result<Vec<Property>, GenerateError> {
        let Some(reference) = reference else {
            return self.classify_all(node);
        };

        if self.inlining.iter().any(|r| r == reference) {
            let mut chain = self.inlining.clone();
            chain.push(reference.to_string());
            return Err(GenerateError::CyclicReference { chain });
        }

        self.inlining.push(reference.to_string());
        let result = self.classify_all(node);
        self.inlining.pop();
        result
    }
}

/// Typed `object`, or untyped with `properties`.
fn is_object_like(types: &TypeSet, node: SchemaNode<'_>) -> bool {
    types.contains(PrimitiveType::Object) || (types.is_empty() && node.has_properties())
}

/// Reject unions of more than one non-null primitive, containers included.
fn check_single_type(types: &TypeSet) -> Result<(), GenerateError> {
    if types.non_null().count() > 1 {
        return Err(GenerateError::UnsupportedType {
            types: types.to_strings(),
        });
    }
    Ok(())
}
