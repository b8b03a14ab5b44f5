//! Core types for hyper-schema type derivation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pointer prefix under which top-level resource definitions live.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Link relation whose response is a list of the owning resource.
pub const INSTANCES_REL: &str = "instances";

/// Encoding assumed when a link has no `encType`.
pub const DEFAULT_ENCODING: &str = "application/json";

/// Encoding whose requests are decoded from form fields.
pub const FORM_ENCODING: &str = "application/x-www-form-urlencoded";

/// Method assumed when a link has no `method`.
pub const DEFAULT_METHOD: &str = "GET";

/// Format hint that maps to a timestamp type.
pub const DATE_TIME_FORMAT: &str = "date-time";

/// Combinator keywords the classifier refuses to interpret.
pub const UNSUPPORTED_KEYWORDS: &[&str] = &["oneOf", "anyOf", "allOf"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON Schema primitive type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    /// Parse a type tag.
    ///
    /// Returns `None` for unknown values (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "array" => Some(PrimitiveType::Array),
            "boolean" => Some(PrimitiveType::Boolean),
            "integer" => Some(PrimitiveType::Integer),
            "null" => Some(PrimitiveType::Null),
            "number" => Some(PrimitiveType::Number),
            "object" => Some(PrimitiveType::Object),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Null => "null",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorted, duplicate-free set of primitive types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeSet(Vec<PrimitiveType>);

impl TypeSet {
    pub fn new(types: impl IntoIterator<Item = PrimitiveType>) -> Self {
        let mut types: Vec<PrimitiveType> = types.into_iter().collect();
        types.sort();
        types.dedup();
        TypeSet(types)
    }

    pub fn contains(&self, ty: PrimitiveType) -> bool {
        self.0.contains(&ty)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PrimitiveType> + '_ {
        self.0.iter().copied()
    }

    /// Types other than `null`.
    pub fn non_null(&self) -> impl Iterator<Item = PrimitiveType> + '_ {
        self.iter().filter(|t| *t != PrimitiveType::Null)
    }

    pub fn is_nullable(&self) -> bool {
        self.contains(PrimitiveType::Null)
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl FromIterator<PrimitiveType> for TypeSet {
    fn from_iter<I: IntoIterator<Item = PrimitiveType>>(iter: I) -> Self {
        TypeSet::new(iter)
    }
}

/// Options controlling emitted source.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Emit `rename` on every field, not just where the identifier differs.
    pub wire_tags: bool,
    /// Name synthesized request/response types after link titles instead of rels.
    pub use_title: bool,
    /// Wrap optional and nullable scalars in `Option`.
    pub nullable: bool,
    /// Derive `Validate` and annotate required/pattern fields.
    pub validator: bool,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wire_tags(mut self, wire_tags: bool) -> Self {
        self.wire_tags = wire_tags;
        self
    }

    pub fn use_title(mut self, use_title: bool) -> Self {
        self.use_title = use_title;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn validator(mut self, validator: bool) -> Self {
        self.validator = validator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_type_parse_valid() {
        assert_eq!(PrimitiveType::parse("string"), Some(PrimitiveType::String));
        assert_eq!(PrimitiveType::parse("null"), Some(PrimitiveType::Null));
        assert_eq!(PrimitiveType::parse("array"), Some(PrimitiveType::Array));
    }

    #[test]
    fn primitive_type_parse_invalid() {
        assert_eq!(PrimitiveType::parse("String"), None);
        assert_eq!(PrimitiveType::parse("any"), None);
        assert_eq!(PrimitiveType::parse(""), None);
    }

    #[test]
    fn type_set_sorts_and_dedups() {
        let set = TypeSet::new([
            PrimitiveType::String,
            PrimitiveType::Null,
            PrimitiveType::String,
        ]);
        assert_eq!(set.to_strings(), vec!["null", "string"]);
        assert!(set.is_nullable());
        assert_eq!(set.non_null().count(), 1);
    }

    #[test]
    fn format_options_builder() {
        let opts = FormatOptions::new().nullable(true).validator(true);
        assert!(opts.nullable);
        assert!(opts.validator);
        assert!(!opts.use_title);
        assert!(!opts.wire_tags);
    }
}
