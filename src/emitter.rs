//! Rust source rendering for resources, actions and validators.

use std::collections::BTreeMap;

use crate::model::{Action, ArrayItems, ObjectShape, Property, PropertyKind, Resource, Validator};
use crate::naming;
use crate::resolver::is_ref_to_main_resource;
use crate::types::{
    FormatOptions, PrimitiveType, TypeSet, DATE_TIME_FORMAT, DEFAULT_METHOD, FORM_ENCODING,
    INSTANCES_REL,
};

const GENERATED_HEADER: &str = "//! Code generated by hyperschema-types. DO NOT EDIT.";
const JSON_VALUE: &str = "serde_json::Value";

/// Render every resource, then every action's request and response.
///
/// Resources come out in id order, actions in definition-id order and then in
/// the `(method, href)` order they were extracted in.
pub fn render_types(
    resources: &BTreeMap<String, Resource>,
    actions: &BTreeMap<String, Vec<Action>>,
    options: &FormatOptions,
) -> String {
    let mut emitter = Emitter::new(options);
    for resource in resources.values() {
        emitter.resource(resource);
    }
    for action in actions.values().flatten() {
        emitter.action(action);
    }
    emitter.finish()
}

/// Render regex constants, statics and matcher functions.
pub fn render_validators(validators: &BTreeMap<String, Validator>) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    if validators.is_empty() {
        return out;
    }

    out.push_str("use std::sync::LazyLock;\n\nuse regex::Regex;\n");
    for validator in validators.values() {
        let pattern_const = validator.pattern_const_name();
        let regex_static = validator.regex_static_name();
        out.push('\n');
        out.push_str(&format!("/// Pattern for `{}` fields.\n", validator.name));
        out.push_str(&format!(
            "pub const {}: &str = {};\n\n",
            pattern_const,
            raw_string_literal(&validator.regexp_string)
        ));
        out.push_str(&format!(
            "pub static {}: LazyLock<Regex> =\n    LazyLock::new(|| Regex::new({}).expect(\"{} is a valid regex\"));\n\n",
            regex_static, pattern_const, pattern_const
        ));
        out.push_str(&format!(
            "/// Whether `value` matches [`{}`].\npub fn {}(value: &str) -> bool {{\n    {}.is_match(value)\n}}\n",
            pattern_const,
            validator.function_name(),
            regex_static
        ));
    }
    out
}

/// Rust type of a field plus the predicate used to omit it when empty.
struct FieldType {
    ty: String,
    skip_if: &'static str,
}

/// Accumulates rendered declarations and the imports they need.
pub struct Emitter<'o> {
    options: &'o FormatOptions,
    body: String,
    uses_serde: bool,
    uses_datetime: bool,
    uses_is_default: bool,
    uses_regex_statics: bool,
}

impl<'o> Emitter<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self {
            options,
            body: String::new(),
            uses_serde: false,
            uses_datetime: false,
            uses_is_default: false,
            uses_regex_statics: false,
        }
    }

    fn line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Render a resource struct and any inline structs it owns.
    pub fn resource(&mut self, resource: &Resource) {
        let name = naming::type_ident(&resource.name);
        let docs = [format!("{} struct for {} resource", name, resource.name)];
        self.write_struct(&name, &docs, &resource.properties, self.options.wire_tags);
    }

    /// Render an action's request (if any) and response declarations.
    pub fn action(&mut self, action: &Action) {
        let label = match &action.title {
            Some(title) if self.options.use_title => title.as_str(),
            _ => action.rel.as_str(),
        };
        let route = format!("{}: {}", action.method, action.href);

        if let Some(request) = &action.request {
            let name = naming::synthesized_ident(&request.name, label, "Request");
            let docs = [format!("{} struct for {}", name, request.name), route.clone()];
            match request.reference.as_deref() {
                Some(reference) if is_ref_to_main_resource(reference) => {
                    self.write_alias(&name, &docs, &naming::ref_type_ident(reference));
                }
                _ => {
                    let wire_tags = self.options.wire_tags
                        || action.method.eq_ignore_ascii_case(DEFAULT_METHOD)
                        || action.encoding == FORM_ENCODING;
                    self.write_struct(&name, &docs, &request.properties, wire_tags);
                }
            }
        }

        let response = &action.response;
        let name = naming::synthesized_ident(&response.name, label, "Response");
        let docs = [format!("{} struct for {}", name, response.name), route];
        let main_reference = response
            .reference
            .as_deref()
            .filter(|r| is_ref_to_main_resource(r));
        let base = match main_reference {
            Some(reference) => naming::ref_type_ident(reference),
            None => naming::type_ident(&response.name),
        };

        if action.rel == INSTANCES_REL {
            self.write_alias(&name, &docs, &format!("Vec<{}>", base));
        } else if response.is_primary || main_reference.is_some() {
            self.write_alias(&name, &docs, &base);
        } else {
            self.write_struct(&name, &docs, &response.properties, self.options.wire_tags);
        }
    }

    /// Prepend the header and imports required by what was rendered.
    pub fn finish(self) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push('\n');
        if self.uses_regex_statics {
            out.push_str("//!\n//! `*_REGEX` statics come from the generated validators module.\n");
        }
        out.push('\n');

        let mut imports = Vec::new();
        if self.uses_datetime {
            imports.push("use chrono::{DateTime, Utc};");
        }
        if self.uses_serde {
            imports.push("use serde::{Deserialize, Serialize};");
        }
        if self.uses_serde && self.options.validator {
            imports.push("use validator::Validate;");
        }
        if !imports.is_empty() {
            out.push_str(&imports.join("\n"));
            out.push_str("\n\n");
        }
        if self.uses_is_default {
            out.push_str(
                "fn is_default<T: Default + PartialEq>(value: &T) -> bool {\n    *value == T::default()\n}\n\n",
            );
        }
        out.push_str(&self.body);
        out
    }

    fn write_alias(&mut self, name: &str, docs: &[String], target: &str) {
        for doc in docs {
            self.line(&format!("/// {}", doc));
        }
        self.line(&format!("pub type {} = {};", name, target));
        self.line("");
    }

    fn write_struct(&mut self, name: &str, docs: &[String], properties: &[Property], wire_tags: bool) {
        self.uses_serde = true;
        for doc in docs {
            self.line(&format!("/// {}", doc));
        }
        let derives = if self.options.validator {
            "Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate"
        } else {
            "Debug, Clone, Default, PartialEq, Serialize, Deserialize"
        };
        self.line(&format!("#[derive({})]", derives));

        if properties.is_empty() {
            self.line(&format!("pub struct {} {{}}", name));
            self.line("");
            return;
        }

        let mut nested: Vec<(String, &[Property])> = Vec::new();
        self.line(&format!("pub struct {} {{", name));
        for property in properties {
            self.write_field(name, property, wire_tags, &mut nested);
        }
        self.line("}");
        self.line("");

        for (nested_name, nested_properties) in nested {
            let docs = [format!("Inline object of {}", name)];
            self.write_struct(&nested_name, &docs, nested_properties, wire_tags);
        }
    }

    fn write_field<'p>(
        &mut self,
        owner: &str,
        property: &'p Property,
        wire_tags: bool,
        nested: &mut Vec<(String, &'p [Property])>,
    ) {
        let ident = naming::field_ident(&property.name);
        let field = self.field_type(owner, property, nested);

        let mut serde_args = Vec::new();
        if wire_tags || naming::strip_raw_prefix(&ident) != property.name {
            serde_args.push(format!("rename = {:?}", property.name));
        }
        if !property.required {
            if field.skip_if == "is_default" {
                self.uses_is_default = true;
            }
            serde_args.push("default".to_string());
            serde_args.push(format!("skip_serializing_if = \"{}\"", field.skip_if));
        }
        if !serde_args.is_empty() {
            self.line(&format!("    #[serde({})]", serde_args.join(", ")));
        }

        if self.options.validator && property.required {
            let mut validate_args = Vec::new();
            if field.ty.starts_with("Option<") {
                validate_args.push("required".to_string());
            }
            let is_text = field.ty == "String" || field.ty == "Option<String>";
            if is_text && property.is_pattern_candidate() {
                if let Some(pattern) = &property.pattern {
                    let validator = Validator::new(&property.name, pattern);
                    validate_args.push(format!("regex(path = *{})", validator.regex_static_name()));
                    self.uses_regex_statics = true;
                }
            }
            if !validate_args.is_empty() {
                self.line(&format!("    #[validate({})]", validate_args.join(", ")));
            }
        }

        self.line(&format!("    pub {}: {},", ident, field.ty));
    }

    fn field_type<'p>(
        &mut self,
        owner: &str,
        property: &'p Property,
        nested: &mut Vec<(String, &'p [Property])>,
    ) -> FieldType {
        match &property.kind {
            PropertyKind::Scalar => {
                let base = self.scalar_type(&property.types, property.format.as_deref());
                if base == JSON_VALUE {
                    FieldType {
                        ty: base,
                        skip_if: "serde_json::Value::is_null",
                    }
                } else if self.options.nullable
                    && (property.types.is_nullable() || !property.required)
                {
                    FieldType {
                        ty: format!("Option<{}>", base),
                        skip_if: "Option::is_none",
                    }
                } else {
                    FieldType {
                        ty: base,
                        skip_if: "is_default",
                    }
                }
            }
            PropertyKind::Array(items) => {
                let inner = match items {
                    ArrayItems::Reference { reference, .. } => naming::ref_type_ident(reference),
                    ArrayItems::Primitive { types, format } => {
                        self.scalar_type(types, format.as_deref())
                    }
                    ArrayItems::Inline(properties) => {
                        let name = nested_ident(owner, &property.name);
                        nested.push((name.clone(), properties.as_slice()));
                        name
                    }
                };
                FieldType {
                    ty: format!("Vec<{}>", inner),
                    skip_if: "Vec::is_empty",
                }
            }
            PropertyKind::Object(shape) => {
                let base = match shape {
                    ObjectShape::Reference(reference) => {
                        format!("Box<{}>", naming::ref_type_ident(reference))
                    }
                    ObjectShape::Inline(properties) if properties.is_empty() => {
                        return FieldType {
                            ty: JSON_VALUE.to_string(),
                            skip_if: "serde_json::Value::is_null",
                        };
                    }
                    ObjectShape::Inline(properties) => {
                        let name = nested_ident(owner, &property.name);
                        nested.push((name.clone(), properties.as_slice()));
                        name
                    }
                };
                if !property.required || property.types.is_nullable() {
                    FieldType {
                        ty: format!("Option<{}>", base),
                        skip_if: "Option::is_none",
                    }
                } else {
                    FieldType {
                        ty: base,
                        skip_if: "Option::is_none",
                    }
                }
            }
        }
    }

    fn scalar_type(&mut self, types: &TypeSet, format: Option<&str>) -> String {
        if types.contains(PrimitiveType::Number) {
            "f64".to_string()
        } else if types.contains(PrimitiveType::Integer) {
            "i64".to_string()
        } else if types.contains(PrimitiveType::Boolean) {
            "bool".to_string()
        } else if types.contains(PrimitiveType::String) {
            if format == Some(DATE_TIME_FORMAT) {
                self.uses_datetime = true;
                "DateTime<Utc>".to_string()
            } else {
                "String".to_string()
            }
        } else {
            JSON_VALUE.to_string()
        }
    }
}

fn nested_ident(owner: &str, field: &str) -> String {
    let suffix = naming::to_pascal_case(field);
    if suffix.is_empty() {
        format!("{}Field", owner)
    } else {
        format!("{}{}", owner, suffix)
    }
}

/// A raw string literal with enough `#`s to hold `s` verbatim.
fn raw_string_literal(s: &str) -> String {
    let mut hashes = 0;
    let mut run: Option<usize> = None;
    for ch in s.chars() {
        match (ch, run) {
            ('"', _) => {
                run = Some(0);
                hashes = hashes.max(1);
            }
            ('#', Some(n)) => {
                run = Some(n + 1);
                hashes = hashes.max(n + 2);
            }
            _ => run = None,
        }
    }
    let fence = "#".repeat(hashes);
    format!("r{}\"{}\"{}", fence, s, fence)
}
