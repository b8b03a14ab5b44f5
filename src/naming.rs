//! Identifier normalization for emitted source.

use crate::resolver::ref_to_resource_name;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Replace every separator character with `_`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Split a name into words on separators and case boundaries.
///
/// `userID` -> `user`, `ID`; `XMLParser` -> `XML`, `Parser`.
fn words(name: &str) -> Vec<String> {
    let normalized = normalize(name);
    let mut words = Vec::new();

    for chunk in normalized.split('_').filter(|c| !c.is_empty()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();
        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 && ch.is_ascii_uppercase() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
                let boundary = prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_is_lower);
                if boundary && !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

pub fn to_pascal_case(name: &str) -> String {
    words(name).iter().map(|w| capitalize(w)).collect()
}

pub fn to_snake_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn to_screaming_snake_case(name: &str) -> String {
    to_snake_case(name).to_ascii_uppercase()
}

/// Strip a leading `r#` from a raw identifier.
pub fn strip_raw_prefix(ident: &str) -> &str {
    ident.strip_prefix("r#").unwrap_or(ident)
}

fn escape_keyword(ident: String) -> String {
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{}", ident)
    } else {
        ident
    }
}

/// Public type name for a schema name, e.g. `app-setup` -> `AppSetup`.
pub fn type_ident(name: &str) -> String {
    let ident = to_pascal_case(name);
    if ident.is_empty() {
        return "Unnamed".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("T{}", ident);
    }
    escape_keyword(ident)
}

/// Field name for a wire property name, e.g. `createdAt` -> `created_at`.
pub fn field_ident(name: &str) -> String {
    let ident = to_snake_case(name);
    if ident.is_empty() {
        return "field".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", ident);
    }
    escape_keyword(ident)
}

/// Type name of the resource a pointer refers to.
pub fn ref_type_ident(reference: &str) -> String {
    type_ident(ref_to_resource_name(reference))
}

/// `<Resource><RelOrTitle><suffix>`, e.g. `TaskCreateRequest`.
pub fn synthesized_ident(resource: &str, label: &str, suffix: &str) -> String {
    format!("{}{}{}", type_ident(resource), to_pascal_case(label), suffix)
}
