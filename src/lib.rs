//! Hyper-Schema Types
//!
//! Generates Rust type declarations from a JSON Hyper-Schema document.
//!
//! Every entry under `definitions` becomes a resource struct. Every link
//! becomes an action with a request type (when the link carries a `schema`)
//! and a response type (from `targetSchema`, or the owning resource).
//! Regex `pattern`s on string properties can also be emitted as a separate
//! validators module.
//!
//! # Example
//!
//! ```
//! use hyperschema_types::{generate_types, FormatOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "definitions": {
//!         "task": {
//!             "type": "object",
//!             "required": ["name"],
//!             "properties": {
//!                 "name": { "type": "string" },
//!                 "completedAt": { "type": "string", "format": "date-time" }
//!             },
//!             "links": [
//!                 { "href": "/tasks", "method": "GET", "rel": "instances" }
//!             ]
//!         }
//!     }
//! });
//!
//! let source = generate_types(&schema, &FormatOptions::default()).unwrap();
//!
//! assert!(source.contains("pub struct Task {"));
//! assert!(source.contains("pub completed_at: DateTime<Utc>,"));
//! assert!(source.contains("pub type TaskInstancesResponse = Vec<Task>;"));
//! ```
//!
//! # Type Mapping
//!
//! | Schema | Rust |
//! |--------|------|
//! | `string` | `String` |
//! | `string` + `format: date-time` | `DateTime<Utc>` |
//! | `integer` / `number` / `boolean` | `i64` / `f64` / `bool` |
//! | `array` | `Vec<T>` |
//! | `$ref` to `#/definitions/x` | `Box<X>` (or `X` inside `Vec`) |
//! | inline `object` | hoisted `OwnerField` struct |
//! | anything else | `serde_json::Value` |

mod action;
mod classifier;
mod emitter;
mod error;
mod loader;
mod model;
pub mod naming;
mod parser;
mod resolver;
mod resource;
mod schema;
mod types;
mod validator;

pub use action::{decode_href, extract_actions};
pub use classifier::{classify, Classifier};
pub use emitter::{render_types, render_validators, Emitter};
pub use error::{GenerateError, PayloadError, ValidateError};
pub use loader::{is_url, load_schema, load_schema_auto, load_schema_reader, load_schema_str};
pub use model::{Action, ArrayItems, ObjectShape, PropType, Property, PropertyKind, Resource, Validator};
pub use parser::{generate_types, generate_validators, parse_document, ParsedSchema};
pub use resolver::{is_ref_to_main_resource, lookup, ref_to_resource_name, resolve};
pub use resource::build_resources;
pub use schema::{definitions, SchemaNode};
pub use types::{FormatOptions, PrimitiveType, TypeSet};
pub use validator::{check_payload, derive_validators, link_schema_document, validate_link_payload};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
