//! Error types for hyper-schema loading, type derivation and payload checks.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a document or deriving its type model.
#[derive(Debug, Error)]
pub enum GenerateError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Schema errors (exit code 2)
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("unresolved reference \"{reference}\"")]
    UnresolvedReference { reference: String },

    #[error("cyclic reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("array schema must have exactly one item schema, found {found}")]
    UnsupportedArrayShape { found: usize },

    #[error("unsupported type union [{}]: only one primitive plus optional null", types.join(", "))]
    UnsupportedType { types: Vec<String> },

    #[error("unsupported keyword \"{keyword}\"")]
    UnsupportedKeyword { keyword: String },

    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("resource not found: {id}")]
    MissingResource { id: String },

    #[error("malformed link in {definition}: {message}")]
    MalformedLink { definition: String, message: String },

    // Context wrappers
    #[error("{definition}.{property}: {source}")]
    InProperty {
        definition: String,
        property: String,
        #[source]
        source: Box<GenerateError>,
    },

    #[error("{definition} link {rel} ({href}): {source}")]
    InLink {
        definition: String,
        rel: String,
        href: String,
        #[source]
        source: Box<GenerateError>,
    },
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::FileNotFound { .. } | GenerateError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            GenerateError::NetworkError { .. } => 3,
            GenerateError::InProperty { source, .. } | GenerateError::InLink { source, .. } => {
                source.exit_code()
            }
            _ => 2,
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root_cause(&self) -> &GenerateError {
        match self {
            GenerateError::InProperty { source, .. } | GenerateError::InLink { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Errors during payload checks against a link schema.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("no link with rel \"{rel}\" on {definition}")]
    UnknownLink { definition: String, rel: String },

    #[error("validation failed with {} error(s)", errors.len())]
    Invalid { errors: Vec<PayloadError> },
}

/// Single payload validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PayloadError {
    /// JSON Pointer (RFC 6901) to the invalid field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Generate(e) => e.exit_code(),
            ValidateError::UnknownLink { .. } => 2,
            ValidateError::Invalid { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_error_exit_codes() {
        let err = GenerateError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = GenerateError::UnresolvedReference {
            reference: "#/definitions/nope".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = GenerateError::UnsupportedArrayShape { found: 2 };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn wrapped_errors_keep_inner_exit_code() {
        let err = GenerateError::InProperty {
            definition: "task".into(),
            property: "tags".into(),
            source: Box::new(GenerateError::UnsupportedArrayShape { found: 0 }),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(
            err.root_cause(),
            GenerateError::UnsupportedArrayShape { found: 0 }
        ));
    }

    #[test]
    fn wrapped_error_display_names_location() {
        let err = GenerateError::InProperty {
            definition: "task".into(),
            property: "owner".into(),
            source: Box::new(GenerateError::UnresolvedReference {
                reference: "#/definitions/user".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "task.owner: unresolved reference \"#/definitions/user\""
        );
    }

    #[test]
    fn cyclic_reference_display_shows_chain() {
        let err = GenerateError::CyclicReference {
            chain: vec!["#/definitions/a".into(), "#/definitions/b".into()],
        };
        assert_eq!(
            err.to_string(),
            "cyclic reference: #/definitions/a -> #/definitions/b"
        );
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            errors: vec![PayloadError {
                path: "/name".into(),
                message: "missing required field".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::UnknownLink {
            definition: "task".into(),
            rel: "destroy".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn payload_error_display() {
        let err = PayloadError {
            path: "/limit".into(),
            message: "\"ten\" is not of type \"integer\"".into(),
        };
        assert_eq!(err.to_string(), "/limit: \"ten\" is not of type \"integer\"");
    }
}
