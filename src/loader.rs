//! Schema loading from various sources.
//!
//! Handles loading schemas from files, stdin, strings, and HTTP URLs.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::GenerateError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source name that selects stdin.
pub const STDIN_SOURCE: &str = "-";

/// Load a schema from a file path.
///
/// # Errors
///
/// Returns `GenerateError::FileNotFound` if the file doesn't exist,
/// or `GenerateError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, GenerateError> {
    if !path.exists() {
        return Err(GenerateError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| GenerateError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_schema_str(&content)
}

/// Load a schema from a JSON string.
///
/// # Errors
///
/// Returns `GenerateError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, GenerateError> {
    serde_json::from_str(content).map_err(|source| GenerateError::InvalidJson { source })
}

/// Load a schema from any reader, reported as `name` on read failure.
pub fn load_schema_reader(mut reader: impl Read, name: &str) -> Result<Value, GenerateError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| GenerateError::ReadError {
            path: PathBuf::from(name),
            source,
        })?;
    load_schema_str(&content)
}

/// Load a schema from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `GenerateError::NetworkError` if the request fails or the status is
/// not a success. A body that isn't JSON is `GenerateError::InvalidJson`.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Value, GenerateError> {
    let network = |source| GenerateError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network)?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(network)?;

    let body = response.text().map_err(network)?;
    load_schema_str(&body)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a schema from a URL, `-` (stdin), or file path.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_schema_auto(source: &str) -> Result<Value, GenerateError> {
    tracing::debug!(source, "loading schema");
    if source == STDIN_SOURCE {
        load_schema_reader(std::io::stdin().lock(), "<stdin>")
    } else if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_schema_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(GenerateError::FileNotFound {
                path: PathBuf::from(source),
            })
        }
    } else {
        load_schema(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_schema_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"definitions": {{}}}}"#).unwrap();

        let schema = load_schema(file.path()).unwrap();
        assert!(schema["definitions"].is_object());
    }

    #[test]
    fn load_schema_file_not_found() {
        let result = load_schema(Path::new("/nonexistent/path.json"));
        assert!(matches!(result, Err(GenerateError::FileNotFound { .. })));
    }

    #[test]
    fn load_schema_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let result = load_schema(file.path());
        assert!(matches!(result, Err(GenerateError::InvalidJson { .. })));
    }

    #[test]
    fn load_schema_str_invalid() {
        let result = load_schema_str("not json");
        assert!(matches!(result, Err(GenerateError::InvalidJson { .. })));
    }

    #[test]
    fn load_schema_reader_parses() {
        let schema = load_schema_reader(&br#"{"title": "API"}"#[..], "<stdin>").unwrap();
        assert_eq!(schema["title"], "API");
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/schema.json"));
        assert!(is_url("http://example.com/schema.json"));
        assert!(!is_url("/path/to/schema.json"));
        assert!(!is_url("-"));
        assert!(!is_url("schema.json"));
    }

    #[test]
    fn load_schema_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"type": "object"}}"#).unwrap();

        let schema = load_schema_auto(file.path().to_str().unwrap()).unwrap();
        assert_eq!(schema["type"], "object");
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_schema_url_valid() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"definitions": {"task": {"type": "object"}}}"#)
                .create();

            let schema = load_schema_url(&format!("{}/schema.json", server.url())).unwrap();
            assert_eq!(schema["definitions"]["task"]["type"], "object");
            mock.assert();
        }

        #[test]
        fn load_schema_url_404() {
            let mut server = mockito::Server::new();
            server.mock("GET", "/missing.json").with_status(404).create();

            let result = load_schema_url(&format!("{}/missing.json", server.url()));
            assert!(matches!(result, Err(GenerateError::NetworkError { .. })));
        }

        #[test]
        fn load_schema_url_invalid_body() {
            let mut server = mockito::Server::new();
            server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body("<html></html>")
                .create();

            let result = load_schema_url(&format!("{}/schema.json", server.url()));
            assert!(matches!(result, Err(GenerateError::InvalidJson { .. })));
        }

        #[test]
        fn load_schema_auto_url() {
            let mut server = mockito::Server::new();
            server
                .mock("GET", "/schema.json")
                .with_status(200)
                .with_body(r#"{"definitions": {}}"#)
                .create();

            let result = load_schema_auto(&format!("{}/schema.json", server.url()));
            assert!(result.is_ok());
        }
    }
}
