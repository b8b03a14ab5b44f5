//! CLI integration tests for hyperschema-types binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hyperschema-types"))
}

// Helper to create a temp schema file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const TASK_SCHEMA: &str = r#"{
    "definitions": {
        "task": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "pattern": "^[a-z ]+$" },
                "completedAt": { "type": "string", "format": "date-time" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "links": [
                {
                    "href": "/tasks",
                    "method": "POST",
                    "rel": "create",
                    "title": "Create",
                    "schema": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string", "pattern": "^[a-z ]+$" }
                        }
                    }
                },
                { "href": "/tasks", "method": "GET", "rel": "instances" }
            ]
        }
    }
}"#;

mod struct_command {
    use super::*;

    #[test]
    fn basic_struct() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        cmd()
            .args(["struct", "--file", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "//! Code generated by hyperschema-types. DO NOT EDIT.",
            ))
            .stdout(predicate::str::contains("pub struct Task {"))
            .stdout(predicate::str::contains(
                "pub type TaskInstancesResponse = Vec<Task>;",
            ));
    }

    #[test]
    fn struct_from_stdin() {
        cmd()
            .args(["struct", "-f", "-"])
            .write_stdin(TASK_SCHEMA)
            .assert()
            .success()
            .stdout(predicate::str::contains("pub struct TaskCreateRequest {"));
    }

    #[test]
    fn struct_with_flags() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        cmd()
            .args([
                "struct",
                "-f",
                schema.to_str().unwrap(),
                "--validate-tag",
                "--nullable",
                "--wire-tags",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Validate)]"))
            .stdout(predicate::str::contains(
                "pub completed_at: Option<DateTime<Utc>>,",
            ))
            .stdout(predicate::str::contains("#[serde(rename = \"name\")]"))
            .stdout(predicate::str::contains("regex(path = *NAME_REGEX)"));
    }

    #[test]
    fn struct_use_title() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        cmd()
            .args(["struct", "-f", schema.to_str().unwrap(), "--use-title"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pub struct TaskCreateRequest {"))
            .stdout(predicate::str::contains("pub type TaskCreateResponse = Task;"));
    }

    #[test]
    fn struct_with_output_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);
        let output = dir.path().join("types.rs");

        cmd()
            .args([
                "struct",
                "-f",
                schema.to_str().unwrap(),
                "-o",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("pub struct Task {"));
    }

    #[test]
    fn repeated_runs_identical() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        let first = cmd()
            .args(["struct", "-f", schema.to_str().unwrap()])
            .output()
            .unwrap();
        let second = cmd()
            .args(["struct", "-f", schema.to_str().unwrap()])
            .output()
            .unwrap();
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn verbose_logs_to_stderr() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        cmd()
            .args(["-vv", "struct", "-f", schema.to_str().unwrap()])
            .assert()
            .success()
            .stderr(predicate::str::contains("resources built"))
            .stdout(predicate::str::contains("resources built").not());
    }
}

mod validator_command {
    use super::*;

    #[test]
    fn validators_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);

        cmd()
            .args(["validator", "-f", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "pub const NAME_PATTERN: &str = r\"^[a-z ]+$\";",
            ))
            .stdout(predicate::str::contains(
                "pub fn name_validator(value: &str) -> bool {",
            ));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn valid_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "write docs"}"#);

        cmd()
            .args([
                "check",
                "-f",
                schema.to_str().unwrap(),
                "--resource",
                "task",
                "--rel",
                "create",
                payload.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }

    #[test]
    fn invalid_payload() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{"name": "Write Docs!"}"#);

        cmd()
            .args([
                "check",
                "-f",
                schema.to_str().unwrap(),
                "--resource",
                "task",
                "--rel",
                "create",
                payload.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Validation failed"))
            .stderr(predicate::str::contains("/name"));
    }

    #[test]
    fn invalid_payload_json_output() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "check",
                "-f",
                schema.to_str().unwrap(),
                "--resource",
                "task",
                "--rel",
                "create",
                "--json",
                payload.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""errors""#));
    }

    #[test]
    fn unknown_rel() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", TASK_SCHEMA);
        let payload = write_temp_file(&dir, "payload.json", r#"{}"#);

        cmd()
            .args([
                "check",
                "-f",
                schema.to_str().unwrap(),
                "--resource",
                "task",
                "--rel",
                "destroy",
                payload.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("no link with rel \"destroy\""));
    }
}

mod errors {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["struct", "-f", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", "not json");

        cmd()
            .args(["struct", "-f", schema.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn unsupported_array_shape() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "schema.json",
            r#"{"definitions":{"task":{"properties":{"pair":{"type":"array","items":[{"type":"string"},{"type":"string"}]}}}}}"#,
        );

        cmd()
            .args(["struct", "-f", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("task.pair"))
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn missing_subcommand() {
        cmd().assert().failure();
    }
}
