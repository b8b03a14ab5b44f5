//! Hyper-Schema Types CLI
//!
//! Command-line interface for generating Rust types from JSON Hyper-Schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use hyperschema_types::{
    check_payload, generate_types, generate_validators, load_schema_auto, FormatOptions,
    ValidateError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hyperschema-types")]
#[command(about = "Generate Rust types from JSON Hyper-Schema")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Schema source: file path, URL (http:// or https://), or - for stdin
    #[arg(long, short, default_value = "-")]
    file: String,

    /// Output file (stdout if not specified)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate structs for resources and link requests/responses
    Struct {
        #[command(flatten)]
        source: SourceArgs,

        /// Derive `Validate` and annotate required and patterned fields
        #[arg(long)]
        validate_tag: bool,

        /// Name request/response types after link titles instead of rels
        #[arg(long)]
        use_title: bool,

        /// Wrap optional and nullable scalars in `Option`
        #[arg(long)]
        nullable: bool,

        /// Emit `serde(rename)` on every field
        #[arg(long)]
        wire_tags: bool,
    },

    /// Generate regex constants and validator functions from `pattern`s
    Validator {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Check a payload against the request schema of a link
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Definition id owning the link
        #[arg(long)]
        resource: String,

        /// Link rel
        #[arg(long)]
        rel: String,

        /// Payload file to check
        payload: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Struct {
            source,
            validate_tag,
            use_title,
            nullable,
            wire_tags,
        } => {
            let options = FormatOptions::new()
                .validator(validate_tag)
                .use_title(use_title)
                .nullable(nullable)
                .wire_tags(wire_tags);
            run_struct(&source, &options)
        }
        Commands::Validator { source } => run_validator(&source),
        Commands::Check {
            source,
            resource,
            rel,
            payload,
            json,
        } => run_check(&source, &resource, &rel, &payload, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_struct(source: &SourceArgs, options: &FormatOptions) -> Result<(), u8> {
    let schema = load(&source.file)?;
    let code = generate_types(&schema, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    write_output(source.output.as_deref(), &code)
}

fn run_validator(source: &SourceArgs) -> Result<(), u8> {
    let schema = load(&source.file)?;
    let code = generate_validators(&schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    write_output(source.output.as_deref(), &code)
}

fn run_check(
    source: &SourceArgs,
    resource: &str,
    rel: &str,
    payload_path: &Path,
    json_output: bool,
) -> Result<(), u8> {
    let schema = load_schema_auto(&source.file).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;
    let payload = load_schema_auto(&payload_path.to_string_lossy()).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    match check_payload(&schema, resource, rel, &payload) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

fn load(source: &str) -> Result<serde_json::Value, u8> {
    load_schema_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn write_output(output: Option<&Path>, code: &str) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(path, code).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            tracing::info!(path = %path.display(), bytes = code.len(), "wrote output");
        }
        None => print!("{}", code),
    }
    Ok(())
}

fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
