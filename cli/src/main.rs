use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use value_schema_core::reflect::recursive;
use value_schema_core::{AnyValue, ValidationResult, ValidationResultType};
use value_schema_definition::SchemaDefinition;

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "schema-check", version)]
#[command(about = "Validate JSON and YAML documents against schema definitions")]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate documents against a schema definition file.
    Validate(ValidateArgs),
    /// Print every leaf of a document under its dotted path.
    Flatten(FlattenArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema definition file (.yaml, .yml or .json).
    #[arg(long)]
    schema: PathBuf,
    /// Treat warnings as failures.
    #[arg(long)]
    strict: bool,
    /// Report format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
    /// Documents to validate (.json, .yaml or .yml; `-` reads JSON from stdin).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct FlattenArgs {
    /// Document to flatten (.json, .yaml or .yml; `-` reads JSON from stdin).
    input: PathBuf,
}

/// Validation outcome of one input document.
#[derive(Debug, Serialize)]
struct InputReport {
    input: String,
    valid: bool,
    /// Set when the document could not be read or parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    results: Vec<ValidationResult>,
}

fn main() {
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
        Command::Validate(args) => run_validate(args),
        Command::Flatten(args) => run_flatten(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let schema = SchemaDefinition::load(&args.schema)
        .and_then(|definition| definition.compile())
        .map_err(|err| format!("Failed to load schema '{}': {err}", args.schema.display()))?;
    if args.inputs.iter().filter(|p| is_stdin(p)).count() > 1 {
        return Err("stdin ('-') can only be read once".to_string());
    }
    tracing::info!(schema = %args.schema.display(), inputs = args.inputs.len(), "Validating");

    let mut reports = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let report = match load_document(input) {
            Ok(value) => {
                let results = schema.validate(&value);
                let valid = !results.iter().any(|r| r.is_failure(args.strict));
                tracing::debug!(input = %input.display(), results = results.len(), valid, "Validated input");
                InputReport {
                    input: input.display().to_string(),
                    valid,
                    error: None,
                    results,
                }
            }
            Err(err) => {
                tracing::warn!(input = %input.display(), "Skipping unreadable input");
                InputReport {
                    input: input.display().to_string(),
                    valid: false,
                    error: Some(err),
                    results: Vec::new(),
                }
            }
        };
        reports.push(report);
    }

    match args.format {
        CliOutputFormat::Text => print_text_report(&reports),
        CliOutputFormat::Json => {
            let raw = serde_json::to_string_pretty(&reports)
                .map_err(|err| format!("Failed to serialize report: {err}"))?;
            println!("{raw}");
        }
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(format!(
            "{failed} of {} input(s) failed validation",
            reports.len()
        ));
    }
    Ok(())
}

fn print_text_report(reports: &[InputReport]) {
    for report in reports {
        if let Some(err) = &report.error {
            println!("{}: FAILED ({err})", report.input);
            continue;
        }
        let count = |kind: ValidationResultType| {
            report
                .results
                .iter()
                .filter(|r| r.result_type == kind)
                .count()
        };
        let status = if report.valid { "ok" } else { "FAILED" };
        println!(
            "{}: {status} ({} error(s), {} warning(s))",
            report.input,
            count(ValidationResultType::Error),
            count(ValidationResultType::Warning)
        );
        for result in &report.results {
            println!("  {result}");
        }
    }
}

fn run_flatten(args: FlattenArgs) -> Result<(), String> {
    let value = load_document(&args.input)?;
    for (path, leaf) in recursive::get_properties(&value) {
        println!("{path} = {}", leaf.to_json());
    }
    Ok(())
}

/// Reads a JSON or YAML document; `-` reads JSON from stdin.
fn load_document(path: &Path) -> Result<AnyValue, String> {
    let name = path.display();
    if is_stdin(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|err| format!("Failed to parse stdin: {err}"))?;
        return Ok(AnyValue::from(json));
    }

    let text = fs::read_to_string(path).map_err(|err| format!("Failed to read '{name}': {err}"))?;
    let json: serde_json::Value = if is_yaml(path) {
        serde_yaml::from_str(&text).map_err(|err| format!("Failed to parse '{name}': {err}"))?
    } else {
        serde_json::from_str(&text).map_err(|err| format!("Failed to parse '{name}': {err}"))?
    };
    Ok(AnyValue::from(json))
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_args() {
        let cli = Cli::try_parse_from([
            "schema-check",
            "-vv",
            "validate",
            "--schema",
            "user.yaml",
            "--strict",
            "--format",
            "json",
            "a.json",
            "b.yml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("user.yaml"));
        assert!(args.strict);
        assert_eq!(args.format, CliOutputFormat::Json);
        assert_eq!(args.inputs.len(), 2);
    }

    #[test]
    fn test_validate_requires_inputs_and_schema() {
        assert!(Cli::try_parse_from(["schema-check", "validate", "--schema", "s.yaml"]).is_err());
        assert!(Cli::try_parse_from(["schema-check", "validate", "a.json"]).is_err());
    }

    #[test]
    fn test_parse_flatten() {
        let cli = Cli::try_parse_from(["schema-check", "flatten", "doc.json"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.command, Command::Flatten(ref args) if args.input == Path::new("doc.json")));
    }

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("a.YAML")));
        assert!(is_yaml(Path::new("dir/a.yml")));
        assert!(!is_yaml(Path::new("a.json")));
        assert!(!is_yaml(Path::new("-")));
    }
}
