use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("schema_check_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, content).expect("failed to write file");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const PERSON_SCHEMA: &str = r#"kind: object
properties:
  - name: name
    required: true
    type: string
  - name: age
    type: integer
"#;

fn schema_check(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_schema-check"))
        .args(args)
        .output()
        .expect("failed to run schema-check")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_passes_valid_documents() {
    let dir = TempDir::new("validate_ok");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);
    let alice = dir.write("alice.json", r#"{"name": "Alice", "age": 30}"#);
    let bob = dir.write("bob.yml", "name: Bob\n");

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        alice.to_str().unwrap(),
        bob.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("alice.json: ok (0 error(s), 0 warning(s))"), "{text}");
    assert!(text.contains("bob.yml: ok"), "{text}");
}

#[test]
fn validate_reports_errors_and_fails() {
    let dir = TempDir::new("validate_errors");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);
    let input = dir.write("bad.json", r#"{"name": "Alice", "age": "30", "extra": true}"#);

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));

    let text = stdout(&out);
    assert!(text.contains("bad.json: FAILED (1 error(s), 1 warning(s))"), "{text}");
    assert!(text.contains("ERROR .age TYPE_MISMATCH"), "{text}");
    assert!(text.contains("WARNING extra UNEXPECTED_PROPERTY"), "{text}");
    assert!(stderr(&out).contains("1 of 1 input(s) failed validation"));
}

#[test]
fn validate_strict_escalates_warnings() {
    let dir = TempDir::new("validate_strict");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);
    let input = dir.write("extra.json", r#"{"name": "Alice", "nickname": "Al"}"#);
    let schema = schema.to_str().unwrap();
    let input = input.to_str().unwrap();

    let lenient = schema_check(&["validate", "--schema", schema, input]);
    assert!(lenient.status.success(), "stderr: {}", stderr(&lenient));

    let strict = schema_check(&["validate", "--schema", schema, "--strict", input]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn validate_json_report() {
    let dir = TempDir::new("validate_json");
    let schema = dir.write("person.json", r#"{"kind": "object", "properties": [{"name": "name", "required": true}]}"#);
    let good = dir.write("good.json", r#"{"name": "x"}"#);
    let bad = dir.write("bad.json", "{}");

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "json",
        good.to_str().unwrap(),
        bad.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let reports = report.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[1]["valid"], false);
    assert_eq!(reports[1]["results"][0]["path"], ".name");
    assert_eq!(reports[1]["results"][0]["code"], "VALUE_IS_NULL");
    assert_eq!(reports[1]["results"][0]["type"], "Error");
}

#[test]
fn validate_rejects_invalid_schema_file() {
    let dir = TempDir::new("validate_bad_schema");
    let schema = dir.write("broken.yaml", "kind: array\nproperties: [{name: a}]\n");
    let input = dir.write("doc.json", "[]");

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("Failed to load schema"), "{err}");
    assert!(err.contains("invalid definition"), "{err}");
}

#[test]
fn validate_reports_unreadable_input() {
    let dir = TempDir::new("validate_missing_input");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);
    let missing = dir.join("missing.json");

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        missing.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("missing.json: FAILED (Failed to read"));
    assert!(stderr(&out).contains("1 of 1 input(s) failed validation"));
}

#[test]
fn validate_continues_past_unreadable_input() {
    let dir = TempDir::new("validate_partial");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);
    let missing = dir.join("missing.json");
    let alice = dir.write("alice.json", r#"{"name": "Alice"}"#);

    let out = schema_check(&[
        "validate",
        "--schema",
        schema.to_str().unwrap(),
        "--format",
        "json",
        missing.to_str().unwrap(),
        alice.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let reports = report.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], false);
    assert!(reports[0]["error"].as_str().unwrap().starts_with("Failed to read"));
    assert_eq!(reports[1]["valid"], true);
    assert!(reports[1].get("error").is_none());
    assert!(stderr(&out).contains("1 of 2 input(s) failed validation"));
}

#[test]
fn validate_rejects_stdin_twice() {
    let dir = TempDir::new("validate_stdin_twice");
    let schema = dir.write("person.yaml", PERSON_SCHEMA);

    let out = schema_check(&["validate", "--schema", schema.to_str().unwrap(), "-", "-"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("stdin ('-') can only be read once"));
}

// ---------------------------------------------------------------------------
// flatten
// ---------------------------------------------------------------------------

#[test]
fn flatten_prints_dotted_paths() {
    let dir = TempDir::new("flatten");
    let input = dir.write("doc.json", r#"{"a": 1, "b": {"c": ["x", null]}}"#);

    let out = schema_check(&["flatten", input.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let lines: Vec<String> = stdout(&out).lines().map(String::from).collect();
    assert_eq!(lines, vec!["a = 1", "b.c.0 = \"x\"", "b.c.1 = null"]);
}

#[test]
fn flatten_reads_yaml() {
    let dir = TempDir::new("flatten_yaml");
    let input = dir.write("doc.yaml", "server:\n  port: 8080\n  tls: false\n");

    let out = schema_check(&["flatten", input.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "server.port = 8080\nserver.tls = false\n");
}
