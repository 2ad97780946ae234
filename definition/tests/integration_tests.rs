use std::io::Write;

use serde_json::json;
use value_schema_core::{AnyValue, codes};
use value_schema_definition::{
    DefinitionError, PropertyDefinition, RuleDefinition, SchemaDefinition, SchemaKind,
    TypeDefinition,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    path
}

fn order_definition() -> SchemaDefinition {
    let mut items = SchemaDefinition::new(SchemaKind::Array);
    items.value_type = Some(TypeDefinition::Name("string".into()));

    let mut definition = SchemaDefinition::new(SchemaKind::Object);
    definition.required = true;
    definition.properties = vec![
        PropertyDefinition::new("id")
            .required()
            .with_type(TypeDefinition::Name("integer".into())),
        PropertyDefinition::new("items").with_type(TypeDefinition::Schema(Box::new(items))),
        PropertyDefinition::new("status").with_rule(RuleDefinition::Included(vec![
            json!("open"),
            json!("closed"),
        ])),
    ];
    definition
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "user.yaml",
        "kind: object\nproperties:\n  - name: email\n    required: true\n    type: string\n",
    );

    let schema = SchemaDefinition::load(&path).unwrap().compile().unwrap();
    let results = schema.validate(&AnyValue::from(json!({})));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].path, ".email");
    assert_eq!(results[0].code, codes::VALUE_IS_NULL);
}

#[test]
fn test_load_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "scores.json",
        r#"{"kind": "map", "key_type": "string", "value_type": "int"}"#,
    );

    let schema = SchemaDefinition::load(&path).unwrap().compile().unwrap();
    assert!(schema.validate(&AnyValue::from(json!({"a": 1}))).is_empty());
    assert_eq!(schema.validate(&AnyValue::from(json!({"a": 1.5}))).len(), 1);
}

#[test]
fn test_save_and_reload_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let definition = order_definition();

    for name in ["order.yml", "order.json"] {
        let path = dir.path().join(name);
        definition.save(&path).unwrap();
        let reloaded = SchemaDefinition::load(&path).unwrap();
        assert_eq!(reloaded, definition, "{name}");
    }
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = SchemaDefinition::load(dir.path().join("missing.yaml"));
    assert!(matches!(missing, Err(DefinitionError::Io(_))));

    let toml = write_file(&dir, "schema.toml", "kind = 'value'");
    assert!(matches!(
        SchemaDefinition::load(&toml),
        Err(DefinitionError::UnsupportedFormat(_))
    ));

    let broken = write_file(&dir, "broken.json", "{\"kind\": ");
    assert!(matches!(SchemaDefinition::load(&broken), Err(DefinitionError::Json(_))));

    let bad_kind = write_file(&dir, "bad.yaml", "kind: tuple\n");
    assert!(matches!(SchemaDefinition::load(&bad_kind), Err(DefinitionError::Yaml(_))));
}

// ---------------------------------------------------------------------------
// Compiled behavior
// ---------------------------------------------------------------------------

#[test]
fn test_compiled_order_schema() {
    let schema = order_definition().compile().unwrap();

    let valid = AnyValue::from(json!({"id": 1, "items": ["a", "b"], "status": "open"}));
    assert!(schema.validate(&valid).is_empty());

    let invalid = AnyValue::from(json!({"items": ["a", 2], "status": "lost", "note": "x"}));
    let found: Vec<(String, String)> = schema
        .validate(&invalid)
        .into_iter()
        .map(|r| (r.path, r.code))
        .collect();
    assert_eq!(
        found,
        vec![
            (".id".to_string(), codes::VALUE_IS_NULL.to_string()),
            (".items.1".to_string(), codes::TYPE_MISMATCH.to_string()),
            (".status".to_string(), codes::VALUE_NOT_INCLUDED.to_string()),
            ("note".to_string(), codes::UNEXPECTED_PROPERTY.to_string()),
        ]
    );
}

#[test]
fn test_compiled_schema_is_shareable() {
    let schema = order_definition().compile().unwrap();
    let other = std::sync::Arc::clone(&schema);
    let handle = std::thread::spawn(move || other.validate(&AnyValue::Null).len());
    assert_eq!(handle.join().unwrap(), 1);
    assert_eq!(schema.validate(&AnyValue::Null).len(), 1);
}
