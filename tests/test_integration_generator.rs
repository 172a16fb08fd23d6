use anyhow::Result;
use gdscript_gen::script::loader::{JsonFileLoader, JsonStrLoader, LoadedDocument, MockDocumentLoader};
use gdscript_gen::transpiler::errors::{Diagnostic, LoadError};
use gdscript_gen::transpiler::{Defaults, Runner, transpile};
use gdscript_gen::{Document, Variable};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_end_to_end_exported_speed() -> Result<()> {
    let source = r#"{
        "variables": [
            {"name": "speed", "type": "float", "value": "5.0", "export": true, "generate_default": true}
        ]
    }"#;

    let script = transpile(source)?;
    let lines: Vec<&str> = script.lines().collect();

    let constants_banner = lines
        .iter()
        .position(|line| line.contains("Constant(s)"))
        .expect("constants banner");
    let constant = lines
        .iter()
        .position(|line| *line == "const DEFAULT_SPEED:float = 5.0")
        .expect("synthesized constant");
    let variables_banner = lines
        .iter()
        .position(|line| line.contains("Variable(s)"))
        .expect("variables banner");
    let variable = lines
        .iter()
        .position(|line| *line == "@export var speed:float = DEFAULT_SPEED")
        .expect("exported variable");

    assert!(constants_banner < constant);
    assert!(constant < variables_banner);
    assert!(variables_banner < variable);
    assert!(!script.contains("Function(s)"));
    assert!(!script.contains("Method(s)"));

    Ok(())
}

#[test]
fn test_empty_document_renders_empty_output() -> Result<()> {
    assert_eq!(transpile("{}")?, "");
    assert_eq!(
        transpile(r#"{"header_comments": [], "constants": [], "variables": [], "functions": []}"#)?,
        ""
    );
    Ok(())
}

#[test]
fn test_document_settings_select_legacy_export() -> Result<()> {
    let source = r#"{
        "settings": {"target_version": 3},
        "variables": [
            {"name": "speed", "type": "float", "value": 5.0, "export": true, "generate_default": true}
        ]
    }"#;

    let script = transpile(source)?;

    assert!(script.contains("\nexport(float) var speed:float = DEFAULT_SPEED\n"), "{}", script);
    Ok(())
}

#[test]
fn test_overrides_win_over_document_settings() -> Result<()> {
    let source = r#"{
        "settings": {"target_version": 3, "constant": {"constant_prefix": "BASE_"}},
        "variables": [{"name": "hp", "value": 10, "export": true, "generate_default": true}]
    }"#;

    let report = Runner::new(JsonStrLoader::new(source))
        .with_overrides(json!({"target_version": 4}))
        .generate()?;

    assert!(report.script.contains("\nconst BASE_HP = 10\n"));
    assert!(report.script.contains("\n@export var hp = BASE_HP\n"));
    Ok(())
}

#[test]
fn test_full_script_from_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let input = temp_dir.path().join("player.json");
    fs::write(
        &input,
        r#"{
            "header_comments": ["Player controller"],
            "constants": [{"name": "gravity", "type": "float", "value": 980.0}],
            "variables": [
                {"name": "hp", "type": "int", "value": 3, "export": true, "tooltip": ["Hit points"]},
                {"name": "alive", "value": true}
            ],
            "functions": [
                {"name": "_ready"},
                {"name": "get_hp", "code": ["return hp"]},
                {"name": "hurt", "parameters": ["amount: int"], "type": "void", "code": ["hp -= amount"]}
            ]
        }"#,
    )?;

    let report = Runner::new(JsonFileLoader::new(&input)).generate()?;
    let script = &report.script;

    assert!(script.starts_with("# Player controller\n\n"));
    assert!(script.contains("const GRAVITY:float = 980.0\n"));
    assert!(script.contains("## Hit points\n@export var hp:int = 3\n"));
    assert!(script.contains("var alive = true\n"));
    assert!(script.contains("func get_hp():\n\treturn hp\n"));
    assert!(script.contains("func _ready():\n\tpass\n"));
    assert!(script.contains("func hurt(amount: int) -> void:\n\thp -= amount\n"));
    assert!(script.find("func get_hp") < script.find("func _ready"));
    assert!(script.ends_with("\thp -= amount\n"));
    assert!(report.diagnostics.is_empty());

    Ok(())
}

#[test]
fn test_skipped_entities_are_reported_not_fatal() -> Result<()> {
    let source = r#"{
        "constants": [{"name": "broken"}, {"value": 1}],
        "variables": [{"name": ""}, {"name": "kept"}]
    }"#;

    let report = Runner::new(JsonStrLoader::new(source)).generate()?;

    assert!(report.script.contains("var kept\n"));
    assert!(!report.script.contains("BROKEN"));
    assert_eq!(report.diagnostics.len(), 3);
    assert!(report
        .diagnostics
        .iter()
        .all(|d| matches!(d, Diagnostic::MissingRequiredField { .. })));
    Ok(())
}

#[test]
fn test_empty_string_values_count_as_missing() -> Result<()> {
    let source = r#"{
        "constants": [{"name": "k", "value": ""}],
        "variables": [
            {"name": "v", "value": ""},
            {"name": "w", "value": "", "generate_default": true}
        ]
    }"#;

    let report = Runner::new(JsonStrLoader::new(source)).generate()?;
    let script = &report.script;

    assert!(!script.contains("const "), "{}", script);
    assert!(!script.contains("DEFAULT_W"), "{}", script);
    assert!(!script.contains("= \n"), "{}", script);
    assert!(script.ends_with("\nvar v\nvar w\n"), "{}", script);
    assert!(report.diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::MissingRequiredField { field: "value", .. }
    )));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::MissingDefaultValue { variable } if variable == "w")));
    Ok(())
}

#[test]
fn test_null_and_empty_entries_render_as_blank_lines() -> Result<()> {
    let source = r#"{
        "settings": {"print_header_constants": false, "print_header_variables": false},
        "constants": [{"name": "a", "value": 1}, null, {"name": "b", "value": 2}],
        "variables": [{"name": "x"}, {}, {"name": "y"}]
    }"#;

    let report = Runner::new(JsonStrLoader::new(source)).generate()?;

    assert_eq!(
        report.script,
        "const A = 1\n\nconst B = 2\n\nvar x\n\nvar y\n"
    );
    assert!(report.diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_callable_code_is_migrated_to_target_version() -> Result<()> {
    let source = r#"{
        "settings": {"code_version": 3},
        "functions": [
            {"name": "spawn", "code": ["var enemy = scene.instance()", "add_child(enemy)"]},
            {"name": "roll", "code": ["var value = rand_range(0, 6)", "return value"]}
        ]
    }"#;

    let script = transpile(source)?;

    assert!(script.contains("\tvar enemy = scene.instantiate()\n"));
    assert!(script.contains("\tvar value = randf_range(0, 6)\n"));
    Ok(())
}

#[test]
fn test_unsupported_code_version_fails() {
    let source = r#"{"settings": {"code_version": 1}, "functions": [{"name": "f"}]}"#;
    let error = transpile(source).unwrap_err();
    assert!(format!("{:#}", error).contains("No rename table"), "{:#}", error);
}

#[test]
fn test_load_failure_writes_nothing() {
    let mut loader = MockDocumentLoader::new();
    loader.expect_load().times(1).returning(|| {
        Err(LoadError::NotAnObject {
            found: "an array".to_string(),
        })
    });

    let mut sink: Vec<u8> = Vec::new();
    let result = Runner::new(loader).run(&mut sink);

    assert!(result.is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_mock_loader_document_is_rendered() -> Result<()> {
    let mut loader = MockDocumentLoader::new();
    loader.expect_load().returning(|| {
        Ok(LoadedDocument {
            document: Document {
                variables: vec![Variable {
                    value: Some("\"idle\"".to_string()),
                    ..Variable::new("state")
                }],
                ..Default::default()
            },
            settings: Some(json!({"print_header_variables": false})),
        })
    });

    let mut sink: Vec<u8> = Vec::new();
    Runner::new(loader)
        .with_defaults(Defaults::builtin())
        .run(&mut sink)?;

    assert_eq!(String::from_utf8(sink)?, "var state = \"idle\"\n");
    Ok(())
}

#[test]
fn test_missing_input_file_is_a_load_failure() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let error = Runner::new(JsonFileLoader::new(&missing)).generate().unwrap_err();

    assert!(error.to_string().contains("Failed to load script description"));
    assert!(error.downcast_ref::<LoadError>().is_some());
}
