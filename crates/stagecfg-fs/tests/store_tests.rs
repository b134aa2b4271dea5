use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use stagecfg_fs::{DocumentFormat, DocumentStore, Error, NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

fn sample_document() -> Value {
    json!({
        "name": "billing",
        "plugins": ["warmup"],
        "variables": {"bucket": "global", "retries": 3}
    })
}

#[rstest]
#[case("s-project.json", DocumentFormat::Json)]
#[case("s-project.yaml", DocumentFormat::Yaml)]
#[case("s-project.YML", DocumentFormat::Yaml)]
#[case("s-project.toml", DocumentFormat::Toml)]
fn format_is_detected_from_extension(#[case] file: &str, #[case] expected: DocumentFormat) {
    let path = NormalizedPath::new("/tmp/project").join(file);
    assert_eq!(DocumentFormat::from_path(&path).unwrap(), expected);
}

#[test]
fn unknown_extension_is_rejected() {
    let path = NormalizedPath::new("/tmp/project/s-project.ini");
    let err = DocumentFormat::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "ini"));
}

#[rstest]
#[case("project.json")]
#[case("project.yaml")]
#[case("project.toml")]
fn save_then_load_preserves_document(#[case] file: &str) {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join(file);
    let store = DocumentStore::new();

    store.save(&path, &sample_document()).unwrap();
    let loaded: Value = store.load(&path).unwrap();

    assert_eq!(loaded, sample_document());
}

#[test]
fn save_creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join_all(&["_meta", "nested", "doc.json"]);

    DocumentStore::new().save(&path, &json!({"ok": true})).unwrap();

    assert!(path.is_file());
}

#[test]
fn load_reports_parse_errors_with_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.json");
    fs::write(&file_path, "{ not json").unwrap();

    let err = DocumentStore::new()
        .load::<Value>(&NormalizedPath::new(&file_path))
        .unwrap_err();

    match err {
        Error::DocumentParse { format, .. } => assert_eq!(format, "JSON"),
        other => panic!("expected DocumentParse, got {other:?}"),
    }
}

#[test]
fn load_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("absent.json");

    let err = DocumentStore::new().load::<Value>(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn write_atomic_overwrites_and_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("doc.json");

    io::write_atomic(&path, b"first").unwrap();
    io::write_atomic(&path, b"second").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "second");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn toml_rejects_null_before_writing() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join("project.toml");
    let document = json!({
        "name": "billing",
        "variables": {"bucket": "global", "debug": null}
    });

    let err = DocumentStore::new().save(&path, &document).unwrap_err();

    assert!(
        matches!(err, Error::NullValue { ref location, ref format, .. } if location == "/variables/debug" && format == "TOML"),
        "got {err:?}"
    );
    assert!(!path.exists());
}

#[rstest]
#[case("project.json")]
#[case("project.yaml")]
fn null_survives_json_and_yaml(#[case] file: &str) {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path()).join(file);
    let document = json!({"variables": {"debug": null}});

    let store = DocumentStore::new();
    store.save(&path, &document).unwrap();
    let loaded: Value = store.load(&path).unwrap();

    assert_eq!(loaded, document);
}
