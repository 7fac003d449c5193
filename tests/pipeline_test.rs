//! End-to-end generation tests over the Vault transform fixtures

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use providergen::application::GenerateProviderUseCase;
use providergen::core::{Config, Error, Result};
use providergen::generation::RunReport;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn config_for(out: &TempDir) -> Config {
    Config {
        output_dir: out.path().to_path_buf(),
        ..Config::default()
    }
}

/// Every file under `root`, keyed by its relative path
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                files.insert(relative, fs::read(&path).unwrap());
            }
        }
    }
    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

fn generate(config: &Config, doc: &str) -> Result<RunReport> {
    GenerateProviderUseCase::from_config(config)?.execute(&fixture(doc))
}

#[test]
fn test_role_endpoint_end_to_end() {
    let out = TempDir::new().unwrap();
    let report = generate(&config_for(&out), "transform.openapi.json").unwrap();
    assert!(report.is_success());

    let code_path = out.path().join("resources/transform/role/name.go");
    let doc_path = out.path().join("docs/resources/transform-role-name.md");
    assert!(report.written.contains(&code_path));
    assert!(report.written.contains(&doc_path));

    let code = fs::read_to_string(&code_path).unwrap();
    assert!(code.starts_with("package role\n"));
    assert!(code.contains("const nameEndpoint = \"/transform/role/{name}\""));
    assert!(code.contains("func NameResource() *schema.Resource {"));

    // Fields: identity first, then parameters sorted by name, no duplicates
    let path_field = code.find("\"path\": {").unwrap();
    let name_field = code.find("\"name\": {").unwrap();
    let transformations_field = code.find("\"transformations\": {").unwrap();
    assert!(path_field < name_field && name_field < transformations_field);
    assert_eq!(code.matches("\"name\": {").count(), 1);
    assert_eq!(code.matches("\"transformations\": {").count(), 1);

    // Path-level definition wins over the body copy of `name`
    assert!(code.contains("Description: \"The name of the role.\","));
    assert!(!code.contains("Body copy of the role name."));

    for func in [
        "func nameCreateResource(",
        "func nameUpdateResource(",
        "func nameReadResource(",
        "func nameResourceExists(",
        "func nameDeleteResource(",
    ] {
        assert!(code.contains(func), "missing {func}");
    }

    let doc = fs::read_to_string(&doc_path).unwrap();
    assert!(doc.contains("# vault_transform_role_name (Resource)"));
    assert!(doc.contains("* `transformations` - (Optional)"));
}

#[test]
fn test_generates_every_eligible_endpoint() {
    let out = TempDir::new().unwrap();
    let report = generate(&config_for(&out), "transform.openapi.json").unwrap();

    // Ten eligible endpoints, a code file and a doc stub each
    assert_eq!(report.written.len(), 20);
    assert!(!out.path().join("resources/sys").exists());

    let encode = fs::read_to_string(out.path().join("datasources/transform/encode/role_name.go"))
        .unwrap();
    assert!(encode.starts_with("package encode\n"));
    assert!(encode.contains("func RolenameDataSource() *schema.Resource {"));
    assert!(encode.contains("client.Logical().Write(path, data)"));
    assert!(out
        .path()
        .join("docs/datasources/transform-decode-role_name.md")
        .is_file());

    let alphabet = fs::read_to_string(out.path().join("resources/transform/alphabet.go")).unwrap();
    assert!(alphabet.starts_with("package transform\n"));
    assert!(alphabet.contains("func alphabetReadResource("));
    assert!(!alphabet.contains("CreateResource"));
    assert!(!alphabet.contains("DeleteResource"));
}

#[test]
fn test_written_in_sorted_path_order() {
    let out = TempDir::new().unwrap();
    let report = generate(&config_for(&out), "transform.openapi.json").unwrap();

    let code_files: Vec<String> = report
        .written
        .iter()
        .filter(|p| p.extension().is_some_and(|e| e == "go"))
        .map(|p| {
            p.strip_prefix(out.path())
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(
        code_files,
        vec![
            "resources/transform/alphabet.go",
            "resources/transform/alphabet/name.go",
            "datasources/transform/decode/role_name.go",
            "datasources/transform/encode/role_name.go",
            "resources/transform/role.go",
            "resources/transform/role/name.go",
            "resources/transform/template.go",
            "resources/transform/template/name.go",
            "resources/transform/transformation.go",
            "resources/transform/transformation/name.go",
        ]
    );
}

#[test]
fn test_parameters_rendered_in_name_order() {
    let out = TempDir::new().unwrap();
    generate(&config_for(&out), "transform.openapi.json").unwrap();

    let code =
        fs::read_to_string(out.path().join("resources/transform/transformation/name.go")).unwrap();
    let positions: Vec<usize> = [
        "allowed_roles",
        "deletion_allowed",
        "masking_character",
        "name",
        "template",
        "tweak_source",
        "type",
    ]
    .iter()
    .map(|field| code.find(&format!("\t\t\"{field}\": {{")).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(code.contains("Type:        schema.TypeBool,"));
}

#[test]
fn test_regeneration_is_idempotent() {
    let out = TempDir::new().unwrap();
    let config = config_for(&out);

    generate(&config, "transform.openapi.json").unwrap();
    let first = snapshot(out.path());
    generate(&config, "transform.openapi.json").unwrap();
    let second = snapshot(out.path());

    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
}

#[test]
fn test_unsupported_type_aborts_run() {
    let out = TempDir::new().unwrap();
    let config = Config::from_toml_str(&format!(
        r#"
        output_dir = {:?}

        [eligibility]
        strategy = "prefix"
        prefixes = ["/transform/"]
        kind = "resource"
        "#,
        out.path().display().to_string()
    ))
    .unwrap();

    let err = generate(&config, "unsupported.openapi.json").unwrap_err();
    match err {
        Error::UnsupportedParameterType {
            path,
            parameter,
            found,
        } => {
            assert_eq!(path, "/transform/role/{name}");
            assert_eq!(parameter, "pattern_options");
            assert_eq!(found, "object");
        }
        other => panic!("Expected UnsupportedParameterType, got {other:?}"),
    }

    // Earlier endpoints stay written, the failing one and everything after it are absent
    assert!(out.path().join("resources/transform/alphabet.go").is_file());
    assert!(!out.path().join("resources/transform/role/name.go").exists());
    assert!(!out.path().join("docs/resources/transform-role-name.md").exists());
    assert!(!out.path().join("resources/transform/template/name.go").exists());
}

#[test]
fn test_keep_going_skips_failing_endpoint() {
    let out = TempDir::new().unwrap();
    let policy = Config::from_toml_str(
        r#"
        [eligibility]
        strategy = "prefix"
        prefixes = ["/transform/"]
        kind = "resource"
        "#,
    )
    .unwrap()
    .eligibility;
    let config = Config {
        keep_going: true,
        eligibility: policy,
        ..config_for(&out)
    };

    let report = generate(&config, "unsupported.openapi.json").unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "/transform/role/{name}");
    assert!(out.path().join("resources/transform/template/name.go").is_file());
    assert!(!out.path().join("resources/transform/role/name.go").exists());
}

#[test]
fn test_write_without_request_body() {
    let out = TempDir::new().unwrap();
    generate(&config_for(&out), "transform.openapi.json").unwrap();

    let code = fs::read_to_string(out.path().join("resources/transform/template.go")).unwrap();
    assert!(code.contains("func templateCreateResource("));
    // Only the identity field
    assert_eq!(code.matches(": {\n").count(), 1);
}

#[test]
fn test_no_docs_option() {
    let out = TempDir::new().unwrap();
    let config = Config {
        emit_docs: false,
        ..config_for(&out)
    };

    let report = generate(&config, "transform.openapi.json").unwrap();
    assert_eq!(report.written.len(), 10);
    assert!(!out.path().join("docs").exists());
}

#[test]
fn test_custom_extensions() {
    let out = TempDir::new().unwrap();
    let config = Config {
        code_extension: "go".to_string(),
        doc_extension: "markdown".to_string(),
        ..config_for(&out)
    };

    generate(&config, "transform.openapi.json").unwrap();
    assert!(out
        .path()
        .join("docs/resources/transform-role-name.markdown")
        .is_file());
}
