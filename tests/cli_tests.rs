use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const TAG_SERVICE: &str = "import { api } from './api.js';\n\nexport function list() {\n  return api.get('/tags');\n}\n\nexport async function create(tag) {\n  return api.post('/tags', tag);\n}\n";

fn objectify(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("objectify").unwrap();
    cmd.current_dir(dir.path()).env_remove("OBJECTIFY_BASE_DIR");
    cmd
}

#[test]
fn converts_listed_service() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", ".", "--service", "tag-service.js=tagService"])
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted tagService"))
        .stdout(predicate::str::contains("Converted: 1"));

    let converted = fs::read_to_string(temp_dir.path().join("tag-service.js")).unwrap();
    assert_eq!(
        converted,
        "import { api } from './api.js';\n\nexport const tagService = {\n  list() {\n    return api.get('/tags');\n  },\n  async create(tag) {\n    return api.post('/tags', tag);\n  }\n\n};\n"
    );
}

#[test]
fn missing_file_is_reported_and_batch_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", "."])
        .args(["--service", "missing-service.js=missingService"])
        .args(["--service", "tag-service.js=tagService"])
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stderr(predicate::str::contains("File not found"))
        .stderr(predicate::str::contains("service file not found").not())
        .stdout(predicate::str::contains("Not found: 1"))
        .stdout(predicate::str::contains("FAILED: ./missing-service.js (not found)"));

    let converted = fs::read_to_string(temp_dir.path().join("tag-service.js")).unwrap();
    assert!(converted.contains("export const tagService = {"));
}

#[test]
fn dry_run_leaves_files_untouched() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", ".", "--service", "tag-service.js=tagService", "--dry-run"])
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would convert tagService"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("tag-service.js")).unwrap(),
        TAG_SERVICE
    );
}

#[test]
fn backup_keeps_original() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", ".", "--service", "tag-service.js=tagService", "--backup", "-q"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("tag-service.js.bak")).unwrap(),
        TAG_SERVICE
    );
}

#[test]
fn json_output_has_file_and_summary_records() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", ".", "--service", "tag-service.js=tagService"])
        .args(["--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"file\""))
        .stdout(predicate::str::contains("\"status\":\"converted\""))
        .stdout(predicate::str::contains("\"type\": \"summary\""));
}

#[test]
fn generate_config_writes_file() {
    let temp_dir = TempDir::new().unwrap();

    objectify(&temp_dir)
        .args(["--generate-config", "--config", "custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = fs::read_to_string(temp_dir.path().join("custom.toml")).unwrap();
    assert!(content.contains("[services]"));
    assert!(content.contains("authService"));
}

#[test]
fn config_file_is_used() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("services")).unwrap();
    fs::write(temp_dir.path().join("services/tag-service.js"), TAG_SERVICE).unwrap();
    fs::write(
        temp_dir.path().join("objectify.toml"),
        "[services]\nbase_directory = \"services\"\nentries = [{ file = \"tag-service.js\", object_name = \"tagService\" }]\n\n[conversion]\nstrategy = \"structural\"\nindent_width = 4\nbackup = false\n",
    )
    .unwrap();

    objectify(&temp_dir).arg("-q").assert().success();

    let converted = fs::read_to_string(temp_dir.path().join("services/tag-service.js")).unwrap();
    assert!(converted.contains("export const tagService = {\n    list() {"));
}

#[test]
fn invalid_object_name_is_rejected() {
    let temp_dir = TempDir::new().unwrap();

    objectify(&temp_dir)
        .args(["--service", "tag-service.js=tag-service"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid object name"));
}

#[test]
fn bad_config_file_exits_with_config_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.toml"), "[services\n").unwrap();

    objectify(&temp_dir)
        .args(["--config", "broken.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn partial_config_table_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tag-service.js"), TAG_SERVICE).unwrap();
    fs::write(temp_dir.path().join("empty-service.js"), "// nothing exported\n").unwrap();
    fs::write(
        temp_dir.path().join("objectify.toml"),
        "[conversion]\nstrategy = \"structural\"\n",
    )
    .unwrap();

    objectify(&temp_dir)
        .args(["--base-dir", "."])
        .args(["--service", "tag-service.js=tagService"])
        .args(["--service", "empty-service.js=emptyService"])
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: No exports found in ./empty-service.js"))
        .stdout(predicate::str::contains("Converted: 1"));

    let converted = fs::read_to_string(temp_dir.path().join("tag-service.js")).unwrap();
    assert!(converted.ends_with("  async create(tag) {\n    return api.post('/tags', tag);\n  }\n};\n"));
}
