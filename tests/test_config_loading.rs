//! Configuration loading and validation tests
//!
//! Tests focus on observable outcomes of loading: accepted files, applied
//! defaults, and the error reported for each kind of bad input.

use agentzero::config::{ConfigError, MissingStagePolicy, OrchestratorConfig, DEFAULT_CONFIG_PATHS};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[platform]
project_id = "agentzero-457213"
location = "europe-west4"
credentials_env = "AGENTZERO_CREDENTIALS"

[workflow]
missing_stage = "skip"
"#,
    );

    let config = OrchestratorConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.platform.project_id, "agentzero-457213");
    assert_eq!(config.platform.location, "europe-west4");
    assert_eq!(config.platform.credentials_env, "AGENTZERO_CREDENTIALS");
    assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Skip);
}

#[test]
fn test_config_applies_defaults() {
    let temp_file = write_config(
        r#"
[platform]
project_id = "agentzero-457213"
"#,
    );

    let config = OrchestratorConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.platform.location, "us-central1");
    assert_eq!(
        config.platform.credentials_env,
        "GOOGLE_APPLICATION_CREDENTIALS"
    );
    assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Fail);
    assert_eq!(
        config,
        OrchestratorConfig::new("agentzero-457213", "us-central1")
    );
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = OrchestratorConfig::load_from_file(&dir.path().join("absent.toml"));

    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let temp_file = write_config("[platform\nproject_id = ");

    let result = OrchestratorConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_platform_section_is_a_parse_error() {
    let temp_file = write_config("[workflow]\nmissing_stage = \"fail\"\n");

    let result = OrchestratorConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let temp_file = write_config(
        r#"
[platform]
project_id = "agentzero-457213"

[workflow]
missing_stage = "retry"
"#,
    );

    let result = OrchestratorConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_invalid_project_ids_are_rejected() {
    for project_id in ["short", "Upper-Case-Project", "has_underscore", "a-project-id-that-is-far-too-long"] {
        let temp_file = write_config(&format!("[platform]\nproject_id = \"{project_id}\"\n"));

        let result = OrchestratorConfig::load_from_file(temp_file.path());

        assert!(
            matches!(result, Err(ConfigError::InvalidProjectId(_))),
            "Expected InvalidProjectId for '{project_id}'"
        );
    }
}

#[test]
fn test_blank_location_is_rejected() {
    let temp_file = write_config(
        r#"
[platform]
project_id = "agentzero-457213"
location = "  "
"#,
    );

    let result = OrchestratorConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = OrchestratorConfig::new("agentzero-457213", "asia-east1")
        .with_missing_stage_policy(MissingStagePolicy::Skip);

    let text = toml::to_string_pretty(&config).unwrap();
    let temp_file = write_config(&text);

    assert_eq!(
        OrchestratorConfig::load_from_file(temp_file.path()).unwrap(),
        config
    );
}

#[test]
fn test_explicit_path_wins_over_search_paths() {
    let explicit = write_config("[platform]\nproject_id = \"explicit-project\"\n");
    let discovered = write_config("[platform]\nproject_id = \"discovered-project\"\n");

    let config =
        OrchestratorConfig::resolve(Some(explicit.path()), &[discovered.path()]).unwrap();

    assert_eq!(config.platform.project_id, "explicit-project");
}

#[test]
fn test_first_existing_search_path_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_config("[platform]\nproject_id = \"first-project\"\n");
    let second = write_config("[platform]\nproject_id = \"second-project\"\n");
    let search_paths = vec![
        dir.path().join("agentzero.toml"),
        first.path().to_path_buf(),
        second.path().to_path_buf(),
    ];

    let config = OrchestratorConfig::resolve(None, &search_paths).unwrap();

    assert_eq!(config.platform.project_id, "first-project");
}

#[test]
fn test_explicit_missing_file_does_not_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let fallback = write_config("[platform]\nproject_id = \"fallback-project\"\n");

    let result = OrchestratorConfig::resolve(
        Some(&dir.path().join("absent.toml")),
        &[fallback.path()],
    );

    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_environment_used_when_no_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let search_paths: Vec<PathBuf> = DEFAULT_CONFIG_PATHS
        .iter()
        .map(|candidate| dir.path().join(candidate))
        .collect();
    std::env::set_var("AGENTZERO_PROJECT", "env-project-42");
    std::env::set_var("AGENTZERO_LOCATION", "europe-west1");

    let config = OrchestratorConfig::resolve(None, &search_paths).unwrap();

    assert_eq!(config.platform.project_id, "env-project-42");
    assert_eq!(config.platform.location, "europe-west1");
    assert_eq!(config.workflow.missing_stage, MissingStagePolicy::Fail);
}
