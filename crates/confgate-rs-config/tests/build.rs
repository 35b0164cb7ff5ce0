//! End-to-end builds against on-disk fixtures.

use confgate_rs_config::{
    BuildParams, ConfigBuilder, ConfigError, ErrorKind, FixedEnvironment, MandatoryRules,
    ProcessEnvironment, SourceRole,
};
use confgate_rs_test_utils::{InMemoryLoader, RecordingValidator, fixtures_dir, write_source};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;
use tempfile::TempDir;

fn fixture_builder() -> ConfigBuilder {
    ConfigBuilder::new(fixtures_dir()).with_environment(FixedEnvironment::new("test"))
}

fn test_params() -> BuildParams {
    BuildParams::new().with_env_config("test", "test.toml")
}

fn expected_test_config() -> Value {
    json!({ "a": "a", "b": "b", "c": "c", "d": { "e": "e", "f": { "g": "" } } })
}

fn build_err(params: BuildParams) -> ConfigError {
    fixture_builder().build(&params).unwrap_err()
}

/// A lone env config is returned unchanged.
#[test]
fn loads_toml_env_config() {
    let config = fixture_builder().build(&test_params()).expect("build");
    assert_eq!(config, expected_test_config());
}

#[test]
fn yaml_env_config_matches_toml() {
    let params = BuildParams::new().with_env_config("test", "test.yaml");
    let config = fixture_builder().build(&params).expect("build");
    assert_eq!(config, expected_test_config());
}

#[test]
fn validates_against_matching_template() {
    let params = test_params().with_template("template.toml");
    assert!(fixture_builder().build(&params).is_ok());
}

#[test]
fn rejects_missing_template_key() {
    let err = build_err(test_params().with_template("template2.toml"));
    assert_eq!(err.kind(), ErrorKind::MissingKey);
    assert_eq!(err.to_string(), "Missing keys: d.f.h");
}

#[test]
fn rejects_empty_mandatory_value() {
    let err = build_err(
        test_params()
            .with_template("template.toml")
            .with_mandatory_keys(MandatoryRules::new(["d.f.g"]).unwrap()),
    );
    assert_eq!(err.kind(), ErrorKind::MissingValue);
    assert_eq!(err.to_string(), "Missing values for mandatory keys: d.f.g");
}

#[test]
fn wildcard_marks_every_leaf_mandatory() {
    let err = build_err(
        test_params()
            .with_template("template.toml")
            .with_mandatory_keys(MandatoryRules::new(["*"]).unwrap()),
    );
    assert_eq!(err.to_string(), "Missing values for mandatory keys: d.f.g");
}

#[test]
fn exclusion_overrides_wildcard() {
    let params = test_params()
        .with_template("template.toml")
        .with_mandatory_keys(MandatoryRules::new(["*", "-d.f.g"]).unwrap());
    assert!(fixture_builder().build(&params).is_ok());
}

#[test]
fn custom_validator_pass_keeps_result() {
    let recorder = RecordingValidator::accepting();
    let mut params = test_params().with_template("template.toml");
    params.validate = Some(recorder.validator());

    let config = fixture_builder().build(&params).expect("build");
    assert_eq!(config, expected_test_config());
    assert_eq!(recorder.calls(), 1);
    assert_eq!(recorder.seen(), vec![expected_test_config()]);
}

#[test]
fn custom_validator_failure_aborts_build() {
    let recorder = RecordingValidator::rejecting("blah");
    let mut params = test_params().with_template("template.toml");
    params.validate = Some(recorder.validator());

    let err = fixture_builder().build(&params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CustomValidationFailed);
    assert_eq!(err.to_string(), "blah");
    assert_eq!(recorder.calls(), 1);
}

#[test]
fn type_validation_passes() {
    let params = BuildParams::new()
        .with_env_config("test", "test3.toml")
        .with_template("template3.toml")
        .with_type_validation(true);
    assert!(fixture_builder().build(&params).is_ok());
}

#[test]
fn type_validation_rejects_wrong_type() {
    let err = build_err(
        BuildParams::new()
            .with_env_config("test", "test4.toml")
            .with_template("template4.toml")
            .with_type_validation(true),
    );
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        err.to_string(),
        "Expected 'server.port' to be a number (instead got '8080' of type 'string')"
    );
}

#[test]
fn type_tags_are_presence_only_without_type_validation() {
    let params = BuildParams::new()
        .with_env_config("test", "test4.toml")
        .with_template("template4.toml");
    assert!(fixture_builder().build(&params).is_ok());
}

#[test]
fn type_validation_rejects_unknown_type() {
    let err = build_err(
        BuildParams::new()
            .with_env_config("test", "test5.toml")
            .with_template("template5.toml")
            .with_type_validation(true),
    );
    assert_eq!(err.kind(), ErrorKind::UnknownType);
    assert!(err.to_string().contains("weird"));
}

#[test]
fn enum_validation() {
    let ok = BuildParams::new()
        .with_env_config("test", "test6.toml")
        .with_template("template6.toml")
        .with_type_validation(true);
    assert!(fixture_builder().build(&ok).is_ok());

    let err = build_err(
        BuildParams::new()
            .with_env_config("test", "test7.toml")
            .with_template("template6.toml")
            .with_type_validation(true),
    );
    assert_eq!(err.kind(), ErrorKind::EnumMismatch);
}

#[test]
fn static_config_merges_under_env_config() {
    let params = test_params().with_static_config("static.toml");
    let config = fixture_builder().build(&params).expect("build");
    assert_eq!(config["a"], json!("a"));
    assert_eq!(config["region"], json!("eu-west-1"));
    assert_eq!(config["d"]["owner"], json!("platform"));
    assert_eq!(config["d"]["f"]["g"], json!(""));
    assert_eq!(config["features"]["flags"], json!(["base"]));
}

#[test]
fn build_is_idempotent() {
    let params = test_params()
        .with_static_config("static.toml")
        .with_template("template.toml");
    let builder = fixture_builder();
    let first = builder.build(&params).expect("first");
    let second = builder.build(&params).expect("second");
    assert_eq!(first, second);
}

#[test]
fn missing_env_file_names_role() {
    let params = BuildParams::new().with_env_config("test", "absent.toml");
    let err = build_err(params);
    assert!(matches!(
        err,
        ConfigError::Source {
            role: SourceRole::Env,
            ..
        }
    ));
    assert!(err.to_string().starts_with("failed to load env config"));
}

#[test]
fn manifest_drives_a_build() {
    let builder = fixture_builder();
    let params = builder.load_manifest("manifest.json5").expect("manifest");
    let config = builder.build(&params).expect("build");
    assert_eq!(config["region"], json!("eu-west-1"));
    assert_eq!(config["b"], json!("b"));
}

#[test]
fn template_and_static_loaded_in_order() {
    let loader = InMemoryLoader::new()
        .with_source("env.json", json!({ "a": 1 }))
        .with_source("template.json", json!({ "a": 0 }))
        .with_source("static.json", json!({ "b": 2 }));
    let requests = loader.requests();
    let builder = ConfigBuilder::new(".")
        .with_loader(loader)
        .with_environment(FixedEnvironment::new("dev"));
    let params = BuildParams::new()
        .with_env_config("dev", "env.json")
        .with_template("template.json")
        .with_static_config("static.json");

    let config = builder.build(&params).expect("build");
    assert_eq!(config, json!({ "b": 2, "a": 1 }));
    let seen: Vec<String> = requests
        .lock()
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    assert_eq!(seen, vec!["env.json", "template.json", "static.json"]);
}

#[test]
fn unparsable_env_config_is_a_load_error() {
    let temp = TempDir::new().expect("tmp");
    write_source(temp.path(), "broken.toml", "a = = 1");
    let builder =
        ConfigBuilder::new(temp.path()).with_environment(FixedEnvironment::new("test"));
    let params = BuildParams::new().with_env_config("test", "broken.toml");
    let err = builder.build(&params).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Load);
}

#[test]
#[serial(env)]
fn environment_read_from_process_variable() {
    // SAFETY: tests touching the environment are serialized.
    unsafe { std::env::set_var("CONFGATE_IT_ENV", "test") };
    let builder = ConfigBuilder::new(fixtures_dir())
        .with_environment(ProcessEnvironment::new("CONFGATE_IT_ENV"));
    let result = builder.build(&test_params());
    // SAFETY: tests touching the environment are serialized.
    unsafe { std::env::remove_var("CONFGATE_IT_ENV") };
    assert_eq!(result.expect("build"), expected_test_config());
}

#[test]
#[serial(env)]
fn unset_environment_variable_fails() {
    // SAFETY: tests touching the environment are serialized.
    unsafe { std::env::remove_var("CONFGATE_IT_ENV") };
    let builder = ConfigBuilder::new(fixtures_dir())
        .with_environment(ProcessEnvironment::new("CONFGATE_IT_ENV"));
    let err = builder.build(&test_params()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigLoad);
    assert_eq!(err.to_string(), "CONFGATE_IT_ENV is not set!");
}
