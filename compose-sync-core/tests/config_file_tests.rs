//! Config file loading and environment layering.

use std::path::PathBuf;
use std::time::Duration;

use assert_fs::prelude::*;
use compose_sync_core::{Config, ConfigError, ConfigFile, GitAuth};
use predicates::prelude::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn yaml_file_supplies_all_settings() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("compose-sync.yaml");
    file.write_str(
        "repo_path: /srv/stacks\n\
         base_url: https://arcane.example.com/\n\
         api_key: from-file\n\
         env_id: \"3\"\n\
         log_file: /tmp/compose-sync.log\n\
         git_auth_method: https\n\
         git_https_token: tok\n\
         git_clean_excludes: [\".env\", \"local/\"]\n\
         request_timeout_secs: 15\n",
    )
    .expect("write");

    let parsed = ConfigFile::load(file.path()).expect("load");
    let config = Config::from_lookup(parsed, no_env).expect("config");
    assert_eq!(config.repo_path, PathBuf::from("/srv/stacks"));
    assert_eq!(config.base_url, "https://arcane.example.com");
    assert_eq!(config.api_key, "from-file");
    assert_eq!(config.env_id, "3");
    assert_eq!(
        config.git_auth,
        GitAuth::Https {
            token: Some("tok".to_string())
        }
    );
    assert_eq!(config.clean_excludes, vec![".env", "local/"]);
    assert_eq!(config.request_timeout, Duration::from_secs(15));
}

#[test]
fn environment_overrides_file() {
    let file = ConfigFile {
        repo_path: Some(PathBuf::from("/from/file")),
        base_url: Some("http://file".to_string()),
        api_key: Some("file-key".to_string()),
        env_id: Some("7".to_string()),
        ..ConfigFile::default()
    };
    let config = Config::from_lookup(file, |key| match key {
        "ARCANE_API_KEY" => Some("env-key".to_string()),
        "ARCANE_ENV_ID" => Some(String::new()),
        _ => None,
    })
    .expect("config");
    assert_eq!(config.api_key, "env-key");
    assert_eq!(config.env_id, "7", "empty env value must not shadow the file");
    assert_eq!(config.repo_path, PathBuf::from("/from/file"));
}

#[test]
fn missing_repo_path_names_the_variable() {
    let err = Config::from_lookup(ConfigFile::default(), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { .. }), "got: {err}");
    assert!(predicate::str::contains("COMPOSE_REPO_PATH").eval(&err.to_string()));
}

#[test]
fn unknown_yaml_key_is_a_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("bad.yaml");
    file.write_str("repo_path: /srv\nbogus_key: 1\n").expect("write");

    let err = ConfigFile::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("bad.yaml"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = ConfigFile::load(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "got: {err}");
}
