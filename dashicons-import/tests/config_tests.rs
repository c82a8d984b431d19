//! Run configuration resolution tests
//!
//! Every test here rewrites PB_URL, PB_ADMIN_TOKEN and GITHUB_OUTPUT, so all
//! of them are marked #[serial].

use dashicons_common::config::TomlConfig;
use dashicons_import::config::{CliOverrides, ImportConfig, PB_ADMIN_TOKEN_ENV, PB_URL_ENV};
use dashicons_import::services::metadata_store::DEFAULT_LOCK_TIMEOUT;
use dashicons_import::services::GITHUB_OUTPUT_ENV;
use dashicons_import::ImportError;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

fn clear_env() {
    env::remove_var(PB_URL_ENV);
    env::remove_var(PB_ADMIN_TOKEN_ENV);
    env::remove_var(GITHUB_OUTPUT_ENV);
}

fn backend_env() {
    clear_env();
    env::set_var(PB_URL_ENV, "https://pb.example.com/");
    env::set_var(PB_ADMIN_TOKEN_ENV, "admin-token");
}

fn cli(submission_id: &str) -> CliOverrides {
    CliOverrides {
        submission_id: Some(submission_id.to_string()),
        ..Default::default()
    }
}

fn config_message(err: ImportError) -> String {
    match err {
        ImportError::Config(msg) => msg,
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_missing_submission_id_is_reported_first() {
    clear_env();

    let err = ImportConfig::resolve(CliOverrides::default(), &TomlConfig::default()).unwrap_err();

    assert!(config_message(err).contains("--submission-id"));
}

#[test]
#[serial]
fn test_missing_backend_url() {
    clear_env();
    env::set_var(PB_ADMIN_TOKEN_ENV, "admin-token");

    let err = ImportConfig::resolve(cli("sub1"), &TomlConfig::default()).unwrap_err();

    assert!(config_message(err).contains(PB_URL_ENV));
    clear_env();
}

#[test]
#[serial]
fn test_missing_admin_token() {
    clear_env();
    env::set_var(PB_URL_ENV, "https://pb.example.com");

    let err = ImportConfig::resolve(cli("sub1"), &TomlConfig::default()).unwrap_err();

    assert!(config_message(err).contains(PB_ADMIN_TOKEN_ENV));
    clear_env();
}

#[test]
#[serial]
fn test_environment_values_and_defaults() {
    backend_env();

    let config = ImportConfig::resolve(cli("sub1"), &TomlConfig::default()).unwrap();

    assert_eq!(config.submission_id, "sub1");
    assert_eq!(config.pb_url, "https://pb.example.com");
    assert_eq!(config.pb_admin_token, "admin-token");
    assert!(!config.dry_run);
    assert_eq!(config.root, PathBuf::from("."));
    assert_eq!(config.metadata_path, PathBuf::from("./metadata.json"));
    assert_eq!(config.step_output, None);
    assert_eq!(config.http_timeout, None);
    assert_eq!(config.lock_timeout, DEFAULT_LOCK_TIMEOUT);
    clear_env();
}

#[test]
#[serial]
fn test_toml_supplies_backend_and_timeouts() {
    clear_env();
    let toml = TomlConfig {
        pb_url: Some("https://toml.example.com".to_string()),
        pb_admin_token: Some("toml-token".to_string()),
        http_timeout_secs: Some(20),
        lock_timeout_secs: Some(5),
        ..Default::default()
    };

    let config = ImportConfig::resolve(cli("sub1"), &toml).unwrap();

    assert_eq!(config.pb_url, "https://toml.example.com");
    assert_eq!(config.pb_admin_token, "toml-token");
    assert_eq!(config.http_timeout, Some(Duration::from_secs(20)));
    assert_eq!(config.lock_timeout, Duration::from_secs(5));
}

#[test]
#[serial]
fn test_environment_beats_toml() {
    backend_env();
    let toml = TomlConfig {
        pb_url: Some("https://toml.example.com".to_string()),
        ..Default::default()
    };

    let config = ImportConfig::resolve(cli("sub1"), &toml).unwrap();

    assert_eq!(config.pb_url, "https://pb.example.com");
    clear_env();
}

#[test]
#[serial]
fn test_step_output_falls_back_to_environment() {
    backend_env();
    env::set_var(GITHUB_OUTPUT_ENV, "/tmp/gha-output");

    let config = ImportConfig::resolve(cli("sub1"), &TomlConfig::default()).unwrap();
    assert_eq!(config.step_output, Some(PathBuf::from("/tmp/gha-output")));

    let explicit = CliOverrides {
        gha_output: Some(PathBuf::from("/tmp/explicit")),
        ..cli("sub1")
    };
    let config = ImportConfig::resolve(explicit, &TomlConfig::default()).unwrap();
    assert_eq!(config.step_output, Some(PathBuf::from("/tmp/explicit")));
    clear_env();
}

#[test]
#[serial]
fn test_metadata_defaults_under_root() {
    backend_env();

    let overrides = CliOverrides {
        root: Some(PathBuf::from("/srv/icons")),
        dry_run: true,
        ..cli("sub1")
    };
    let config = ImportConfig::resolve(overrides, &TomlConfig::default()).unwrap();
    assert!(config.dry_run);
    assert_eq!(config.metadata_path, PathBuf::from("/srv/icons/metadata.json"));

    let overrides = CliOverrides {
        root: Some(PathBuf::from("/srv/icons")),
        metadata: Some(PathBuf::from("/elsewhere/meta.json")),
        ..cli("sub1")
    };
    let config = ImportConfig::resolve(overrides, &TomlConfig::default()).unwrap();
    assert_eq!(config.metadata_path, PathBuf::from("/elsewhere/meta.json"));
    clear_env();
}

#[test]
#[serial]
fn test_debug_output_redacts_token() {
    backend_env();

    let config = ImportConfig::resolve(cli("sub1"), &TomlConfig::default()).unwrap();
    let rendered = format!("{:?}", config);

    assert!(!rendered.contains("admin-token"));
    assert!(rendered.contains("<redacted>"));
    clear_env();
}
