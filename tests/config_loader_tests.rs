//! Tests for layered .env configuration loading.

use std::fs;

use syndicate::config::ConfigLoader;
use tempfile::TempDir;

fn write_env(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn defaults_apply_when_no_files_exist() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.profile, "local");
    assert_eq!(config.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(config.log_format, "json");
    assert_eq!(
        config.allowed_destinations,
        vec!["facebook", "google", "instagram"]
    );
    assert!((config.sync.fault_probability - 0.15).abs() < f64::EPSILON);
    assert_eq!(config.sync.fault_pause_ms, 500);
    assert_eq!(config.sync.collapse_policy, "first-wins");
    assert_eq!(config.sync.delivery_mode, "embedded");
}

#[test]
fn base_env_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    write_env(
        &dir,
        ".env",
        "SYNDICATE_LOG_LEVEL=debug\nSYNDICATE_OPERATOR_TOKEN=file-token\nUNPREFIXED=ignored\n",
    );

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.operator_tokens, vec!["file-token"]);
}

#[test]
fn local_overlay_wins_over_base() {
    let dir = TempDir::new().unwrap();
    write_env(&dir, ".env", "SYNDICATE_LOG_LEVEL=info\n");
    write_env(&dir, ".env.local", "SYNDICATE_LOG_LEVEL=trace\n");

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.log_level, "trace");
}

#[test]
fn profile_specific_file_overlays_base() {
    let dir = TempDir::new().unwrap();
    write_env(
        &dir,
        ".env",
        "SYNDICATE_PROFILE=staging\nSYNDICATE_LOG_FORMAT=json\n",
    );
    write_env(&dir, ".env.staging", "SYNDICATE_LOG_FORMAT=pretty\n");

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.profile, "staging");
    assert_eq!(config.log_format, "pretty");
}

#[test]
fn operator_tokens_list_is_comma_separated() {
    let dir = TempDir::new().unwrap();
    write_env(
        &dir,
        ".env",
        "SYNDICATE_OPERATOR_TOKENS=alpha, bravo ,charlie,\n",
    );

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.operator_tokens, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn allowed_destinations_and_sync_settings_parse() {
    let dir = TempDir::new().unwrap();
    write_env(
        &dir,
        ".env",
        concat!(
            "SYNDICATE_ALLOWED_DESTINATIONS=facebook,linkedin\n",
            "SYNDICATE_SYNC_FAULT_PROBABILITY=0.0\n",
            "SYNDICATE_SYNC_FAULT_PAUSE_MS=25\n",
            "SYNDICATE_SYNC_COLLAPSE_POLICY=merge-all\n",
            "SYNDICATE_SYNC_DELIVERY_MODE=http\n",
        ),
    );

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();

    assert_eq!(config.allowed_destinations, vec!["facebook", "linkedin"]);
    assert_eq!(config.sync.fault_probability, 0.0);
    assert_eq!(config.sync.fault_pause_ms, 25);
    assert_eq!(config.sync.collapse_policy, "merge-all");
    assert_eq!(config.sync.delivery_mode, "http");
    assert!(config.sync.validate().is_ok());
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_env(&dir, ".env", "SYNDICATE_API_BIND_ADDR=not-an-addr\n");

    let result = ConfigLoader::with_base_dir(dir.path().to_path_buf()).load();
    assert!(result.is_err());
}

#[test]
fn redacted_json_hides_operator_tokens() {
    let dir = TempDir::new().unwrap();
    write_env(&dir, ".env", "SYNDICATE_OPERATOR_TOKEN=super-secret\n");

    let config = ConfigLoader::with_base_dir(dir.path().to_path_buf())
        .load()
        .unwrap();
    let rendered = config.redacted_json().unwrap();

    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[REDACTED]"));
}
