use std::fs;
use std::path::PathBuf;

use connect_async::config::{ClientConfig, Config, ConfigError, Profile};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Returns true if running as root (euid == 0). Used to skip permission tests.
#[cfg(unix)]
fn is_root() -> bool {
    std::process::Command::new("id")
        .arg("-u")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim() == "0")
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// 1. Missing config directory / nonexistent path
// ---------------------------------------------------------------------------

#[test]
fn load_from_nonexistent_path_returns_default_config() {
    let path = PathBuf::from("/tmp/connect-async-test-nonexistent/does/not/exist/config.toml");
    assert!(!path.exists());

    let config = Config::load_from_path(&path).expect("should not error on missing path");

    assert!(config.profiles.is_empty());
    assert!(config.default_profile.is_none());
}

// ---------------------------------------------------------------------------
// 2. Empty config file
// ---------------------------------------------------------------------------

#[test]
fn load_empty_config_file_returns_default_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "").unwrap();

    let config = Config::load_from_path(&config_path).expect("empty file should parse as default");

    assert_eq!(config, Config::default());
}

// ---------------------------------------------------------------------------
// 3. Corrupt / invalid TOML
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_toml_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[[[broken").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// 4. Profile fields with the wrong type
// ---------------------------------------------------------------------------

#[test]
fn load_profile_with_wrong_field_type_returns_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let content = r#"
[profiles.broken]
region = "us-west-2"

[profiles.broken.client]
max_connections = "ten"
"#;
    fs::write(&config_path, content).unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

// ---------------------------------------------------------------------------
// 5. Sparse profiles fill in defaults; unknown fields are ignored
// ---------------------------------------------------------------------------

#[test]
fn load_sparse_profile_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let content = r#"
unknown_top_level_key = "hello"

[profiles.minimal]
totally_unknown_field = true

[profiles.tuned]
region = "eu-west-2"

[profiles.tuned.client]
max_connections = 4
"#;
    fs::write(&config_path, content).unwrap();

    let config = Config::load_from_path(&config_path).expect("unknown fields should be ignored");

    let minimal = &config.profiles["minimal"];
    assert_eq!(minimal, &Profile::default());
    assert_eq!(minimal.resolved_endpoint(), "https://connect.us-east-1.amazonaws.com");

    let tuned = &config.profiles["tuned"];
    assert_eq!(tuned.region, "eu-west-2");
    assert_eq!(tuned.client.max_connections, 4);
    assert_eq!(tuned.client.max_error_retry, ClientConfig::default().max_error_retry);
}

// ---------------------------------------------------------------------------
// 6. Save / load round trip
// ---------------------------------------------------------------------------

#[test]
fn save_then_load_preserves_profiles() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_profile: Some("prod".to_string()),
        ..Config::default()
    };
    config.set_profile(
        "prod".to_string(),
        Profile {
            endpoint: Some("https://connect.example.test".to_string()),
            access_key_id: Some("keyring:prod-access-key".to_string()),
            client: ClientConfig::default().with_max_connections(25),
            ..Profile::new("ap-southeast-2")
        },
    );
    config.set_profile("dev".to_string(), Profile::default());

    config.save_to_path(&config_path).unwrap();
    let loaded = Config::load_from_path(&config_path).unwrap();

    assert_eq!(loaded, config);
    let names: Vec<&str> = loaded.list_profiles().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["dev", "prod"]);
}

// ---------------------------------------------------------------------------
// 7. Dangling default profile
// ---------------------------------------------------------------------------

#[test]
fn dangling_default_profile_is_reported() {
    let mut config = Config {
        default_profile: Some("gone".to_string()),
        ..Config::default()
    };
    config.set_profile("other".to_string(), Profile::default());

    let err = config.resolve_profile(None).unwrap_err();
    assert!(matches!(err, ConfigError::ProfileNotFound { ref name } if name == "gone"));

    // Removing the named default clears it even though the profile never existed
    assert!(config.remove_profile("gone").is_none());
    assert!(config.default_profile.is_none());
    assert_eq!(config.resolve_profile(None).unwrap(), "other");

    config.remove_profile("other");
    assert!(config.resolve_profile(None).is_err());
}

// ---------------------------------------------------------------------------
// 8. Permission errors (unix only)
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn load_unreadable_file_returns_clear_error() {
    use std::os::unix::fs::PermissionsExt;

    // Permissions are not enforced for root
    if is_root() {
        eprintln!("skipping test: running as root");
        return;
    }

    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# valid toml").unwrap();

    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o000)).unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::LoadError { .. }), "got {err:?}");

    // Restore permissions so TempDir cleanup can remove the file
    fs::set_permissions(&config_path, fs::Permissions::from_mode(0o644)).unwrap();
}

#[cfg(unix)]
#[test]
fn save_to_readonly_directory_returns_clear_error() {
    use std::os::unix::fs::PermissionsExt;

    if is_root() {
        eprintln!("skipping test: running as root");
        return;
    }

    let dir = TempDir::new().unwrap();
    let readonly_dir = dir.path().join("readonly");
    fs::create_dir(&readonly_dir).unwrap();
    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o444)).unwrap();

    let config_path = readonly_dir.join("config.toml");
    let err = Config::default().save_to_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::SaveError { .. }), "got {err:?}");

    fs::set_permissions(&readonly_dir, fs::Permissions::from_mode(0o755)).unwrap();
}
