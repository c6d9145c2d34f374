//! Profile-based configuration
//!
//! Configuration is stored in TOML format with support for multiple named
//! profiles. Each profile names a region, an optional endpoint override,
//! optional credentials, and the client settings used to size the worker pool.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::client::ClientConfig;
use super::credential::{Credentials, CredentialsProvider, DefaultCredentialsChain};
use super::error::{ConfigError, Result};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "CONNECT_ASYNC_CONFIG";

pub const DEFAULT_REGION: &str = "us-east-1";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Profile used when none is named explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    #[serde(default = "default_region")]
    pub region: String,
    /// Service endpoint; derived from the region when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Supports the `keyring:` prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Supports the `keyring:` prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            client: ClientConfig::default(),
        }
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Profile {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// The configured endpoint, or the regional default
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://connect.{}.amazonaws.com", self.region))
    }

    /// Check if this profile stores a secret of its own
    pub fn has_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

/// Everything needed to build a synchronous provider for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub profile: String,
    pub region: String,
    pub endpoint: String,
    pub credentials: Credentials,
    pub client: ClientConfig,
}

impl Config {
    /// Resolve which profile to use
    ///
    /// Resolution order: the explicit name, then `default_profile`, then the
    /// alphabetically first profile.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(name) = explicit_profile {
            if self.profiles.contains_key(name) {
                return Ok(name.to_string());
            }
            return Err(ConfigError::ProfileNotFound {
                name: name.to_string(),
            });
        }

        if let Some(ref default) = self.default_profile {
            if self.profiles.contains_key(default) {
                return Ok(default.clone());
            }
            return Err(ConfigError::ProfileNotFound {
                name: default.clone(),
            });
        }

        let mut names: Vec<_> = self.profiles.keys().collect();
        names.sort();
        names
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: format!(
                    "Add a [profiles.<name>] table to {}.",
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                ),
            })
    }

    /// Resolve a profile into settings with credentials
    ///
    /// Credentials come from [`DefaultCredentialsChain`]: environment first,
    /// then the profile's own values.
    pub fn resolve_settings(&self, explicit_profile: Option<&str>) -> Result<ClientSettings> {
        let name = self.resolve_profile(explicit_profile)?;
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.clone() })?;

        if profile.region.trim().is_empty() {
            return Err(ConfigError::InvalidProfile {
                name,
                reason: "region must not be empty".to_string(),
            });
        }
        if profile.client.max_connections == 0 {
            return Err(ConfigError::InvalidProfile {
                name,
                reason: "client.max_connections must be at least 1".to_string(),
            });
        }

        let credentials = DefaultCredentialsChain::with_profile(profile).credentials()?;

        tracing::debug!(
            profile = %name,
            region = %profile.region,
            max_connections = profile.client.max_connections,
            "Resolved client settings"
        );

        Ok(ClientSettings {
            region: profile.region.clone(),
            endpoint: profile.resolved_endpoint(),
            credentials,
            client: profile.client.clone(),
            profile: name,
        })
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields an empty configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        tracing::debug!(
            path = %config_path.display(),
            profiles = config.profiles.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// `CONNECT_ASYNC_CONFIG` wins when set. Otherwise:
    /// - Linux: ~/.config/connect-async/config.toml
    /// - macOS: ~/Library/Application Support/connect-async/config.toml
    /// - Windows: %APPDATA%\connect-async\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("", "", "connect-async").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports `${VAR}` and `${VAR:-default}`. Unset variables without a
    /// default are left as written.
    ///
    /// ```toml
    /// access_key_id = "${AWS_ACCESS_KEY_ID}"
    /// region = "${CONNECT_REGION:-us-east-1}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credential::{ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SECRET_KEY};

    fn profile_with_keys(region: &str) -> Profile {
        Profile {
            access_key_id: Some("AKIDPROFILE".to_string()),
            secret_access_key: Some("profile-secret".to_string()),
            ..Profile::new(region)
        }
    }

    fn clear_credential_env() {
        unsafe {
            std::env::remove_var(ENV_ACCESS_KEY_ID);
            std::env::remove_var(ENV_SECRET_KEY);
            std::env::remove_var(ENV_SECRET_ACCESS_KEY);
        }
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.set_profile("test".to_string(), profile_with_keys("eu-west-2"));
        config.default_profile = Some("test".to_string());

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_profile_defaults() {
        let config: Config = toml::from_str("[profiles.minimal]\n").unwrap();
        let profile = config.profiles.get("minimal").unwrap();

        assert_eq!(profile.region, "us-east-1");
        assert!(profile.endpoint.is_none());
        assert!(!profile.has_credentials());
        assert_eq!(profile.client, ClientConfig::default());
        assert_eq!(
            profile.resolved_endpoint(),
            "https://connect.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let profile = Profile {
            endpoint: Some("http://localhost:4566".to_string()),
            ..Profile::new("us-west-2")
        };
        assert_eq!(profile.resolved_endpoint(), "http://localhost:4566");
    }

    #[test]
    fn test_profile_resolution_order() {
        let mut config = Config::default();
        config.set_profile("zeta".to_string(), Profile::default());
        config.set_profile("alpha".to_string(), Profile::default());

        // Explicit wins
        assert_eq!(config.resolve_profile(Some("zeta")).unwrap(), "zeta");
        // Alphabetical first without a default
        assert_eq!(config.resolve_profile(None).unwrap(), "alpha");

        config.default_profile = Some("zeta".to_string());
        assert_eq!(config.resolve_profile(None).unwrap(), "zeta");
    }

    #[test]
    fn test_explicit_profile_not_found() {
        let mut config = Config::default();
        config.set_profile("prod".to_string(), Profile::default());

        let err = config.resolve_profile(Some("staging")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { ref name } if name == "staging"));
    }

    #[test]
    fn test_dangling_default_profile() {
        let mut config = Config::default();
        config.set_profile("prod".to_string(), Profile::default());
        config.default_profile = Some("gone".to_string());

        assert!(matches!(
            config.resolve_profile(None),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_no_profiles() {
        let config = Config::default();
        let err = config.resolve_profile(None).unwrap_err();
        assert!(matches!(err, ConfigError::NoProfiles { .. }));
        assert!(err.to_string().contains("No profiles configured"));
    }

    #[test]
    fn test_remove_profile_clears_default() {
        let mut config = Config::default();
        config.set_profile("prod".to_string(), Profile::default());
        config.set_profile("dev".to_string(), Profile::default());
        config.default_profile = Some("prod".to_string());

        assert!(config.remove_profile("prod").is_some());
        assert!(config.default_profile.is_none());
        assert!(config.remove_profile("prod").is_none());

        let names: Vec<_> = config.list_profiles().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["dev"]);
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_settings_from_profile() {
        clear_credential_env();

        let mut config = Config::default();
        let mut profile = profile_with_keys("ap-southeast-2");
        profile.client.max_connections = 4;
        config.set_profile("syd".to_string(), profile);

        let settings = config.resolve_settings(None).unwrap();
        assert_eq!(settings.profile, "syd");
        assert_eq!(settings.region, "ap-southeast-2");
        assert_eq!(
            settings.endpoint,
            "https://connect.ap-southeast-2.amazonaws.com"
        );
        assert_eq!(settings.credentials.access_key_id, "AKIDPROFILE");
        assert_eq!(settings.client.max_connections, 4);
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_settings_without_credentials() {
        clear_credential_env();

        let mut config = Config::default();
        config.set_profile("bare".to_string(), Profile::default());

        let err = config.resolve_settings(Some("bare")).unwrap_err();
        assert!(matches!(err, ConfigError::CredentialError(_)));
    }

    #[test]
    fn test_resolve_settings_rejects_zero_pool() {
        let mut config = Config::default();
        let mut profile = profile_with_keys("us-east-1");
        profile.client.max_connections = 0;
        config.set_profile("broken".to_string(), profile);

        let err = config.resolve_settings(None).unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn test_resolve_settings_rejects_empty_region() {
        let mut config = Config::default();
        config.set_profile("broken".to_string(), profile_with_keys(" "));

        assert!(matches!(
            config.resolve_settings(None),
            Err(ConfigError::InvalidProfile { .. })
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("CONNECT_TEST_KEY_ID", "expanded-key");
        }

        let content = r#"
[profiles.test]
access_key_id = "${CONNECT_TEST_KEY_ID}"
region = "${CONNECT_TEST_MISSING_REGION:-eu-central-1}"
session_token = "${CONNECT_TEST_UNSET_TOKEN}"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("expanded-key"));
        assert!(expanded.contains("eu-central-1"));
        assert!(expanded.contains("${CONNECT_TEST_UNSET_TOKEN}"));

        unsafe {
            std::env::remove_var("CONNECT_TEST_KEY_ID");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_config_path_env_override() {
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, "/tmp/connect-async-test/config.toml");
        }
        assert_eq!(
            Config::config_path().unwrap(),
            PathBuf::from("/tmp/connect-async-test/config.toml")
        );
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }
}
