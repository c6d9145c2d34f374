//! Credentials and their resolution
//!
//! Access keys can come from the environment, from a profile in the config
//! file, or from the OS keyring (profile values of the form `keyring:<name>`,
//! with the `secure-storage` feature). [`DefaultCredentialsChain`] tries the
//! environment first and falls back to the profile.

use super::config::Profile;
use super::error::{ConfigError, Result};
use std::env;
use std::fmt;

/// Prefix that indicates a value should be retrieved from the keyring
const KEYRING_PREFIX: &str = "keyring:";

/// Service name for keyring entries
#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "connect-async";

pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_KEY";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Access key pair, optionally with a session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Source of credentials
pub trait CredentialsProvider: Send + Sync {
    /// Short name used in error messages
    fn name(&self) -> &'static str;

    fn credentials(&self) -> Result<Credentials>;
}

/// Fixed credentials supplied by the caller
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider(Credentials);

impl StaticCredentialsProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn credentials(&self) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// Credentials from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_KEY` (or
/// `AWS_SECRET_ACCESS_KEY`), plus an optional `AWS_SESSION_TOKEN`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentCredentialsProvider;

impl CredentialsProvider for EnvironmentCredentialsProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn credentials(&self) -> Result<Credentials> {
        let access_key_id = non_empty_var(ENV_ACCESS_KEY_ID).ok_or_else(|| {
            ConfigError::CredentialError(format!("{} is not set", ENV_ACCESS_KEY_ID))
        })?;
        let secret = non_empty_var(ENV_SECRET_KEY)
            .or_else(|| non_empty_var(ENV_SECRET_ACCESS_KEY))
            .ok_or_else(|| {
                ConfigError::CredentialError(format!(
                    "Neither {} nor {} is set",
                    ENV_SECRET_KEY, ENV_SECRET_ACCESS_KEY
                ))
            })?;

        Ok(Credentials {
            access_key_id,
            secret_access_key: secret,
            session_token: non_empty_var(ENV_SESSION_TOKEN),
        })
    }
}

/// Credentials stored in a config profile
///
/// Each value is resolved through [`CredentialStore`], so keyring references
/// work here.
#[derive(Debug, Clone)]
pub struct ProfileCredentialsProvider {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
}

impl ProfileCredentialsProvider {
    pub fn new(profile: &Profile) -> Self {
        Self {
            access_key_id: profile.access_key_id.clone(),
            secret_access_key: profile.secret_access_key.clone(),
            session_token: profile.session_token.clone(),
        }
    }
}

impl CredentialsProvider for ProfileCredentialsProvider {
    fn name(&self) -> &'static str {
        "profile"
    }

    fn credentials(&self) -> Result<Credentials> {
        let (Some(key), Some(secret)) = (&self.access_key_id, &self.secret_access_key) else {
            return Err(ConfigError::CredentialError(
                "Profile does not define both access_key_id and secret_access_key".to_string(),
            ));
        };

        let store = CredentialStore::new();
        let resolved_key = store.get_credential(key, None).map_err(|e| {
            ConfigError::CredentialError(format!("Failed to resolve access key id: {}", e))
        })?;
        let resolved_secret = store.get_credential(secret, None).map_err(|e| {
            ConfigError::CredentialError(format!("Failed to resolve secret access key: {}", e))
        })?;
        let resolved_token = self
            .session_token
            .as_ref()
            .map(|t| {
                store.get_credential(t, None).map_err(|e| {
                    ConfigError::CredentialError(format!(
                        "Failed to resolve session token: {}",
                        e
                    ))
                })
            })
            .transpose()?;

        Ok(Credentials {
            access_key_id: resolved_key,
            secret_access_key: resolved_secret,
            session_token: resolved_token,
        })
    }
}

/// Ordered list of providers; the first that yields credentials wins
pub struct DefaultCredentialsChain {
    providers: Vec<Box<dyn CredentialsProvider>>,
}

impl DefaultCredentialsChain {
    /// Environment only
    pub fn new() -> Self {
        Self {
            providers: vec![Box::new(EnvironmentCredentialsProvider)],
        }
    }

    /// Environment, then the given profile
    pub fn with_profile(profile: &Profile) -> Self {
        Self::new().push(ProfileCredentialsProvider::new(profile))
    }

    /// Append a provider at the end of the chain
    #[must_use]
    pub fn push(mut self, provider: impl CredentialsProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Default for DefaultCredentialsChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsProvider for DefaultCredentialsChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn credentials(&self) -> Result<Credentials> {
        let mut failures = Vec::new();
        for provider in &self.providers {
            match provider.credentials() {
                Ok(credentials) => {
                    tracing::debug!(provider = provider.name(), "Resolved credentials");
                    return Ok(credentials);
                }
                Err(e) => failures.push(format!("{}: {}", provider.name(), e)),
            }
        }
        Err(ConfigError::CredentialError(format!(
            "No credentials found ({})",
            failures.join("; ")
        )))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Storage backend for credentials
#[derive(Debug, Clone)]
pub enum CredentialStorage {
    /// Store in OS keyring
    #[cfg(feature = "secure-storage")]
    Keyring,
    /// Store as plaintext
    Plaintext,
}

/// Credential store abstraction
pub struct CredentialStore {
    #[cfg_attr(not(feature = "secure-storage"), allow(dead_code))]
    storage: CredentialStorage,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Create a new credential store with automatic backend selection
    pub fn new() -> Self {
        #[cfg(feature = "secure-storage")]
        {
            if Self::is_keyring_available() {
                Self {
                    storage: CredentialStorage::Keyring,
                }
            } else {
                Self {
                    storage: CredentialStorage::Plaintext,
                }
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            Self {
                storage: CredentialStorage::Plaintext,
            }
        }
    }

    #[cfg(feature = "secure-storage")]
    fn is_keyring_available() -> bool {
        match keyring::Entry::new(SERVICE_NAME, "__probe__") {
            Ok(entry) => {
                let _ = entry.get_password();
                true
            }
            Err(_) => false,
        }
    }

    /// Store a credential value, returning what should be written to the config
    ///
    /// With a keyring backend this is a `keyring:<key>` reference; otherwise
    /// the value itself.
    pub fn store_credential(&self, key: &str, value: &str) -> Result<String> {
        #[cfg(feature = "secure-storage")]
        {
            match self.storage {
                CredentialStorage::Keyring => {
                    let entry = keyring::Entry::new(SERVICE_NAME, key)
                        .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                    entry.set_password(value).map_err(|e| {
                        ConfigError::KeyringError(format!(
                            "Failed to store credential in keyring: {}",
                            e
                        ))
                    })?;
                    Ok(format!("{}{}", KEYRING_PREFIX, key))
                }
                CredentialStorage::Plaintext => Ok(value.to_string()),
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            let _ = key;
            Ok(value.to_string())
        }
    }

    /// Retrieve a credential value
    ///
    /// Resolution order:
    /// 1. Check environment variable (if env_var provided)
    /// 2. If value starts with "keyring:", retrieve from keyring
    /// 3. Otherwise, return the value as-is (plaintext)
    pub fn get_credential(&self, value: &str, env_var: Option<&str>) -> Result<String> {
        if let Some(var) = env_var
            && let Ok(env_value) = env::var(var)
        {
            return Ok(env_value);
        }

        if value.starts_with(KEYRING_PREFIX) {
            #[cfg(feature = "secure-storage")]
            {
                let key = value.trim_start_matches(KEYRING_PREFIX);
                let entry = keyring::Entry::new(SERVICE_NAME, key)
                    .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                entry.get_password().map_err(|e| {
                    ConfigError::KeyringError(format!(
                        "Failed to retrieve credential '{}' from keyring: {}",
                        key, e
                    ))
                })
            }
            #[cfg(not(feature = "secure-storage"))]
            {
                Err(ConfigError::CredentialError(
                    "Credential references keyring but secure-storage feature is not enabled"
                        .to_string(),
                ))
            }
        } else {
            Ok(value.to_string())
        }
    }

    /// Delete a credential from storage
    pub fn delete_credential(&self, key: &str) -> Result<()> {
        #[cfg(feature = "secure-storage")]
        {
            match self.storage {
                CredentialStorage::Keyring => {
                    let entry = keyring::Entry::new(SERVICE_NAME, key)
                        .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                    match entry.delete_credential() {
                        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                        Err(e) => Err(ConfigError::KeyringError(format!(
                            "Failed to delete credential from keyring: {}",
                            e
                        ))),
                    }
                }
                CredentialStorage::Plaintext => Ok(()),
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            let _ = key;
            Ok(())
        }
    }

    /// Check if a value is a keyring reference
    pub fn is_keyring_reference(value: &str) -> bool {
        value.starts_with(KEYRING_PREFIX)
    }

    /// Name of the active storage backend
    pub fn storage_backend(&self) -> &str {
        #[cfg(feature = "secure-storage")]
        {
            match self.storage {
                CredentialStorage::Keyring => "keyring",
                CredentialStorage::Plaintext => "plaintext",
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            "plaintext"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            env::remove_var(ENV_ACCESS_KEY_ID);
            env::remove_var(ENV_SECRET_KEY);
            env::remove_var(ENV_SECRET_ACCESS_KEY);
            env::remove_var(ENV_SESSION_TOKEN);
        }
    }

    fn profile_with_keys(key: &str, secret: &str) -> Profile {
        Profile {
            access_key_id: Some(key.to_string()),
            secret_access_key: Some(secret.to_string()),
            ..Profile::default()
        }
    }

    #[test]
    fn test_plaintext_storage() {
        let store = CredentialStore::new();
        let result = store.get_credential("my-secret", None).unwrap();
        assert_eq!(result, "my-secret");
    }

    #[test]
    #[serial]
    fn test_store_env_var_override() {
        unsafe {
            env::set_var("CONNECT_TEST_CREDENTIAL", "env-value");
        }

        let store = CredentialStore::new();
        let result = store
            .get_credential("config-value", Some("CONNECT_TEST_CREDENTIAL"))
            .unwrap();
        assert_eq!(result, "env-value");

        unsafe {
            env::remove_var("CONNECT_TEST_CREDENTIAL");
        }
    }

    #[test]
    fn test_keyring_reference_detection() {
        assert!(CredentialStore::is_keyring_reference("keyring:prod-secret"));
        assert!(!CredentialStore::is_keyring_reference("prod-secret"));
        assert!(!CredentialStore::is_keyring_reference(""));
    }

    #[cfg(not(feature = "secure-storage"))]
    #[test]
    fn test_keyring_reference_without_feature_fails() {
        let store = CredentialStore::new();
        assert_eq!(store.storage_backend(), "plaintext");
        assert!(store.get_credential("keyring:prod-secret", None).is_err());
        assert_eq!(store.store_credential("k", "v").unwrap(), "v");
        assert!(store.delete_credential("k").is_ok());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI").with_session_token("tok");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("wJalrXUtnFEMI"));
        assert!(!debug.contains("tok\""));
    }

    #[test]
    #[serial]
    fn test_environment_provider_prefers_secret_key() {
        clear_env();
        unsafe {
            env::set_var(ENV_ACCESS_KEY_ID, "AKIDENV");
            env::set_var(ENV_SECRET_KEY, "primary");
            env::set_var(ENV_SECRET_ACCESS_KEY, "fallback");
        }

        let creds = EnvironmentCredentialsProvider.credentials().unwrap();
        assert_eq!(creds.access_key_id, "AKIDENV");
        assert_eq!(creds.secret_access_key, "primary");
        assert!(creds.session_token.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_environment_provider_missing_key() {
        clear_env();
        let err = EnvironmentCredentialsProvider.credentials().unwrap_err();
        assert!(err.to_string().contains(ENV_ACCESS_KEY_ID));
    }

    #[test]
    #[serial]
    fn test_chain_prefers_environment_over_profile() {
        clear_env();
        unsafe {
            env::set_var(ENV_ACCESS_KEY_ID, "AKIDENV");
            env::set_var(ENV_SECRET_ACCESS_KEY, "env-secret");
            env::set_var(ENV_SESSION_TOKEN, "env-token");
        }

        let profile = profile_with_keys("AKIDPROFILE", "profile-secret");
        let creds = DefaultCredentialsChain::with_profile(&profile)
            .credentials()
            .unwrap();
        assert_eq!(creds.access_key_id, "AKIDENV");
        assert_eq!(creds.session_token.as_deref(), Some("env-token"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_chain_falls_back_to_profile() {
        clear_env();
        let profile = profile_with_keys("AKIDPROFILE", "profile-secret");
        let creds = DefaultCredentialsChain::with_profile(&profile)
            .credentials()
            .unwrap();
        assert_eq!(creds.access_key_id, "AKIDPROFILE");
        assert_eq!(creds.secret_access_key, "profile-secret");
    }

    #[test]
    #[serial]
    fn test_chain_reports_every_failure() {
        clear_env();
        let err = DefaultCredentialsChain::with_profile(&Profile::default())
            .credentials()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("environment"));
        assert!(msg.contains("profile"));
    }

    #[test]
    fn test_static_provider_at_end_of_chain() {
        let fixed = Credentials::new("AKIDSTATIC", "static-secret");
        let chain = DefaultCredentialsChain {
            providers: Vec::new(),
        }
        .push(StaticCredentialsProvider::new(fixed.clone()));
        assert_eq!(chain.credentials().unwrap(), fixed);
    }
}
