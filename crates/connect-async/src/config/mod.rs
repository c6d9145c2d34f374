//! Configuration and profile management
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! # Features
//!
//! - Multiple named profiles, each with region, endpoint and client settings
//! - Credential chain over the environment and the profile
//! - Secure credential storage using OS keyring (optional)
//! - Environment variable expansion in config files

pub mod client;
pub mod config;
pub mod credential;
pub mod error;

pub use client::ClientConfig;
pub use config::{ClientSettings, Config, Profile};
pub use credential::{
    CredentialStorage, CredentialStore, Credentials, CredentialsProvider,
    DefaultCredentialsChain, EnvironmentCredentialsProvider, ProfileCredentialsProvider,
    StaticCredentialsProvider,
};
pub use error::{ConfigError, Result};
