//! Credential lookup from the local Docker config file.
//!
//! This module provides a trait-based abstraction for locating registry
//! credentials. The file-based implementation reads `~/.docker/config.json`
//! as written by `docker login`, supporting plain base64 `auth` entries.
//! Credential helpers are not invoked.

use crate::auth::Credentials;
use crate::error::{PluckError, Result};
use crate::reference::DEFAULT_REGISTRY;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Config-file key Docker uses for hub credentials.
const HUB_CONFIG_KEY: &str = "https://index.docker.io/v1/";

/// Trait for looking up registry credentials.
///
/// This trait allows different credential sources (Docker config file,
/// environment, keyring) to be used interchangeably.
pub trait CredentialSource {
    /// Looks up credentials for a registry host.
    ///
    /// Returns `Ok(None)` when the source has no entry for the host; errors
    /// are reserved for sources that exist but cannot be read.
    fn lookup(&self, registry: &str) -> Result<Option<Credentials>>;
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
}

#[derive(Debug, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: Option<String>,
}

/// Credential source backed by a Docker `config.json` file.
///
/// # Examples
///
/// ```no_run
/// use libpluck::auth::store::{CredentialSource, DockerConfigFile};
/// use std::path::PathBuf;
///
/// # fn example() -> libpluck::error::Result<()> {
/// let source = DockerConfigFile::new(PathBuf::from("/home/user/.docker/config.json"));
/// let creds = source.lookup("index.docker.io")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DockerConfigFile {
    /// Path to the config file
    path: PathBuf,
}

impl DockerConfigFile {
    /// Creates a credential source reading the given config file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the conventional config path under the user's home directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".docker").join("config.json"))
    }

    /// Creates a source at the default location, if a home directory exists.
    pub fn from_default_location() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// Decodes a base64 `user:pass` auth entry.
    fn decode_auth(&self, encoded: &str) -> Result<Credentials> {
        use base64::{Engine as _, engine::general_purpose};

        let decoded = general_purpose::STANDARD.decode(encoded).map_err(|e| {
            PluckError::config_with_source("Failed to decode auth entry", self.path.to_str(), e)
        })?;
        let pair = String::from_utf8(decoded).map_err(|e| {
            PluckError::config_with_source("Auth entry is not valid UTF-8", self.path.to_str(), e)
        })?;

        let Some((username, password)) = pair.split_once(':') else {
            return Err(PluckError::config(
                "Auth entry missing ':' separator",
                self.path.to_str(),
            ));
        };
        Ok(Credentials::basic(username, password))
    }
}

impl CredentialSource for DockerConfigFile {
    fn lookup(&self, registry: &str) -> Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            PluckError::config_with_source(
                "Failed to read Docker config file",
                self.path.to_str(),
                e,
            )
        })?;
        let config: ConfigFile = serde_json::from_str(&contents).map_err(|e| {
            PluckError::config_with_source(
                "Failed to parse Docker config file",
                self.path.to_str(),
                e,
            )
        })?;

        // docker login stores hub credentials under the legacy v1 key.
        let key = if registry == DEFAULT_REGISTRY {
            HUB_CONFIG_KEY
        } else {
            registry
        };

        match config.auths.get(key).and_then(|entry| entry.auth.as_deref()) {
            Some(encoded) if !encoded.is_empty() => self.decode_auth(encoded).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
