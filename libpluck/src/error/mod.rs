//! Error types for pluck
//!
//! This module provides the error taxonomy for every registry and extraction
//! operation. All errors implement the standard Error trait and carry enough
//! context (registry host, repository, digest) for an actionable message.

use thiserror::Error;


/// Main error type for pluck operations
#[derive(Error, Debug)]
pub enum PluckError {
    /// Malformed image reference strings
    #[error("Invalid image reference '{reference}': {message}")]
    Reference { reference: String, message: String },

    /// Malformed content digest strings
    #[error("Invalid digest '{value}': {message}")]
    Digest { value: String, message: String },

    /// Credentials absent or rejected by the registry
    #[error("Authentication required for registry {registry}")]
    AuthRequired { registry: String },

    /// Unexpected response during token exchange
    #[error("Authentication failed for registry {registry} (status: {status:?}): {message}")]
    AuthFailure {
        registry: String,
        status: Option<u16>,
        message: String,
    },

    /// Missing image or layer blob (404), distinguishable from auth errors
    #[error("{resource} not found: {name}")]
    NotFound { resource: String, name: String },

    /// Manifest body that is not valid manifest JSON
    #[error("Invalid manifest for {reference}: {message}")]
    ManifestParse {
        reference: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Declared-size or digest mismatch on a downloaded blob
    #[error("Integrity check failed for {digest}: {message}")]
    Integrity { digest: String, message: String },

    /// Network-level failure (connection, timeout, DNS)
    #[error("Registry {registry} unreachable: {message}")]
    Unreachable {
        registry: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other non-success registry response
    #[error("Registry {registry} returned status {status}: {message}")]
    Registry {
        registry: String,
        status: u16,
        message: String,
    },

    /// Configuration errors (unreadable credential file, bad entries)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local I/O errors (sink writes, temp files)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pluck operations
pub type Result<T> = std::result::Result<T, PluckError>;

impl PluckError {
    /// Creates a new reference parse error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::reference("bad::ref", "invalid tag");
    /// assert!(matches!(err, PluckError::Reference { .. }));
    /// ```
    pub fn reference<S: Into<String>>(reference: S, message: S) -> Self {
        Self::Reference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Creates a new digest parse error.
    pub fn digest<S: Into<String>>(value: S, message: S) -> Self {
        Self::Digest {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a new authentication-required error naming the registry host.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::auth_required("index.docker.io");
    /// assert!(matches!(err, PluckError::AuthRequired { .. }));
    /// ```
    pub fn auth_required<S: Into<String>>(registry: S) -> Self {
        Self::AuthRequired {
            registry: registry.into(),
        }
    }

    /// Creates a new authentication-failure error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::auth_failure("index.docker.io", Some(500), "token endpoint error");
    /// assert!(matches!(err, PluckError::AuthFailure { .. }));
    /// ```
    pub fn auth_failure<S: Into<String>>(registry: S, status: Option<u16>, message: S) -> Self {
        Self::AuthFailure {
            registry: registry.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::not_found("image", "library/nosuch:latest");
    /// assert!(matches!(err, PluckError::NotFound { .. }));
    /// ```
    pub fn not_found<S: Into<String>>(resource: S, name: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Creates a new manifest parse error with a source error.
    pub fn manifest_parse<S, E>(reference: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ManifestParse {
            reference: reference.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new integrity error for a layer digest.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::integrity("sha256:abc", "expected 120 bytes, got 100");
    /// assert!(matches!(err, PluckError::Integrity { .. }));
    /// ```
    pub fn integrity<S: Into<String>>(digest: S, message: S) -> Self {
        Self::Integrity {
            digest: digest.into(),
            message: message.into(),
        }
    }

    /// Creates a new unreachable-registry error.
    pub fn unreachable<S: Into<String>>(registry: S, message: S) -> Self {
        Self::Unreachable {
            registry: registry.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new unreachable-registry error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    /// let err = PluckError::unreachable_with_source("localhost:5000", "failed to connect", io_err);
    /// assert!(matches!(err, PluckError::Unreachable { .. }));
    /// ```
    pub fn unreachable_with_source<S, E>(registry: S, message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unreachable {
            registry: registry.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new registry error carrying the response status.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// let err = PluckError::registry("ghcr.io", 503, "service unavailable");
    /// assert!(matches!(err, PluckError::Registry { .. }));
    /// ```
    pub fn registry<S: Into<String>>(registry: S, status: u16, message: S) -> Self {
        Self::Registry {
            registry: registry.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    /// use std::io;
    ///
    /// let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    /// let err = PluckError::config_with_source("failed to read credentials", Some("~/.docker/config.json"), io_err);
    /// assert!(matches!(err, PluckError::Config { .. }));
    /// ```
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new I/O error.
    pub fn io<S: Into<String>>(message: S, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns true for errors a caller may reasonably retry.
    ///
    /// Only network-level failures qualify; every other kind is fatal for
    /// the invocation. The library itself never retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::error::PluckError;
    ///
    /// assert!(PluckError::unreachable("ghcr.io", "timed out").is_retryable());
    /// assert!(!PluckError::auth_required("ghcr.io").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}
