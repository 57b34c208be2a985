//! Registry clients for manifest and blob retrieval.
//!
//! This module provides the [`RegistryClient`] trait plus the two
//! implementations pluck ships: [`HubClient`] for Docker Hub with its token
//! exchange, and [`GenericV2Client`] for any other Registry v2 endpoint.
//! [`client_for`] selects the right one from a parsed reference.

use crate::auth::Credentials;
use crate::error::{PluckError, Result};
use crate::manifest::{LayerDescriptor, Manifest};
use crate::reference::ImageReference;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub mod generic;
pub mod hub;

pub use generic::GenericV2Client;
pub use hub::HubClient;

#[cfg(test)]
mod tests;

/// Media type requested for image manifests.
///
/// Pinning the schema-2 type keeps registries from answering with a
/// multi-platform manifest list, whose body carries no layers.
pub const MANIFEST_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Configuration for the HTTP client.
///
/// This struct allows customization of HTTP client behavior such as timeouts
/// and connection pooling. Use the builder pattern to configure:
///
/// # Examples
///
/// ```
/// use libpluck::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_max_idle_per_host(20);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    ///
    /// Default values:
    /// - timeout: 30 seconds
    /// - max_idle_per_host: 10 connections
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::client::ClientConfig;
    ///
    /// let config = ClientConfig::new();
    /// assert_eq!(config.timeout_seconds, 30);
    /// assert_eq!(config.max_idle_per_host, 10);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connect timeout in seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::client::ClientConfig;
    ///
    /// let config = ClientConfig::new().with_timeout(60);
    /// assert_eq!(config.timeout_seconds, 60);
    /// ```
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::client::ClientConfig;
    ///
    /// let config = ClientConfig::new().with_max_idle_per_host(20);
    /// assert_eq!(config.max_idle_per_host, 20);
    /// ```
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// A registry that can serve manifests and layer blobs for pull.
///
/// Implementations are selected once per image reference by [`client_for`];
/// both methods may be called concurrently from the layer fetch workers.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Retrieves the manifest for a tagged image.
    async fn get_manifest(&self, reference: &ImageReference) -> Result<Manifest>;

    /// Streams one layer blob into `sink`, verifying size and digest.
    ///
    /// Returns the number of bytes written; the sink is flushed before a
    /// successful return. Bytes already written before a failure are the
    /// caller's to discard.
    async fn pull_layer(
        &self,
        reference: &ImageReference,
        layer: &LayerDescriptor,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64>;
}

/// Builds the registry client matching a reference's registry host.
///
/// Docker Hub references get the token-exchange client; everything else
/// talks plain Registry v2 with the supplied credentials.
///
/// # Examples
///
/// ```
/// use libpluck::auth::Credentials;
/// use libpluck::client::{ClientConfig, client_for};
/// use libpluck::reference::ImageReference;
///
/// # fn example() -> libpluck::error::Result<()> {
/// let reference = ImageReference::parse("ghcr.io/org/app:v2")?;
/// let client = client_for(&reference, Credentials::anonymous(), ClientConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn client_for(
    reference: &ImageReference,
    credentials: Credentials,
    config: ClientConfig,
) -> Result<Arc<dyn RegistryClient>> {
    if reference.is_default_registry() {
        Ok(Arc::new(HubClient::new(credentials, config)?))
    } else {
        Ok(Arc::new(GenericV2Client::new(
            reference.registry(),
            credentials,
            config,
        )?))
    }
}

/// Builds the shared reqwest client from a [`ClientConfig`].
///
/// Only the connect phase is bounded; a whole-request timeout would cap
/// large blob downloads.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.timeout_seconds))
        .pool_max_idle_per_host(config.max_idle_per_host)
        .build()
        .map_err(|e| PluckError::config_with_source("Failed to create HTTP client", None, e))
}

/// Normalizes a registry URL by ensuring it has a scheme and removing
/// trailing slashes.
pub(crate) fn normalize_registry_url(url: &str) -> Result<String> {
    let url = url.trim();

    if url.is_empty() {
        return Err(PluckError::reference(url, "registry URL cannot be empty"));
    }

    let url = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{}", url)
    } else {
        url.to_string()
    };

    Ok(url.trim_end_matches('/').to_string())
}

/// Translates a reqwest error into a PluckError.
pub(crate) fn translate_reqwest_error(error: reqwest::Error, registry: &str) -> PluckError {
    let message = if error.is_timeout() {
        format!("request to {} timed out", registry)
    } else if error.is_connect() {
        format!("failed to connect to {}", registry)
    } else if error.is_request() {
        format!("failed to send request to {}", registry)
    } else {
        format!("network error communicating with {}", registry)
    };
    PluckError::unreachable_with_source(registry.to_string(), message, error)
}

/// Fetches and decodes a manifest from a v2 endpoint.
pub(crate) async fn fetch_manifest_at(
    http: &reqwest::Client,
    registry_url: &str,
    registry_host: &str,
    reference: &ImageReference,
    auth_header: Option<&str>,
) -> Result<Manifest> {
    let url = format!(
        "{}/v2/{}/manifests/{}",
        registry_url,
        reference.repository(),
        reference.tag()
    );

    let mut request = http.get(&url).header("Accept", MANIFEST_MEDIA_TYPE);
    if let Some(header) = auth_header {
        request = request.header("Authorization", header);
    }

    let response = request
        .send()
        .await
        .map_err(|e| translate_reqwest_error(e, registry_host))?;

    let status = response.status().as_u16();
    if status == 200 {
        let body = response
            .bytes()
            .await
            .map_err(|e| translate_reqwest_error(e, registry_host))?;
        return serde_json::from_slice(&body)
            .map_err(|e| PluckError::manifest_parse(reference.to_string(), e));
    }

    // Drain the error body before mapping the status so the connection can
    // go back into the pool.
    let message = response.text().await.unwrap_or_default();
    match status {
        401 => Err(PluckError::auth_required(registry_host)),
        404 => Err(PluckError::not_found(
            "image",
            format!("{}:{}", reference.repository(), reference.tag()).as_str(),
        )),
        status => Err(PluckError::registry(registry_host, status, message.as_str())),
    }
}

/// Streams a layer blob into `sink`, verifying declared size and digest.
///
/// The declared Content-Length is checked against the manifest before any
/// byte is written, so a mismatch leaves the sink untouched. The digest is
/// hashed incrementally and compared after the stream ends.
pub(crate) async fn stream_blob(
    http: &reqwest::Client,
    registry_url: &str,
    registry_host: &str,
    reference: &ImageReference,
    layer: &LayerDescriptor,
    auth_header: Option<&str>,
    sink: &mut (dyn AsyncWrite + Unpin + Send),
) -> Result<u64> {
    let url = format!(
        "{}/v2/{}/blobs/{}",
        registry_url,
        reference.repository(),
        layer.digest
    );

    let mut request = http.get(&url);
    if let Some(header) = auth_header {
        request = request.header("Authorization", header);
    }

    let mut response = request
        .send()
        .await
        .map_err(|e| translate_reqwest_error(e, registry_host))?;

    let status = response.status().as_u16();
    if status != 200 {
        let message = response.text().await.unwrap_or_default();
        return Err(match status {
            401 => PluckError::auth_required(registry_host),
            404 => PluckError::not_found("layer blob", layer.digest.as_str()),
            status => PluckError::registry(registry_host, status, message.as_str()),
        });
    }

    // Fast-fail before writing anything when the declared length already
    // contradicts the manifest. Some registries stream chunked without a
    // Content-Length; the post-stream checks still cover those.
    if let Some(declared) = response.content_length()
        && declared != layer.size
    {
        return Err(PluckError::integrity(
            layer.digest.as_str(),
            format!(
                "declared content length {} does not match manifest size {}",
                declared, layer.size
            )
            .as_str(),
        ));
    }

    let mut hasher = layer.digest.hasher()?;
    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| translate_reqwest_error(e, registry_host))?
    {
        hasher.update(&chunk);
        sink.write_all(&chunk)
            .await
            .map_err(|e| PluckError::io("failed to write layer bytes", e))?;
        written += chunk.len() as u64;
    }
    sink.flush()
        .await
        .map_err(|e| PluckError::io("failed to flush layer sink", e))?;

    if written != layer.size {
        return Err(PluckError::integrity(
            layer.digest.as_str(),
            format!("expected {} bytes, got {}", layer.size, written).as_str(),
        ));
    }

    let computed = hasher.finalize_hex();
    if computed != layer.digest.hex() {
        return Err(PluckError::integrity(
            layer.digest.as_str(),
            format!(
                "digest mismatch: computed {}:{}",
                layer.digest.algorithm(),
                computed
            )
            .as_str(),
        ));
    }

    Ok(written)
}
