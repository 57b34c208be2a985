//! Generic Registry v2 client.
//!
//! Serves every non-hub registry (GHCR, private deployments, localhost).
//! Credentials are sent directly as an Authorization header on each
//! request; no token endpoint is involved.

use crate::auth::Credentials;
use crate::client::{
    ClientConfig, RegistryClient, build_http_client, fetch_manifest_at, normalize_registry_url,
    stream_blob,
};
use crate::error::Result;
use crate::manifest::{LayerDescriptor, Manifest};
use crate::reference::ImageReference;
use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Registry client for arbitrary Registry v2 endpoints.
#[derive(Debug)]
pub struct GenericV2Client {
    http_client: reqwest::Client,
    registry_url: String,
    registry_host: String,
    credentials: Credentials,
}

impl GenericV2Client {
    /// Creates a client for the given registry host.
    ///
    /// The host may carry a scheme (`http://localhost:5000`); without one,
    /// https is assumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::auth::Credentials;
    /// use libpluck::client::{ClientConfig, GenericV2Client};
    ///
    /// let client = GenericV2Client::new(
    ///     "ghcr.io",
    ///     Credentials::basic("user", "token"),
    ///     ClientConfig::default(),
    /// ).unwrap();
    /// ```
    pub fn new(registry: &str, credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let registry_url = normalize_registry_url(registry)?;
        let http_client = build_http_client(&config)?;

        Ok(Self {
            http_client,
            registry_url,
            // Host kept separately for error messages.
            registry_host: registry.trim().to_string(),
            credentials,
        })
    }
}

#[async_trait]
impl RegistryClient for GenericV2Client {
    async fn get_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        let header = self.credentials.to_header_value();
        fetch_manifest_at(
            &self.http_client,
            &self.registry_url,
            &self.registry_host,
            reference,
            header.as_deref(),
        )
        .await
    }

    async fn pull_layer(
        &self,
        reference: &ImageReference,
        layer: &LayerDescriptor,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        let header = self.credentials.to_header_value();
        stream_blob(
            &self.http_client,
            &self.registry_url,
            &self.registry_host,
            reference,
            layer,
            header.as_deref(),
            sink,
        )
        .await
    }
}

#[cfg(test)]
#[path = "generic_tests.rs"]
mod generic_tests;
