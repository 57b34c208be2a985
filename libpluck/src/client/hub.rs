//! Docker Hub registry client.
//!
//! Hub pulls ride on a repository-scoped bearer token obtained through
//! [`TokenExchange`]; the token is negotiated once on first use and shared
//! by every request this client makes.

use crate::auth::Credentials;
use crate::auth::token::TokenExchange;
use crate::client::{
    ClientConfig, RegistryClient, build_http_client, fetch_manifest_at, normalize_registry_url,
    stream_blob,
};
use crate::error::Result;
use crate::manifest::{LayerDescriptor, Manifest};
use crate::reference::{DEFAULT_REGISTRY, ImageReference};
use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Hub registry endpoint.
const DEFAULT_REGISTRY_URL: &str = "https://index.docker.io";

/// Hub anonymous token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://auth.docker.io/token";

/// Hub credentialed login endpoint.
const DEFAULT_LOGIN_URL: &str = "https://hub.docker.com/v2/users/login/";

/// Registry client for Docker Hub.
#[derive(Debug)]
pub struct HubClient {
    http_client: reqwest::Client,
    registry_url: String,
    exchange: TokenExchange,
}

impl HubClient {
    /// Creates a hub client against the production endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::auth::Credentials;
    /// use libpluck::client::{ClientConfig, HubClient};
    ///
    /// let client = HubClient::new(Credentials::anonymous(), ClientConfig::default()).unwrap();
    /// ```
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Self::with_endpoints(
            DEFAULT_REGISTRY_URL,
            DEFAULT_TOKEN_URL,
            DEFAULT_LOGIN_URL,
            credentials,
            config,
        )
    }

    /// Creates a hub client against explicit endpoints.
    ///
    /// Useful for mirrors and test servers standing in for the hub.
    pub fn with_endpoints(
        registry_url: &str,
        token_url: &str,
        login_url: &str,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Result<Self> {
        let registry_url = normalize_registry_url(registry_url)?;
        let http_client = build_http_client(&config)?;
        let exchange = TokenExchange::new(http_client.clone(), token_url, login_url, credentials);

        Ok(Self {
            http_client,
            registry_url,
            exchange,
        })
    }
}

#[async_trait]
impl RegistryClient for HubClient {
    async fn get_manifest(&self, reference: &ImageReference) -> Result<Manifest> {
        let token = self.exchange.bearer_token(reference.repository()).await?;
        let header = format!("Bearer {}", token);
        fetch_manifest_at(
            &self.http_client,
            &self.registry_url,
            DEFAULT_REGISTRY,
            reference,
            Some(&header),
        )
        .await
    }

    async fn pull_layer(
        &self,
        reference: &ImageReference,
        layer: &LayerDescriptor,
        sink: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<u64> {
        let token = self.exchange.bearer_token(reference.repository()).await?;
        let header = format!("Bearer {}", token);
        stream_blob(
            &self.http_client,
            &self.registry_url,
            DEFAULT_REGISTRY,
            reference,
            layer,
            Some(&header),
            sink,
        )
        .await
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod hub_tests;
