//! Docker Hub bearer token exchange.
//!
//! Hub manifests and blobs require a short-lived bearer token scoped to one
//! repository. The anonymous path asks the token endpoint directly; when
//! that endpoint rejects the request, Basic credentials fall back to the hub
//! login endpoint, whose JWT works as a bearer token for registry pulls.

use crate::auth::Credentials;
use crate::client::translate_reqwest_error;
use crate::error::{PluckError, Result};
use crate::reference::DEFAULT_REGISTRY;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

/// Service name the hub token endpoint expects.
const TOKEN_SERVICE: &str = "registry.docker.io";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Negotiates and caches one repository-scoped bearer token.
///
/// The first `bearer_token` call performs the exchange; the token is then
/// reused for every request made through the owning client, including
/// concurrent ones. A token is scoped to the repository it was requested
/// for, so each client instance serves a single image retrieval.
#[derive(Debug)]
pub struct TokenExchange {
    http_client: reqwest::Client,
    token_url: String,
    login_url: String,
    credentials: Credentials,
    token: OnceCell<String>,
}

impl TokenExchange {
    /// Creates an exchange against the given token and login endpoints.
    pub fn new(
        http_client: reqwest::Client,
        token_url: impl Into<String>,
        login_url: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            http_client,
            token_url: token_url.into(),
            login_url: login_url.into(),
            credentials,
            token: OnceCell::new(),
        }
    }

    /// Returns the cached bearer token, performing the exchange on first use.
    ///
    /// Pre-supplied bearer credentials are returned as-is without contacting
    /// the token endpoint.
    pub async fn bearer_token(&self, repository: &str) -> Result<&str> {
        if let Credentials::Bearer { token } = &self.credentials {
            return Ok(token);
        }
        self.token
            .get_or_try_init(|| self.request_token(repository))
            .await
            .map(String::as_str)
    }

    async fn request_token(&self, repository: &str) -> Result<String> {
        let url = format!(
            "{}?service={}&scope=repository:{}:pull",
            self.token_url, TOKEN_SERVICE, repository
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| translate_reqwest_error(e, DEFAULT_REGISTRY))?;

        match response.status().as_u16() {
            200 => parse_token_body(response, "token endpoint").await,
            401 => self.login_fallback().await,
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(PluckError::auth_failure(
                    DEFAULT_REGISTRY,
                    Some(status),
                    message.as_str(),
                ))
            }
        }
    }

    /// Exchanges Basic credentials for a JWT via the hub login endpoint.
    async fn login_fallback(&self) -> Result<String> {
        let Credentials::Basic { username, password } = &self.credentials else {
            return Err(PluckError::auth_required(DEFAULT_REGISTRY));
        };

        let response = self
            .http_client
            .post(&self.login_url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| translate_reqwest_error(e, DEFAULT_REGISTRY))?;

        match response.status().as_u16() {
            200 => parse_token_body(response, "login endpoint").await,
            401 => Err(PluckError::auth_required(DEFAULT_REGISTRY)),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(PluckError::auth_failure(
                    DEFAULT_REGISTRY,
                    Some(status),
                    message.as_str(),
                ))
            }
        }
    }
}

async fn parse_token_body(response: reqwest::Response, endpoint: &str) -> Result<String> {
    let body: TokenResponse = response.json().await.map_err(|e| {
        PluckError::auth_failure(
            DEFAULT_REGISTRY,
            None,
            format!("{endpoint} returned an unparseable body: {e}").as_str(),
        )
    })?;
    if body.token.is_empty() {
        return Err(PluckError::auth_failure(
            DEFAULT_REGISTRY,
            None,
            format!("{endpoint} returned no token").as_str(),
        ));
    }
    Ok(body.token)
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod token_tests;
