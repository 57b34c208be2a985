//! pluck - retrieve single files from container images
//!
//! libpluck fetches the layers of a published container image directly from
//! its registry, without a container runtime and without pulling the image
//! through a daemon. Registry access covers Docker Hub (with its token
//! exchange) and any other Registry v2 endpoint, with blob integrity
//! verified against the manifest during download.
//!
//! # Quick Start
//!
//! ```no_run
//! use libpluck::{Credentials, FetchOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::env::temp_dir();
//!     let (manifest, layers) = libpluck::fetch_image_layers(
//!         "nginx:latest",
//!         Credentials::anonymous(),
//!         &dir,
//!         &FetchOptions::default(),
//!     )
//!     .await?;
//!
//!     println!(
//!         "downloaded {} of {} layers",
//!         layers.len(),
//!         manifest.layers.len()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`ImageReference`] - Reference parsing and normalization
//! - [`Credentials`] - Authentication credentials
//! - [`RegistryClient`] - Manifest and blob retrieval, selected by [`client_for`]
//! - [`FetchOptions`] / [`fetch_layers`] - Concurrent, order-preserving layer downloads
//! - [`LayerBlob`] - A verified layer on disk
//!
//! # Architecture
//!
//! The pipeline runs reference parsing ([`reference`]), client selection and
//! auth ([`client`], [`auth`]), then bounded concurrent layer retrieval
//! ([`fetch`]). Each stage only consumes validated output of the previous
//! one, so a malformed reference or manifest fails before any download
//! starts.

#![warn(clippy::all)]

use std::path::Path;

/// Returns the libpluck crate version.
///
/// This is useful for version reporting in CLI tools and debugging.
///
/// # Examples
///
/// ```
/// let version = libpluck::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Fetches the manifest for `image` and downloads its selected layers.
///
/// Convenience wrapper over [`ImageReference::parse`], [`client_for`], and
/// [`fetch_layers`] for callers that do not need to hold on to the client.
/// Layer files land in `dir` as described by [`fetch_layers`].
///
/// # Examples
///
/// ```no_run
/// use libpluck::{Credentials, FetchOptions};
///
/// # async fn example() -> libpluck::Result<()> {
/// let dir = std::env::temp_dir();
/// let (manifest, layers) = libpluck::fetch_image_layers(
///     "ghcr.io/org/app:v2",
///     Credentials::basic("user", "token"),
///     &dir,
///     &FetchOptions::new().with_include_base(true),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn fetch_image_layers(
    image: &str,
    credentials: Credentials,
    dir: &Path,
    options: &FetchOptions,
) -> Result<(Manifest, Vec<LayerBlob>)> {
    let reference = ImageReference::parse(image)?;
    let client = client_for(&reference, credentials, ClientConfig::default())?;
    let manifest = client.get_manifest(&reference).await?;
    let blobs = fetch_layers(client, &reference, &manifest, dir, options).await?;
    Ok((manifest, blobs))
}

// Re-export commonly used types for convenience
pub use auth::Credentials;
pub use auth::store::{CredentialSource, DockerConfigFile};
pub use client::{
    ClientConfig, GenericV2Client, HubClient, MANIFEST_MEDIA_TYPE, RegistryClient, client_for,
};
pub use digest::Digest;
pub use error::{PluckError, Result};
pub use fetch::{DEFAULT_CONCURRENCY, FetchOptions, LayerBlob, fetch_layers};
pub use manifest::{LayerDescriptor, Manifest, ManifestConfig};
pub use reference::{DEFAULT_REGISTRY, ImageReference};

pub mod auth;
pub mod client;
pub mod digest;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod reference;
