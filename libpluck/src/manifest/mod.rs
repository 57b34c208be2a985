//! Image manifest schema.
//!
//! Covers the fields of a Docker schema-2 image manifest that layer
//! retrieval needs. Unknown fields are ignored and absent ones default, so
//! manifests from older or minimal registries still decode; layer digest and
//! size stay required because integrity verification depends on them.

use crate::digest::Digest;
use serde::{Deserialize, Serialize};


/// A Docker schema-2 image manifest.
///
/// `layers` is ordered base-first, matching the order the layers are applied
/// when assembling a filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub config: Option<ManifestConfig>,
    #[serde(default)]
    pub layers: Vec<LayerDescriptor>,
}

/// Descriptor for one layer blob: its digest, declared size, and media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    #[serde(default)]
    pub media_type: String,
    pub size: u64,
    pub digest: Digest,
}

/// Descriptor for the image config blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConfig {
    #[serde(default)]
    pub media_type: String,
    pub size: u64,
    pub digest: Digest,
}
