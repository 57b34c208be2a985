//! Image reference parsing and normalization.
//!
//! References arrive in shorthand (`ubuntu`, `nginx:1.25`, `ghcr.io/org/app:v2`)
//! and are normalized once into a fully qualified registry, repository, and
//! tag. Parsing and validation happen here so every later stage can assume a
//! well-formed reference.

use crate::error::{PluckError, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(test)]
mod tests;

/// Registry host assumed when a reference names none.
pub const DEFAULT_REGISTRY: &str = "index.docker.io";

/// Tag assumed when a reference names none.
const DEFAULT_TAG: &str = "latest";

/// Maximum tag length accepted by registries.
const MAX_TAG_LEN: usize = 128;

/// A fully qualified image reference.
///
/// Construction goes through [`ImageReference::parse`], which applies the
/// conventional shorthand rules:
///
/// - no registry host means [`DEFAULT_REGISTRY`]
/// - no tag means `latest`
/// - single-segment repositories on the default registry gain a `library/`
///   prefix (`ubuntu` becomes `library/ubuntu`)
///
/// # Examples
///
/// ```
/// use libpluck::reference::ImageReference;
///
/// let reference = ImageReference::parse("ubuntu").unwrap();
/// assert_eq!(reference.registry(), "index.docker.io");
/// assert_eq!(reference.repository(), "library/ubuntu");
/// assert_eq!(reference.tag(), "latest");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: String,
    repository: String,
    tag: String,
}

impl ImageReference {
    /// Parses a reference string into its normalized form.
    ///
    /// Digest-pinned references (`repo@sha256:...`) are rejected; retrieval
    /// is tag-addressed.
    ///
    /// # Examples
    ///
    /// ```
    /// use libpluck::reference::ImageReference;
    ///
    /// let reference = ImageReference::parse("ghcr.io/org/app:v2").unwrap();
    /// assert_eq!(reference.registry(), "ghcr.io");
    /// assert_eq!(reference.repository(), "org/app");
    /// assert_eq!(reference.tag(), "v2");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PluckError::reference(raw, "reference is empty"));
        }
        if trimmed.contains('@') {
            return Err(PluckError::reference(
                raw,
                "digest-pinned references are not supported",
            ));
        }

        // A leading segment is a registry host only if it could not be a
        // repository name: hosts contain '.', end in ':port', or are
        // "localhost".
        let (registry, remainder) = match trimmed.split_once('/') {
            Some((first, rest)) if is_registry_host(first) => {
                (normalize_registry_host(first), rest)
            }
            _ => (DEFAULT_REGISTRY.to_string(), trimmed),
        };

        // The last ':' separates the tag unless it belongs to a port, in
        // which case a '/' follows it.
        let (repository, tag) = match remainder.rfind(':') {
            Some(idx) if remainder[idx + 1..].contains('/') => {
                return Err(PluckError::reference(raw, "invalid ':' in repository"));
            }
            Some(idx) => (&remainder[..idx], &remainder[idx + 1..]),
            None => (remainder, DEFAULT_TAG),
        };

        let repository = if registry == DEFAULT_REGISTRY && !repository.contains('/') {
            format!("library/{repository}")
        } else {
            repository.to_string()
        };

        validate_repository(raw, &repository)?;
        validate_tag(raw, tag)?;

        Ok(ImageReference {
            registry,
            repository,
            tag: tag.to_string(),
        })
    }

    /// Returns the registry host (optionally with port).
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Returns the normalized repository path.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true when the reference targets the default registry.
    pub fn is_default_registry(&self) -> bool {
        self.registry == DEFAULT_REGISTRY
    }
}

impl FromStr for ImageReference {
    type Err = PluckError;

    fn from_str(s: &str) -> Result<Self> {
        ImageReference::parse(s)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}

fn is_registry_host(segment: &str) -> bool {
    if segment == "localhost" {
        return true;
    }
    // A ':' marks a host only when a numeric port follows; "nginx:la" is a
    // repository with a bad tag, not a host.
    match segment.split_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
        }
        None => segment.contains('.'),
    }
}

fn normalize_registry_host(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    // "docker.io" is an alias for the hub endpoint.
    if host == "docker.io" {
        DEFAULT_REGISTRY.to_string()
    } else {
        host
    }
}

fn validate_repository(raw: &str, repository: &str) -> Result<()> {
    if repository.is_empty() {
        return Err(PluckError::reference(raw, "repository is empty"));
    }
    for segment in repository.split('/') {
        if segment.is_empty() {
            return Err(PluckError::reference(raw, "empty repository path segment"));
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c))
        {
            return Err(PluckError::reference(
                raw,
                "repository may only contain lowercase letters, digits, '.', '_', and '-'",
            ));
        }
    }
    Ok(())
}

fn validate_tag(raw: &str, tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(PluckError::reference(raw, "tag is empty"));
    }
    if tag.len() > MAX_TAG_LEN {
        return Err(PluckError::reference(raw, "tag exceeds 128 characters"));
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._-".contains(c))
    {
        return Err(PluckError::reference(
            raw,
            "tag may only contain alphanumerics, '.', '_', and '-'",
        ));
    }
    Ok(())
}
