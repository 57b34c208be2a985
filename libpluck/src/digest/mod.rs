//! Content digest validation and streaming hashers.
//!
//! Registry blobs are addressed by `algorithm:hex` digests. This module
//! validates digest strings on parse and provides the matching streaming
//! hasher so downloads can be verified without buffering whole blobs.

use crate::error::{PluckError, Result};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use sha2::{Digest as Sha2Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;


/// A validated content digest in `algorithm:hex` form.
///
/// Parsing rejects malformed input once, so a constructed `Digest` can be
/// trusted everywhere downstream. The original string is preserved and used
/// verbatim in blob URLs.
///
/// # Examples
///
/// ```
/// use libpluck::digest::Digest;
/// use std::str::FromStr;
///
/// let digest = Digest::from_str(
///     "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// ).unwrap();
/// assert_eq!(digest.algorithm(), "sha256");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    raw: String,
    colon: usize,
}

impl Digest {
    /// Returns the algorithm component, e.g. `sha256`.
    pub fn algorithm(&self) -> &str {
        &self.raw[..self.colon]
    }

    /// Returns the hex component without the algorithm prefix.
    pub fn hex(&self) -> &str {
        &self.raw[self.colon + 1..]
    }

    /// Returns the full `algorithm:hex` string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Creates a streaming hasher matching this digest's algorithm.
    ///
    /// Returns an integrity error for algorithms that parse but cannot be
    /// verified locally.
    pub fn hasher(&self) -> Result<Hasher> {
        match self.algorithm() {
            "sha256" => Ok(Hasher::Sha256(Sha256::new())),
            "sha512" => Ok(Hasher::Sha512(Sha512::new())),
            other => Err(PluckError::integrity(
                self.as_str(),
                format!("unsupported digest algorithm '{other}'").as_str(),
            )),
        }
    }
}

impl FromStr for Digest {
    type Err = PluckError;

    fn from_str(s: &str) -> Result<Self> {
        let Some((algorithm, hex)) = s.split_once(':') else {
            return Err(PluckError::digest(s, "missing ':' separator"));
        };

        if algorithm.is_empty() {
            return Err(PluckError::digest(s, "empty algorithm"));
        }
        if !algorithm
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "_+.-".contains(c))
        {
            return Err(PluckError::digest(s, "invalid character in algorithm"));
        }

        if hex.is_empty() {
            return Err(PluckError::digest(s, "empty hex component"));
        }
        if !hex
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(PluckError::digest(
                s,
                "hex component must be lowercase hexadecimal",
            ));
        }

        // Length is fixed for the algorithms we can verify.
        let expected_len = match algorithm {
            "sha256" => Some(64),
            "sha512" => Some(128),
            _ => None,
        };
        if let Some(expected) = expected_len
            && hex.len() != expected
        {
            return Err(PluckError::Digest {
                value: s.to_string(),
                message: format!("{algorithm} requires {expected} hex characters, got {}", hex.len()),
            });
        }

        Ok(Digest {
            raw: s.to_string(),
            colon: algorithm.len(),
        })
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Digest::from_str(&raw).map_err(de::Error::custom)
    }
}

/// Incremental hasher for digest verification during streaming downloads.
#[derive(Debug)]
pub enum Hasher {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    /// Feeds a chunk of blob bytes into the hash state.
    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            Hasher::Sha256(h) => h.update(bytes),
            Hasher::Sha512(h) => h.update(bytes),
        }
    }

    /// Consumes the hasher and returns the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        match self {
            Hasher::Sha256(h) => format!("{:x}", h.finalize()),
            Hasher::Sha512(h) => format!("{:x}", h.finalize()),
        }
    }
}
