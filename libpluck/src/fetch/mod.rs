//! Concurrent layer retrieval.
//!
//! Downloads the selected layers of a manifest through a fixed pool of
//! workers, writing each blob to its own file. Results always come back in
//! manifest order no matter which download finishes first, and the first
//! failure cancels everything in flight and removes partial output.

use crate::client::RegistryClient;
use crate::digest::Digest;
use crate::error::{PluckError, Result};
use crate::manifest::{LayerDescriptor, Manifest};
use crate::reference::ImageReference;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::task::JoinSet;


/// Default number of concurrent layer downloads.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Options controlling layer selection and download concurrency.
///
/// # Examples
///
/// ```
/// use libpluck::fetch::FetchOptions;
///
/// let options = FetchOptions::new()
///     .with_include_base(true)
///     .with_concurrency(8);
/// assert!(options.include_base);
/// assert_eq!(options.concurrency, 8);
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Whether the first (base) layer is downloaded too (default: false)
    pub include_base: bool,
    /// Number of download workers (default: 4)
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            include_base: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl FetchOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the base layer is included.
    pub fn with_include_base(mut self, include_base: bool) -> Self {
        self.include_base = include_base;
        self
    }

    /// Sets the number of download workers.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// A fully downloaded and verified layer blob on disk.
#[derive(Debug, Clone)]
pub struct LayerBlob {
    /// Position of this layer in the manifest
    pub index: usize,
    /// Content digest, already verified against the downloaded bytes
    pub digest: Digest,
    /// Layer media type as declared by the manifest
    pub media_type: String,
    /// Verified size in bytes
    pub size: u64,
    /// File the blob was written to
    pub path: PathBuf,
}

/// Downloads the selected layers of `manifest` into `dir`.
///
/// Layer selection honors `options.include_base`: by default the first
/// manifest layer is skipped and only the layers above it are fetched. Each
/// selected layer lands in `dir` as `layer-<index>.tar.gz`, where the index
/// is the layer's position in the manifest.
///
/// Downloads run on `options.concurrency` workers pulling from a shared
/// queue. The returned blobs are ordered by manifest index regardless of
/// completion order. On the first failure all in-flight downloads are
/// cancelled, every file this call created is removed, and the triggering
/// error is returned. No retries are attempted; the caller decides whether
/// a retryable error warrants another call.
///
/// An empty selection (for example a single-layer image without
/// `include_base`) returns an empty vector.
pub async fn fetch_layers(
    client: Arc<dyn RegistryClient>,
    reference: &ImageReference,
    manifest: &Manifest,
    dir: &Path,
    options: &FetchOptions,
) -> Result<Vec<LayerBlob>> {
    let skip = if options.include_base { 0 } else { 1 };
    let selected: Vec<(usize, LayerDescriptor)> = manifest
        .layers
        .iter()
        .cloned()
        .enumerate()
        .skip(skip)
        .collect();

    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let queue = Arc::new(selected);
    let cursor = Arc::new(AtomicUsize::new(0));
    let workers = options.concurrency.max(1).min(queue.len());

    let mut join_set = JoinSet::new();
    for _ in 0..workers {
        let client = Arc::clone(&client);
        let queue = Arc::clone(&queue);
        let cursor = Arc::clone(&cursor);
        let reference = reference.clone();
        let dir = dir.to_path_buf();

        join_set.spawn(async move {
            let mut completed = Vec::new();
            loop {
                let slot = cursor.fetch_add(1, Ordering::SeqCst);
                let Some((index, layer)) = queue.get(slot) else {
                    break;
                };

                let path = dir.join(format!("layer-{}.tar.gz", index));
                let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
                    PluckError::io(format!("failed to create layer file {}", path.display()), e)
                })?;
                client.pull_layer(&reference, layer, &mut file).await?;

                completed.push((
                    slot,
                    LayerBlob {
                        index: *index,
                        digest: layer.digest.clone(),
                        media_type: layer.media_type.clone(),
                        size: layer.size,
                        path,
                    },
                ));
            }
            Ok::<_, PluckError>(completed)
        });
    }

    let mut indexed: Vec<(usize, LayerBlob)> = Vec::with_capacity(queue.len());
    let mut first_error: Option<PluckError> = None;

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Ok(batch)) => indexed.extend(batch),
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                    join_set.abort_all();
                }
            }
            Err(join_error) => {
                if join_error.is_cancelled() {
                    continue;
                }
                std::panic::resume_unwind(join_error.into_panic());
            }
        }
    }

    if let Some(err) = first_error {
        // Partial output is useless to the caller; remove whatever landed.
        for (index, _) in queue.iter() {
            let _ = tokio::fs::remove_file(dir.join(format!("layer-{}.tar.gz", index))).await;
        }
        return Err(err);
    }

    indexed.sort_by_key(|(slot, _)| *slot);
    Ok(indexed.into_iter().map(|(_, blob)| blob).collect())
}
