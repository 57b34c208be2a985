//! Turns downloaded layer blobs into files on disk.
//!
//! Layers are tar archives, usually gzip-compressed, that build on each
//! other in manifest order. Unpacking them into one directory in that order
//! yields the image's root filesystem, with later layers overwriting earlier
//! ones. Whiteout markers are not interpreted, so a file deleted by an upper
//! layer can still appear in the result.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use libpluck::{PluckError, Result};
use tar::Archive;

/// Unpack one layer archive into `root`.
///
/// Gzip compression is detected from the media type suffix; any other media
/// type is treated as a plain tar stream.
pub fn unpack_layer(path: &Path, media_type: &str, root: &Path) -> Result<()> {
    let file = File::open(path)
        .map_err(|e| PluckError::io(format!("failed to open layer file {}", path.display()), e))?;
    let reader = BufReader::new(file);

    if media_type.ends_with("gzip") {
        unpack_tar(GzDecoder::new(reader), path, root)
    } else {
        unpack_tar(reader, path, root)
    }
}

fn unpack_tar<R: Read>(reader: R, source: &Path, root: &Path) -> Result<()> {
    let mut archive = Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(root).map_err(|e| {
        PluckError::io(
            format!(
                "failed to unpack layer {} into {}",
                source.display(),
                root.display()
            ),
            e,
        )
    })
}

/// Copy the requested file out of the assembled root filesystem.
///
/// `requested` is resolved relative to the image root regardless of a
/// leading slash. The file's basename lands in `dest_dir` and the full
/// destination path is returned. A path that does not resolve to a file in
/// the assembled root is a not-found error naming the requested path.
pub fn copy_file_out(root: &Path, requested: &str, dest_dir: &Path) -> Result<PathBuf> {
    let relative = requested.trim_start_matches('/');
    if relative.is_empty() {
        return Err(PluckError::not_found("file", requested));
    }

    let source = root.join(relative);
    if !source.is_file() {
        return Err(PluckError::not_found("file", requested));
    }

    let name = source
        .file_name()
        .ok_or_else(|| PluckError::not_found("file", requested))?;
    let dest = dest_dir.join(name);
    std::fs::copy(&source, &dest).map_err(|e| {
        PluckError::io(
            format!(
                "failed to copy {} to {}",
                source.display(),
                dest.display()
            ),
            e,
        )
    })?;

    Ok(dest)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod extract_tests;
