use libpluck::{
    ClientConfig, CredentialSource, Credentials, DockerConfigFile, FetchOptions, ImageReference,
    RegistryClient, client_for, fetch_layers,
};
use tempfile::TempDir;

use crate::context::{AppContext, VerbosityLevel};
use crate::extract;
use crate::format;

/// Handle the extract command
///
/// Fetches the manifest for `image`, downloads its layers into a scratch
/// directory, assembles the root filesystem, and copies `file` out of it
/// into the current directory. Every failure prints a formatted error and
/// exits non-zero.
pub async fn handle_extract(
    ctx: &AppContext,
    image: &str,
    file: &str,
    base_layer: bool,
    concurrency: usize,
) {
    // Parse and normalize the image reference
    let reference = match ImageReference::parse(image) {
        Ok(reference) => reference,
        Err(e) => {
            format::error(ctx, &e.to_string());
            std::process::exit(1);
        }
    };
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Resolved reference: {}", reference),
    );

    // Load credentials if available
    let credentials = credentials_for(ctx, &reference);

    // Build the client for this registry
    let client = match client_for(&reference, credentials, ClientConfig::default()) {
        Ok(client) => client,
        Err(e) => {
            format::error(ctx, &e.to_string());
            std::process::exit(1);
        }
    };

    let formatter = format::create_formatter(ctx);

    // Fetch the manifest
    let spinner = formatter.spinner(&format!("Fetching manifest for {}", reference));
    let manifest = match client.get_manifest(&reference).await {
        Ok(manifest) => manifest,
        Err(e) => {
            spinner.finish_and_clear();
            format::error(ctx, &format!("Failed to fetch manifest: {}", e));
            std::process::exit(1);
        }
    };
    formatter.finish_progress(
        spinner,
        &format!("Manifest lists {} layers", manifest.layers.len()),
    );

    // Layer blobs land in a scratch directory that cleans itself up on exit
    let workdir = match TempDir::new() {
        Ok(dir) => dir,
        Err(e) => {
            format::error(ctx, &format!("Failed to create working directory: {}", e));
            std::process::exit(1);
        }
    };
    format::print(
        ctx,
        VerbosityLevel::VeryVerbose,
        &format!("Working directory: {}", workdir.path().display()),
    );
    format::print(
        ctx,
        VerbosityLevel::VeryVerbose,
        &format!("Using {} concurrent downloads", concurrency),
    );

    // Download the selected layers
    let options = FetchOptions::new()
        .with_include_base(base_layer)
        .with_concurrency(concurrency);
    let spinner = formatter.spinner("Downloading layers");
    let blobs = match fetch_layers(client, &reference, &manifest, workdir.path(), &options).await {
        Ok(blobs) => blobs,
        Err(e) => {
            spinner.finish_and_clear();
            format::error(ctx, &format!("Failed to download layers: {}", e));
            std::process::exit(1);
        }
    };
    if blobs.is_empty() {
        spinner.finish_and_clear();
        format::warning(
            ctx,
            "No layers selected; for a single-layer image re-run with --base-layer",
        );
        std::process::exit(1);
    }
    formatter.finish_progress(spinner, &format!("Downloaded {} layers", blobs.len()));
    for blob in &blobs {
        format::print(
            ctx,
            VerbosityLevel::Trace,
            &format!("layer {}: {} ({} bytes)", blob.index, blob.digest, blob.size),
        );
    }

    // Unpack in manifest order; tar work runs off the async runtime
    let layer_count = blobs.len();
    let root = workdir.path().join("rootfs");
    let pb = formatter.progress_bar(layer_count as u64, "Unpacking layers");
    let unpack_root = root.clone();
    let unpack_pb = pb.clone();
    let unpack = tokio::task::spawn_blocking(move || {
        for blob in &blobs {
            extract::unpack_layer(&blob.path, &blob.media_type, &unpack_root)?;
            unpack_pb.inc(1);
        }
        Ok::<_, libpluck::PluckError>(())
    });
    match unpack.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            pb.finish_and_clear();
            format::error(ctx, &format!("Failed to unpack layers: {}", e));
            std::process::exit(1);
        }
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
    formatter.finish_progress(
        pb,
        &format!("Assembled filesystem from {} layers", layer_count),
    );

    // Copy the requested file into the current directory
    let dest_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            format::error(ctx, &format!("Failed to resolve current directory: {}", e));
            std::process::exit(1);
        }
    };
    let dest = match extract::copy_file_out(&root, file, &dest_dir) {
        Ok(path) => path,
        Err(e) => {
            format::error(ctx, &e.to_string());
            std::process::exit(1);
        }
    };

    format::success(
        ctx,
        &format!("Extracted {} from {} to {}", file, reference, dest.display()),
    );
}

/// Resolve credentials for the reference's registry.
///
/// Public hub images under `library/` are pulled anonymously without
/// consulting the credential store. Everything else goes through the Docker
/// config file; a missing or unreadable entry degrades to anonymous access
/// with a warning instead of failing the run.
fn credentials_for(ctx: &AppContext, reference: &ImageReference) -> Credentials {
    if reference.is_default_registry() && reference.repository().starts_with("library/") {
        format::print(
            ctx,
            VerbosityLevel::VeryVerbose,
            "Public library image; skipping credential lookup",
        );
        return Credentials::Anonymous;
    }

    let Some(store) = DockerConfigFile::from_default_location() else {
        format::warning(ctx, "No home directory found; trying anonymous access");
        return Credentials::Anonymous;
    };

    match store.lookup(reference.registry()) {
        Ok(Some(credentials)) => {
            format::print(
                ctx,
                VerbosityLevel::VeryVerbose,
                &format!("Using stored credentials for {}", reference.registry()),
            );
            credentials
        }
        Ok(None) => {
            format::warning(
                ctx,
                &format!(
                    "No credentials found for {}; trying anonymous access",
                    reference.registry()
                ),
            );
            Credentials::Anonymous
        }
        Err(e) => {
            format::warning(
                ctx,
                &format!("Could not read credential store ({}); trying anonymous access", e),
            );
            Credentials::Anonymous
        }
    }
}
