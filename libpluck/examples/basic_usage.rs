//! Basic usage example for the pluck library.
//!
//! This example fetches a public image's manifest and downloads its
//! non-base layers into a temporary directory.
//!
//! Run with: cargo run --example basic_usage

use libpluck::{
    ClientConfig, Credentials, FetchOptions, ImageReference, RegistryClient, client_for,
    fetch_layers,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pluck Library - Basic Usage Example\n");

    let reference = ImageReference::parse("nginx:latest")?;
    println!("✓ Parsed reference: {}\n", reference);

    let client = client_for(&reference, Credentials::anonymous(), ClientConfig::default())?;

    println!("Fetching manifest...");
    let manifest = match client.get_manifest(&reference).await {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("✗ Failed to fetch manifest: {}", e);
            eprintln!("  Make sure you have network access to Docker Hub");
            return Ok(());
        }
    };
    println!("✓ Manifest has {} layers:\n", manifest.layers.len());
    for layer in &manifest.layers {
        println!("  - {} ({} bytes)", layer.digest, layer.size);
    }
    println!();

    let dir = std::env::temp_dir().join("pluck-example");
    std::fs::create_dir_all(&dir)?;

    println!("Downloading layers above the base...");
    match fetch_layers(
        client,
        &reference,
        &manifest,
        &dir,
        &FetchOptions::default(),
    )
    .await
    {
        Ok(blobs) => {
            println!("✓ Downloaded {} layers:\n", blobs.len());
            for blob in &blobs {
                println!("  - {} -> {}", blob.digest, blob.path.display());
            }
        }
        Err(e) => println!("✗ Download failed: {}", e),
    }

    println!("\nExample completed!");
    Ok(())
}
