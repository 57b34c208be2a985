use clap::Parser;

mod commands;
mod context;
mod extract;
mod format;

/// Pluck - single-file extraction from container images
///
/// Downloads just the layers of a published image and copies one file out of
/// the assembled filesystem, without a container runtime and without keeping
/// the image around.
#[derive(Parser, Debug)]
#[command(name = "pluck")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of the file to extract from the image filesystem
    file: String,

    /// Image reference (e.g. nginx:1.25, ghcr.io/org/app:v2)
    #[arg(short, long)]
    image: String,

    /// Also download and unpack the base (first) layer
    #[arg(long)]
    base_layer: bool,

    /// Number of layers to download in parallel
    #[arg(long, default_value_t = libpluck::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, default_value = "auto")]
    color: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Build context with precedence: defaults > env vars > CLI flags
    let ctx = context::AppContext::build(
        format::ColorChoice::from(cli.color.as_str()),
        context::VerbosityLevel::from_count(cli.verbose),
    );

    commands::handle_extract(&ctx, &cli.image, &cli.file, cli.base_layer, cli.concurrency).await;
}
