//! Run the staged build only: chunks, vectors, metadata and index.

use clap::Parser;
use docqa_cli::{init_logging, ConfigOverrides};
use docqa_vector::build_artifacts;

#[derive(Parser)]
#[command(name = "docqa-indexer")]
#[command(about = "Chunk, embed and index the data directory")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    let config = cli.overrides.load()?;

    println!("Data directory: {}", config.data_dir().display());
    println!("Index directory: {}", config.index_dir().display());

    let embedder = docqa_embed::get_default_embedder(&config)?;
    let artifacts = build_artifacts(&config, embedder.as_ref())?;

    println!("\nIndexing completed.");
    println!("  chunks:   {}", artifacts.chunks.display());
    println!("  vectors:  {}", artifacts.vectors.display());
    println!("  metadata: {}", artifacts.metadata.display());
    println!("  index:    {}", artifacts.index.display());
    println!("\nTo search without generation: docqa-search '<query>'");
    Ok(())
}
