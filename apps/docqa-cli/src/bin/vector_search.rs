//! Rank chunks for one query against an already built index. No generation.

use anyhow::Context;
use clap::Parser;
use docqa_cli::{init_logging, ConfigOverrides};
use docqa_vector::schema::{INDEX_FILE, METADATA_FILE};
use docqa_vector::Retriever;

const PREVIEW_CHARS: usize = 120;

#[derive(Parser)]
#[command(name = "docqa-search")]
#[command(about = "Search the built index for a query")]
#[command(version)]
struct Cli {
    /// Query text
    query: String,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    let config = cli.overrides.load()?;

    let index_dir = config.index_dir();
    let embedder = docqa_embed::get_default_embedder(&config)?;
    let retriever = Retriever::open(embedder, &index_dir.join(INDEX_FILE), &index_dir.join(METADATA_FILE))
        .with_context(|| format!("no usable index in {}; run docqa-indexer first", index_dir.display()))?;

    let hits = retriever.search(&cli.query, config.top_k)?;
    println!("Found {} results for: \"{}\"", hits.len(), cli.query);
    for (rank, hit) in hits.iter().enumerate() {
        let flat = hit.text.split_whitespace().collect::<Vec<_>>().join(" ");
        let mut preview: String = flat.chars().take(PREVIEW_CHARS).collect();
        if flat.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        println!("\n  {}. score={:.4}  doc={}  chunk={}", rank + 1, hit.score, hit.doc_id, hit.chunk_id);
        println!("     {preview}");
    }
    Ok(())
}
