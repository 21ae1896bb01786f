//! Staged build: ingest → embed → index → retriever. Each stage finishes and
//! writes its artifact before the next one starts.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use docqa_core::data_processor::{ChunkingConfig, DataProcessor};
use docqa_core::records::write_records;
use docqa_core::{Config, Embedder, Result};

use crate::index_build::build_index;
use crate::schema::CHUNKS_FILE;
use crate::search::Retriever;
use crate::writer::build_embeddings;

/// Chunk every document in `data_dir` and write `chunks.jsonl` to `out_dir`.
pub fn ingest_directory(data_dir: &Path, out_dir: &Path, chunking: ChunkingConfig) -> Result<PathBuf> {
    let processor = DataProcessor::new(chunking)?;
    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(CHUNKS_FILE);

    let chunks = processor.process_directory(data_dir)?;
    write_records(&out_path, &chunks)?;

    info!(chunks = chunks.len(), path = %out_path.display(), "ingest complete");
    Ok(out_path)
}

/// Paths of the artifacts written by [`build_artifacts`].
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub chunks: PathBuf,
    pub vectors: PathBuf,
    pub metadata: PathBuf,
    pub index: PathBuf,
}

pub fn build_artifacts(config: &Config, embedder: &dyn Embedder) -> Result<Artifacts> {
    config.validate()?;
    let index_dir = config.index_dir();
    let chunks = ingest_directory(&config.data_dir(), &index_dir, config.chunking())?;
    let (vectors, metadata) = build_embeddings(&chunks, &index_dir, embedder, config.embed_batch_size)?;
    let index = build_index(&vectors, &index_dir)?;
    Ok(Artifacts { chunks, vectors, metadata, index })
}

/// Rebuild every artifact from scratch and open a retriever over them.
/// Returns the retriever and the configured `top_k`.
pub fn build_pipeline(config: &Config) -> Result<(Retriever, usize)> {
    let embedder = docqa_embed::get_default_embedder(config)?;
    let artifacts = build_artifacts(config, embedder.as_ref())?;
    let retriever = Retriever::open(embedder, &artifacts.index, &artifacts.metadata)?;
    Ok((retriever, config.top_k))
}
