//! Print what the index directory currently holds.

use anyhow::Context;
use docqa_core::records::read_records;
use docqa_core::{Config, VectorIndex};
use docqa_vector::schema::{CHUNKS_FILE, INDEX_FILE, METADATA_FILE, VECTORS_FILE};
use docqa_vector::{read_vectors, FlatIndex};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let dir = config.index_dir();
    println!("index dir: {}", dir.display());

    match read_records(&dir.join(CHUNKS_FILE)) {
        Ok(chunks) => println!("{CHUNKS_FILE}: {} chunks", chunks.len()),
        Err(e) => println!("{CHUNKS_FILE}: {e}"),
    }
    match read_vectors(&dir.join(VECTORS_FILE)) {
        Ok(stored) => println!("{VECTORS_FILE}: {} x {}", stored.vectors.len(), stored.dimension),
        Err(e) => println!("{VECTORS_FILE}: {e}"),
    }
    let metadata = read_records(&dir.join(METADATA_FILE)).context("reading metadata")?;
    let index = FlatIndex::load(&dir.join(INDEX_FILE)).context("loading index")?;
    println!("{INDEX_FILE}: {} vectors, dim {}", index.len(), index.dimension());
    if metadata.len() != index.len() {
        println!("warning: metadata has {} records, index has {}", metadata.len(), index.len());
    }
    Ok(())
}
