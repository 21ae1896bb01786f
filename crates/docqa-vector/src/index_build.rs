use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use docqa_core::{Result, VectorIndex};

use crate::flat::FlatIndex;
use crate::schema::INDEX_FILE;
use crate::writer::read_vectors;

/// Build a [`FlatIndex`] from `vectors.bin` and save it as `index.bin` in
/// `out_dir`. Returns the index path.
pub fn build_index(vectors_path: &Path, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let index_path = out_dir.join(INDEX_FILE);

    let stored = read_vectors(vectors_path)?;
    let index = FlatIndex::with_rows(stored.dimension, &stored.vectors)?;
    index.save(&index_path)?;

    info!(path = %index_path.display(), n = index.len(), dim = index.dimension(), "flat index saved");
    Ok(index_path)
}
