use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docqa_core::records::{read_records, write_records};
use docqa_core::{Embedder, Error, Result};

use crate::schema::{decode_f32s, encode_f32s, read_u64, METADATA_FILE, VECTORS_FILE, VECTORS_HEADER_LEN};

/// Contents of `vectors.bin`: `vectors.len()` rows of `dimension` floats.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredVectors {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

pub fn write_vectors(path: &Path, dimension: usize, vectors: &[Vec<f32>]) -> Result<()> {
    let mut buf = Vec::with_capacity(VECTORS_HEADER_LEN + vectors.len() * dimension * 4);
    buf.extend_from_slice(&(vectors.len() as u64).to_le_bytes());
    buf.extend_from_slice(&(dimension as u64).to_le_bytes());
    for (position, v) in vectors.iter().enumerate() {
        if v.len() != dimension {
            return Err(Error::DimensionMismatch { expected: dimension, found: v.len(), position });
        }
        encode_f32s(&mut buf, v);
    }
    fs::write(path, buf)?;
    Ok(())
}

pub fn read_vectors(path: &Path) -> Result<StoredVectors> {
    let bytes = fs::read(path).map_err(|e| Error::Load(format!("cannot read {}: {e}", path.display())))?;
    if bytes.len() < VECTORS_HEADER_LEN {
        return Err(Error::Load(format!("{} is too short for a vector store", path.display())));
    }
    let n = read_u64(&bytes, 0) as usize;
    let dimension = read_u64(&bytes, 8) as usize;
    if dimension == 0 && n > 0 {
        return Err(Error::Load(format!("{}: {n} vectors declared with zero dimensions", path.display())));
    }
    let payload = &bytes[VECTORS_HEADER_LEN..];
    let expected = n.checked_mul(dimension).and_then(|x| x.checked_mul(4));
    if expected != Some(payload.len()) {
        return Err(Error::Load(format!(
            "{}: header says {n}x{dimension} but payload is {} bytes",
            path.display(),
            payload.len()
        )));
    }
    let vectors = if dimension == 0 {
        Vec::new()
    } else {
        payload.chunks_exact(dimension * 4).map(decode_f32s).collect()
    };
    Ok(StoredVectors { dimension, vectors })
}

/// Embed every record of the chunk store and write `vectors.bin` plus the
/// positionally aligned `metadata.jsonl`. Returns `(vectors_path, metadata_path)`.
pub fn build_embeddings(
    chunks_path: &Path,
    out_dir: &Path,
    embedder: &dyn Embedder,
    batch_size: usize,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(out_dir)?;
    let vectors_path = out_dir.join(VECTORS_FILE);
    let metadata_path = out_dir.join(METADATA_FILE);

    let chunks = read_records(chunks_path)?;
    let dimension = embedder.dimension();
    info!(chunks = chunks.len(), dim = dimension, "embedding chunks");

    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embedded = embedder.embed(&texts)?;
        if embedded.len() != texts.len() {
            return Err(Error::EmbeddingBackend(format!(
                "embedder returned {} vectors for {} texts",
                embedded.len(),
                texts.len()
            )));
        }
        vectors.extend(embedded);
        pb.set_position(vectors.len() as u64);
    }
    pb.finish_and_clear();

    write_vectors(&vectors_path, dimension, &vectors)?;
    write_records(&metadata_path, &chunks)?;

    info!(path = %vectors_path.display(), "saved vectors");
    info!(path = %metadata_path.display(), "saved metadata");
    Ok((vectors_path, metadata_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn vector_store_round_trips() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(VECTORS_FILE);
        let vectors = vec![vec![0.5, -0.25, 1.0], vec![f32::MIN_POSITIVE, 0.0, -0.0]];
        write_vectors(&path, 3, &vectors).expect("write");
        assert_eq!(fs::metadata(&path).expect("meta").len(), 16 + 2 * 3 * 4);
        let stored = read_vectors(&path).expect("read");
        assert_eq!(stored, StoredVectors { dimension: 3, vectors });
    }

    #[test]
    fn truncated_vector_store_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(VECTORS_FILE);
        write_vectors(&path, 2, &[vec![1.0, 2.0]]).expect("write");
        let bytes = fs::read(&path).expect("read");
        fs::write(&path, &bytes[..bytes.len() - 1]).expect("truncate");
        assert!(matches!(read_vectors(&path), Err(Error::Load(_))));
    }

    #[test]
    fn zero_width_header_with_rows_is_rejected() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(VECTORS_FILE);
        let mut header = u64::MAX.to_le_bytes().to_vec();
        header.extend_from_slice(&0u64.to_le_bytes());
        fs::write(&path, &header).expect("write");
        assert!(matches!(read_vectors(&path), Err(Error::Load(_))));

        write_vectors(&path, 0, &[]).expect("empty store");
        assert_eq!(read_vectors(&path).expect("read"), StoredVectors { dimension: 0, vectors: Vec::new() });
    }

    #[test]
    fn width_is_checked_on_write() {
        let tmp = TempDir::new().expect("tmp");
        let err = write_vectors(&tmp.path().join(VECTORS_FILE), 2, &[vec![1.0]]).expect_err("width");
        assert!(matches!(err, Error::DimensionMismatch { position: 0, .. }));
    }
}
