use std::fs;
use std::path::Path;

use tracing::debug;

use docqa_core::{Error, Result, VectorIndex};

use crate::schema::{decode_f32s, encode_f32s, read_u64, DIGEST_LEN, INDEX_HEADER_LEN, INDEX_MAGIC};

/// Brute-force exact inner-product index.
///
/// Vectors are stored row-major in insertion order; position `i` is the
/// only link between a vector and its metadata record.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// All vectors must share the width of the first one.
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let dim = vectors.first().map_or(0, Vec::len);
        Self::with_rows(dim, vectors)
    }

    /// Like [`build`](Self::build) but with the width fixed up front, so an
    /// empty index still knows its dimension.
    pub fn with_rows(dim: usize, vectors: &[Vec<f32>]) -> Result<Self> {
        if dim == 0 && !vectors.is_empty() {
            return Err(Error::InvalidConfiguration("vectors must have at least one dimension".to_string()));
        }
        let mut data = Vec::with_capacity(dim * vectors.len());
        for (position, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, found: v.len(), position });
            }
            data.extend_from_slice(v);
        }
        Ok(Self { dim, data })
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        if position >= self.len() {
            return None;
        }
        Some(&self.data[position * self.dim..(position + 1) * self.dim])
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::with_capacity(INDEX_HEADER_LEN + self.data.len() * 4 + DIGEST_LEN);
        buf.extend_from_slice(INDEX_MAGIC);
        buf.extend_from_slice(&(self.dim as u64).to_le_bytes());
        buf.extend_from_slice(&(self.len() as u64).to_le_bytes());
        encode_f32s(&mut buf, &self.data);
        let digest = blake3::hash(&buf);
        buf.extend_from_slice(digest.as_bytes());
        fs::write(path, buf)?;
        debug!(path = %path.display(), n = self.len(), dim = self.dim, "saved flat index");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::Load(format!("cannot read {}: {e}", path.display())))?;
        if bytes.len() < INDEX_HEADER_LEN + DIGEST_LEN {
            return Err(Error::Load(format!("{} is too short to be an index", path.display())));
        }
        if &bytes[..INDEX_MAGIC.len()] != INDEX_MAGIC {
            return Err(Error::Load(format!("{} is not a docqa flat index", path.display())));
        }
        let (body, digest) = bytes.split_at(bytes.len() - DIGEST_LEN);
        if blake3::hash(body).as_bytes() != digest {
            return Err(Error::Load(format!("{} failed its checksum", path.display())));
        }

        let dim = read_u64(body, INDEX_MAGIC.len()) as usize;
        let count = read_u64(body, INDEX_MAGIC.len() + 8) as usize;
        let payload = &body[INDEX_HEADER_LEN..];
        let expected = dim
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| Error::Load(format!("{}: header overflows", path.display())))?;
        if payload.len() != expected {
            return Err(Error::Load(format!(
                "{}: expected {expected} payload bytes for {count}x{dim}, found {}",
                path.display(),
                payload.len()
            )));
        }
        Ok(Self { dim, data: decode_f32s(payload) })
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>> {
        if top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than 0".to_string()));
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, found: query.len(), position: 0 });
        }
        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| row.iter().zip(query).map(|(a, b)| a * b).sum::<f32>())
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);
        Ok(scored)
    }
}
