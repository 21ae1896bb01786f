use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use docqa_core::records::read_records;
use docqa_core::{Chunk, Embedder, Error, Result, RetrievedContext, ScoredChunk, VectorIndex};

use crate::flat::FlatIndex;

/// Embeds a query, searches the index and maps positions back to chunks.
///
/// Owns the embedder, index and metadata for its lifetime; all three are
/// read-only after construction.
pub struct Retriever<I: VectorIndex = FlatIndex> {
    embedder: Box<dyn Embedder>,
    index: I,
    metadata: Vec<Chunk>,
}

impl<I: VectorIndex> Retriever<I> {
    /// Fails with `Load` when metadata and index sizes differ, and with
    /// `DimensionMismatch` when a non-empty index disagrees with the embedder.
    pub fn new(embedder: Box<dyn Embedder>, index: I, metadata: Vec<Chunk>) -> Result<Self> {
        if metadata.len() != index.len() {
            return Err(Error::Load(format!(
                "metadata has {} records but the index holds {} vectors",
                metadata.len(),
                index.len()
            )));
        }
        if !index.is_empty() && index.dimension() != embedder.dimension() {
            return Err(Error::DimensionMismatch {
                expected: index.dimension(),
                found: embedder.dimension(),
                position: 0,
            });
        }
        Ok(Self { embedder, index, metadata })
    }

    pub fn search(&self, query: &str, top_k: usize) -> Result<RetrievedContext> {
        if top_k == 0 {
            return Err(Error::InvalidConfiguration("top_k must be greater than 0".to_string()));
        }
        let start = Instant::now();
        let query_vec = self
            .embedder
            .embed(&[query.to_string()])?
            .pop()
            .ok_or_else(|| Error::EmbeddingBackend("model returned no vector for the query".to_string()))?;
        let hits = self.index.search(&query_vec, top_k)?;

        let context = hits
            .into_iter()
            .map(|(position, score)| {
                self.metadata
                    .get(position)
                    .map(|chunk| ScoredChunk::from_chunk(chunk, score))
                    .ok_or(Error::IndexCorruption { position, metadata_len: self.metadata.len() })
            })
            .collect::<Result<RetrievedContext>>()?;
        debug!(hits = context.len(), elapsed_ms = start.elapsed().as_millis() as u64, "retrieved");
        Ok(context)
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub fn metadata(&self) -> &[Chunk] {
        &self.metadata
    }
}

impl Retriever<FlatIndex> {
    pub fn open(embedder: Box<dyn Embedder>, index_path: &Path, metadata_path: &Path) -> Result<Self> {
        let index = FlatIndex::load(index_path)?;
        let metadata = read_records(metadata_path)?;
        info!(n = index.len(), dim = index.dimension(), "retriever ready");
        Self::new(embedder, index, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_embed::HashEmbedder;

    /// Reports a fixed hit list regardless of the query.
    struct ScriptedIndex {
        len: usize,
        hits: Vec<(usize, f32)>,
    }

    impl VectorIndex for ScriptedIndex {
        fn dimension(&self) -> usize {
            16
        }
        fn len(&self) -> usize {
            self.len
        }
        fn search(&self, _query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>> {
            Ok(self.hits.iter().copied().take(top_k).collect())
        }
    }

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n).map(|i| Chunk::new(format!("doc{i}.txt"), 0, format!("text {i}"))).collect()
    }

    #[test]
    fn out_of_range_position_is_corruption() {
        let index = ScriptedIndex { len: 2, hits: vec![(1, 0.9), (5, 0.8)] };
        let retriever = Retriever::new(Box::new(HashEmbedder::new(16)), index, chunks(2)).expect("retriever");
        let err = retriever.search("q", 2).expect_err("position 5");
        assert!(matches!(err, Error::IndexCorruption { position: 5, metadata_len: 2 }));
        assert_eq!(retriever.search("q", 1).expect("first hit only")[0].doc_id, "doc1.txt");
    }

    #[test]
    fn size_mismatch_is_a_load_error() {
        let index = ScriptedIndex { len: 3, hits: vec![] };
        let err = Retriever::new(Box::new(HashEmbedder::new(16)), index, chunks(2)).err().expect("mismatch");
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn embedder_width_must_match_index() {
        let index = FlatIndex::build(&[vec![1.0, 0.0]]).expect("index");
        let err = Retriever::new(Box::new(HashEmbedder::new(16)), index, chunks(1)).err().expect("width");
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 16, .. }));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let index = FlatIndex::with_rows(16, &[]).expect("index");
        let retriever = Retriever::new(Box::new(HashEmbedder::new(16)), index, Vec::new()).expect("retriever");
        assert!(retriever.search("q", 0).is_err());
        assert!(retriever.search("q", 3).expect("empty").is_empty());
    }
}
