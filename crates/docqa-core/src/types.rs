//! Domain types shared by the chunker, the index and the answer layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A bounded slice of a source document; the unit of embedding and retrieval.
///
/// - `doc_id`: file name of the source document (extension included)
/// - `chunk_id`: position of the chunk within its document, starting at 0
/// - `text`: trimmed chunk content
///
/// Identity is `(doc_id, chunk_id)`. Chunks are immutable once produced and
/// persisted one per line in the chunk and metadata stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: String,
    pub chunk_id: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(doc_id: impl Into<String>, chunk_id: usize, text: impl Into<String>) -> Self {
        Self { doc_id: doc_id.into(), chunk_id, text: text.into() }
    }
}

/// A chunk with the inner-product score it received for one query.
///
/// Scores lie in [-1, 1] for normalized vectors; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub doc_id: String,
    pub chunk_id: usize,
    pub text: String,
    pub score: f32,
}

impl ScoredChunk {
    pub fn from_chunk(chunk: &Chunk, score: f32) -> Self {
        Self { doc_id: chunk.doc_id.clone(), chunk_id: chunk.chunk_id, text: chunk.text.clone(), score }
    }
}

/// Scored chunks for one query, ordered by descending score.
pub type RetrievedContext = Vec<ScoredChunk>;

/// Output of an answer generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub answer: String,
    pub used_remote: bool,
    pub latency: Duration,
}

impl Generation {
    pub fn latency_ms(&self) -> f64 {
        self.latency.as_secs_f64() * 1000.0
    }
}
