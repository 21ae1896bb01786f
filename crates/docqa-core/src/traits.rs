use crate::error::Result;
use crate::types::{Generation, RetrievedContext};

/// Maps texts to fixed-width, L2-normalized vectors.
///
/// Batch and single-query calls go through the same method so that both
/// sides of a similarity comparison see the same model and normalization.
pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
}

/// Nearest-neighbor search over vectors addressed by insertion position.
///
/// Results are `(position, score)` pairs ordered by descending score, ties
/// broken by ascending position, at most `min(top_k, len())` long.
pub trait VectorIndex: Send + Sync {
    fn dimension(&self) -> usize;
    fn len(&self) -> usize;
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns a question plus its retrieved context into an answer.
pub trait AnswerGenerator: Send + Sync {
    fn generate(&self, question: &str, context: &RetrievedContext) -> Result<Generation>;
}
