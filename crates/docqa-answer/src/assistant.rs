use tracing::info;

use docqa_core::{AnswerGenerator, Generation, Result, RetrievedContext, VectorIndex};
use docqa_vector::{FlatIndex, Retriever};

use crate::evaluate::{grounding_check, retrieval_stats, GroundingReport, RetrievalStats};

/// Everything produced for one question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub context: RetrievedContext,
    pub generation: Generation,
    pub stats: RetrievalStats,
    pub grounding: GroundingReport,
}

/// Retrieval, generation and evaluation for single questions.
pub struct Assistant<I: VectorIndex = FlatIndex> {
    retriever: Retriever<I>,
    generator: Box<dyn AnswerGenerator>,
    top_k: usize,
}

impl<I: VectorIndex> Assistant<I> {
    pub fn new(retriever: Retriever<I>, generator: Box<dyn AnswerGenerator>, top_k: usize) -> Self {
        Self { retriever, generator, top_k }
    }

    pub fn retriever(&self) -> &Retriever<I> {
        &self.retriever
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Errors here concern this question only; the assistant stays usable.
    pub fn ask(&self, question: &str) -> Result<Answer> {
        let context = self.retriever.search(question, self.top_k)?;
        let generation = self.generator.generate(question, &context)?;
        let stats = retrieval_stats(&context);
        let grounding = grounding_check(&generation.answer, &context);
        info!(
            hits = context.len(),
            used_remote = generation.used_remote,
            latency_ms = generation.latency_ms(),
            "answered"
        );
        Ok(Answer { context, generation, stats, grounding })
    }
}
