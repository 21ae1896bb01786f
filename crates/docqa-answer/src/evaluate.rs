//! Retrieval and grounding summaries. Pure functions, no I/O.

use docqa_core::RetrievedContext;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalStats {
    pub top_score: f32,
    pub avg_score: f32,
    /// Distinct doc ids in first-appearance (rank) order.
    pub doc_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingReport {
    pub docs_mentioned: Vec<String>,
    pub mentioned_count: usize,
    pub retrieved_doc_count: usize,
}

fn distinct_doc_ids(context: &RetrievedContext) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for chunk in context {
        if !ids.contains(&chunk.doc_id) {
            ids.push(chunk.doc_id.clone());
        }
    }
    ids
}

pub fn retrieval_stats(context: &RetrievedContext) -> RetrievalStats {
    if context.is_empty() {
        return RetrievalStats { top_score: 0.0, avg_score: 0.0, doc_ids: Vec::new() };
    }
    let top_score = context.iter().map(|c| c.score).fold(f32::NEG_INFINITY, f32::max);
    let avg_score = context.iter().map(|c| c.score).sum::<f32>() / context.len() as f32;
    RetrievalStats { top_score, avg_score, doc_ids: distinct_doc_ids(context) }
}

/// Which retrieved doc ids appear verbatim in the answer text.
pub fn grounding_check(answer: &str, context: &RetrievedContext) -> GroundingReport {
    let doc_ids = distinct_doc_ids(context);
    let docs_mentioned: Vec<String> = doc_ids.iter().filter(|id| answer.contains(id.as_str())).cloned().collect();
    GroundingReport {
        mentioned_count: docs_mentioned.len(),
        docs_mentioned,
        retrieved_doc_count: doc_ids.len(),
    }
}
