//! docqa-answer
//!
//! Turns retrieved context into an answer, either through a remote
//! chat-completions model or the offline extractive fallback, and scores the
//! result.

pub mod assistant;
pub mod evaluate;
pub mod generate;

pub use assistant::{Answer, Assistant};
pub use evaluate::{grounding_check, retrieval_stats, GroundingReport, RetrievalStats};
pub use generate::{format_context, select_generator, ExtractiveGenerator, RemoteGenerator, NO_ANSWER, SYSTEM_PROMPT};
