//! docqa-core
//!
//! Domain types, error taxonomy, configuration, capability traits and the
//! document chunker shared by every docqa crate.

pub mod config;
pub mod data_processor;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use traits::{AnswerGenerator, Embedder, VectorIndex};
pub use types::{Chunk, Generation, RetrievedContext, ScoredChunk};
