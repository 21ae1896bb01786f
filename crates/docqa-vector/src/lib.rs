//! docqa-vector
//!
//! Exact inner-product index over normalized embeddings, the on-disk vector
//! store, the staged build pipeline and the [`Retriever`].

pub mod flat;
pub mod index_build;
pub mod pipeline;
pub mod schema;
pub mod search;
pub mod writer;

pub use flat::FlatIndex;
pub use index_build::build_index;
pub use pipeline::{build_artifacts, build_pipeline, ingest_directory, Artifacts};
pub use search::Retriever;
pub use writer::{build_embeddings, read_vectors, write_vectors, StoredVectors};
