/// Embedding and vector-store infrastructure
mod chunker;
mod fastembed_service;
mod qdrant_store;

pub use chunker::TextChunker;
pub use fastembed_service::FastEmbedService;
pub use qdrant_store::{CollectionRegistry, QdrantChunkStore};
