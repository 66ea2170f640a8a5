/// Gateway traits between the application services and the embedding /
/// vector-store infrastructure. Services are generic over these so tests
/// can run against in-memory fakes.
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;

use crate::application::dto::{ChunkRecord, ModelInfo, StoredChunkInfo, StoredHit};
use crate::domain::value_objects::{ChunkId, EmbeddingVector, Language};

/// Gateway to the embedding model
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Encode one text. Empty or whitespace-only input encodes to a zero
    /// vector of the model's dimension without calling the model.
    async fn encode(&self, text: &str) -> Result<EmbeddingVector>;

    /// Encode a batch, filtering out empty inputs first. An all-empty
    /// batch yields an empty result.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>>;

    fn model_info(&self) -> ModelInfo;
}

/// Gateway to the persistent vector store, partitioned into one collection
/// per language
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Lazily create the language's collection; cached for the process
    /// lifetime once created.
    async fn ensure_collection(&self, language: &Language) -> Result<()>;

    /// Drop the language's collection and evict it from the cache so the
    /// next access re-creates it empty.
    async fn drop_collection(&self, language: &Language) -> Result<()>;

    /// Subset of `ids` that is already stored.
    async fn existing_ids(
        &self,
        language: &Language,
        ids: &[ChunkId],
    ) -> Result<HashSet<ChunkId>>;

    /// Batched upsert of (record, vector) pairs.
    async fn upsert_chunks(
        &self,
        language: &Language,
        chunks: Vec<(ChunkRecord, EmbeddingVector)>,
    ) -> Result<()>;

    /// `top_k` nearest neighbours of `query` in cosine distance space.
    async fn search(
        &self,
        language: &Language,
        query: &EmbeddingVector,
        top_k: usize,
    ) -> Result<Vec<StoredHit>>;

    /// Delete every chunk belonging to `document_key`; returns the count.
    async fn delete_document(&self, language: &Language, document_key: &str) -> Result<usize>;

    /// Enumerate stored chunks for statistics.
    async fn list_chunks(&self, language: &Language) -> Result<Vec<StoredChunkInfo>>;

    /// Where the store persists its data, for reporting.
    fn persist_location(&self) -> String;
}
