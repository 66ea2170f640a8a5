#![allow(dead_code)]
/// In-memory fakes for exercising the indexing and retrieval pipeline
/// without a live embedding model or Qdrant instance.
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use docmcp::application::dto::{ChunkRecord, ModelInfo, StoredChunkInfo, StoredHit};
use docmcp::application::gateways::{ChunkStore, Embedder};
use docmcp::domain::value_objects::{ChunkId, EmbeddingVector, Language};

/// Deterministic embedding derived from the text bytes: identical text
/// always encodes to the identical vector, distinct text rarely collides.
pub fn embedding_for(text: &str, dimension: usize) -> EmbeddingVector {
    let mut values = vec![0.0f32; dimension];
    for (i, byte) in text.bytes().enumerate() {
        values[i % dimension] += f32::from(byte) / 255.0;
    }
    let norm: f32 = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut values {
            *v /= norm;
        }
    }
    EmbeddingVector::new(values).unwrap()
}

pub struct StubEmbedder {
    pub dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        StubEmbedder { dimension }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn encode(&self, text: &str) -> Result<EmbeddingVector> {
        if text.trim().is_empty() {
            return Ok(EmbeddingVector::zeros(self.dimension));
        }
        Ok(embedding_for(text, self.dimension))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        Ok(texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| embedding_for(t, self.dimension))
            .collect())
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: "stub-embedder".to_string(),
            dimension: self.dimension,
            max_input_length: 128,
            loaded: true,
        }
    }
}

struct StoredRecord {
    record: ChunkRecord,
    vector: EmbeddingVector,
}

/// Chunk store over a process-local map, one entry per collection
pub struct InMemoryChunkStore {
    collections: Mutex<HashMap<String, HashMap<String, StoredRecord>>>,
}

impl InMemoryChunkStore {
    pub fn new() -> Self {
        InMemoryChunkStore {
            collections: Mutex::new(HashMap::new()),
        }
    }

    pub fn chunk_count(&self, language: &Language) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(&language.collection_name())
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Plant a record directly, bypassing the indexing pipeline (simulates
    /// stale state left behind by deleted or renamed files).
    pub fn plant(&self, language: &Language, record: ChunkRecord, vector: EmbeddingVector) {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(language.collection_name())
            .or_default()
            .insert(record.id.as_str().to_string(), StoredRecord { record, vector });
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn ensure_collection(&self, language: &Language) -> Result<()> {
        self.collections
            .lock()
            .unwrap()
            .entry(language.collection_name())
            .or_default();
        Ok(())
    }

    async fn drop_collection(&self, language: &Language) -> Result<()> {
        self.collections
            .lock()
            .unwrap()
            .remove(&language.collection_name());
        Ok(())
    }

    async fn existing_ids(
        &self,
        language: &Language,
        ids: &[ChunkId],
    ) -> Result<HashSet<ChunkId>> {
        let collections = self.collections.lock().unwrap();
        let collection = match collections.get(&language.collection_name()) {
            Some(collection) => collection,
            None => return Ok(HashSet::new()),
        };
        Ok(ids
            .iter()
            .filter(|id| collection.contains_key(id.as_str()))
            .cloned()
            .collect())
    }

    async fn upsert_chunks(
        &self,
        language: &Language,
        chunks: Vec<(ChunkRecord, EmbeddingVector)>,
    ) -> Result<()> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections.entry(language.collection_name()).or_default();
        for (record, vector) in chunks {
            collection.insert(record.id.as_str().to_string(), StoredRecord { record, vector });
        }
        Ok(())
    }

    async fn search(
        &self,
        language: &Language,
        query: &EmbeddingVector,
        top_k: usize,
    ) -> Result<Vec<StoredHit>> {
        let collections = self.collections.lock().unwrap();
        let collection = match collections.get(&language.collection_name()) {
            Some(collection) => collection,
            None => return Ok(Vec::new()),
        };

        let mut hits: Vec<StoredHit> = collection
            .values()
            .map(|stored| {
                let similarity = stored.vector.cosine_similarity(query).unwrap_or(0.0);
                StoredHit {
                    id: stored.record.id.as_str().to_string(),
                    content: stored.record.content.clone(),
                    metadata: stored.record.metadata.clone(),
                    distance: 1.0 - similarity,
                }
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete_document(&self, language: &Language, document_key: &str) -> Result<usize> {
        let mut collections = self.collections.lock().unwrap();
        let collection = match collections.get_mut(&language.collection_name()) {
            Some(collection) => collection,
            None => return Ok(0),
        };
        let before = collection.len();
        collection.retain(|_, stored| stored.record.document_key != document_key);
        Ok(before - collection.len())
    }

    async fn list_chunks(&self, language: &Language) -> Result<Vec<StoredChunkInfo>> {
        let collections = self.collections.lock().unwrap();
        let collection = match collections.get(&language.collection_name()) {
            Some(collection) => collection,
            None => return Ok(Vec::new()),
        };
        Ok(collection
            .values()
            .map(|stored| StoredChunkInfo {
                chunk_id: stored.record.id.as_str().to_string(),
                category: stored.record.metadata.category.clone(),
            })
            .collect())
    }

    fn persist_location(&self) -> String {
        "memory".to_string()
    }
}
