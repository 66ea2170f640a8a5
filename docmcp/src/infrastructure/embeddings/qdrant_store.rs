/// Qdrant-backed chunk store and per-language collection registry
use anyhow::{Context, Result};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, Condition, CountPointsBuilder, CreateCollectionBuilder,
        DeletePointsBuilder, Distance, Filter, GetPointsBuilder, PointId, PointStruct,
        ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    },
    Payload, Qdrant,
};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{ChunkMetadata, ChunkRecord, StoredChunkInfo, StoredHit};
use crate::application::gateways::ChunkStore;
use crate::domain::value_objects::{ChunkId, EmbeddingVector, Language};

/// Lazily creates and caches the `docs_{language}` collections.
/// Shared for the process lifetime; a force rebuild drops the backing
/// collection and evicts the cache entry so the next access starts empty.
pub struct CollectionRegistry {
    client: Arc<Qdrant>,
    dimension: usize,
    ensured: Mutex<HashSet<String>>,
}

impl CollectionRegistry {
    pub fn new(client: Arc<Qdrant>, dimension: usize) -> Self {
        CollectionRegistry {
            client,
            dimension,
            ensured: Mutex::new(HashSet::new()),
        }
    }

    /// Resolve the language's collection, creating it on first access
    /// with cosine distance as the similarity space.
    pub async fn ensure(&self, language: &Language) -> Result<String> {
        let name = language.collection_name();

        {
            let ensured = self.ensured.lock().await;
            if ensured.contains(&name) {
                return Ok(name);
            }
        }

        if !self.collection_exists(&name).await? {
            info!("Creating collection: {}", name);
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&name).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .context("Failed to create collection")?;
        }

        self.ensured.lock().await.insert(name.clone());
        Ok(name)
    }

    /// Drop the language's collection and forget it, so the next `ensure`
    /// re-creates a fresh, empty one.
    pub async fn drop_collection(&self, language: &Language) -> Result<()> {
        let name = language.collection_name();
        self.ensured.lock().await.remove(&name);

        match self.client.delete_collection(&name).await {
            Ok(_) => info!("Deleted collection: {}", name),
            Err(e) => warn!("Failed to delete collection {}: {}", name, e),
        }
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self.client.list_collections().await?;
        Ok(collections.collections.iter().any(|c| c.name == name))
    }
}

/// Chunk store implementation using Qdrant
pub struct QdrantChunkStore {
    client: Arc<Qdrant>,
    registry: CollectionRegistry,
    url: String,
}

impl QdrantChunkStore {
    /// Connect to a Qdrant server.
    ///
    /// # Arguments
    /// * `url` - Qdrant server URL (e.g., "http://localhost:6334")
    /// * `dimension` - Vector dimension count (384 for MiniLM models)
    pub fn new(url: &str, dimension: usize) -> Result<Self> {
        info!("Connecting to Qdrant at {}", url);

        let client = Arc::new(
            Qdrant::from_url(url)
                .build()
                .context("Failed to connect to Qdrant")?,
        );

        Ok(QdrantChunkStore {
            registry: CollectionRegistry::new(Arc::clone(&client), dimension),
            client,
            url: url.to_string(),
        })
    }

    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Qdrant point ids must be UUIDs; the deterministic UUIDv5 of the chunk
    /// identifier keeps re-indexing idempotent while the identifier string
    /// itself stays in the payload as the logical key.
    fn point_id(chunk_id: &ChunkId) -> PointId {
        PointId::from(
            Uuid::new_v5(&Uuid::NAMESPACE_URL, chunk_id.as_str().as_bytes()).to_string(),
        )
    }

    fn chunk_payload(record: &ChunkRecord) -> Result<Payload> {
        let m = &record.metadata;
        json!({
            "chunk_id": record.id.as_str(),
            "document": record.document_key,
            "content": record.content,
            "file_path": m.file_path,
            "language": m.language,
            "chunk_index": m.chunk_index,
            "title": m.title,
            "category": m.category,
            "url": m.url,
            "timestamp": m.timestamp,
        })
        .try_into()
        .context("Failed to serialize payload")
    }

    fn metadata_from_payload(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
    ) -> ChunkMetadata {
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_default()
        };
        ChunkMetadata {
            file_path: text("file_path"),
            language: text("language"),
            chunk_index: payload
                .get("chunk_index")
                .and_then(|v| v.as_integer())
                .unwrap_or(0) as usize,
            title: text("title"),
            category: text("category"),
            url: text("url"),
            timestamp: text("timestamp"),
        }
    }

    fn payload_text(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
        key: &str,
    ) -> String {
        payload
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    fn document_filter(document_key: &str) -> Filter {
        Filter::must([Condition::matches("document", document_key.to_string())])
    }
}

#[async_trait]
impl ChunkStore for QdrantChunkStore {
    async fn ensure_collection(&self, language: &Language) -> Result<()> {
        self.registry.ensure(language).await.map(|_| ())
    }

    async fn drop_collection(&self, language: &Language) -> Result<()> {
        self.registry.drop_collection(language).await
    }

    async fn existing_ids(
        &self,
        language: &Language,
        ids: &[ChunkId],
    ) -> Result<HashSet<ChunkId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let name = self.registry.ensure(language).await?;

        // Map the deterministic point uuids back to the chunk identifiers.
        let by_uuid: HashMap<String, ChunkId> = ids
            .iter()
            .map(|id| {
                (
                    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_str().as_bytes()).to_string(),
                    id.clone(),
                )
            })
            .collect();

        let point_ids: Vec<PointId> = ids.iter().map(Self::point_id).collect();
        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&name, point_ids)
                    .with_payload(false)
                    .with_vectors(false),
            )
            .await
            .context("Failed to look up existing chunk ids")?;

        let mut existing = HashSet::new();
        for point in response.result {
            if let Some(PointId {
                point_id_options: Some(PointIdOptions::Uuid(uuid)),
            }) = point.id
            {
                if let Some(chunk_id) = by_uuid.get(&uuid) {
                    existing.insert(chunk_id.clone());
                }
            }
        }
        Ok(existing)
    }

    async fn upsert_chunks(
        &self,
        language: &Language,
        chunks: Vec<(ChunkRecord, EmbeddingVector)>,
    ) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let name = self.registry.ensure(language).await?;

        debug!("Upserting batch of {} chunks into {}", chunks.len(), name);

        let points: Result<Vec<PointStruct>> = chunks
            .iter()
            .map(|(record, embedding)| {
                Ok(PointStruct::new(
                    Self::point_id(&record.id),
                    embedding.dimensions().to_vec(),
                    Self::chunk_payload(record)?,
                ))
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&name, points?).wait(true))
            .await
            .context("Failed to upsert chunks")?;

        debug!("Batch upsert completed");
        Ok(())
    }

    async fn search(
        &self,
        language: &Language,
        query: &EmbeddingVector,
        top_k: usize,
    ) -> Result<Vec<StoredHit>> {
        let name = self.registry.ensure(language).await?;

        debug!("Searching {} with top_k: {}", name, top_k);

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&name, query.dimensions().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .context("Search failed")?;

        let hits = response
            .result
            .into_iter()
            .map(|point| StoredHit {
                id: Self::payload_text(&point.payload, "chunk_id"),
                content: Self::payload_text(&point.payload, "content"),
                metadata: Self::metadata_from_payload(&point.payload),
                // Qdrant reports cosine similarity; the store contract is
                // cosine distance.
                distance: 1.0 - point.score,
            })
            .collect();

        Ok(hits)
    }

    async fn delete_document(&self, language: &Language, document_key: &str) -> Result<usize> {
        let name = self.registry.ensure(language).await?;

        let count = self
            .client
            .count(
                CountPointsBuilder::new(&name)
                    .filter(Self::document_filter(document_key))
                    .exact(true),
            )
            .await
            .context("Failed to count document chunks")?
            .result
            .map(|r| r.count as usize)
            .unwrap_or(0);

        if count == 0 {
            debug!("No chunks found for document {}", document_key);
            return Ok(0);
        }

        self.client
            .delete_points(
                DeletePointsBuilder::new(&name)
                    .points(Self::document_filter(document_key))
                    .wait(true),
            )
            .await
            .context("Failed to delete document chunks")?;

        info!("Deleted {} chunks for document {}", count, document_key);
        Ok(count)
    }

    async fn list_chunks(&self, language: &Language) -> Result<Vec<StoredChunkInfo>> {
        let name = self.registry.ensure(language).await?;

        let mut chunks = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut builder = ScrollPointsBuilder::new(&name)
                .limit(256)
                .with_payload(true)
                .with_vectors(false);
            if let Some(o) = offset.take() {
                builder = builder.offset(o);
            }

            let response = self
                .client
                .scroll(builder)
                .await
                .context("Failed to scroll collection")?;

            chunks.extend(response.result.iter().map(|point| StoredChunkInfo {
                chunk_id: Self::payload_text(&point.payload, "chunk_id"),
                category: Self::payload_text(&point.payload, "category"),
            }));

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(chunks)
    }

    fn persist_location(&self) -> String {
        self.url.clone()
    }
}
