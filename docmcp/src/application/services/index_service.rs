/// Index manager: owns add / delete / rebuild / stats over the per-language
/// chunk collections
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::dto::{
    AddStats, ChunkRecord, IndexStats, LanguageRebuild, RebuildAllReport, RebuildOutcome,
    RebuildReport,
};
use crate::application::gateways::{ChunkStore, Embedder};
use crate::application::services::metadata::MetadataExtractor;
use crate::config::ServerConfig;
use crate::domain::value_objects::{ChunkId, DocumentPath, Language};
use crate::infrastructure::embeddings::TextChunker;
use crate::infrastructure::file_system::discover_markdown_files;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Documents root not found: {0}")]
    MissingRoot(PathBuf),

    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Vector store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::base::DomainError),
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Sole writer of the vector store. Adds, skips, deletes and rebuilds
/// documents as chunk-level records.
pub struct IndexService<E, S> {
    config: Arc<ServerConfig>,
    embedder: Arc<E>,
    store: Arc<S>,
    chunker: TextChunker,
    metadata: MetadataExtractor,
}

impl<E: Embedder, S: ChunkStore> IndexService<E, S> {
    pub fn new(config: Arc<ServerConfig>, embedder: Arc<E>, store: Arc<S>) -> Self {
        let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap);
        let metadata = MetadataExtractor::new(Arc::clone(&config));
        IndexService {
            config,
            embedder,
            store,
            chunker,
            metadata,
        }
    }

    /// Index one document. Unless `force`, chunks already present in the
    /// collection are skipped, so re-running over unchanged content adds
    /// nothing. An unreadable or empty file is logged and counted as zero,
    /// not an error.
    pub async fn add_document(
        &self,
        file_path: &Path,
        language: &Language,
        force: bool,
    ) -> IndexResult<AddStats> {
        info!(
            "Adding document: {}, language: {}",
            file_path.display(),
            language
        );

        let content = match tokio::fs::read_to_string(file_path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", file_path.display(), e);
                return Ok(AddStats::default());
            }
        };
        if content.trim().is_empty() {
            warn!("Empty content in file: {}", file_path.display());
            return Ok(AddStats::default());
        }

        let chunks = self.chunker.split(&content);
        debug!("Document split into {} chunks", chunks.len());

        let document = DocumentPath::from_project_path(file_path, &self.config.project_root)?;
        let ids: Vec<ChunkId> = (0..chunks.len()).map(|i| document.chunk_id(i)).collect();

        let existing = if force {
            HashSet::new()
        } else {
            self.store
                .existing_ids(language, &ids)
                .await
                .map_err(IndexError::Store)?
        };

        let mut records = Vec::new();
        for (i, chunk) in chunks.into_iter().enumerate() {
            if existing.contains(&ids[i]) {
                debug!("Chunk {} already exists, skipping", ids[i]);
                continue;
            }
            records.push(ChunkRecord {
                id: ids[i].clone(),
                document_key: document.document_key(),
                content: chunk,
                metadata: self.metadata.extract(file_path, i, language),
            });
        }
        let skipped = ids.len() - records.len();

        if records.is_empty() {
            info!("No new chunks to add");
            return Ok(AddStats { added: 0, skipped });
        }

        // One embedding batch and one upsert per document; an embedding
        // failure aborts the whole document instead of committing part of it.
        let texts: Vec<String> = records.iter().map(|r| r.content.clone()).collect();
        let embeddings = self
            .embedder
            .encode_batch(&texts)
            .await
            .map_err(IndexError::Embedding)?;
        if embeddings.len() != records.len() {
            return Err(IndexError::Embedding(anyhow::anyhow!(
                "Expected {} embeddings, got {}",
                records.len(),
                embeddings.len()
            )));
        }

        let added = records.len();
        let pairs = records.into_iter().zip(embeddings).collect();
        self.store
            .upsert_chunks(language, pairs)
            .await
            .map_err(IndexError::Store)?;

        info!("Added {} chunks to vector store", added);
        Ok(AddStats { added, skipped })
    }

    /// Delete every stored chunk of a document; returns the count deleted
    pub async fn delete_document(
        &self,
        file_path: &Path,
        language: &Language,
    ) -> IndexResult<usize> {
        info!(
            "Deleting document: {}, language: {}",
            file_path.display(),
            language
        );

        let document = DocumentPath::from_project_path(file_path, &self.config.project_root)?;
        self.store
            .delete_document(language, &document.document_key())
            .await
            .map_err(IndexError::Store)
    }

    /// Re-index every markdown file under the language root. With `force`
    /// the collection is dropped first; otherwise present chunks are
    /// skipped. Per-document failures are logged and do not stop the run.
    pub async fn rebuild_index(
        &self,
        language: &Language,
        force: bool,
    ) -> IndexResult<RebuildReport> {
        info!("Rebuilding index for language: {}, force: {}", language, force);

        let root = self.config.language_root(language);
        if !root.exists() {
            warn!("Docs directory not found: {}", root.display());
            return Err(IndexError::MissingRoot(root));
        }

        let mut files = discover_markdown_files(&root).await?;
        files.sort();
        info!("Found {} markdown files", files.len());

        if force {
            self.store
                .drop_collection(language)
                .await
                .map_err(IndexError::Store)?;
        }

        let mut added_chunks = 0;
        let mut skipped_chunks = 0;
        for file in &files {
            match self.add_document(file, language, force).await {
                Ok(stats) => {
                    added_chunks += stats.added;
                    skipped_chunks += stats.skipped;
                }
                Err(e) => {
                    warn!("Failed to index {}: {}", file.display(), e);
                }
            }
        }

        let total_chunks = self
            .get_stats(language)
            .await
            .map(|stats| stats.total_chunks)
            .unwrap_or(0);

        Ok(RebuildReport {
            language: language.clone(),
            total_files: files.len(),
            added_chunks,
            skipped_chunks,
            total_chunks,
            collection_name: language.collection_name(),
        })
    }

    /// Rebuild every supported language sequentially. Success is the
    /// logical AND of the per-language outcomes.
    pub async fn rebuild_all_indexes(&self, force: bool) -> RebuildAllReport {
        info!("Rebuilding all indexes, force: {}", force);

        let mut details = Vec::new();
        let mut success = true;
        let (mut total_files, mut added_chunks, mut skipped_chunks, mut total_chunks) =
            (0, 0, 0, 0);

        for language in Language::supported() {
            match self.rebuild_index(&language, force).await {
                Ok(report) => {
                    total_files += report.total_files;
                    added_chunks += report.added_chunks;
                    skipped_chunks += report.skipped_chunks;
                    total_chunks += report.total_chunks;
                    details.push(LanguageRebuild {
                        language,
                        outcome: RebuildOutcome::Completed(report),
                    });
                }
                Err(e) => {
                    error!("Rebuild failed for {}: {}", language, e);
                    success = false;
                    details.push(LanguageRebuild {
                        language,
                        outcome: RebuildOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        RebuildAllReport {
            success,
            total_files,
            added_chunks,
            skipped_chunks,
            total_chunks,
            details,
        }
    }

    /// Collection statistics: chunk and document counts, category
    /// histogram, model info, persistence location
    pub async fn get_stats(&self, language: &Language) -> IndexResult<IndexStats> {
        self.store
            .ensure_collection(language)
            .await
            .map_err(IndexError::Store)?;

        let chunks = self
            .store
            .list_chunks(language)
            .await
            .map_err(IndexError::Store)?;

        let mut documents = HashSet::new();
        let mut categories: BTreeMap<String, usize> = BTreeMap::new();
        for chunk in &chunks {
            let document_key = ChunkId::new(chunk.chunk_id.clone())
                .map(|id| id.document_key().to_string())
                .unwrap_or_else(|_| chunk.chunk_id.clone());
            documents.insert(document_key);

            let category = if chunk.category.is_empty() {
                "unknown".to_string()
            } else {
                chunk.category.clone()
            };
            *categories.entry(category).or_insert(0) += 1;
        }

        Ok(IndexStats {
            language: language.clone(),
            collection_name: language.collection_name(),
            total_chunks: chunks.len(),
            total_documents: documents.len(),
            categories,
            model: self.embedder.model_info(),
            persist_location: self.store.persist_location(),
        })
    }
}
