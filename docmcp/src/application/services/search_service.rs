/// Retrieval engine: semantic search over the vector store plus the
/// lexical document query retained for compatibility
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::dto::{LexicalMatch, ScoredChunk};
use crate::application::gateways::{ChunkStore, Embedder};
use crate::config::ServerConfig;
use crate::domain::value_objects::{Language, LineRange};
use crate::infrastructure::file_system::{discover_markdown_files, read_file_content};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Vector store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;

/// Read-only query side of the index
pub struct SearchService<E, S> {
    config: Arc<ServerConfig>,
    embedder: Arc<E>,
    store: Arc<S>,
}

impl<E: Embedder, S: ChunkStore> SearchService<E, S> {
    pub fn new(config: Arc<ServerConfig>, embedder: Arc<E>, store: Arc<S>) -> Self {
        SearchService {
            config,
            embedder,
            store,
        }
    }

    /// Semantic search: embed the query, fetch `top_k` nearest neighbours,
    /// convert distance to similarity and drop results under `min_score`
    /// (configured default when not given). Filtering happens after
    /// retrieval, so fewer than `top_k` results may come back - the set is
    /// never backfilled.
    pub async fn semantic_search(
        &self,
        query: &str,
        top_k: usize,
        language: &Language,
        min_score: Option<f32>,
    ) -> SearchResult<Vec<ScoredChunk>> {
        info!(
            "Searching for: {}, language: {}, top_k: {}",
            query, language, top_k
        );

        let min_score = min_score.unwrap_or(self.config.min_similarity_score);

        let query_embedding = self
            .embedder
            .encode(query)
            .await
            .map_err(SearchError::Embedding)?;

        let hits = self
            .store
            .search(language, &query_embedding, top_k)
            .await
            .map_err(SearchError::Store)?;

        let mut results: Vec<ScoredChunk> = hits
            .into_iter()
            .filter_map(|hit| {
                let similarity = 1.0 - hit.distance;
                if similarity < min_score {
                    return None;
                }
                Some(ScoredChunk {
                    id: hit.id,
                    content: hit.content,
                    metadata: hit.metadata,
                    similarity,
                    distance: hit.distance,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!("Found {} results", results.len());
        Ok(results)
    }

    /// Lexical search: case-insensitive substring match over the first 50
    /// lines of every markdown file under the language root
    pub async fn lexical_query(
        &self,
        query: &str,
        max_results: usize,
        language: &Language,
    ) -> SearchResult<Vec<LexicalMatch>> {
        info!("Querying documents with: {}, language: {}", query, language);

        let root = self.config.language_root(language);
        if !root.exists() {
            warn!("Directory not found: {}", root.display());
            return Ok(Vec::new());
        }

        let mut files = discover_markdown_files(&root).await?;
        files.sort();

        let needle = query.to_lowercase();
        let range = LineRange::Lines { start: 0, end: 50 };
        let mut matches = Vec::new();

        for file in files {
            let content = match read_file_content(&file, &range).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {}: {}", file.display(), e);
                    continue;
                }
            };

            if content.to_lowercase().contains(&needle) {
                let path = posix_relative(&file, &self.config.project_root);
                let doc_relative = posix_relative(&file, &root);
                let url = self.config.document_url(&doc_relative, language);
                matches.push(LexicalMatch {
                    path,
                    url,
                    excerpt: content,
                });
                if matches.len() >= max_results {
                    break;
                }
            }
        }

        info!("Found {} lexical matches", matches.len());
        Ok(matches)
    }
}

fn posix_relative(file: &Path, base: &Path) -> String {
    let relative = file.strip_prefix(base).unwrap_or(file);
    relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
