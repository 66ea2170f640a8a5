/// Typed results exchanged between services, the store, and the tool layer
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::value_objects::{ChunkId, Language};

/// Descriptive fields attached to every stored chunk.
/// Written wholesale on each add; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Project-root relative path, posix-style
    pub file_path: String,
    pub language: String,
    pub chunk_index: usize,
    /// Derived from the file name
    pub title: String,
    /// First path segment under the language root, or "root"
    pub category: String,
    /// Online view link
    pub url: String,
    /// RFC-3339 creation time
    pub timestamp: String,
}

/// A chunk as handed to the vector store for upsert
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub id: ChunkId,
    /// Normalized document prefix shared by all chunks of one document
    pub document_key: String,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Raw nearest-neighbour hit as the store reports it (cosine distance space)
#[derive(Debug, Clone)]
pub struct StoredHit {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

/// One ranked semantic search result
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub id: String,
    pub content: String,
    pub metadata: ChunkMetadata,
    /// `1 - distance`
    pub similarity: f32,
    pub distance: f32,
}

/// One lexical (substring) match over the documentation tree
#[derive(Debug, Clone)]
pub struct LexicalMatch {
    /// Project-root relative path, posix-style
    pub path: String,
    /// Online view link
    pub url: String,
    /// Leading lines of the matched document
    pub excerpt: String,
}

/// Minimal stored-chunk view used for statistics
#[derive(Debug, Clone)]
pub struct StoredChunkInfo {
    pub chunk_id: String,
    pub category: String,
}

/// Per-document indexing outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddStats {
    /// Chunks newly written by this call
    pub added: usize,
    /// Chunks skipped because they were already present
    pub skipped: usize,
}

/// Embedding model description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_name: String,
    pub dimension: usize,
    pub max_input_length: usize,
    pub loaded: bool,
}

/// Result of rebuilding one language's index
#[derive(Debug, Clone)]
pub struct RebuildReport {
    pub language: Language,
    pub total_files: usize,
    pub added_chunks: usize,
    pub skipped_chunks: usize,
    /// Chunk count in the collection after the rebuild
    pub total_chunks: usize,
    pub collection_name: String,
}

/// Tagged outcome of one language's rebuild within a rebuild-all run
#[derive(Debug, Clone)]
pub enum RebuildOutcome {
    Completed(RebuildReport),
    Failed { error: String },
}

impl RebuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RebuildOutcome::Completed(_))
    }
}

#[derive(Debug, Clone)]
pub struct LanguageRebuild {
    pub language: Language,
    pub outcome: RebuildOutcome,
}

/// Aggregated result of rebuilding every supported language
#[derive(Debug, Clone)]
pub struct RebuildAllReport {
    /// Logical AND of per-language success
    pub success: bool,
    pub total_files: usize,
    pub added_chunks: usize,
    pub skipped_chunks: usize,
    pub total_chunks: usize,
    pub details: Vec<LanguageRebuild>,
}

/// Statistics for one language's collection
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub language: Language,
    pub collection_name: String,
    pub total_chunks: usize,
    /// Distinct documents, derived from stored chunk identifiers
    pub total_documents: usize,
    /// Chunk counts per category
    pub categories: BTreeMap<String, usize>,
    pub model: ModelInfo,
    pub persist_location: String,
}
