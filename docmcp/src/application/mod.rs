pub mod dto;
pub mod gateways;
pub mod services;

// Re-export key types to avoid naming conflicts
pub use dto::{
    AddStats, ChunkMetadata, ChunkRecord, IndexStats, LanguageRebuild, LexicalMatch, ModelInfo,
    RebuildAllReport, RebuildOutcome, RebuildReport, ScoredChunk, StoredChunkInfo, StoredHit,
};
pub use gateways::{ChunkStore, Embedder};
pub use services::{IndexError, IndexService, SearchError, SearchService};
