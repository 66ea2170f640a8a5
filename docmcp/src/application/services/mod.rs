pub mod index_service;
pub mod metadata;
pub mod search_service;

pub use index_service::{IndexError, IndexResult, IndexService};
pub use metadata::MetadataExtractor;
pub use search_service::{SearchError, SearchResult, SearchService};
