//! Documentation vector index MCP server.
//!
//! Indexes a Docusaurus-style documentation tree into per-language vector
//! collections and serves semantic + lexical retrieval tools over MCP.
//!
//! - [`domain`] - value objects: languages, document paths, chunk identity,
//!   embedding vectors, line ranges
//! - [`application`] - indexing and retrieval services behind gateway traits
//! - [`infrastructure`] - chunking, fastembed embeddings, the Qdrant store,
//!   filesystem discovery and line-range reading
//! - [`interface`] - the MCP tool surface and its text reports

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
