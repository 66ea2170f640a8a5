/// Server configuration: defaults merged with `DOCMCP_*` environment variables
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::value_objects::{EmbeddingModel, Language};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported by the MCP server
    pub server_name: String,
    /// Base URL of the published documentation site
    pub website_url: String,
    /// Qdrant server URL
    pub qdrant_url: String,
    /// Embedding model used for indexing and queries
    pub embedding_model: EmbeddingModel,
    /// Document chunk size, in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks, in characters
    pub chunk_overlap: usize,
    /// Default minimum similarity score for semantic search results
    pub min_similarity_score: f32,
    /// Root of the documentation project (holds docs/, i18n/, static/)
    pub project_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server_name: "docmcp".to_string(),
            website_url: "https://docs.example.com".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            embedding_model: EmbeddingModel::default(),
            chunk_size: 800,
            chunk_overlap: 150,
            min_similarity_score: 0.5,
            project_root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Load defaults overridden by `DOCMCP_*` environment variables
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Env::prefixed("DOCMCP_"))
            .extract()
            .context("Failed to load configuration")
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    /// Root of the primary-language (`zh`) documentation
    pub fn docs_root(&self) -> PathBuf {
        self.project_root.join("docs")
    }

    pub fn i18n_root(&self) -> PathBuf {
        self.project_root.join("i18n")
    }

    /// Root of the static assets served alongside the docs
    pub fn static_root(&self) -> PathBuf {
        self.project_root.join("static")
    }

    /// Documentation root for a language. The primary language lives in
    /// `docs/`; translations follow the Docusaurus i18n layout.
    pub fn language_root(&self, language: &Language) -> PathBuf {
        if language == &Language::zh() {
            self.docs_root()
        } else {
            self.i18n_root()
                .join(language.as_str())
                .join("docusaurus-plugin-content-docs")
                .join("current")
        }
    }

    /// Online URL of a document, from its path relative to its language root
    pub fn document_url(&self, doc_relative_path: &str, language: &Language) -> String {
        let path = doc_relative_path
            .strip_suffix(".md")
            .unwrap_or(doc_relative_path);
        if language == &Language::zh() {
            format!("{}/docs/{}", self.website_url, path)
        } else {
            format!("{}/{}/docs/{}", self.website_url, language.as_str(), path)
        }
    }

    /// Online URL of a media file, from its path relative to `static/`
    pub fn media_url(&self, static_relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.website_url,
            static_relative_path.replace('\\', "/")
        )
    }
}
