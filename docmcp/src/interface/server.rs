/// MCP tool surface over the documentation index.
///
/// The dispatcher forwards named calls with typed arguments to the services
/// and returns text; every failure surfaces as a readable message, never a
/// raw fault.
use rmcp::{
    handler::server::wrapper::Parameters, model::ServerInfo, tool, tool_handler, tool_router,
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::application::services::{IndexService, SearchService};
use crate::config::ServerConfig;
use crate::domain::value_objects::{Language, LineRange};
use crate::infrastructure::embeddings::{FastEmbedService, QdrantChunkStore};
use crate::infrastructure::file_system::{
    discover_files_with_extensions, discover_markdown_files, file_info, friendly_size,
    read_file_content,
};
use crate::interface::format;

pub type DocIndexService = IndexService<FastEmbedService, QdrantChunkStore>;
pub type DocSearchService = SearchService<FastEmbedService, QdrantChunkStore>;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "avi", "mov", "wmv", "flv", "webm"];

fn default_language() -> String {
    "zh".to_string()
}

fn default_rebuild_language() -> String {
    "all".to_string()
}

fn default_max_results() -> usize {
    5
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_line_range() -> String {
    "0~100".to_string()
}

fn default_media_type() -> String {
    "image".to_string()
}

/// Request parameters for the lexical document query
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryDocumentRequest {
    /// Search query string
    pub query: String,
    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Language selection: "zh" or "en"
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request parameters for semantic search
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SemanticSearchRequest {
    /// Search query text
    pub query: String,
    /// Number of nearest neighbours to retrieve
    #[serde(default = "default_max_results")]
    pub top_k: usize,
    /// Language selection: "zh" or "en"
    #[serde(default = "default_language")]
    pub language: String,
    /// Minimum similarity score; configuration default when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f32>,
}

/// Request parameters for rebuilding the vector index
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RebuildIndexRequest {
    /// Language to rebuild: "zh", "en" or "all"
    #[serde(default = "default_rebuild_language")]
    pub language: String,
    /// Drop and re-create the collection before indexing
    #[serde(default)]
    pub force: bool,
}

/// Request parameters for vector index statistics
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VectorStatsRequest {
    /// Language selection: "zh" or "en"
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request parameters for listing markdown files
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListFilesRequest {
    /// Directory relative to the language root
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Language selection: "zh" or "en"
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request parameters for reading a file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadFileRequest {
    /// File path relative to the language root
    pub file_path: String,
    /// Line range: "0~100", "50" (first 50 lines) or "all"
    #[serde(default = "default_line_range")]
    pub line_range: String,
    /// Language selection: "zh" or "en"
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request parameters for listing media files
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListMediaFilesRequest {
    /// Directory relative to the static assets root
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Media type: "image", "video" or "all"
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

/// MCP server for documentation retrieval
#[derive(Clone)]
pub struct DocsServer {
    config: Arc<ServerConfig>,
    index: Arc<DocIndexService>,
    search: Arc<DocSearchService>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl DocsServer {
    pub fn new(
        config: Arc<ServerConfig>,
        index: Arc<DocIndexService>,
        search: Arc<DocSearchService>,
    ) -> Self {
        Self {
            config,
            index,
            search,
            tool_router: Self::tool_router(),
        }
    }

    fn parse_language(&self, tag: &str) -> Result<Language, String> {
        Language::new(tag).map_err(|e| format!("Error: {}", e))
    }
}

#[tool_router]
impl DocsServer {
    /// Lexical search over the documentation tree
    #[tool(
        description = "Search project documentation by keyword. Matches against the first 50 lines of every markdown file and returns excerpts with online links."
    )]
    async fn query_document(
        &self,
        params: Parameters<QueryDocumentRequest>,
    ) -> Result<String, McpError> {
        let params = params.0;
        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };

        match self
            .search
            .lexical_query(&params.query, params.max_results, &language)
            .await
        {
            Ok(matches) => Ok(format::format_lexical_report(&params.query, &matches)),
            Err(e) => {
                error!("Error in query_document: {}", e);
                Ok(format!("Error: {}", e))
            }
        }
    }

    /// Semantic search over the vector index
    #[tool(
        description = "Search project documentation by meaning using the vector index. Returns the most similar chunks with scores and online links."
    )]
    async fn semantic_search(
        &self,
        params: Parameters<SemanticSearchRequest>,
    ) -> Result<String, McpError> {
        let params = params.0;
        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };

        match self
            .search
            .semantic_search(&params.query, params.top_k, &language, params.min_score)
            .await
        {
            Ok(results) => Ok(format::format_semantic_report(&params.query, &results)),
            Err(e) => {
                error!("Error in semantic_search: {}", e);
                Ok(format!("Error: {}", e))
            }
        }
    }

    /// Rebuild the vector index for one language or all of them
    #[tool(
        description = "Rebuild the semantic search index from the markdown sources. language is \"zh\", \"en\" or \"all\"; force drops the collection first."
    )]
    async fn rebuild_vector_index(
        &self,
        params: Parameters<RebuildIndexRequest>,
    ) -> Result<String, McpError> {
        let params = params.0;

        if params.language == "all" {
            let report = self.index.rebuild_all_indexes(params.force).await;
            return Ok(format::format_rebuild_all_report(&report));
        }

        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };
        match self.index.rebuild_index(&language, params.force).await {
            Ok(report) => Ok(format::format_rebuild_report(&report)),
            Err(e) => {
                error!("Error in rebuild_vector_index: {}", e);
                Ok(format!("Error: {}", e))
            }
        }
    }

    /// Statistics about the vector index
    #[tool(description = "Get vector index statistics: chunk and document counts, categories, embedding model and storage location.")]
    async fn get_vector_stats(
        &self,
        params: Parameters<VectorStatsRequest>,
    ) -> Result<String, McpError> {
        let params = params.0;
        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };

        match self.index.get_stats(&language).await {
            Ok(stats) => Ok(format::format_stats_report(&stats)),
            Err(e) => {
                error!("Error in get_vector_stats: {}", e);
                Ok(format!("Error: {}", e))
            }
        }
    }

    /// List markdown files under a documentation directory
    #[tool(description = "List markdown files in a directory of the documentation tree, with sizes and online links.")]
    async fn list_files(&self, params: Parameters<ListFilesRequest>) -> Result<String, McpError> {
        let params = params.0;
        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };

        let language_root = self.config.language_root(&language);
        // join(".") would leave a literal "." component in every path
        let base_dir = if params.directory == "." {
            language_root.clone()
        } else {
            language_root.join(&params.directory)
        };
        if !base_dir.exists() {
            return Ok(format!("Directory not found: {}", params.directory));
        }

        let mut files = match discover_markdown_files(&base_dir).await {
            Ok(files) => files,
            Err(e) => {
                error!("Error in list_files: {}", e);
                return Ok(format!("Error: {}", e));
            }
        };
        files.sort();

        if files.is_empty() {
            return Ok(format!("No md files found in {}", params.directory));
        }

        let mut result = format!("Found {} md files in {}:\n", files.len(), params.directory);
        for file in files.iter().take(50) {
            let relative = file
                .strip_prefix(&language_root)
                .unwrap_or(file)
                .to_string_lossy()
                .replace('\\', "/");
            let url = self.config.document_url(&relative, &language);
            let size = match file_info(file).await {
                Ok(info) => info.size,
                Err(_) => 0,
            };
            result.push_str(&format!("- {} ({} bytes)\n  View online: {}\n", relative, size, url));
        }
        if files.len() > 50 {
            result.push_str(&format!("\n... and {} more files", files.len() - 50));
        }

        Ok(result)
    }

    /// Read a file from the documentation tree
    #[tool(
        description = "Read a documentation file. line_range supports \"0~100\" (lines 1-100), \"50\" (first 50 lines) and \"all\"."
    )]
    async fn read_file(&self, params: Parameters<ReadFileRequest>) -> Result<String, McpError> {
        let params = params.0;

        if params.file_path.trim().is_empty() {
            return Ok("Error: file_path cannot be empty".to_string());
        }
        let language = match self.parse_language(&params.language) {
            Ok(language) => language,
            Err(message) => return Ok(message),
        };
        let range: LineRange = match params.line_range.parse() {
            Ok(range) => range,
            Err(e) => return Ok(format!("Error: {}", e)),
        };

        let full_path = self.config.language_root(&language).join(&params.file_path);
        if !full_path.exists() {
            return Ok(format!("Error: File not found: {}", params.file_path));
        }
        if !full_path.is_file() {
            return Ok(format!("Error: Path is not a file: {}", params.file_path));
        }

        let content = match read_file_content(&full_path, &range).await {
            Ok(content) => content,
            Err(e) => {
                error!("Error in read_file: {}", e);
                return Ok(format!("Error: {}", e));
            }
        };

        let relative = full_path
            .strip_prefix(&self.config.project_root)
            .unwrap_or(&full_path)
            .to_string_lossy()
            .replace('\\', "/");
        let url = self.config.document_url(&params.file_path, &language);

        Ok(format!(
            "Content of {}:\nView online: {}\n\n{}",
            relative, url, content
        ))
    }

    /// List media files under the static assets directory
    #[tool(
        description = "List media files (images or videos) under the static assets directory, with sizes and online links."
    )]
    async fn list_media_files(
        &self,
        params: Parameters<ListMediaFilesRequest>,
    ) -> Result<String, McpError> {
        let params = params.0;

        let static_root = self.config.static_root();
        let base_dir = if params.directory == "." {
            static_root.clone()
        } else {
            static_root.join(&params.directory)
        };
        if !base_dir.exists() {
            return Ok(format!("Directory not found: {}", params.directory));
        }

        let extensions: Vec<&str> = match params.media_type.as_str() {
            "image" => IMAGE_EXTENSIONS.to_vec(),
            "video" => VIDEO_EXTENSIONS.to_vec(),
            "all" => IMAGE_EXTENSIONS
                .iter()
                .chain(VIDEO_EXTENSIONS.iter())
                .copied()
                .collect(),
            other => {
                return Ok(format!(
                    "Error: unknown media_type '{}'. Expected \"image\", \"video\" or \"all\"",
                    other
                ))
            }
        };

        let mut files = match discover_files_with_extensions(&base_dir, &extensions).await {
            Ok(files) => files,
            Err(e) => {
                error!("Error in list_media_files: {}", e);
                return Ok(format!("Error: {}", e));
            }
        };
        files.sort();

        if files.is_empty() {
            return Ok(format!(
                "No {} files found in {}",
                params.media_type, params.directory
            ));
        }

        let mut result = format!(
            "Found {} {} files in {}:\n",
            files.len(),
            params.media_type,
            params.directory
        );
        for file in &files {
            let relative = file
                .strip_prefix(&self.config.project_root)
                .unwrap_or(file)
                .to_string_lossy()
                .replace('\\', "/");
            let static_relative = file
                .strip_prefix(&static_root)
                .unwrap_or(file)
                .to_string_lossy()
                .replace('\\', "/");
            let url = self.config.media_url(&static_relative);
            let (size, extension) = match file_info(file).await {
                Ok(info) => (friendly_size(info.size), info.extension),
                Err(_) => ("unknown size".to_string(), String::new()),
            };
            result.push_str(&format!(
                "- {} ({}, .{})\n  View online: {}\n",
                relative, size, extension, url
            ));
        }

        Ok(result)
    }

    /// Basic project information
    #[tool(description = "Get basic information about the documentation project.")]
    async fn get_project_info(&self) -> Result<String, McpError> {
        Ok(format!(
            "Project Information:\n\
             Name: {}\n\
             Version: {}\n\
             Root: {}\n\
             Docs Root: {}\n\
             i18n Root: {}\n\
             Website: {}\n\
             Description: MCP server for documentation access (docs and i18n directories)",
            self.config.server_name,
            env!("CARGO_PKG_VERSION"),
            self.config.project_root.display(),
            self.config.docs_root().display(),
            self.config.i18n_root().display(),
            self.config.website_url
        ))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for DocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::default(),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: rmcp::model::Implementation {
                name: self.config.server_name.clone(),
                title: Some("Documentation Search MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..rmcp::model::Implementation::default()
            },
            instructions: Some(
                "Documentation retrieval server. Use query_document for keyword search, \
                 semantic_search for meaning-based search over the vector index, \
                 rebuild_vector_index to refresh it, and the file tools to browse the tree."
                    .to_string(),
            ),
        }
    }
}
