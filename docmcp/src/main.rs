//! MCP server for documentation retrieval.
//!
//! Uses stdio transport (stdin/stdout for JSON-RPC communication).
//!
//! # Usage
//!
//! ```bash
//! docmcp --project-root /path/to/docs-site
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docmcp::config::ServerConfig;
use docmcp::infrastructure::embeddings::{FastEmbedService, QdrantChunkStore};
use docmcp::interface::{DocIndexService, DocSearchService, DocsServer};

#[derive(Parser, Debug)]
#[command(name = "docmcp")]
#[command(about = "MCP server for documentation search and indexing")]
struct Args {
    /// Root of the documentation project (overrides configuration)
    #[arg(long)]
    project_root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load()?;
    if let Some(project_root) = args.project_root {
        config = config.with_project_root(project_root);
    }
    let config = Arc::new(config);

    info!("Starting documentation MCP server");
    info!("Project root: {}", config.project_root.display());

    // Constructed once and injected; a model that fails to load is fatal.
    let embedder = Arc::new(
        FastEmbedService::new(config.embedding_model)
            .await
            .context("Failed to initialize embedding model")?,
    );
    let store = Arc::new(
        QdrantChunkStore::new(&config.qdrant_url, config.embedding_model.dimension_count())
            .context("Failed to initialize vector store")?,
    );

    let index = Arc::new(DocIndexService::new(
        Arc::clone(&config),
        Arc::clone(&embedder),
        Arc::clone(&store),
    ));
    let search = Arc::new(DocSearchService::new(
        Arc::clone(&config),
        Arc::clone(&embedder),
        Arc::clone(&store),
    ));

    let server = DocsServer::new(config, index, search);

    info!("MCP server ready, listening on stdio");

    use rmcp::ServiceExt;
    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());
    let service = server
        .serve((stdin, stdout))
        .await
        .context("Failed to initialize MCP server")?;

    service
        .waiting()
        .await
        .context("Server error during execution")?;

    Ok(())
}
