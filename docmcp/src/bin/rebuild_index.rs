//! Rebuild the documentation vector index from the command line.
//!
//! # Usage
//!
//! ```bash
//! rebuild-index --language all --force
//! ```
//!
//! Exits non-zero when any rebuild fails.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use docmcp::config::ServerConfig;
use docmcp::domain::value_objects::Language;
use docmcp::infrastructure::embeddings::{FastEmbedService, QdrantChunkStore};
use docmcp::interface::format::{format_rebuild_all_report, format_rebuild_report};
use docmcp::interface::DocIndexService;

#[derive(Parser, Debug)]
#[command(name = "rebuild-index")]
#[command(about = "Rebuild the documentation vector index")]
struct Args {
    /// Language to rebuild
    #[arg(long, default_value = "all", value_parser = ["zh", "en", "all"])]
    language: String,

    /// Drop and re-create the collection before indexing
    #[arg(long)]
    force: bool,

    /// Root of the documentation project (overrides configuration)
    #[arg(long)]
    project_root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load()?;
    if let Some(project_root) = args.project_root {
        config = config.with_project_root(project_root);
    }
    let config = Arc::new(config);

    let embedder = Arc::new(
        FastEmbedService::new(config.embedding_model)
            .await
            .context("Failed to initialize embedding model")?,
    );
    let store = Arc::new(
        QdrantChunkStore::new(&config.qdrant_url, config.embedding_model.dimension_count())
            .context("Failed to initialize vector store")?,
    );
    let index = DocIndexService::new(Arc::clone(&config), embedder, store);

    if args.language == "all" {
        let report = index.rebuild_all_indexes(args.force).await;
        println!("{}", format_rebuild_all_report(&report));
        if !report.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    // The value parser limits language to zh/en/all, so this cannot fail.
    let language = Language::new(args.language.clone())
        .map_err(|e| anyhow::anyhow!("Invalid language {}: {}", args.language, e))?;
    match index.rebuild_index(&language, args.force).await {
        Ok(report) => {
            println!("{}", format_rebuild_report(&report));
            Ok(())
        }
        Err(e) => {
            eprintln!("Rebuild failed for {}: {}", language, e);
            std::process::exit(1);
        }
    }
}
