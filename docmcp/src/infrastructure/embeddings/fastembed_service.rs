/// FastEmbed gateway for local embedding generation
use anyhow::{Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::dto::ModelInfo;
use crate::application::gateways::Embedder;
use crate::domain::value_objects::{EmbeddingModel, EmbeddingVector};

/// Embedding gateway backed by fastembed
pub struct FastEmbedService {
    model: Arc<Mutex<TextEmbedding>>,
    model_type: EmbeddingModel,
}

impl FastEmbedService {
    /// Create a new FastEmbed service with the specified model.
    /// A model that fails to load is fatal; there is no lazy retry.
    pub async fn new(model_type: EmbeddingModel) -> Result<Self> {
        info!("Initializing FastEmbed service with model: {}", model_type);

        let fastembed_model = match model_type {
            EmbeddingModel::ParaphraseMLMiniLML12V2 => FastEmbedModel::ParaphraseMLMiniLML12V2,
            EmbeddingModel::AllMiniLML6V2 => FastEmbedModel::AllMiniLML6V2,
        };

        let model = TextEmbedding::try_new(
            InitOptions::new(fastembed_model).with_show_download_progress(true),
        )
        .context("Failed to initialize FastEmbed model")?;

        info!("FastEmbed model initialized successfully");

        Ok(FastEmbedService {
            model: Arc::new(Mutex::new(model)),
            model_type,
        })
    }

    /// Create a new FastEmbed service with the default model
    pub async fn new_default() -> Result<Self> {
        Self::new(EmbeddingModel::default()).await
    }

    pub fn model_type(&self) -> EmbeddingModel {
        self.model_type
    }

    pub fn dimension_count(&self) -> usize {
        self.model_type.dimension_count()
    }
}

#[async_trait]
impl Embedder for FastEmbedService {
    async fn encode(&self, text: &str) -> Result<EmbeddingVector> {
        if text.trim().is_empty() {
            debug!("Empty text provided for encoding, returning zero vector");
            return Ok(EmbeddingVector::zeros(self.dimension_count()));
        }

        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(vec![text], None)
            .context("Failed to generate embedding")?;

        let embedding_vec = embeddings
            .into_iter()
            .next()
            .context("No embedding returned")?;

        EmbeddingVector::new(embedding_vec)
            .map_err(|e| anyhow::anyhow!("Invalid embedding vector: {}", e))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let valid_texts: Vec<&str> = texts
            .iter()
            .map(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect();

        if valid_texts.is_empty() {
            debug!("No non-empty texts in batch, nothing to encode");
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for batch of {} texts", valid_texts.len());

        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(valid_texts, None)
            .context("Failed to generate batch embeddings")?;

        let mut result = Vec::with_capacity(embeddings.len());
        for embedding_vec in embeddings {
            let embedding = EmbeddingVector::new(embedding_vec)
                .map_err(|e| anyhow::anyhow!("Invalid embedding vector: {}", e))?;
            result.push(embedding);
        }

        debug!("Generated {} embeddings successfully", result.len());
        Ok(result)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_name: self.model_type.model_name().to_string(),
            dimension: self.model_type.dimension_count(),
            max_input_length: self.model_type.max_input_length(),
            loaded: true,
        }
    }
}
