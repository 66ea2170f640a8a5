/// Chunk metadata derivation
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::application::dto::ChunkMetadata;
use crate::config::ServerConfig;
use crate::domain::base::{DomainError, DomainResult};
use crate::domain::value_objects::{DocumentPath, Language};

/// Derives the descriptive fields stored with every chunk
pub struct MetadataExtractor {
    config: Arc<ServerConfig>,
}

impl MetadataExtractor {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        MetadataExtractor { config }
    }

    /// Extract metadata for one chunk of a document.
    ///
    /// Derivation failures (e.g. a path outside the expected roots) fall
    /// back to placeholder values instead of failing the add operation.
    pub fn extract(
        &self,
        file_path: &Path,
        chunk_index: usize,
        language: &Language,
    ) -> ChunkMetadata {
        match self.derive(file_path, chunk_index, language) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "Error extracting metadata from {}: {}",
                    file_path.display(),
                    e
                );
                ChunkMetadata {
                    file_path: file_path.display().to_string(),
                    language: language.as_str().to_string(),
                    chunk_index,
                    title: "Unknown".to_string(),
                    category: "unknown".to_string(),
                    url: String::new(),
                    timestamp: Utc::now().to_rfc3339(),
                }
            }
        }
    }

    fn derive(
        &self,
        file_path: &Path,
        chunk_index: usize,
        language: &Language,
    ) -> DomainResult<ChunkMetadata> {
        let relative = DocumentPath::from_project_path(file_path, &self.config.project_root)?;
        let title = title_from_file_name(file_path);

        let language_root = self.config.language_root(language);
        let doc_relative = file_path.strip_prefix(&language_root).map_err(|_| {
            DomainError::InvalidValue(format!(
                "Path {} is not under language root {}",
                file_path.display(),
                language_root.display()
            ))
        })?;

        let components: Vec<String> = doc_relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .map(|s| s.to_string())
            .collect();
        let category = if components.len() > 1 {
            components[0].clone()
        } else {
            "root".to_string()
        };

        let url = self
            .config
            .document_url(&components.join("/"), language);

        Ok(ChunkMetadata {
            file_path: relative.as_str().to_string(),
            language: language.as_str().to_string(),
            chunk_index,
            title,
            category,
            url,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

/// Title from the file stem: separators become spaces, words are title-cased
fn title_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new(Arc::new(
            ServerConfig {
                website_url: "https://docs.example.com".to_string(),
                ..ServerConfig::default()
            }
            .with_project_root("/project"),
        ))
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(
            title_from_file_name(Path::new("getting-started.md")),
            "Getting Started"
        );
        assert_eq!(
            title_from_file_name(Path::new("api_reference.md")),
            "Api Reference"
        );
        assert_eq!(title_from_file_name(Path::new("faq.md")), "Faq");
    }

    #[test]
    fn test_extract_nested_document() {
        let file = PathBuf::from("/project/docs/guide/getting-started.md");
        let metadata = extractor().extract(&file, 2, &Language::zh());

        assert_eq!(metadata.file_path, "docs/guide/getting-started.md");
        assert_eq!(metadata.language, "zh");
        assert_eq!(metadata.chunk_index, 2);
        assert_eq!(metadata.title, "Getting Started");
        assert_eq!(metadata.category, "guide");
        assert_eq!(
            metadata.url,
            "https://docs.example.com/docs/guide/getting-started"
        );
        assert!(!metadata.timestamp.is_empty());
    }

    #[test]
    fn test_extract_document_at_language_root() {
        let file = PathBuf::from("/project/docs/intro.md");
        let metadata = extractor().extract(&file, 0, &Language::zh());

        assert_eq!(metadata.category, "root");
        assert_eq!(metadata.url, "https://docs.example.com/docs/intro");
    }

    #[test]
    fn test_extract_translated_document() {
        let file = PathBuf::from(
            "/project/i18n/en/docusaurus-plugin-content-docs/current/guide/intro.md",
        );
        let metadata = extractor().extract(&file, 0, &Language::en());

        assert_eq!(metadata.category, "guide");
        assert_eq!(metadata.url, "https://docs.example.com/en/docs/guide/intro");
    }

    #[test]
    fn test_extract_falls_back_to_placeholders() {
        let file = PathBuf::from("/elsewhere/outside.md");
        let metadata = extractor().extract(&file, 1, &Language::zh());

        assert_eq!(metadata.title, "Unknown");
        assert_eq!(metadata.category, "unknown");
        assert_eq!(metadata.url, "");
        assert_eq!(metadata.chunk_index, 1);
    }
}
