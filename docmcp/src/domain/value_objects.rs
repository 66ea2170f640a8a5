/// Value objects for the domain layer
use super::base::{DomainError, DomainResult, ValueObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A validated language tag (`zh`, `en`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    pub fn new(tag: impl Into<String>) -> DomainResult<Self> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(DomainError::InvalidValue(
                "Language tag cannot be empty".to_string(),
            ));
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::InvalidValue(format!(
                "Language tag must be lowercase ASCII: {}",
                tag
            )));
        }
        Ok(Language(tag))
    }

    pub fn zh() -> Self {
        Language("zh".to_string())
    }

    pub fn en() -> Self {
        Language("en".to_string())
    }

    /// Languages covered by a full rebuild
    pub fn supported() -> Vec<Language> {
        vec![Language::zh(), Language::en()]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the vector store collection holding this language's chunks.
    /// The `docs_{language}` convention is part of the on-disk contract.
    pub fn collection_name(&self) -> String {
        format!("docs_{}", self.0)
    }
}

impl ValueObject for Language {}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document's path relative to the project root, posix-style
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn new(relative: impl Into<String>) -> DomainResult<Self> {
        let relative = relative.into().replace('\\', "/");
        if relative.is_empty() {
            return Err(DomainError::InvalidValue(
                "Document path cannot be empty".to_string(),
            ));
        }
        Ok(DocumentPath(relative))
    }

    /// Build from an absolute file path and the project root it must live under
    pub fn from_project_path(file_path: &Path, project_root: &Path) -> DomainResult<Self> {
        let relative = file_path.strip_prefix(project_root).map_err(|_| {
            DomainError::InvalidValue(format!(
                "Path {} is not under project root {}",
                file_path.display(),
                project_root.display()
            ))
        })?;
        let parts: Option<Vec<&str>> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        let parts = parts.ok_or_else(|| {
            DomainError::InvalidValue(format!("Non-UTF8 path: {}", file_path.display()))
        })?;
        Self::new(parts.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The normalized identifier prefix shared by all chunks of this document
    pub fn document_key(&self) -> String {
        self.0.replace(['/', '\\'], "_")
    }

    /// Deterministic identifier for the chunk at `ordinal`
    pub fn chunk_id(&self, ordinal: usize) -> ChunkId {
        ChunkId(format!("{}_chunk_{}", self.document_key(), ordinal))
    }
}

impl ValueObject for DocumentPath {}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic identifier of a stored chunk: `{document_key}_chunk_{ordinal}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChunkId(String);

impl ChunkId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidValue(
                "ChunkId cannot be empty".to_string(),
            ));
        }
        Ok(ChunkId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the owning document's key by stripping the `_chunk_{n}` suffix
    pub fn document_key(&self) -> &str {
        match self.0.rsplit_once("_chunk_") {
            Some((prefix, _)) => prefix,
            None => &self.0,
        }
    }

    /// The chunk's ordinal within its document, when the suffix is well-formed
    pub fn ordinal(&self) -> Option<usize> {
        self.0
            .rsplit_once("_chunk_")
            .and_then(|(_, n)| n.parse().ok())
    }
}

impl ValueObject for ChunkId {}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed-length embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> DomainResult<Self> {
        if values.is_empty() {
            return Err(DomainError::InvalidValue(
                "Embedding vector cannot be empty".to_string(),
            ));
        }
        Ok(EmbeddingVector(values))
    }

    /// Zero vector of the given dimension, the encoding of empty text
    pub fn zeros(dimension: usize) -> Self {
        EmbeddingVector(vec![0.0; dimension.max(1)])
    }

    pub fn dimensions(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension_count(&self) -> usize {
        self.0.len()
    }

    /// Cosine similarity with another vector.
    /// Returns 0.0 when either vector has zero norm.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> DomainResult<f32> {
        if self.0.len() != other.0.len() {
            return Err(DomainError::InvalidOperation(format!(
                "Dimension mismatch: {} vs {}",
                self.0.len(),
                other.0.len()
            )));
        }
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        let norm_a: f32 = self.0.iter().map(|a| a * a).sum::<f32>().sqrt();
        let norm_b: f32 = other.0.iter().map(|b| b * b).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }
        Ok(dot / (norm_a * norm_b))
    }
}

/// Supported embedding models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingModel {
    /// Multilingual default, matches zh + en documentation
    #[serde(rename = "paraphrase-multilingual-MiniLM-L12-v2")]
    ParaphraseMLMiniLML12V2,
    /// English-only alternative
    #[serde(rename = "all-MiniLM-L6-v2")]
    AllMiniLML6V2,
}

impl EmbeddingModel {
    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::ParaphraseMLMiniLML12V2 => "paraphrase-multilingual-MiniLM-L12-v2",
            EmbeddingModel::AllMiniLML6V2 => "all-MiniLM-L6-v2",
        }
    }

    pub fn dimension_count(&self) -> usize {
        match self {
            EmbeddingModel::ParaphraseMLMiniLML12V2 => 384,
            EmbeddingModel::AllMiniLML6V2 => 384,
        }
    }

    /// Maximum input sequence length, in tokens
    pub fn max_input_length(&self) -> usize {
        match self {
            EmbeddingModel::ParaphraseMLMiniLML12V2 => 128,
            EmbeddingModel::AllMiniLML6V2 => 256,
        }
    }
}

impl Default for EmbeddingModel {
    fn default() -> Self {
        EmbeddingModel::ParaphraseMLMiniLML12V2
    }
}

impl ValueObject for EmbeddingModel {}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.model_name())
    }
}

/// A parsed line range: `"all"`, `"50"` (first 50 lines) or `"0~100"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRange {
    All,
    Lines { start: usize, end: usize },
}

impl LineRange {
    /// `(start, end)` bounds; `None` end means read to the last line.
    /// Lines are 1-based when enumerated; a line is included when
    /// `line_number > start` and `line_number <= end`.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match self {
            LineRange::All => (0, None),
            LineRange::Lines { start, end } => (*start, Some(*end)),
        }
    }
}

impl ValueObject for LineRange {}

impl std::str::FromStr for LineRange {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(LineRange::All);
        }
        if let Some((start, end)) = s.split_once('~') {
            let start: usize = start.trim().parse().map_err(|_| invalid_range(s))?;
            let end: usize = end.trim().parse().map_err(|_| invalid_range(s))?;
            if end < start {
                return Err(DomainError::InvalidValue(format!(
                    "Invalid line_range: end {} is before start {}",
                    end, start
                )));
            }
            return Ok(LineRange::Lines { start, end });
        }
        let max_lines: usize = s.parse().map_err(|_| invalid_range(s))?;
        Ok(LineRange::Lines {
            start: 0,
            end: max_lines,
        })
    }
}

fn invalid_range(input: &str) -> DomainError {
    DomainError::InvalidValue(format!(
        "Invalid line_range format: {}. Expected format: '0~100', '50' or 'all'",
        input
    ))
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRange::All => write!(f, "all"),
            LineRange::Lines { start, end } => write!(f, "{}~{}", start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_creation() {
        let lang = Language::new("zh").unwrap();
        assert_eq!(lang.as_str(), "zh");
        assert_eq!(lang.collection_name(), "docs_zh");

        assert!(Language::new("").is_err());
        assert!(Language::new("ZH").is_err());
        assert!(Language::new("pt-br").is_ok());
    }

    #[test]
    fn test_supported_languages() {
        let supported = Language::supported();
        assert_eq!(supported, vec![Language::zh(), Language::en()]);
    }

    #[test]
    fn test_document_path_from_project_path() {
        let root = PathBuf::from("/project");
        let file = PathBuf::from("/project/docs/guide/getting-started.md");
        let doc = DocumentPath::from_project_path(&file, &root).unwrap();
        assert_eq!(doc.as_str(), "docs/guide/getting-started.md");

        let outside = PathBuf::from("/elsewhere/file.md");
        assert!(DocumentPath::from_project_path(&outside, &root).is_err());
    }

    #[test]
    fn test_document_key_replaces_separators() {
        let doc = DocumentPath::new("docs/guide/intro.md").unwrap();
        assert_eq!(doc.document_key(), "docs_guide_intro.md");

        let windows = DocumentPath::new("docs\\guide\\intro.md").unwrap();
        assert_eq!(windows.document_key(), "docs_guide_intro.md");
    }

    #[test]
    fn test_chunk_id_is_deterministic() {
        let doc = DocumentPath::new("docs/guide/intro.md").unwrap();
        let first = doc.chunk_id(3);
        let second = doc.chunk_id(3);
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "docs_guide_intro.md_chunk_3");
    }

    #[test]
    fn test_chunk_id_document_key_round_trip() {
        let doc = DocumentPath::new("docs/faq.md").unwrap();
        let id = doc.chunk_id(12);
        assert_eq!(id.document_key(), doc.document_key());
        assert_eq!(id.ordinal(), Some(12));
    }

    #[test]
    fn test_chunk_id_without_suffix() {
        let id = ChunkId::new("free-form").unwrap();
        assert_eq!(id.document_key(), "free-form");
        assert_eq!(id.ordinal(), None);
    }

    #[test]
    fn test_embedding_vector_requires_values() {
        assert!(EmbeddingVector::new(vec![]).is_err());
        let v = EmbeddingVector::new(vec![0.1, 0.2]).unwrap();
        assert_eq!(v.dimension_count(), 2);
    }

    #[test]
    fn test_cosine_similarity_of_self_is_one() {
        let v = EmbeddingVector::new(vec![0.3, -1.2, 4.5]).unwrap();
        let sim = v.cosine_similarity(&v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_norm_is_zero() {
        let zero = EmbeddingVector::zeros(3);
        let v = EmbeddingVector::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(zero.cosine_similarity(&v).unwrap(), 0.0);
        assert_eq!(v.cosine_similarity(&zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let a = EmbeddingVector::new(vec![1.0, 2.0]).unwrap();
        let b = EmbeddingVector::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert!(a.cosine_similarity(&b).is_err());
    }

    #[test]
    fn test_line_range_grammar() {
        assert_eq!("all".parse::<LineRange>().unwrap(), LineRange::All);
        assert_eq!("ALL".parse::<LineRange>().unwrap(), LineRange::All);
        assert_eq!(
            "0~100".parse::<LineRange>().unwrap(),
            LineRange::Lines { start: 0, end: 100 }
        );
        assert_eq!(
            "50".parse::<LineRange>().unwrap(),
            LineRange::Lines { start: 0, end: 50 }
        );
        assert!("abc".parse::<LineRange>().is_err());
        assert!("10~".parse::<LineRange>().is_err());
        assert!("100~10".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_line_range_bounds() {
        assert_eq!(LineRange::All.bounds(), (0, None));
        assert_eq!(
            LineRange::Lines { start: 10, end: 20 }.bounds(),
            (10, Some(20))
        );
    }
}
