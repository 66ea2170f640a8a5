/// Plain-text report rendering for the tool surface
use crate::application::dto::{
    IndexStats, LexicalMatch, RebuildAllReport, RebuildOutcome, RebuildReport, ScoredChunk,
};

const EXCERPT_MAX_CHARS: usize = 500;

/// Truncate to a character budget with an ellipsis marker
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated)
}

pub fn format_lexical_report(query: &str, matches: &[LexicalMatch]) -> String {
    if matches.is_empty() {
        return format!("No documents found matching query: {}", query);
    }

    let mut report = format!("Found {} documents:\n", matches.len());
    for m in matches {
        report.push_str(&format!(
            "\n--- {} ---\nView online: {}\n\n{}\n",
            m.path, m.url, m.excerpt
        ));
    }
    report
}

pub fn format_semantic_report(query: &str, results: &[ScoredChunk]) -> String {
    if results.is_empty() {
        return format!("No results found for query: {}", query);
    }

    let mut report = format!("Found {} results for '{}':\n", results.len(), query);
    for (i, result) in results.iter().enumerate() {
        report.push_str(&format!(
            "\n{}. {} (similarity: {:.3})\n   {}\n   View online: {}\n\n{}\n",
            i + 1,
            result.metadata.title,
            result.similarity,
            result.metadata.file_path,
            result.metadata.url,
            truncate_text(&result.content, EXCERPT_MAX_CHARS)
        ));
    }
    report
}

pub fn format_rebuild_report(report: &RebuildReport) -> String {
    format!(
        "Rebuild completed for '{}':\n\
         - Files scanned: {}\n\
         - Chunks added: {}\n\
         - Chunks skipped: {}\n\
         - Total chunks in collection: {}\n\
         - Collection: {}",
        report.language,
        report.total_files,
        report.added_chunks,
        report.skipped_chunks,
        report.total_chunks,
        report.collection_name
    )
}

pub fn format_rebuild_all_report(report: &RebuildAllReport) -> String {
    let mut text = format!(
        "Rebuild of all indexes {}\n\
         - Total files: {}\n\
         - Chunks added: {}\n\
         - Chunks skipped: {}\n\
         - Total chunks: {}\n\
         Per language:",
        if report.success { "succeeded" } else { "failed" },
        report.total_files,
        report.added_chunks,
        report.skipped_chunks,
        report.total_chunks
    );
    for detail in &report.details {
        match &detail.outcome {
            RebuildOutcome::Completed(r) => {
                text.push_str(&format!(
                    "\n- {}: {} files, {} added, {} skipped ({})",
                    detail.language,
                    r.total_files,
                    r.added_chunks,
                    r.skipped_chunks,
                    r.collection_name
                ));
            }
            RebuildOutcome::Failed { error } => {
                text.push_str(&format!("\n- {}: failed - {}", detail.language, error));
            }
        }
    }
    text
}

pub fn format_stats_report(stats: &IndexStats) -> String {
    let mut text = format!(
        "Vector index statistics for '{}':\n\
         - Collection: {}\n\
         - Total chunks: {}\n\
         - Total documents: {}\n\
         - Model: {} ({} dimensions, max input {} tokens)\n\
         - Persist location: {}",
        stats.language,
        stats.collection_name,
        stats.total_chunks,
        stats.total_documents,
        stats.model.model_name,
        stats.model.dimension,
        stats.model.max_input_length,
        stats.persist_location
    );
    if !stats.categories.is_empty() {
        text.push_str("\nChunks per category:");
        for (category, count) in &stats.categories {
            text.push_str(&format!("\n- {}: {}", category, count));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::{ChunkMetadata, LanguageRebuild, ModelInfo};
    use crate::domain::value_objects::Language;
    use std::collections::BTreeMap;

    fn sample_metadata() -> ChunkMetadata {
        ChunkMetadata {
            file_path: "docs/guide/intro.md".to_string(),
            language: "zh".to_string(),
            chunk_index: 0,
            title: "Intro".to_string(),
            category: "guide".to_string(),
            url: "https://docs.example.com/docs/guide/intro".to_string(),
            timestamp: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 5), "abcde...");
    }

    #[test]
    fn test_lexical_report_empty() {
        let report = format_lexical_report("budget", &[]);
        assert_eq!(report, "No documents found matching query: budget");
    }

    #[test]
    fn test_lexical_report_lists_matches() {
        let matches = vec![LexicalMatch {
            path: "docs/guide/intro.md".to_string(),
            url: "https://docs.example.com/docs/guide/intro".to_string(),
            excerpt: "Budgets help you track spending.".to_string(),
        }];
        let report = format_lexical_report("budget", &matches);
        assert!(report.starts_with("Found 1 documents:"));
        assert!(report.contains("--- docs/guide/intro.md ---"));
        assert!(report.contains("View online: https://docs.example.com/docs/guide/intro"));
        assert!(report.contains("Budgets help you track spending."));
    }

    #[test]
    fn test_semantic_report_lists_results() {
        let results = vec![ScoredChunk {
            id: "docs_guide_intro.md_chunk_0".to_string(),
            content: "Budgets help you track spending.".to_string(),
            metadata: sample_metadata(),
            similarity: 0.8234,
            distance: 0.1766,
        }];
        let report = format_semantic_report("budget", &results);
        assert!(report.contains("Found 1 results for 'budget':"));
        assert!(report.contains("1. Intro (similarity: 0.823)"));
        assert!(report.contains("docs/guide/intro.md"));
    }

    #[test]
    fn test_rebuild_all_report_marks_failures() {
        let report = RebuildAllReport {
            success: false,
            total_files: 3,
            added_chunks: 12,
            skipped_chunks: 0,
            total_chunks: 12,
            details: vec![
                LanguageRebuild {
                    language: Language::zh(),
                    outcome: RebuildOutcome::Completed(RebuildReport {
                        language: Language::zh(),
                        total_files: 3,
                        added_chunks: 12,
                        skipped_chunks: 0,
                        total_chunks: 12,
                        collection_name: "docs_zh".to_string(),
                    }),
                },
                LanguageRebuild {
                    language: Language::en(),
                    outcome: RebuildOutcome::Failed {
                        error: "Documents root not found: /missing".to_string(),
                    },
                },
            ],
        };
        let text = format_rebuild_all_report(&report);
        assert!(text.starts_with("Rebuild of all indexes failed"));
        assert!(text.contains("- zh: 3 files, 12 added, 0 skipped (docs_zh)"));
        assert!(text.contains("- en: failed - Documents root not found"));
    }

    #[test]
    fn test_stats_report() {
        let mut categories = BTreeMap::new();
        categories.insert("guide".to_string(), 8);
        categories.insert("faq".to_string(), 4);
        let stats = IndexStats {
            language: Language::zh(),
            collection_name: "docs_zh".to_string(),
            total_chunks: 12,
            total_documents: 3,
            categories,
            model: ModelInfo {
                model_name: "paraphrase-multilingual-MiniLM-L12-v2".to_string(),
                dimension: 384,
                max_input_length: 128,
                loaded: true,
            },
            persist_location: "http://localhost:6334".to_string(),
        };
        let text = format_stats_report(&stats);
        assert!(text.contains("Total chunks: 12"));
        assert!(text.contains("Total documents: 3"));
        assert!(text.contains("- faq: 4"));
        assert!(text.contains("- guide: 8"));
        assert!(text.contains("384 dimensions"));
    }
}
