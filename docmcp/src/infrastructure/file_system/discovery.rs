/// File discovery utilities for the documentation tree
use std::path::{Path, PathBuf};
use tokio::fs;

/// Discover all .md files in a directory recursively
pub async fn discover_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    discover_files_with_extensions(dir, &["md"]).await
}

/// Discover files matching any of the given extensions, recursively.
/// Hidden directories are skipped.
pub async fn discover_files_with_extensions(
    dir: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, std::io::Error> {
    Box::pin(async move {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_file() {
                if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
                    if extensions.iter().any(|e| extension.eq_ignore_ascii_case(e)) {
                        files.push(path);
                    }
                }
            } else if path.is_dir() {
                if let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) {
                    if !dir_name.starts_with('.') {
                        let mut sub_files =
                            discover_files_with_extensions(&path, extensions).await?;
                        files.append(&mut sub_files);
                    }
                }
            }
        }

        Ok(files)
    })
    .await
}
