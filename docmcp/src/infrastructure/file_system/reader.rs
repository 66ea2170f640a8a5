/// Line-range file reading
use std::path::Path;
use tokio::fs;

use crate::domain::value_objects::LineRange;

/// Read a file's content restricted to a line range.
///
/// Lines are counted from 1. The range's `start` is exclusive (a `0~100`
/// range reads lines 1-100). When a leading range cuts the file short, a
/// truncation marker is appended so callers can tell the content continues.
/// Invalid UTF-8 is replaced rather than rejected.
pub async fn read_file_content(path: &Path, range: &LineRange) -> Result<String, std::io::Error> {
    let bytes = fs::read(path).await?;
    let content = String::from_utf8_lossy(&bytes);

    let (start, end) = range.bounds();
    let mut lines = Vec::new();

    for (i, line) in content.split_inclusive('\n').enumerate() {
        let line_number = i + 1;
        if let Some(end) = end {
            if line_number > end {
                if start == 0 {
                    lines.push(format!("\n... (truncated after {} lines)", end));
                }
                break;
            }
        }
        if line_number > start {
            lines.push(line.to_string());
        }
    }

    Ok(lines.concat())
}

/// Basic information about a file on disk
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub extension: String,
}

pub async fn file_info(path: &Path) -> Result<FileInfo, std::io::Error> {
    let metadata = fs::metadata(path).await?;
    Ok(FileInfo {
        name: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string(),
        size: metadata.len(),
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase(),
    })
}

/// Render a byte count the way humans read it
pub fn friendly_size(size: u64) -> String {
    if size < 1024 {
        format!("{} bytes", size)
    } else if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_lines(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[tokio::test]
    async fn test_read_all() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "f.md", &["one", "two", "three"]);

        let content = read_file_content(&path, &LineRange::All).await.unwrap();
        assert_eq!(content, "one\ntwo\nthree");
    }

    #[tokio::test]
    async fn test_read_leading_range_appends_truncation_marker() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "f.md", &["one", "two", "three", "four"]);

        let range = LineRange::Lines { start: 0, end: 2 };
        let content = read_file_content(&path, &range).await.unwrap();
        assert!(content.starts_with("one\ntwo"));
        assert!(content.ends_with("... (truncated after 2 lines)"));
    }

    #[tokio::test]
    async fn test_read_middle_range_has_no_marker() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "f.md", &["one", "two", "three", "four"]);

        let range = LineRange::Lines { start: 2, end: 3 };
        let content = read_file_content(&path, &range).await.unwrap();
        assert_eq!(content, "three\n");
    }

    #[tokio::test]
    async fn test_range_past_end_reads_to_end() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "f.md", &["one", "two"]);

        let range = LineRange::Lines { start: 0, end: 100 };
        let content = read_file_content(&path, &range).await.unwrap();
        assert_eq!(content, "one\ntwo");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.md");
        assert!(read_file_content(&missing, &LineRange::All).await.is_err());
    }

    #[tokio::test]
    async fn test_file_info() {
        let dir = TempDir::new().unwrap();
        let path = write_lines(&dir, "image.PNG", &["data"]);

        let info = file_info(&path).await.unwrap();
        assert_eq!(info.name, "image.PNG");
        assert_eq!(info.extension, "png");
        assert_eq!(info.size, 4);
    }

    #[test]
    fn test_friendly_size() {
        assert_eq!(friendly_size(512), "512 bytes");
        assert_eq!(friendly_size(2048), "2.00 KB");
        assert_eq!(friendly_size(3 * 1024 * 1024), "3.00 MB");
    }
}
