/// Offset-aware text chunking for embedding
///
/// Splits document text into overlapping windows, preferring to cut on a
/// natural boundary (newline, full-width period, ASCII period) found in the
/// second half of the window. Offsets are Unicode scalar values, so CJK text
/// chunks the same way as ASCII.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        TextChunker {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split `text` into ordered, non-empty, whitespace-trimmed chunks.
    ///
    /// Text no longer than the chunk size is returned as-is. A zero chunk
    /// size degrades to a single whole-text chunk instead of looping.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        if self.chunk_size == 0 || total <= self.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            // The window end may pass the end of text; it is clamped only
            // when slicing so that the advance step matches the window.
            let candidate = start + self.chunk_size;
            let mut end = candidate;

            if candidate < total {
                // Prefer a boundary in the second half of the window.
                let midpoint = start + self.chunk_size / 2;
                let boundary = ['\n', '。', '.']
                    .iter()
                    .find_map(|c| rfind_char(&chars, start, candidate, *c).filter(|p| *p > midpoint));
                if let Some(pos) = boundary {
                    end = pos + 1;
                }
            }

            let segment: String = chars[start..end.min(total)].iter().collect();
            let trimmed = segment.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }

            // Strictly advance even when the overlap swallows the window,
            // so pathological overlap settings still terminate.
            let next = end.saturating_sub(self.chunk_overlap);
            start = next.max(start + 1);
        }

        chunks
    }
}

fn rfind_char(chars: &[char], start: usize, end: usize, needle: char) -> Option<usize> {
    let end = end.min(chars.len());
    chars[start..end]
        .iter()
        .rposition(|c| *c == needle)
        .map(|i| start + i)
}
