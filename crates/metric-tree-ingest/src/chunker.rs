//! Fixed-width character windows over cleaned text.
//!
//! Windows are counted in characters, not bytes, so multi-byte text is never
//! split inside a code point.

use metric_tree_core::config::IngestConfig;
use metric_tree_core::retrieval::clean_text;

/// Chunking configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentChunker {
    /// Window width in characters
    chunk_size: usize,
    /// Characters shared by consecutive windows
    overlap: usize,
}

impl Default for DocumentChunker {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default())
    }
}

impl DocumentChunker {
    /// Create a chunker. An overlap not smaller than the window is reduced
    /// so that every step advances at least one character.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into overlapping windows after collapsing whitespace.
    ///
    /// Text no longer than one window is returned whole; empty text yields
    /// no chunks. The final window may be shorter than `chunk_size`.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = cleaned.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![cleaned];
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::with_capacity(chars.len() / step + 1);
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            start += step;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunker_default() {
        let chunker = DocumentChunker::default();
        assert_eq!(chunker.chunk_size(), 900);
        assert_eq!(chunker.overlap(), 200);
    }

    #[test]
    fn test_chunk_small_text() {
        let chunker = DocumentChunker::default();
        let chunks = chunker.chunk("  Hello,\n\n world!  ");
        assert_eq!(chunks, vec!["Hello, world!"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(DocumentChunker::default().chunk(" \n\t ").is_empty());
    }

    #[test]
    fn test_window_and_overlap() {
        let chunker = DocumentChunker::default();
        let text: String = (0..2000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = chunker.chunk(&text);

        // starts at 0, 700, 1400; the last window runs to the end
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 900);
        assert_eq!(chunks[2].len(), 600);
        assert_eq!(&chunks[0][700..], &chunks[1][..200]);
    }

    #[test]
    fn test_exact_window_is_single_chunk() {
        let text = "x".repeat(900);
        assert_eq!(DocumentChunker::default().chunk(&text).len(), 1);
    }

    #[test]
    fn test_multibyte_counted_in_chars() {
        let chunker = DocumentChunker::new(4, 1);
        let chunks = chunker.chunk("→→→→→→→");
        assert_eq!(chunks, vec!["→→→→", "→→→→", "→"]);
    }

    #[test]
    fn test_degenerate_overlap_still_advances() {
        let chunker = DocumentChunker::new(3, 10);
        assert_eq!(chunker.overlap(), 2);
        assert_eq!(chunker.chunk("abcde").len(), 5);
    }
}
