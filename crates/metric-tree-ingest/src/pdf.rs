//! PDF Text Extraction using lopdf
//!
//! Page text is concatenated in page order. Scanned PDFs without a text
//! layer yield an empty string, which the pipeline reports as
//! `No text extracted.`

use lopdf::Document;
use tracing::debug;

use crate::{IngestError, IngestResult};

/// PDF Extractor - extracts text from PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes
    pub fn extract_text(&self, pdf_bytes: &[u8]) -> IngestResult<String> {
        let doc = Document::load_mem(pdf_bytes).map_err(|e| IngestError::Parse(e.to_string()))?;
        Ok(self.extract_text_from_doc(&doc))
    }

    fn extract_text_from_doc(&self, doc: &Document) -> String {
        let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut text = String::new();
        let mut skipped = 0usize;
        for page in &page_numbers {
            match doc.extract_text(&[*page]) {
                Ok(page_text) => {
                    if !text.is_empty() && !page_text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(page_text.trim());
                }
                Err(e) => {
                    skipped += 1;
                    debug!(page, error = %e, "Skipping unreadable PDF page");
                }
            }
        }

        debug!(
            pages = page_numbers.len(),
            skipped,
            chars = text.len(),
            "Extracted PDF text"
        );
        text
    }

    /// Whether bytes look like a PDF (`%PDF-` header)
    pub fn looks_like_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(b"%PDF-")
    }
}
