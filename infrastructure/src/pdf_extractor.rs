use domain::errors::{RagError, RagResult};
use domain::ports::TextExtractor;
use std::panic::{self, AssertUnwindSafe};

/// Readers accept the `%PDF-` header anywhere in this many leading bytes.
const HEADER_SEARCH_LEN: usize = 1024;

/// PDF text extraction backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let prefix = &bytes[..bytes.len().min(HEADER_SEARCH_LEN)];
    prefix.windows(5).any(|w| w == b"%PDF-")
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, bytes: &[u8]) -> RagResult<String> {
        if !has_pdf_header(bytes) {
            return Err(RagError::Ingestion("not a PDF file".to_string()));
        }
        // pdf-extract panics on some structurally broken documents.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(bytes)
        }));
        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(RagError::Ingestion(format!("could not read PDF: {}", e))),
            Err(_) => Err(RagError::Ingestion(
                "could not read PDF: malformed document structure".to_string(),
            )),
        }
    }
}
