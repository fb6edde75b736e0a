//! PDF text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use tracing::{debug, trace};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    min_text_length: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            min_text_length: 50,
        }
    }

    /// Set the minimum text length for a PDF to count as text-based.
    pub fn with_min_text_length(mut self, len: usize) -> Self {
        self.min_text_length = len;
        self
    }

    /// Text of a loaded document, refusing scanned or empty files.
    pub fn extract_slip_text(&self) -> Result<String> {
        let text = self.extract_text()?;
        let pdf_type = self.classify(&text);
        if !pdf_type.has_text() {
            debug!("PDF text layer has {} chars, treating as {:?}", text.trim().len(), pdf_type);
            return Err(PdfError::NoText);
        }
        Ok(text)
    }

    /// Classify the document from its extracted text and image count.
    fn classify(&self, text: &str) -> PdfType {
        let has_text = text.trim().len() >= self.min_text_length;
        let has_images = self.count_images() > 0;

        let pdf_type = match (has_text, has_images) {
            (true, false) => PdfType::Text,
            (false, true) => PdfType::Image,
            (true, true) => PdfType::Hybrid,
            (false, false) => PdfType::Empty,
        };

        debug!("PDF analysis: has_text={}, has_images={} -> {:?}", has_text, has_images, pdf_type);
        pdf_type
    }

    /// Count image XObjects in the document.
    fn count_images(&self) -> usize {
        let Some(doc) = self.document.as_ref() else {
            return 0;
        };

        let count = doc
            .objects
            .values()
            .filter(|object| is_image(object))
            .count();

        debug!("Found {} images in document", count);
        count
    }
}

fn is_image(object: &Object) -> bool {
    let Object::Stream(stream) = object else {
        return false;
    };

    let is_image = stream
        .dict
        .get(b"Subtype")
        .ok()
        .and_then(|subtype| subtype.as_name().ok())
        .is_some_and(|name| name == b"Image");

    if is_image {
        trace!("Found image object");
    }
    is_image
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // Save decrypted document to raw_data for pdf_extract
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn analyze(&self) -> PdfType {
        let text = self.extract_text().unwrap_or_default();
        self.classify(&text)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Stream};

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert_eq!(extractor.analyze(), PdfType::Empty);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_slip_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"01 NOME: ACME\n10 VALOR TOTAL 1,00");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    fn with_image() -> PdfExtractor {
        let mut dict = Dictionary::new();
        dict.set("Subtype", Object::Name(b"Image".to_vec()));

        let mut doc = Document::with_version("1.5");
        doc.add_object(Stream::new(dict, vec![]));

        let mut extractor = PdfExtractor::new().with_min_text_length(10);
        extractor.document = Some(doc);
        extractor
    }

    #[test]
    fn test_classify_without_images() {
        let extractor = PdfExtractor::new().with_min_text_length(10);
        assert_eq!(extractor.classify("  short  "), PdfType::Empty);
        assert_eq!(extractor.classify("10 VALOR TOTAL 1,00"), PdfType::Text);
    }

    #[test]
    fn test_classify_with_images() {
        let extractor = with_image();
        assert_eq!(extractor.count_images(), 1);
        assert_eq!(extractor.classify(""), PdfType::Image);
        assert_eq!(extractor.classify("10 VALOR TOTAL 1,00"), PdfType::Hybrid);
    }

    #[test]
    fn test_is_image() {
        let mut dict = Dictionary::new();
        dict.set("Subtype", Object::Name(b"Form".to_vec()));

        assert!(!is_image(&Object::Stream(Stream::new(dict, vec![]))));
        assert!(!is_image(&Object::Integer(1)));
    }

    #[test]
    fn test_pdf_type_has_text() {
        assert!(PdfType::Text.has_text());
        assert!(PdfType::Hybrid.has_text());
        assert!(!PdfType::Image.has_text());
        assert!(!PdfType::Empty.has_text());
    }
}
