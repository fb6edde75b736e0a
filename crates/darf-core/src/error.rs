//! Error types for the darf-core library.

use thiserror::Error;

/// Main error type for the darf library.
#[derive(Error, Debug)]
pub enum DarfError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Slip extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Remittance file generation error.
    #[error("remittance error: {0}")]
    Remittance(#[from] RemittanceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF carries no extractable text (scanned slips).
    #[error("PDF has no extractable text")]
    NoText,
}

/// Errors related to slip extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No slip could be recovered from the text.
    #[error("no DARF slips found")]
    NoSlips,
}

/// Errors raised before a remittance file is generated.
#[derive(Error, Debug)]
pub enum RemittanceError {
    /// Company profile has empty required fields.
    #[error("company profile is incomplete, missing: {}", missing.join(", "))]
    IncompleteProfile { missing: Vec<String> },

    /// There is nothing to remit.
    #[error("no payment records to remit")]
    NoRecords,
}

/// Result type for the darf library.
pub type Result<T> = std::result::Result<T, DarfError>;
