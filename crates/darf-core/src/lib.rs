//! Core library for DARF slip processing.
//!
//! This crate provides:
//! - PDF text ingestion (text layer only, no OCR)
//! - DARF slip extraction from loosely formatted text
//! - CNAB-240 remittance file generation for the extracted payments

pub mod cnab;
pub mod error;
pub mod models;
pub mod pdf;
pub mod slip;

pub use cnab::{RemittanceEncoder, RemittanceFile};
pub use error::{DarfError, Result};
pub use models::{CompanyProfile, DarfConfig, PaymentRecord, SlipAmounts};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
pub use slip::{DarfParser, ExtractionResult, SlipParser, SplitStrategy};
