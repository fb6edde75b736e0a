//! DARF slip parser: text in, payment records out.

use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::payment::PaymentRecord;

use super::rules::{normalize_block, scan_lines, segment_blocks, SplitStrategy};

/// Result of slip extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Records in block order, then in order of discovery.
    pub records: Vec<PaymentRecord>,
    /// How the text was split.
    pub strategy: SplitStrategy,
    /// Number of blocks scanned.
    pub blocks: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Whether no slip was found.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records, treating an empty result as an error.
    pub fn into_records(self) -> Result<Vec<PaymentRecord>, ExtractionError> {
        if self.records.is_empty() {
            Err(ExtractionError::NoSlips)
        } else {
            Ok(self.records)
        }
    }
}

/// Trait for slip parsing.
pub trait SlipParser {
    /// Parse every slip found in the text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Heuristic parser for text extracted from DARF documents.
pub struct DarfParser {
    /// Whether to split on "01 NOME" markers when headings are missing.
    fallback_split: bool,
    /// Whether to log incomplete slips.
    warn_incomplete: bool,
}

impl DarfParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            fallback_split: true,
            warn_incomplete: true,
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_fallback_split(config.fallback_split)
            .with_incomplete_warnings(config.warn_incomplete)
    }

    /// Set the "01 NOME" fallback split.
    pub fn with_fallback_split(mut self, enabled: bool) -> Self {
        self.fallback_split = enabled;
        self
    }

    /// Set logging of incomplete slips.
    pub fn with_incomplete_warnings(mut self, enabled: bool) -> Self {
        self.warn_incomplete = enabled;
        self
    }

    /// Parse text, drawing record identifiers from `next_id`.
    pub fn parse_with_ids<F>(&self, text: &str, mut next_id: F) -> ExtractionResult
    where
        F: FnMut() -> Uuid,
    {
        let start = Instant::now();

        info!("Parsing DARF slips from {} characters of text", text.len());

        let segmentation = segment_blocks(text, self.fallback_split);
        debug!(
            "Split text into {} blocks using {:?}",
            segmentation.blocks.len(),
            segmentation.strategy
        );

        let mut records = Vec::new();
        for (i, block) in segmentation.blocks.iter().enumerate() {
            let lines = normalize_block(block);
            let drafts = scan_lines(&lines);
            debug!("Block {}: {} lines, {} slips", i + 1, lines.len(), drafts.len());

            records.extend(drafts.into_iter().map(|d| d.into_record(next_id())));
        }

        let mut warnings = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let missing = record.missing_fields();
            if missing.is_empty() {
                continue;
            }

            let message = format!("Slip {} is missing {}", i + 1, missing.join(", "));
            if self.warn_incomplete {
                warn!("{}", message);
            }
            warnings.push(message);
        }

        if records.is_empty() {
            warnings.push("No DARF slips found".to_string());
        }

        debug!("Extracted {} slips", records.len());

        ExtractionResult {
            records,
            strategy: segmentation.strategy,
            blocks: segmentation.blocks.len(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for DarfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SlipParser for DarfParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        self.parse_with_ids(text, Uuid::new_v4)
    }
}
