//! Configuration structures for the DARF pipeline.

use serde::{Deserialize, Serialize};

use super::company::CompanyProfile;

/// Main configuration for the darf pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DarfConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Slip extraction configuration.
    pub extraction: ExtractionConfig,

    /// Remittance file configuration.
    pub remittance: RemittanceConfig,

    /// Default company banking data.
    pub company: CompanyProfile,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
        }
    }
}

/// Slip extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Split on "01 NOME" field markers when the DARF heading is missing.
    pub fallback_split: bool,

    /// Log a warning for slips with empty required fields.
    pub warn_incomplete: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_split: true,
            warn_incomplete: true,
        }
    }
}

/// Remittance file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemittanceConfig {
    /// Bank name written in the file header.
    pub bank_name: String,

    /// Prefix of generated file names.
    pub file_prefix: String,
}

impl Default for RemittanceConfig {
    fn default() -> Self {
        Self {
            bank_name: crate::cnab::DEFAULT_BANK_NAME.to_string(),
            file_prefix: "REMESSA_DARF".to_string(),
        }
    }
}

impl DarfConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
