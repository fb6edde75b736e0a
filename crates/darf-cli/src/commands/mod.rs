//! Subcommands and the helpers they share.

pub mod config;
pub mod generate;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use darf_core::models::config::{DarfConfig, PdfConfig};
use darf_core::pdf::{PdfExtractor, PdfProcessor};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("darf")
        .join("config.json")
}

/// Resolve the configuration file: the `--config` path, else the default path.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration.
///
/// An explicit path must exist; a missing default file means defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<DarfConfig> {
    let path = config_path(explicit);

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(DarfConfig::from_file(&path)?)
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display())
    } else {
        Ok(DarfConfig::default())
    }
}

/// Read the text of one input document (`.pdf` or `.txt`).
pub async fn read_input_text(path: &Path, pdf: &PdfConfig) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    info!("Reading {}", path.display());

    match extension.as_str() {
        "pdf" => {
            let data = tokio::fs::read(path).await?;
            let mut extractor = PdfExtractor::new().with_min_text_length(pdf.min_text_length);
            extractor.load(&data)?;

            debug!("PDF has {} pages", extractor.page_count());

            Ok(extractor.extract_slip_text()?)
        }
        "txt" | "text" => Ok(tokio::fs::read_to_string(path).await?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
