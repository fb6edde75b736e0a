//! Generate command - build a CNAB-240 remittance file from DARF documents.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use darf_core::cnab::RemittanceEncoder;
use darf_core::error::RemittanceError;
use darf_core::models::company::CompanyProfile;
use darf_core::models::payment::PaymentRecord;
use darf_core::slip::rules::format_brl_amount;
use darf_core::slip::{DarfParser, SlipParser};

use super::{load_config, read_input_text};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input files or glob patterns (PDF or plain text)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Company profile JSON (default: the "company" section of the config)
    #[arg(long)]
    company: Option<PathBuf>,

    /// Output file
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Output directory, the file gets a generated name
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of reading one input document.
struct FileOutcome {
    path: PathBuf,
    error: Option<String>,
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let company = match &args.company {
        Some(path) => CompanyProfile::from_file(path)?,
        None => config.company.clone(),
    };
    company.validate()?;

    let files = expand_inputs(&args.inputs)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = DarfParser::from_config(&config.extraction);
    let mut records: Vec<PaymentRecord> = Vec::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let result = match read_input_text(&path, &config.pdf).await {
            Ok(text) => parser.parse(&text).into_records().map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(found) => {
                debug!("{}: {} slips", path.display(), found.len());
                outcomes.push(FileOutcome {
                    path,
                    error: None,
                });
                records.extend(found);
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    outcomes.push(FileOutcome {
                        path,
                        error: Some(error_msg),
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if records.is_empty() {
        return Err(RemittanceError::NoRecords.into());
    }

    let encoder = RemittanceEncoder::from_config(&config.remittance);
    let remittance = encoder.encode(&company, &records);

    let output_path = match (&args.output, &args.output_dir) {
        (Some(path), _) => path.clone(),
        (None, dir) => {
            let dir = dir.clone().unwrap_or_else(|| PathBuf::from("."));
            tokio::fs::create_dir_all(&dir).await?;
            dir.join(remittance.file_name(&config.remittance.file_prefix))
        }
    };

    tokio::fs::write(&output_path, remittance.to_content()).await?;

    let totals = remittance.totals();
    println!();
    println!(
        "{} Wrote {} payment records to {}",
        style("✓").green(),
        remittance.record_count(),
        output_path.display()
    );
    println!(
        "   principal R$ {}, penalty R$ {}, interest R$ {}, total R$ {}",
        format_brl_amount(totals.principal),
        format_brl_amount(totals.penalty),
        format_brl_amount(totals.interest),
        style(format_brl_amount(totals.total)).bold()
    );

    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();
    println!(
        "   {} files read, {} failed in {:?}",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red(),
        start.elapsed()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand glob patterns into a sorted, de-duplicated file list.
fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matched: Vec<PathBuf> = glob(pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();

        if matched.is_empty() {
            warn!("No files match {}", pattern);
        }
        files.extend(matched);
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", patterns.join(", "));
    }

    Ok(files)
}
