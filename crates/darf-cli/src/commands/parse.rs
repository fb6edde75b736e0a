//! Parse command - extract payment records from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use darf_core::models::payment::{PaymentRecord, SlipAmounts};
use darf_core::slip::rules::format_brl_amount;
use darf_core::slip::{DarfParser, SlipParser};

use super::{load_config, read_input_text};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading document...");

    let text = read_input_text(&args.input, &config.pdf).await?;

    pb.set_message("Extracting slips...");
    let parser = DarfParser::from_config(&config.extraction);
    let result = parser.parse(&text);
    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    debug!(
        "{} slips from {} blocks ({:?}) in {}ms",
        result.records.len(),
        result.blocks,
        result.strategy,
        result.processing_time_ms
    );

    let records = result.into_records()?;
    let output = format_records(&records, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render records in the requested format.
pub fn format_records(records: &[PaymentRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => format_csv(records),
        OutputFormat::Text => Ok(format_text(records)),
    }
}

fn format_csv(records: &[PaymentRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "name",
        "period",
        "tax_id",
        "revenue_code",
        "reference",
        "due_date",
        "principal",
        "penalty",
        "interest",
        "total",
    ])?;

    for record in records {
        wtr.write_record([
            &record.id.to_string(),
            &record.name,
            &record.period,
            &record.tax_id,
            &record.revenue_code,
            &record.reference,
            &record.due_date,
            &record.principal.to_string(),
            &record.penalty.to_string(),
            &record.interest.to_string(),
            &record.total.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(records: &[PaymentRecord]) -> String {
    let mut output = String::new();

    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!("Slip {}: {}\n", i + 1, record.name));
        output.push_str(&format!("  CPF/CNPJ:     {}\n", record.tax_id));
        output.push_str(&format!("  Revenue code: {}\n", record.revenue_code));
        if !record.reference.is_empty() {
            output.push_str(&format!("  Reference:    {}\n", record.reference));
        }
        output.push_str(&format!("  Period:       {}\n", record.period));
        output.push_str(&format!("  Due date:     {}\n", record.due_date));
        output.push_str(&format!("  Principal:    R$ {}\n", format_brl_amount(record.principal)));
        output.push_str(&format!("  Penalty:      R$ {}\n", format_brl_amount(record.penalty)));
        output.push_str(&format!("  Interest:     R$ {}\n", format_brl_amount(record.interest)));
        output.push_str(&format!("  Total:        R$ {}\n", format_brl_amount(record.total)));
        output.push('\n');
    }

    let totals: SlipAmounts = records.iter().sum();
    output.push_str(&format!(
        "{} slips, total R$ {}\n",
        records.len(),
        format_brl_amount(totals.total)
    ));

    output
}
