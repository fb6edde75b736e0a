//! Remittance file assembly.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use super::layout::{self, FileContext};
use super::{DEFAULT_BANK_NAME, LINE_SEPARATOR};
use crate::models::company::CompanyProfile;
use crate::models::config::RemittanceConfig;
use crate::models::payment::{PaymentRecord, SlipAmounts};

/// A generated CNAB-240 file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemittanceFile {
    lines: Vec<String>,
    generated_at: NaiveDateTime,
    totals: SlipAmounts,
    record_count: usize,
}

impl RemittanceFile {
    /// Lines in file order, without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Moment the file was generated.
    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    /// Summed amounts of all detail lines.
    pub fn totals(&self) -> &SlipAmounts {
        &self.totals
    }

    /// Number of detail lines.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// File content: lines joined by CRLF, no trailing terminator.
    pub fn to_content(&self) -> String {
        self.lines.join(LINE_SEPARATOR)
    }

    /// Suggested download name, e.g. `REMESSA_DARF_20240305_140759.rem`.
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}.rem", prefix, self.generated_at.format("%Y%m%d_%H%M%S"))
    }
}

impl fmt::Display for RemittanceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_content())
    }
}

/// Renders a company profile and payment records as a CNAB-240 file.
///
/// The profile is not validated here; empty fields come out zero- or
/// space-padded.
pub struct RemittanceEncoder {
    bank_name: String,
}

impl RemittanceEncoder {
    /// Create an encoder with the default bank name.
    pub fn new() -> Self {
        Self {
            bank_name: DEFAULT_BANK_NAME.to_string(),
        }
    }

    /// Create an encoder from remittance settings.
    pub fn from_config(config: &RemittanceConfig) -> Self {
        Self::new().with_bank_name(&config.bank_name)
    }

    /// Set the bank name written in the file header.
    pub fn with_bank_name(mut self, name: &str) -> Self {
        self.bank_name = name.to_string();
        self
    }

    /// Encode using the current local time.
    pub fn encode(&self, company: &CompanyProfile, records: &[PaymentRecord]) -> RemittanceFile {
        self.encode_at(company, records, Local::now().naive_local())
    }

    /// Encode as if generated at `generated_at`.
    ///
    /// The timestamp fills the header date/time fields and stands in for
    /// unparseable slip dates.
    pub fn encode_at(
        &self,
        company: &CompanyProfile,
        records: &[PaymentRecord],
        generated_at: NaiveDateTime,
    ) -> RemittanceFile {
        let ctx = FileContext {
            company,
            bank_name: &self.bank_name,
            generated_at,
        };
        let count = records.len();
        let totals: SlipAmounts = records.iter().sum();

        let mut lines = Vec::with_capacity(count + 4);
        lines.push(layout::file_header(&ctx));
        lines.push(layout::batch_header(&ctx, count));
        lines.extend(
            records
                .iter()
                .enumerate()
                .map(|(i, record)| layout::detail(&ctx, i + 1, record)),
        );
        lines.push(layout::batch_trailer(count, &totals));
        lines.push(layout::file_trailer(count));

        debug!("Batch totals: {:?}", totals);
        info!("Encoded {} payment records into {} lines", count, lines.len());

        RemittanceFile {
            lines,
            generated_at,
            totals,
            record_count: count,
        }
    }
}

impl Default for RemittanceEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnab::LINE_WIDTH;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn company() -> CompanyProfile {
        CompanyProfile {
            bank_code: "001".to_string(),
            branch: "1234".to_string(),
            branch_digit: "5".to_string(),
            account: "98765".to_string(),
            account_digit: "0".to_string(),
            agreement: "123456".to_string(),
            name: "Acme Ltda".to_string(),
            tax_id: "12345678000190".to_string(),
        }
    }

    fn record(principal: i64, penalty: i64, interest: i64, due_date: &str) -> PaymentRecord {
        let principal = Decimal::new(principal, 2);
        let penalty = Decimal::new(penalty, 2);
        let interest = Decimal::new(interest, 2);
        PaymentRecord {
            id: Uuid::new_v4(),
            name: "Payer".to_string(),
            period: "31/12/2023".to_string(),
            tax_id: "11222333000181".to_string(),
            revenue_code: "2089".to_string(),
            reference: String::new(),
            due_date: due_date.to_string(),
            principal,
            penalty,
            interest,
            total: principal + penalty + interest,
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 59)
            .unwrap()
    }

    fn slice(line: &str, from: usize, to: usize) -> &str {
        &line[from - 1..to]
    }

    #[test]
    fn test_line_count_and_width() {
        let records = vec![
            record(150000, 0, 0, "31/01/2024"),
            record(25000, 1000, 500, "20/12/2023"),
            record(100, 0, 0, "01/02/2024"),
        ];
        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());

        assert_eq!(file.lines().len(), records.len() + 4);
        assert_eq!(file.record_count(), 3);
        for line in file.lines() {
            assert_eq!(line.chars().count(), LINE_WIDTH);
        }

        let types: String = file.lines().iter().map(|l| &l[..1]).collect();
        assert_eq!(types, "0133359");
    }

    #[test]
    fn test_sequence_numbers_are_contiguous() {
        let records: Vec<_> = (0..12).map(|_| record(100, 0, 0, "01/01/2024")).collect();
        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());

        let sequences: Vec<&str> = file.lines()[2..14].iter().map(|l| slice(l, 6, 10)).collect();
        let expected: Vec<String> = (1..=12).map(|n| format!("{:05}", n)).collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn test_trailer_totals_match_details() {
        let records = vec![
            record(150000, 0, 0, "31/01/2024"),
            record(25000, 1000, 500, "20/12/2023"),
        ];
        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());
        let lines = file.lines();

        let trailer = &lines[4];
        assert_eq!(slice(trailer, 6, 11), "000004");
        assert_eq!(slice(trailer, 12, 29), "000000000000175000");
        assert_eq!(slice(trailer, 30, 47), "000000000000001000");
        assert_eq!(slice(trailer, 48, 65), "000000000000000500");
        assert_eq!(slice(trailer, 66, 83), "000000000000176500");

        // Each trailer sum equals the sum of the detail fields
        for (detail_from, trailer_from) in [(104, 12), (119, 30), (134, 48), (149, 66)] {
            let detail_sum: u64 = lines[2..4]
                .iter()
                .map(|l| slice(l, detail_from, detail_from + 14).parse::<u64>().unwrap())
                .sum();
            let trailer_sum: u64 = slice(trailer, trailer_from, trailer_from + 17).parse().unwrap();
            assert_eq!(detail_sum, trailer_sum);
        }

        assert_eq!(slice(&lines[5], 8, 13), "000006");
        assert_eq!(file.totals().total, Decimal::new(176500, 2));
    }

    #[test]
    fn test_huge_parsed_totals_encode_without_overflow() {
        use crate::slip::{DarfParser, SlipParser};

        let text = "\
DARF
01 NOME ACME
10 VALOR TOTAL 999999999999999999999999999

DARF
01 NOME BETA
10 VALOR TOTAL 999999999999999999999999999
";
        let records = DarfParser::new().parse(text).records;
        assert_eq!(records.len(), 2);

        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());
        let lines = file.lines();

        assert!(lines.iter().all(|l| l.chars().count() == LINE_WIDTH));
        assert_eq!(slice(&lines[2], 149, 163), "9".repeat(15));
        assert_eq!(slice(&lines[4], 66, 83), "999999999999999998");
    }

    #[test]
    fn test_bad_due_date_uses_generation_date() {
        let records = vec![record(100, 0, 0, "abc")];
        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());

        assert_eq!(slice(&file.lines()[2], 96, 103), "05032024");
    }

    #[test]
    fn test_content_is_crlf_joined() {
        let records = vec![record(100, 0, 0, "01/01/2024")];
        let file = RemittanceEncoder::new().encode_at(&company(), &records, generated_at());
        let content = file.to_content();

        assert!(!content.ends_with("\r\n"));
        assert_eq!(content.split("\r\n").count(), 5);
        assert_eq!(content.len(), 5 * LINE_WIDTH + 4 * 2);
        assert_eq!(file.to_string(), content);
    }

    #[test]
    fn test_empty_records_produce_zero_totals() {
        let file = RemittanceEncoder::new().encode_at(&company(), &[], generated_at());
        let lines = file.lines();

        assert_eq!(lines.len(), 4);
        assert_eq!(slice(&lines[1], 180, 185), "000000");
        assert_eq!(slice(&lines[2], 6, 11), "000002");
        assert_eq!(slice(&lines[2], 12, 83), "0".repeat(72));
        assert_eq!(slice(&lines[3], 8, 13), "000004");
    }

    #[test]
    fn test_custom_bank_name_and_file_name() {
        let file = RemittanceEncoder::new()
            .with_bank_name("Banco Exemplo")
            .encode_at(&company(), &[], generated_at());

        assert_eq!(slice(&file.lines()[0], 98, 110), "BANCO EXEMPLO");
        assert_eq!(file.file_name("REMESSA_DARF"), "REMESSA_DARF_20240305_140759.rem");
    }
}
