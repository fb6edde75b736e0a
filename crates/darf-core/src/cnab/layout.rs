//! Header, detail and trailer lines of the CNAB-240 DARF layout.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::fields::{digits_only, encode_amount, encode_date, format_date, pad_number, pad_text};
use super::{BATCH_NUMBER, LAYOUT_VERSION, LINE_WIDTH};
use crate::models::company::CompanyProfile;
use crate::models::payment::{PaymentRecord, SlipAmounts};

/// Width of each amount on a detail line.
pub const DETAIL_AMOUNT_WIDTH: usize = 15;

/// Width of each summed amount on the batch trailer.
pub const TRAILER_AMOUNT_WIDTH: usize = 18;

/// Concatenates fixed-width fields into one line.
#[derive(Debug, Default)]
pub struct LineBuilder {
    buf: String,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(LINE_WIDTH),
        }
    }

    /// A constant field, written as is.
    pub fn literal(mut self, value: &str) -> Self {
        self.buf.push_str(value);
        self
    }

    /// Left-justified, space-padded text.
    pub fn text(mut self, value: &str, width: usize) -> Self {
        self.buf.push_str(&pad_text(value, width));
        self
    }

    /// Right-justified, zero-padded number; non-digits are dropped first.
    pub fn digits(mut self, value: &str, width: usize) -> Self {
        self.buf.push_str(&pad_number(&digits_only(value), width));
        self
    }

    /// Unsigned cents.
    pub fn amount(mut self, value: Decimal, width: usize) -> Self {
        self.buf.push_str(&encode_amount(value, width));
        self
    }

    /// Blank positions.
    pub fn filler(self, width: usize) -> Self {
        self.text("", width)
    }

    /// Fit the line to exactly [`LINE_WIDTH`] characters.
    pub fn build(self) -> String {
        pad_text(&self.buf, LINE_WIDTH)
    }
}

/// Values shared by every line of one file.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub company: &'a CompanyProfile,
    pub bank_name: &'a str,
    pub generated_at: NaiveDateTime,
}

impl FileContext<'_> {
    fn company_name(&self) -> String {
        self.company.name.to_uppercase()
    }

    fn date(&self) -> String {
        format_date(self.generated_at.date())
    }
}

/// File header (record type 0).
pub fn file_header(ctx: &FileContext<'_>) -> String {
    let company = ctx.company;

    LineBuilder::new()
        .literal("0")
        .literal("0000")
        .digits(&company.bank_code, 3)
        .literal("2")
        .filler(9)
        .digits(&company.agreement, 20)
        .filler(5)
        .digits(&company.tax_id, 14)
        .filler(10)
        .text(&ctx.company_name(), 30)
        .text(&ctx.bank_name.to_uppercase(), 30)
        .literal(&ctx.date())
        .literal(&ctx.generated_at.format("%H%M").to_string())
        .digits(LAYOUT_VERSION, 6)
        .build()
}

/// Batch header (record type 1) announcing `record_count` detail lines.
pub fn batch_header(ctx: &FileContext<'_>, record_count: usize) -> String {
    let company = ctx.company;

    LineBuilder::new()
        .literal("1")
        .digits(&company.bank_code, 3)
        .literal(BATCH_NUMBER)
        .literal("C")
        .literal("J")
        .filler(2)
        .literal("040")
        .filler(1)
        .digits(&company.agreement, 20)
        .filler(1)
        .digits(&company.branch, 4)
        .text(&company.branch_digit, 1)
        .digits(&company.account, 9)
        .filler(1)
        .text(&company.account_digit, 1)
        .text(&ctx.company_name(), 40)
        .filler(40)
        .filler(30)
        .literal(&ctx.date())
        .filler(8)
        .digits(&record_count.to_string(), 6)
        .build()
}

/// Detail line (record type 3, segment A) for the `sequence`-th record.
pub fn detail(ctx: &FileContext<'_>, sequence: usize, record: &PaymentRecord) -> String {
    let today = ctx.generated_at.date();

    LineBuilder::new()
        .literal("3")
        .literal(BATCH_NUMBER)
        .digits(&sequence.to_string(), 5)
        .literal("A")
        .digits(&record.tax_id, 15)
        .text(&record.name.to_uppercase(), 30)
        .digits(&record.revenue_code, 6)
        .digits(&record.reference, 25)
        .literal(&encode_date(&record.period, today))
        .literal(&encode_date(&record.due_date, today))
        .amount(record.principal, DETAIL_AMOUNT_WIDTH)
        .amount(record.penalty, DETAIL_AMOUNT_WIDTH)
        .amount(record.interest, DETAIL_AMOUNT_WIDTH)
        .amount(record.total, DETAIL_AMOUNT_WIDTH)
        .build()
}

/// Batch trailer (record type 5) with the batch line count and summed amounts.
pub fn batch_trailer(record_count: usize, totals: &SlipAmounts) -> String {
    LineBuilder::new()
        .literal("5")
        .literal(BATCH_NUMBER)
        .digits(&(record_count + 2).to_string(), 6)
        .amount(totals.principal, TRAILER_AMOUNT_WIDTH)
        .amount(totals.penalty, TRAILER_AMOUNT_WIDTH)
        .amount(totals.interest, TRAILER_AMOUNT_WIDTH)
        .amount(totals.total, TRAILER_AMOUNT_WIDTH)
        .build()
}

/// File trailer (record type 9) with the batch count and file line count.
pub fn file_trailer(record_count: usize) -> String {
    LineBuilder::new()
        .literal("9")
        .digits("1", 6)
        .digits(&(record_count + 4).to_string(), 6)
        .build()
}
