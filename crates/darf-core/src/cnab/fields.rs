//! Fixed-width field primitives for CNAB-240 lines.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::slip::rules::patterns::{DATE_COMPACT, DATE_DMY};

/// Left-justify and space-pad to `width` characters, truncating longer values.
pub fn pad_text(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Right-justify and zero-pad to `width` characters.
///
/// Longer values keep their rightmost characters, so overflow drops the most
/// significant digits.
pub fn pad_number(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.chars().skip(len - width).collect()
    } else {
        format!("{}{}", "0".repeat(width - len), value)
    }
}

/// Keep only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Encode an amount as unsigned cents, zero-padded to `width`.
///
/// The cents come from the two-place rendering with the point removed, so
/// no amount can overflow on the way.
pub fn encode_amount(amount: Decimal, width: usize) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pad_number(&digits_only(&format!("{:.2}", rounded)), width)
}

/// Encode a date as DDMMYYYY.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// Encode a printed date as DDMMYYYY.
///
/// Eight digits pass through and "D/M/YYYY" or "D-M-YYYY" is reordered.
/// Anything else encodes as `today`, so a bad due date never stops a file.
pub fn encode_date(value: &str, today: NaiveDate) -> String {
    let value = value.trim();

    if DATE_COMPACT.is_match(value) {
        return value.to_string();
    }

    if let Some(caps) = DATE_DMY.captures(value) {
        return format!("{:0>2}{:0>2}{}", &caps[1], &caps[2], &caps[3]);
    }

    format_date(today)
}
