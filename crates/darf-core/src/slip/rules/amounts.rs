//! Amount parsing for Brazilian-formatted slip values.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest amount a slip field holds: 18 digits of cents, the widest
/// amount column in a remittance file (9999999999999999.99).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// Parse a Brazilian-formatted amount (e.g. "R$ 1.234,56").
///
/// Anything that does not parse becomes zero, and so does a negative value.
/// Values above [`MAX_AMOUNT`] are capped. The result always carries two
/// decimal places.
pub fn parse_brl_amount(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = strip_thousands_separators(&cleaned).replace(',', ".");

    let mut amount = Decimal::from_str(&normalized)
        .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
        .min(MAX_AMOUNT);
    amount.rescale(2);
    amount
}

/// Drop periods that separate groups of three digits ("1.234" -> "1234").
///
/// A period only counts as a separator when exactly three digits follow it.
fn strip_thousands_separators(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '.' {
            let group = chars
                .get(i + 1..i + 4)
                .is_some_and(|g| g.iter().all(char::is_ascii_digit));
            let group_ends = chars.get(i + 4).is_none_or(|n| !n.is_ascii_digit());
            if group && group_ends {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// Format amount in Brazilian style (1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Add thousand separators
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
