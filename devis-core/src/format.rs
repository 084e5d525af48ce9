//! French display formatting for amounts, rates and hours.
//!
//! The live display and the quote document share these helpers so a figure
//! reads the same on screen and on paper.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

/// Non-breaking space, used as thousands separator and before the currency.
pub const NBSP: char = '\u{a0}';

/// Formats an amount in euros, French style.
///
/// Whole amounts drop the cents; other amounts always show two decimals.
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::format_eur;
///
/// assert_eq!(format_eur(dec!(1452)), "1\u{a0}452\u{a0}€");
/// assert_eq!(format_eur(dec!(1028.5)), "1\u{a0}028,50\u{a0}€");
/// assert_eq!(format_eur(dec!(11)), "11\u{a0}€");
/// ```
pub fn format_eur(amount: Decimal) -> String {
    format!("{}{NBSP}€", format_amount(amount))
}

/// Formats an amount without the currency symbol.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let fixed = format!("{:.2}", rounded.abs());
    let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(units);

    if cents == "00" {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{cents}")
    }
}

/// Formats a surcharge rate as a signed percentage, e.g. `+10%`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::format_percent;
///
/// assert_eq!(format_percent(dec!(0.10)), "+10%");
/// assert_eq!(format_percent(dec!(0.125)), "+12,5%");
/// ```
pub fn format_percent(rate: Decimal) -> String {
    let sign = if rate.is_sign_negative() { "" } else { "+" };
    format!("{sign}{}%", format_decimal(rate * Decimal::ONE_HUNDRED))
}

/// Formats a plain rate as a percentage without sign, e.g. `20%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", format_decimal(rate * Decimal::ONE_HUNDRED))
}

/// Formats a number with a decimal comma and no trailing zeros.
///
/// ```
/// use rust_decimal_macros::dec;
/// use devis_core::format::format_decimal;
///
/// assert_eq!(format_decimal(dec!(6.7)), "6,7");
/// assert_eq!(format_decimal(dec!(5.0)), "5");
/// ```
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string().replace('.', ",")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * 2);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(NBSP);
        }
        grouped.push(digit);
    }

    grouped
}
