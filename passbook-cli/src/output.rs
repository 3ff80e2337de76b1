//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Right-aligned amount cell; blank when there is no value
pub fn amount_cell(value: Option<Decimal>) -> Cell {
    let text = value.map(format_amount).unwrap_or_default();
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Amount with two decimal places and thousands separators
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Positive amounts green, negative red
pub fn signed_amount(value: Decimal) -> String {
    let text = format_amount(value);
    if value.is_sign_negative() && !value.is_zero() {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123456750, 2)), "1,234,567.50");
        assert_eq!(format_amount(Decimal::new(-5, 1)), "-0.50");
        assert_eq!(format_amount(Decimal::from(100)), "100.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }
}
