//! Display formatting for prices and percent changes

/// USD amount with thousands separators, e.g. `$67,187.33` or `-$0.50`
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" would read as a loss
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

/// Percent change with an explicit `+` for gains, e.g. `+2.41%`
pub fn format_change(percent: f64) -> String {
    let fixed = format!("{:.2}", percent);
    if percent > 0.0 {
        format!("+{}%", fixed)
    } else if fixed == "-0.00" {
        "0.00%".to_string()
    } else {
        format!("{}%", fixed)
    }
}

/// Compact price label for the graph highlight, e.g. `$67187.33`
pub fn format_price_label(value: f64) -> String {
    format!("${:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(0.456), "$0.46");
        assert_eq!(format_currency(999.99), "$999.99");
        assert_eq!(format_currency(1000.0), "$1,000.00");
        assert_eq!(format_currency(67187.333), "$67,187.33");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(2.413), "+2.41%");
        assert_eq!(format_change(0.0), "0.00%");
        assert_eq!(format_change(-0.69), "-0.69%");
        assert_eq!(format_change(-0.001), "0.00%");
    }

    #[test]
    fn test_format_price_label() {
        assert_eq!(format_price_label(67187.333), "$67187.33");
        assert_eq!(format_price_label(100.0), "$100.00");
    }
}
