//! Number formatting shared by the browser and the CLI

/// Format large counts with K/M/B suffixes
pub fn format_compact(n: f64) -> String {
    let abs = n.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

/// Whole number with thousands separators: `1234567.0` -> `"1,234,567"`
pub fn format_count(n: f64) -> String {
    let rounded = n.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two-decimal percentage, `N/A` when the ratio is undefined
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.4), "1,234,567");
        assert_eq!(format_count(-12345.0), "-12,345");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(950.0), "950");
        assert_eq!(format_compact(1_500.0), "1.5K");
        assert_eq!(format_compact(2_300_000.0), "2.3M");
        assert_eq!(format_compact(7_000_000_000.0), "7.0B");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(2.5)), "2.50%");
        assert_eq!(format_percent(None), "N/A");
    }
}
