//! Number formatting shared by the TUI and CLI renderers.

/// Format a number with `,` thousands separators.
///
/// Whole numbers print without a fractional part (`38000.0` → `38,000`);
/// other values keep their shortest exact decimal form (`1234.5` →
/// `1,234.5`).
#[must_use]
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let value = if value == 0.0 { 0.0 } else { value };
    let raw = value.abs().to_string();
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    if value < 0.0 {
        grouped.push('-');
    }
    let lead = int_part.len() % 3;
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Format a percentage with a forced sign: `+30%`, `-20%`, `+0%`.
#[must_use]
pub fn signed_percent(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:+}%")
}

/// Compact axis label: `38k`, `1.2M`, `371`.
#[must_use]
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        trim_decimal(value / 1_000_000.0, "M")
    } else if abs >= 1_000.0 {
        trim_decimal(value / 1_000.0, "k")
    } else {
        trim_decimal(value, "")
    }
}

fn trim_decimal(value: f64, suffix: &str) -> String {
    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_whole_numbers() {
        assert_eq!(thousands(38000.0), "38,000");
        assert_eq!(thousands(371.0), "371");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(100_000.0), "100,000");
        assert_eq!(thousands(0.0), "0");
    }

    #[test]
    fn thousands_keeps_fraction_and_sign() {
        assert_eq!(thousands(1234.5), "1,234.5");
        assert_eq!(thousands(-9000.0), "-9,000");
        assert_eq!(thousands(-0.0), "0");
        assert_eq!(thousands(56.25), "56.25");
    }

    #[test]
    fn signed_percent_forces_sign() {
        assert_eq!(signed_percent(30.0), "+30%");
        assert_eq!(signed_percent(-20.0), "-20%");
        assert_eq!(signed_percent(0.0), "+0%");
        assert_eq!(signed_percent(-0.0), "+0%");
        assert_eq!(signed_percent(2.5), "+2.5%");
    }

    #[test]
    fn compact_uses_suffixes() {
        assert_eq!(compact(38000.0), "38k");
        assert_eq!(compact(1_500_000.0), "1.5M");
        assert_eq!(compact(371.0), "371");
        assert_eq!(compact(6500.0), "6.5k");
    }
}
