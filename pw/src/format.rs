//! Number and date formatting shared by the prompt and the preview

use chrono::NaiveDate;

/// Group the integer part with commas, keep up to three fractional digits
///
/// `1500.0` -> `"1,500"`, `1234567.5` -> `"1,234,567.5"`
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let scaled = (value.abs() * 1000.0).round();
    let mut whole = (scaled / 1000.0).trunc();
    let mut frac = (scaled - whole * 1000.0).round() as u64;
    if frac >= 1000 {
        whole += 1.0;
        frac -= 1000;
    }

    let digits = format!("{:.0}", whole);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if frac > 0 {
        let frac = format!("{:03}", frac);
        grouped.push('.');
        grouped.push_str(frac.trim_end_matches('0'));
    }

    if negative && grouped.chars().any(|c| c != '0' && c != ',' && c != '.') {
        grouped.insert(0, '-');
    }
    grouped
}

/// Dollar amount with thousands separators: `$1,500`
pub fn currency(value: f64) -> String {
    format!("${}", thousands(value))
}

/// Format an ISO date as `M/D/YYYY`
///
/// Empty input yields `None`; text that isn't an ISO date is returned unchanged.
pub fn short_date(iso: &str) -> Option<String> {
    let trimmed = iso.trim();
    if trimmed.is_empty() {
        return None;
    }
    // Accept full timestamps too; only the date part matters
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%-m/%-d/%Y").to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}
