// Display formatting for identifiers and timestamps

use chrono::{DateTime, FixedOffset};

/// Group a personal (11 digits) or company (14 digits) tax id with its
/// separators and check digits. Anything else is returned trimmed.
pub fn format_tax_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        11 => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        _ => raw.trim().to_string(),
    }
}

pub fn format_date(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

pub fn format_time(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%H:%M").to_string()
}

pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_tax_id() {
        assert_eq!(format_tax_id("12345678909"), "123.456.789-09");
        assert_eq!(format_tax_id("123.456.789-09"), "123.456.789-09");
    }

    #[test]
    fn test_company_tax_id() {
        assert_eq!(format_tax_id("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn test_unrecognised_tax_id_passes_through() {
        assert_eq!(format_tax_id("  X-42  "), "X-42");
        assert_eq!(format_tax_id(""), "");
    }

    #[test]
    fn test_timestamps_keep_their_offset() {
        let ts = DateTime::parse_from_rfc3339("2025-03-10T08:05:00-03:00").unwrap();
        assert_eq!(format_date(&ts), "10/03/2025");
        assert_eq!(format_time(&ts), "08:05");
        assert_eq!(format_timestamp(&ts), "10/03/2025 08:05");
    }
}
