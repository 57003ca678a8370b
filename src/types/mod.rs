use chrono::NaiveDate;

use crate::config::DATE_FORMAT;
use crate::error::{KernelError, KernelResult};

pub mod id;
pub mod filing;

/// Parse a source-reported calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> KernelResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| KernelError::InvalidDate(raw.to_string()))
}

/// Render a date the way storage and the source expect it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_dates() {
        let d = parse_date("2024-03-01").unwrap();
        assert_eq!(format_date(d), "2024-03-01");
        assert_eq!(parse_date(" 2024-03-01 ").unwrap(), d);
    }

    #[test]
    fn rejects_timestamps_and_garbage() {
        assert!(parse_date("2024-03-01T00:00:00").is_err());
        assert!(parse_date("03/01/2024").is_err());
        assert!(parse_date("").is_err());
    }
}
