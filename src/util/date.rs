use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parses the date part of a textual date.
///
/// Accepted: `2021-06-01`, RFC 3339 (`2021-06-01T10:00:00+02:00`) and
/// `2021-06-01 10:00:00[.000]`. Surrounding whitespace is ignored.
pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    let buf = buf.trim();
    if buf.is_empty() {
        return Err("empty date".to_string());
    }

    if let Ok(date) = NaiveDate::parse_from_str(buf, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(buf) {
        return Ok(date_time.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(buf, format) {
            return Ok(date_time.date());
        }
    }

    Err(format!("Unable to parse date {}", buf))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2021-06-01").unwrap(), ymd(2021, 6, 1));
        assert_eq!(parse_date(" 2021-06-01\n").unwrap(), ymd(2021, 6, 1));
        assert_eq!(parse_date("2017-09-10 10:42:32.123").unwrap(), ymd(2017, 9, 10));
        assert_eq!(parse_date("2017-09-10 10:42:32").unwrap(), ymd(2017, 9, 10));
        assert_eq!(parse_date("2017-09-10T10:42:32").unwrap(), ymd(2017, 9, 10));
        assert_eq!(parse_date("2021-06-01T23:00:00+02:00").unwrap(), ymd(2021, 6, 1));
    }

    #[test]
    fn test_parse_date_errors() {
        assert!(parse_date("").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2021-13-01").is_err());
        assert!(parse_date("2021-02-30").is_err());
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&ymd(2024, 2, 9)), "2024-02-09");
    }
}
