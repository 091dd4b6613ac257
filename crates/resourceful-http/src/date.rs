//! HTTP-date helpers (RFC 7231 §7.1.1.1)

use chrono::{DateTime, SubsecRound, Utc};

/// Parses an HTTP-date. Invalid dates yield `None`, which callers treat as
/// an absent header.
///
/// # Examples
///
/// ```
/// use resourceful_http::date::parse_http_date;
///
/// let date = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
/// assert_eq!(date.timestamp(), 1445412480);
/// assert!(parse_http_date("yesterday").is_none());
/// ```
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
	httpdate::parse_http_date(value.trim()).ok().map(DateTime::from)
}

/// Formats a timestamp as an IMF-fixdate.
///
/// # Examples
///
/// ```
/// use resourceful_http::date::format_http_date;
/// use chrono::{TimeZone, Utc};
///
/// let date = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
/// assert_eq!(format_http_date(date), "Wed, 21 Oct 2015 07:28:00 GMT");
/// ```
pub fn format_http_date(date: DateTime<Utc>) -> String {
	httpdate::fmt_http_date(truncate_to_seconds(date).into())
}

/// HTTP dates carry whole seconds; comparisons against them must drop the
/// sub-second part first.
pub fn truncate_to_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
	date.trunc_subsecs(0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};

	#[test]
	fn test_round_trip() {
		let date = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
		assert_eq!(parse_http_date(&format_http_date(date)), Some(date));
	}

	#[test]
	fn test_obsolete_formats_accepted() {
		let expected = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
		assert_eq!(parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"), Some(expected));
		assert_eq!(parse_http_date("Sun Nov  6 08:49:37 1994"), Some(expected));
	}

	#[test]
	fn test_truncate_drops_subseconds() {
		let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
		let later = date + Duration::milliseconds(750);
		assert_eq!(truncate_to_seconds(later), date);
	}
}
