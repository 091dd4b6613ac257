//! Accept header parsing

use crate::media_type::MediaType;

/// Represents an Accept header
///
/// Ranges are kept in header order; ranking happens in
/// [`MediaRangeMatcher`](crate::MediaRangeMatcher), so order here only breaks
/// ties. An absent or empty header behaves as `*/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptHeader {
	ranges: Vec<MediaType>,
	malformed: usize,
}

impl AcceptHeader {
	/// Parses an Accept header string into an AcceptHeader struct
	///
	/// Malformed ranges are skipped; they never invalidate their neighbours.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::AcceptHeader;
	///
	/// let accept = AcceptHeader::parse("application/json, text/html; q=0.9");
	/// assert_eq!(accept.ranges().len(), 2);
	/// assert_eq!(accept.ranges()[1].quality().thousandths(), 900);
	///
	/// // `*/html` is invalid and dropped, the rest survives
	/// let partial = AcceptHeader::parse("*/html, text/plain");
	/// assert_eq!(partial.ranges().len(), 1);
	/// ```
	pub fn parse(header: &str) -> Self {
		let mut ranges = Vec::new();
		let mut malformed = 0;

		for segment in split_ranges(header) {
			if segment.trim().is_empty() {
				continue;
			}
			match MediaType::parse(segment) {
				Ok(range) => ranges.push(range),
				Err(err) => {
					tracing::debug!(range = %segment.trim(), error = %err, "ignoring malformed Accept range");
					malformed += 1;
				}
			}
		}

		Self { ranges, malformed }
	}

	/// Parses an optional header value. `None` means the client sent no
	/// Accept header.
	pub fn from_header(header: Option<&str>) -> Self {
		header.map(Self::parse).unwrap_or_else(Self::empty)
	}

	/// Creates an AcceptHeader with no ranges (accept anything)
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::AcceptHeader;
	///
	/// let empty = AcceptHeader::empty();
	/// assert!(empty.is_empty());
	/// assert_eq!(empty.effective_ranges()[0].essence(), "*/*");
	/// ```
	pub fn empty() -> Self {
		Self {
			ranges: Vec::new(),
			malformed: 0,
		}
	}

	pub fn ranges(&self) -> &[MediaType] {
		&self.ranges
	}

	/// True when the header carried nothing at all, malformed or not.
	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty() && self.malformed == 0
	}

	/// Number of ranges dropped while parsing.
	pub fn malformed(&self) -> usize {
		self.malformed
	}

	/// The ranges used for matching: the parsed ranges, or a single `*/*`
	/// when the header was empty.
	pub fn effective_ranges(&self) -> Vec<MediaType> {
		if self.is_empty() {
			vec![MediaType::any()]
		} else {
			self.ranges.clone()
		}
	}
}

impl From<Vec<MediaType>> for AcceptHeader {
	fn from(ranges: Vec<MediaType>) -> Self {
		Self {
			ranges,
			malformed: 0,
		}
	}
}

/// Splits on `,` outside quoted parameter values.
fn split_ranges(header: &str) -> Vec<&str> {
	let mut parts = Vec::new();
	let mut start = 0;
	let mut in_quotes = false;
	let mut escaped = false;

	for (i, c) in header.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' if in_quotes => escaped = true,
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => {
				parts.push(&header[start..i]);
				start = i + 1;
			}
			_ => {}
		}
	}
	parts.push(&header[start..]);
	parts
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_accept_header() {
		let accept = AcceptHeader::parse("application/json, text/html; q=0.9");
		assert_eq!(accept.ranges().len(), 2);
		assert_eq!(accept.ranges()[0].quality().thousandths(), 1000);
	}

	#[test]
	fn test_parse_preserves_header_order() {
		let accept = AcceptHeader::parse("text/plain;q=0.1, application/json");
		assert_eq!(accept.ranges()[0].essence(), "text/plain");
		assert_eq!(accept.ranges()[1].essence(), "application/json");
	}

	#[test]
	fn test_malformed_range_is_isolated() {
		let accept = AcceptHeader::parse("text/html;q=5, application/json, bogus");
		assert_eq!(accept.ranges().len(), 1);
		assert_eq!(accept.ranges()[0].essence(), "application/json");
		assert_eq!(accept.malformed(), 2);
	}

	#[test]
	fn test_only_malformed_ranges_match_nothing() {
		let accept = AcceptHeader::parse("bogus, */html");
		assert!(!accept.is_empty());
		assert!(accept.effective_ranges().is_empty());
	}

	#[test]
	fn test_comma_inside_quotes() {
		let accept = AcceptHeader::parse(r#"text/plain; note="a, b", text/html"#);
		assert_eq!(accept.ranges().len(), 2);
		assert_eq!(accept.ranges()[0].param("note"), Some("a, b"));
	}

	#[test]
	fn test_blank_header_is_empty() {
		assert!(AcceptHeader::parse("   ").is_empty());
		assert!(AcceptHeader::parse(" , ,").is_empty());
		assert!(AcceptHeader::from_header(None).is_empty());
	}
}
