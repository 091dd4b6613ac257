//! Quality values (`q` parameters) as fixed-point thousandths.

use std::fmt;

use crate::ParseError;

/// Client preference weight in `[0, 1]`, stored in thousandths.
///
/// Keeping the value as an integer makes ordering and equality exact, so two
/// ranges written as `q=0.5` and `q=0.500` always tie.
///
/// # Examples
///
/// ```
/// use resourceful_negotiation::Quality;
///
/// let q = Quality::parse("0.75").unwrap();
/// assert_eq!(q.thousandths(), 750);
/// assert_eq!(q.to_string(), "0.75");
/// assert!(Quality::parse("1.5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u16);

impl Quality {
	/// `q=1`
	pub const MAX: Quality = Quality(1000);
	/// `q=0`, an explicit rejection
	pub const ZERO: Quality = Quality(0);

	/// Builds a quality from thousandths, clamping to 1000.
	pub fn from_thousandths(value: u16) -> Self {
		Self(value.min(1000))
	}

	pub fn thousandths(self) -> u16 {
		self.0
	}

	pub fn is_zero(self) -> bool {
		self.0 == 0
	}

	/// Parses a `qvalue` (RFC 7231 §5.3.1): `0`, `1`, or a decimal with at
	/// most three fractional digits.
	pub fn parse(s: &str) -> Result<Self, ParseError> {
		let s = s.trim();
		let invalid = || ParseError::InvalidQuality(s.to_string());

		let (int_part, frac_part) = match s.split_once('.') {
			Some((i, f)) => (i, f),
			None => (s, ""),
		};

		if int_part.len() != 1 || frac_part.len() > 3 {
			return Err(invalid());
		}
		if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
			return Err(invalid());
		}

		let whole = match int_part {
			"0" => 0u16,
			"1" => 1000u16,
			_ => return Err(invalid()),
		};

		let mut frac = 0u16;
		for (i, digit) in frac_part.bytes().enumerate() {
			let scale = [100u16, 10, 1][i];
			frac += u16::from(digit - b'0') * scale;
		}

		let value = whole + frac;
		if value > 1000 {
			return Err(invalid());
		}
		Ok(Self(value))
	}
}

impl Default for Quality {
	fn default() -> Self {
		Self::MAX
	}
}

impl fmt::Display for Quality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			1000 => f.write_str("1"),
			0 => f.write_str("0"),
			n => {
				let frac = format!("{:03}", n);
				write!(f, "0.{}", frac.trim_end_matches('0'))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("1", 1000)]
	#[case("1.0", 1000)]
	#[case("1.000", 1000)]
	#[case("0", 0)]
	#[case("0.5", 500)]
	#[case("0.05", 50)]
	#[case("0.001", 1)]
	#[case(" 0.9 ", 900)]
	fn test_parse_valid(#[case] input: &str, #[case] expected: u16) {
		assert_eq!(Quality::parse(input).unwrap().thousandths(), expected);
	}

	#[rstest]
	#[case("1.001")]
	#[case("2")]
	#[case("-0.5")]
	#[case("0.1234")]
	#[case("abc")]
	#[case("")]
	#[case(".5")]
	#[case("0.5x")]
	fn test_parse_invalid(#[case] input: &str) {
		assert!(Quality::parse(input).is_err());
	}

	#[rstest]
	#[case(1000, "1")]
	#[case(0, "0")]
	#[case(500, "0.5")]
	#[case(125, "0.125")]
	#[case(50, "0.05")]
	fn test_display(#[case] value: u16, #[case] expected: &str) {
		assert_eq!(Quality::from_thousandths(value).to_string(), expected);
	}

	#[test]
	fn test_equal_spellings_compare_equal() {
		assert_eq!(Quality::parse("0.5").unwrap(), Quality::parse("0.500").unwrap());
	}
}
