//! Media types and media ranges

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{ParseError, Quality};

/// Parameter carrying the representation version, e.g. `application/json; version=2`
pub const VERSION_PARAM: &str = "version";

/// How specific a media range is. Concrete beats `type/*` beats `*/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
	Any = 1,
	Subtype = 2,
	Exact = 3,
}

impl Specificity {
	pub fn rank(self) -> u8 {
		self as u8
	}
}

/// A single `type/subtype;param=value` token, possibly with wildcards.
///
/// Type, subtype and parameter names are stored lower-cased, parameter values
/// keep their case. The `q` parameter is lifted out into [`MediaType::quality`].
///
/// # Examples
///
/// ```
/// use resourceful_negotiation::MediaType;
///
/// let mt = MediaType::parse("Application/JSON; Version=2; q=0.8").unwrap();
/// assert_eq!(mt.main_type(), "application");
/// assert_eq!(mt.subtype(), "json");
/// assert_eq!(mt.param("version"), Some("2"));
/// assert_eq!(mt.quality().thousandths(), 800);
/// assert_eq!(mt.to_string(), "application/json;version=2;q=0.8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
	main_type: String,
	subtype: String,
	params: BTreeMap<String, String>,
	quality: Quality,
}

impl MediaType {
	/// Creates a media type with no parameters and quality 1.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::MediaType;
	///
	/// let html = MediaType::new("text", "html");
	/// assert_eq!(html.essence(), "text/html");
	/// ```
	pub fn new(main_type: impl Into<String>, subtype: impl Into<String>) -> Self {
		Self {
			main_type: main_type.into().to_ascii_lowercase(),
			subtype: subtype.into().to_ascii_lowercase(),
			params: BTreeMap::new(),
			quality: Quality::MAX,
		}
	}

	/// `*/*`
	pub fn any() -> Self {
		Self::new("*", "*")
	}

	/// Parses one media range token.
	///
	/// Whitespace around the token and its parameters is ignored. Parameter
	/// values may be quoted strings. `*/subtype` is rejected.
	pub fn parse(token: &str) -> Result<Self, ParseError> {
		let mut parts = split_params(token).into_iter();
		let essence = parts.next().unwrap_or_default();
		let essence = essence.trim();
		if essence.is_empty() {
			return Err(ParseError::Empty);
		}

		let (main_type, subtype) = essence
			.split_once('/')
			.ok_or_else(|| ParseError::MissingSlash(essence.to_string()))?;
		let main_type = main_type.trim();
		let subtype = subtype.trim();

		if subtype.contains('/') {
			return Err(ParseError::MissingSlash(essence.to_string()));
		}
		if !is_token(main_type) || !is_token(subtype) {
			return Err(ParseError::InvalidToken(essence.to_string()));
		}
		if main_type == "*" && subtype != "*" {
			return Err(ParseError::WildcardType(essence.to_string()));
		}

		let mut media_type = Self::new(main_type, subtype);

		for raw in parts {
			let raw = raw.trim();
			if raw.is_empty() {
				continue;
			}
			let (key, value) = raw
				.split_once('=')
				.ok_or_else(|| ParseError::InvalidParameter(raw.to_string()))?;
			let key = key.trim().to_ascii_lowercase();
			if !is_token(&key) {
				return Err(ParseError::InvalidParameter(raw.to_string()));
			}
			let value = unquote(value.trim())
				.ok_or_else(|| ParseError::InvalidParameter(raw.to_string()))?;

			if key == "q" {
				media_type.quality = Quality::parse(&value)?;
			} else {
				media_type.params.insert(key, value);
			}
		}

		Ok(media_type)
	}

	pub fn main_type(&self) -> &str {
		&self.main_type
	}

	pub fn subtype(&self) -> &str {
		&self.subtype
	}

	/// `type/subtype` without parameters
	pub fn essence(&self) -> String {
		format!("{}/{}", self.main_type, self.subtype)
	}

	pub fn params(&self) -> &BTreeMap<String, String> {
		&self.params
	}

	/// Looks up a parameter, case-insensitively on the name.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params
			.get(&name.to_ascii_lowercase())
			.map(String::as_str)
	}

	pub fn version(&self) -> Option<&str> {
		self.param(VERSION_PARAM)
	}

	pub fn quality(&self) -> Quality {
		self.quality
	}

	/// Returns a copy carrying an extra (or replaced) parameter.
	pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
		let name = name.to_ascii_lowercase();
		if name == "q" {
			return self;
		}
		self.params.insert(name, value.into());
		self
	}

	/// Returns a copy with the given quality.
	pub fn with_quality(mut self, quality: Quality) -> Self {
		self.quality = quality;
		self
	}

	/// Returns a copy with the quality reset to 1.
	pub fn without_quality(self) -> Self {
		self.with_quality(Quality::MAX)
	}

	pub fn is_wildcard(&self) -> bool {
		self.main_type == "*" || self.subtype == "*"
	}

	pub fn specificity(&self) -> Specificity {
		match (self.main_type.as_str(), self.subtype.as_str()) {
			("*", _) => Specificity::Any,
			(_, "*") => Specificity::Subtype,
			_ => Specificity::Exact,
		}
	}

	/// Whether this range accepts `candidate`.
	///
	/// Type and subtype must be equal or wildcarded. Parameters are ignored
	/// except `version`: a range asking for a version only matches candidates
	/// declaring the same version or none at all.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::MediaType;
	///
	/// let range = MediaType::parse("application/*; version=2").unwrap();
	/// assert!(range.matches(&MediaType::parse("application/json").unwrap()));
	/// assert!(range.matches(&MediaType::parse("application/json; version=2").unwrap()));
	/// assert!(!range.matches(&MediaType::parse("application/json; version=1").unwrap()));
	/// assert!(!range.matches(&MediaType::parse("text/html").unwrap()));
	/// ```
	pub fn matches(&self, candidate: &MediaType) -> bool {
		let type_ok = self.main_type == "*" || self.main_type == candidate.main_type;
		let subtype_ok = self.subtype == "*" || self.subtype == candidate.subtype;
		if !(type_ok && subtype_ok) {
			return false;
		}

		match (self.version(), candidate.version()) {
			(Some(wanted), Some(offered)) => wanted == offered,
			_ => true,
		}
	}

	/// Number of this range's parameters that `candidate` carries with the
	/// same value. Used to prefer `text/html;level=1` over `text/html`.
	pub(crate) fn matching_params(&self, candidate: &MediaType) -> usize {
		self.params
			.iter()
			.filter(|(k, v)| candidate.params.get(*k) == Some(*v))
			.count()
	}
}

impl FromStr for MediaType {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for MediaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.main_type, self.subtype)?;
		for (key, value) in &self.params {
			if !value.is_empty() && is_token(value) {
				write!(f, ";{}={}", key, value)?;
			} else {
				write!(f, ";{}=\"{}\"", key, value.replace('\\', "\\\\").replace('"', "\\\""))?;
			}
		}
		if self.quality != Quality::MAX {
			write!(f, ";q={}", self.quality)?;
		}
		Ok(())
	}
}

/// Splits on `;` outside quoted strings.
fn split_params(token: &str) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;
	let mut escaped = false;

	for c in token.chars() {
		if escaped {
			current.push(c);
			escaped = false;
			continue;
		}
		match c {
			'\\' if in_quotes => {
				current.push(c);
				escaped = true;
			}
			'"' => {
				in_quotes = !in_quotes;
				current.push(c);
			}
			';' if !in_quotes => parts.push(std::mem::take(&mut current)),
			_ => current.push(c),
		}
	}
	parts.push(current);
	parts
}

/// Strips surrounding quotes and resolves backslash escapes.
fn unquote(value: &str) -> Option<String> {
	let Some(inner) = value.strip_prefix('"') else {
		return is_token(value).then(|| value.to_string());
	};
	let inner = inner.strip_suffix('"')?;

	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		match c {
			'\\' => out.push(chars.next()?),
			'"' => return None,
			_ => out.push(c),
		}
	}
	Some(out)
}

/// RFC 7230 `token`
fn is_token(s: &str) -> bool {
	!s.is_empty()
		&& s.bytes().all(|b| {
			b.is_ascii_alphanumeric()
				|| matches!(
					b,
					b'!' | b'#'
						| b'$' | b'%'
						| b'&' | b'\''
						| b'*' | b'+'
						| b'-' | b'.'
						| b'^' | b'_'
						| b'`' | b'|'
						| b'~'
				)
		})
}
