//! Entity tags (RFC 7232 §2.3)

use std::fmt;

use sha2::{Digest, Sha256};

/// An entity tag: an opaque validator, optionally marked weak.
///
/// # Examples
///
/// ```
/// use resourceful_conditional::EntityTag;
///
/// let tag = EntityTag::parse("W/\"v2\"").unwrap();
/// assert!(tag.is_weak());
/// assert_eq!(tag.tag(), "v2");
/// assert_eq!(tag.to_string(), "W/\"v2\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
	weak: bool,
	tag: String,
}

impl EntityTag {
	pub fn strong(tag: impl Into<String>) -> Self {
		Self {
			weak: false,
			tag: tag.into(),
		}
	}

	pub fn weak(tag: impl Into<String>) -> Self {
		Self {
			weak: true,
			tag: tag.into(),
		}
	}

	/// Parse a wire-format entity tag (`"x"` or `W/"x"`)
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		let (weak, rest) = match value.strip_prefix("W/") {
			Some(rest) => (true, rest),
			None => (false, value),
		};
		let inner = rest.strip_prefix('"')?.strip_suffix('"')?;
		if inner.contains('"') {
			return None;
		}
		Some(Self {
			weak,
			tag: inner.to_string(),
		})
	}

	/// Interpret a tag reported by a resource. Resources may hand back the
	/// wire form or just the opaque value; a bare value is a strong tag.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_conditional::EntityTag;
	///
	/// assert_eq!(EntityTag::from_resource("abc"), EntityTag::strong("abc"));
	/// assert_eq!(EntityTag::from_resource("\"abc\""), EntityTag::strong("abc"));
	/// assert_eq!(EntityTag::from_resource("W/\"abc\""), EntityTag::weak("abc"));
	/// ```
	pub fn from_resource(value: &str) -> Self {
		Self::parse(value).unwrap_or_else(|| Self::strong(value.trim().trim_matches('"')))
	}

	/// Strong tag derived from representation bytes
	pub fn from_content(content: &[u8]) -> Self {
		let digest = Sha256::digest(content);
		Self::strong(hex::encode(&digest[..16]))
	}

	pub fn is_weak(&self) -> bool {
		self.weak
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Exact comparison: same opaque value and same weakness
	pub fn exact_eq(&self, other: &EntityTag) -> bool {
		self == other
	}

	/// Weak comparison: opaque values equal, weakness ignored
	pub fn weak_eq(&self, other: &EntityTag) -> bool {
		self.tag == other.tag
	}
}

impl fmt::Display for EntityTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.weak {
			write!(f, "W/\"{}\"", self.tag)
		} else {
			write!(f, "\"{}\"", self.tag)
		}
	}
}

/// Value of an `If-Match` or `If-None-Match` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTagList {
	Any,
	Tags(Vec<EntityTag>),
}

impl EntityTagList {
	/// Parse every occurrence of the header. Malformed members are
	/// skipped; a header with no usable member yields `None` and is
	/// ignored by the evaluator.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_conditional::{EntityTag, EntityTagList};
	///
	/// let list = EntityTagList::parse(["\"a\", W/\"b\""]).unwrap();
	/// assert!(list.contains_weak(&EntityTag::strong("b")));
	/// assert_eq!(EntityTagList::parse(["*"]), Some(EntityTagList::Any));
	/// assert_eq!(EntityTagList::parse(["garbage"]), None);
	/// ```
	pub fn parse<'a, I>(values: I) -> Option<Self>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut tags = Vec::new();
		for value in values {
			if value.trim() == "*" {
				return Some(EntityTagList::Any);
			}
			for member in split_tags(value) {
				match EntityTag::parse(member) {
					Some(tag) => tags.push(tag),
					None => tracing::debug!(member, "ignoring malformed entity tag"),
				}
			}
		}
		if tags.is_empty() {
			None
		} else {
			Some(EntityTagList::Tags(tags))
		}
	}

	pub fn contains_exact(&self, etag: &EntityTag) -> bool {
		match self {
			EntityTagList::Any => true,
			EntityTagList::Tags(tags) => tags.iter().any(|t| t.exact_eq(etag)),
		}
	}

	pub fn contains_weak(&self, etag: &EntityTag) -> bool {
		match self {
			EntityTagList::Any => true,
			EntityTagList::Tags(tags) => tags.iter().any(|t| t.weak_eq(etag)),
		}
	}
}

fn split_tags(value: &str) -> impl Iterator<Item = &str> {
	let mut parts = Vec::new();
	let mut start = 0;
	let mut quoted = false;
	for (i, c) in value.char_indices() {
		match c {
			'"' => quoted = !quoted,
			',' if !quoted => {
				parts.push(&value[start..i]);
				start = i + 1;
			}
			_ => {}
		}
	}
	parts.push(&value[start..]);
	parts.into_iter().map(str::trim).filter(|p| !p.is_empty())
}
