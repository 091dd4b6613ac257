use crate::media_type::MediaType;

/// Outcome of Accept negotiation for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationResult {
	matched: bool,
	media_type: Option<MediaType>,
	range: Option<MediaType>,
	version: Option<String>,
}

impl NegotiationResult {
	/// A candidate won through `range`.
	pub fn matched(media_type: MediaType, range: MediaType) -> Self {
		let version = media_type
			.version()
			.or_else(|| range.version())
			.map(str::to_string);
		Self {
			matched: true,
			media_type: Some(media_type.without_quality()),
			range: Some(range),
			version,
		}
	}

	/// Nothing acceptable was offered.
	pub fn no_match() -> Self {
		Self {
			matched: false,
			media_type: None,
			range: None,
			version: None,
		}
	}

	/// The resource declares no representations, so anything goes.
	pub fn unconstrained() -> Self {
		Self {
			matched: true,
			media_type: None,
			range: None,
			version: None,
		}
	}

	/// A type chosen without the client's say, e.g. a lenient fallback.
	pub fn fallback(media_type: MediaType) -> Self {
		let version = media_type.version().map(str::to_string);
		Self {
			matched: true,
			media_type: Some(media_type.without_quality()),
			range: None,
			version,
		}
	}

	pub fn is_match(&self) -> bool {
		self.matched
	}

	/// The resource-declared type that won.
	pub fn media_type(&self) -> Option<&MediaType> {
		self.media_type.as_ref()
	}

	/// The client range that selected the winner.
	pub fn matched_range(&self) -> Option<&MediaType> {
		self.range.as_ref()
	}

	pub fn version(&self) -> Option<&str> {
		self.version.as_deref()
	}

	/// `Content-Type` value for the response, carrying `version` when one
	/// was negotiated.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::{MediaType, NegotiationResult};
	///
	/// let offered = MediaType::parse("application/vnd.api+json").unwrap();
	/// let range = MediaType::parse("application/vnd.api+json; version=2").unwrap();
	/// let result = NegotiationResult::matched(offered, range);
	/// assert_eq!(result.content_type().unwrap(), "application/vnd.api+json;version=2");
	/// ```
	pub fn content_type(&self) -> Option<String> {
		let media_type = self.media_type.as_ref()?;
		let media_type = match &self.version {
			Some(v) => media_type.clone().with_param(crate::media_type::VERSION_PARAM, v.as_str()),
			None => media_type.clone(),
		};
		Some(media_type.to_string())
	}
}
