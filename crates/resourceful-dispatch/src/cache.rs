//! Cache headers for GET and HEAD responses

use chrono::{DateTime, Utc};
use resourceful_http::Response;
use resourceful_http::date::format_http_date;
use resourceful_http::header::{CACHE_CONTROL, EXPIRES, HeaderValue, PRAGMA};

/// Who may store a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
	Public,
	Private,
	NoCache,
}

impl CacheType {
	fn directive(self) -> &'static str {
		match self {
			CacheType::Public => "public",
			CacheType::Private => "private",
			CacheType::NoCache => "no-cache",
		}
	}
}

/// How long a representation stays fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
	/// `Cache-Control: max-age`. Zero or negative forbids reuse without
	/// revalidation.
	MaxAge(i64),
	/// Absolute `Expires` date
	At(DateTime<Utc>),
}

/// Caching directives a resource attaches to successful GET and HEAD
/// responses.
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::cache::{CachePolicy, CacheType};
/// use resourceful_http::Response;
///
/// let policy = CachePolicy::max_age(300).with_cache_type(CacheType::Private);
/// let mut response = Response::ok();
/// policy.apply(&mut response);
/// assert_eq!(response.header("cache-control"), Some("private, max-age=300"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachePolicy {
	pub expiry: Option<Expiry>,
	pub cache_type: Option<CacheType>,
	pub no_store: bool,
	pub must_revalidate: bool,
}

impl CachePolicy {
	pub fn max_age(seconds: i64) -> Self {
		Self {
			expiry: Some(Expiry::MaxAge(seconds)),
			..Self::default()
		}
	}

	pub fn expires_at(at: DateTime<Utc>) -> Self {
		Self {
			expiry: Some(Expiry::At(at)),
			..Self::default()
		}
	}

	pub fn with_cache_type(mut self, cache_type: CacheType) -> Self {
		self.cache_type = Some(cache_type);
		self
	}

	pub fn with_no_store(mut self, no_store: bool) -> Self {
		self.no_store = no_store;
		self
	}

	pub fn with_must_revalidate(mut self, must_revalidate: bool) -> Self {
		self.must_revalidate = must_revalidate;
		self
	}

	/// `Cache-Control` directives, empty when the policy sets nothing
	pub fn directives(&self) -> Vec<String> {
		let mut directives: Vec<String> = Vec::new();
		if let Some(cache_type) = self.cache_type {
			directives.push(cache_type.directive().to_string());
		}
		let max_age = match self.expiry {
			Some(Expiry::MaxAge(seconds)) => Some(seconds.max(0)),
			_ => None,
		};
		if max_age == Some(0) && self.cache_type != Some(CacheType::NoCache) {
			directives.push("no-cache".to_string());
		}
		if self.no_store {
			directives.push("no-store".to_string());
		}
		if self.must_revalidate {
			directives.push("must-revalidate".to_string());
		}
		if let Some(seconds) = max_age {
			directives.push(format!("max-age={seconds}"));
		}
		directives
	}

	/// Write `Cache-Control` and `Expires`. Headers already set by the
	/// handler are left alone.
	pub fn apply(&self, response: &mut Response) {
		if let Some(Expiry::At(at)) = self.expiry
			&& !response.headers.contains_key(EXPIRES)
		{
			response.set_header(EXPIRES.as_str(), &format_http_date(at));
		}
		let directives = self.directives();
		if !directives.is_empty() && !response.headers.contains_key(CACHE_CONTROL) {
			response.set_header(CACHE_CONTROL.as_str(), &directives.join(", "));
		}
	}
}

/// Mark a response as never cacheable
pub fn apply_uncacheable(response: &mut Response) {
	response.headers.insert(
		CACHE_CONTROL,
		HeaderValue::from_static("no-cache, must-revalidate, max-age=0"),
	);
	response
		.headers
		.insert(PRAGMA, HeaderValue::from_static("no-cache"));
	response.headers.insert(EXPIRES, HeaderValue::from_static("0"));
}
