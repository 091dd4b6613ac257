//! Precondition evaluation (RFC 7232 §6)

use chrono::{DateTime, Utc};
use resourceful_http::date::{parse_http_date, truncate_to_seconds};
use resourceful_http::header::{
	HeaderMap, HeaderName, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE,
};

use crate::etag::{EntityTag, EntityTagList};

/// Outcome of evaluating the conditional headers of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	/// Continue with normal processing
	Proceed,
	/// Answer 304 without a body
	NotModified,
	/// Answer 412
	PreconditionFailed,
}

/// Conditional headers extracted from a request. Unparseable dates and
/// entity-tag lists without a valid member are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
	pub if_match: Option<EntityTagList>,
	pub if_none_match: Option<EntityTagList>,
	pub if_modified_since: Option<DateTime<Utc>>,
	pub if_unmodified_since: Option<DateTime<Utc>>,
}

impl Preconditions {
	/// # Examples
	///
	/// ```
	/// use resourceful_conditional::Preconditions;
	/// use resourceful_http::HeaderMap;
	/// use resourceful_http::header::{HeaderValue, IF_NONE_MATCH, IF_MODIFIED_SINCE};
	///
	/// let mut headers = HeaderMap::new();
	/// headers.insert(IF_NONE_MATCH, HeaderValue::from_static("\"abc\""));
	/// headers.insert(IF_MODIFIED_SINCE, HeaderValue::from_static("not a date"));
	///
	/// let preconditions = Preconditions::from_headers(&headers);
	/// assert!(preconditions.if_none_match.is_some());
	/// assert!(preconditions.if_modified_since.is_none());
	/// ```
	pub fn from_headers(headers: &HeaderMap) -> Self {
		let tags = |name: HeaderName| {
			EntityTagList::parse(headers.get_all(name).iter().filter_map(|v| v.to_str().ok()))
		};
		let date = |name: HeaderName| {
			headers
				.get(name)
				.and_then(|v| v.to_str().ok())
				.and_then(parse_http_date)
		};
		Self {
			if_match: tags(IF_MATCH),
			if_none_match: tags(IF_NONE_MATCH),
			if_modified_since: date(IF_MODIFIED_SINCE),
			if_unmodified_since: date(IF_UNMODIFIED_SINCE),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.if_match.is_none()
			&& self.if_none_match.is_none()
			&& self.if_modified_since.is_none()
			&& self.if_unmodified_since.is_none()
	}

	/// Whether the request guards a write with `If-Match` or
	/// `If-Unmodified-Since`
	pub fn has_write_precondition(&self) -> bool {
		self.if_match.is_some() || self.if_unmodified_since.is_some()
	}
}

/// Current validators of the target resource together with the request's
/// preconditions
#[derive(Debug, Clone, Default)]
pub struct ConditionalContext {
	pub last_modified: Option<DateTime<Utc>>,
	pub etag: Option<EntityTag>,
	pub preconditions: Preconditions,
}

impl ConditionalContext {
	pub fn new(preconditions: Preconditions) -> Self {
		Self {
			preconditions,
			..Self::default()
		}
	}

	pub fn with_etag(mut self, etag: Option<EntityTag>) -> Self {
		self.etag = etag;
		self
	}

	/// Sub-second precision is dropped so that a timestamp compares equal
	/// to its own HTTP-date rendering.
	pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
		self.last_modified = last_modified.map(truncate_to_seconds);
		self
	}
}

/// Stateless evaluator for [`ConditionalContext`]s.
///
/// Write preconditions (`If-Match`, then `If-Unmodified-Since`) are checked
/// first and either one failing gives 412. For safe methods a hit on
/// `If-None-Match` or `If-Modified-Since` gives 304. A header whose
/// validator the resource does not report is skipped.
///
/// # Examples
///
/// ```
/// use resourceful_conditional::{
///     ConditionalContext, ConditionalEvaluator, Decision, EntityTag, EntityTagList, Preconditions,
/// };
///
/// let preconditions = Preconditions {
///     if_none_match: EntityTagList::parse(["\"abc\""]),
///     ..Preconditions::default()
/// };
/// let ctx = ConditionalContext::new(preconditions).with_etag(Some(EntityTag::strong("abc")));
///
/// assert_eq!(ConditionalEvaluator::evaluate(&ctx, true), Decision::NotModified);
/// assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
/// ```
pub struct ConditionalEvaluator;

impl ConditionalEvaluator {
	pub fn evaluate(ctx: &ConditionalContext, method_is_safe: bool) -> Decision {
		let pre = &ctx.preconditions;

		if let (Some(list), Some(etag)) = (&pre.if_match, &ctx.etag)
			&& !list.contains_exact(etag)
		{
			tracing::debug!(%etag, "If-Match did not match");
			return Decision::PreconditionFailed;
		}
		if let (Some(since), Some(modified)) = (pre.if_unmodified_since, ctx.last_modified)
			&& modified > since
		{
			tracing::debug!(%since, %modified, "modified after If-Unmodified-Since");
			return Decision::PreconditionFailed;
		}

		if !method_is_safe {
			return Decision::Proceed;
		}

		if let (Some(list), Some(etag)) = (&pre.if_none_match, &ctx.etag)
			&& list.contains_weak(etag)
		{
			return Decision::NotModified;
		}
		if let (Some(since), Some(modified)) = (pre.if_modified_since, ctx.last_modified)
			&& modified <= since
		{
			return Decision::NotModified;
		}

		Decision::Proceed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, TimeZone};
	use rstest::{fixture, rstest};

	#[fixture]
	fn t() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
	}

	fn tags(value: &str) -> Option<EntityTagList> {
		EntityTagList::parse([value])
	}

	#[rstest]
	fn test_no_preconditions_proceeds() {
		let ctx = ConditionalContext::default().with_etag(Some(EntityTag::strong("x")));
		assert_eq!(ConditionalEvaluator::evaluate(&ctx, true), Decision::Proceed);
		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	#[case("\"abc\"", Decision::Proceed)]
	#[case("\"other\"", Decision::PreconditionFailed)]
	#[case("\"other\", \"abc\"", Decision::Proceed)]
	#[case("*", Decision::Proceed)]
	#[case("W/\"abc\"", Decision::PreconditionFailed)]
	fn test_if_match(#[case] header: &str, #[case] expected: Decision) {
		// Arrange
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags(header),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")));

		// Act
		let decision = ConditionalEvaluator::evaluate(&ctx, false);

		// Assert
		assert_eq!(decision, expected);
	}

	#[rstest]
	fn test_if_match_weak_resource_tag_matches_exactly() {
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags("W/\"abc\""),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::weak("abc")));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	fn test_if_match_without_resource_etag_is_skipped() {
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags("\"abc\""),
			..Preconditions::default()
		});

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	fn test_if_unmodified_since_is_inclusive(t: DateTime<Utc>) {
		let pre = Preconditions {
			if_unmodified_since: Some(t),
			..Preconditions::default()
		};

		let later = ConditionalContext::new(pre.clone()).with_last_modified(Some(t + Duration::seconds(1)));
		let same = ConditionalContext::new(pre).with_last_modified(Some(t));

		assert_eq!(
			ConditionalEvaluator::evaluate(&later, false),
			Decision::PreconditionFailed
		);
		assert_eq!(ConditionalEvaluator::evaluate(&same, false), Decision::Proceed);
	}

	#[rstest]
	fn test_subsecond_last_modified_is_truncated(t: DateTime<Utc>) {
		let ctx = ConditionalContext::new(Preconditions {
			if_unmodified_since: Some(t),
			..Preconditions::default()
		})
		.with_last_modified(Some(t + Duration::milliseconds(400)));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	fn test_passing_if_match_still_checks_if_unmodified_since(t: DateTime<Utc>) {
		// Arrange
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags("\"abc\""),
			if_unmodified_since: Some(t),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")))
		.with_last_modified(Some(t + Duration::hours(1)));

		// Act
		let decision = ConditionalEvaluator::evaluate(&ctx, false);

		// Assert
		assert_eq!(decision, Decision::PreconditionFailed);
	}

	#[rstest]
	fn test_passing_if_match_and_if_unmodified_since_proceeds(t: DateTime<Utc>) {
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags("\"abc\""),
			if_unmodified_since: Some(t),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")))
		.with_last_modified(Some(t));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	#[case(true, Decision::NotModified)]
	#[case(false, Decision::Proceed)]
	fn test_if_none_match_only_applies_to_safe_methods(
		#[case] safe: bool,
		#[case] expected: Decision,
	) {
		let ctx = ConditionalContext::new(Preconditions {
			if_none_match: tags("\"abc\""),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, safe), expected);
	}

	#[rstest]
	fn test_if_none_match_uses_weak_comparison() {
		let ctx = ConditionalContext::new(Preconditions {
			if_none_match: tags("W/\"abc\""),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, true), Decision::NotModified);
	}

	#[rstest]
	fn test_if_none_match_miss_falls_through_to_if_modified_since(t: DateTime<Utc>) {
		// Arrange
		let ctx = ConditionalContext::new(Preconditions {
			if_none_match: tags("\"stale\""),
			if_modified_since: Some(t),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")))
		.with_last_modified(Some(t));

		// Act
		let decision = ConditionalEvaluator::evaluate(&ctx, true);

		// Assert
		assert_eq!(decision, Decision::NotModified);
	}

	#[rstest]
	fn test_if_none_match_miss_and_modified_since_proceeds(t: DateTime<Utc>) {
		let ctx = ConditionalContext::new(Preconditions {
			if_none_match: tags("\"stale\""),
			if_modified_since: Some(t),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")))
		.with_last_modified(Some(t + Duration::seconds(5)));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, true), Decision::Proceed);
	}

	#[rstest]
	#[case(Duration::zero(), Decision::NotModified)]
	#[case(Duration::seconds(-30), Decision::NotModified)]
	#[case(Duration::seconds(1), Decision::Proceed)]
	fn test_if_modified_since(t: DateTime<Utc>, #[case] offset: Duration, #[case] expected: Decision) {
		let ctx = ConditionalContext::new(Preconditions {
			if_modified_since: Some(t),
			..Preconditions::default()
		})
		.with_last_modified(Some(t + offset));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, true), expected);
	}

	#[rstest]
	fn test_if_modified_since_ignored_for_unsafe_methods(t: DateTime<Utc>) {
		let ctx = ConditionalContext::new(Preconditions {
			if_modified_since: Some(t),
			..Preconditions::default()
		})
		.with_last_modified(Some(t));

		assert_eq!(ConditionalEvaluator::evaluate(&ctx, false), Decision::Proceed);
	}

	#[rstest]
	fn test_failed_write_precondition_wins_over_not_modified(t: DateTime<Utc>) {
		let ctx = ConditionalContext::new(Preconditions {
			if_match: tags("\"other\""),
			if_none_match: tags("\"abc\""),
			..Preconditions::default()
		})
		.with_etag(Some(EntityTag::strong("abc")))
		.with_last_modified(Some(t));

		assert_eq!(
			ConditionalEvaluator::evaluate(&ctx, true),
			Decision::PreconditionFailed
		);
	}
}
