//! Property tests for media type parsing and negotiation

use proptest::prelude::*;
use resourceful_negotiation::{AcceptHeader, MediaRangeMatcher, MediaType, Quality};

fn token() -> impl Strategy<Value = String> {
	"[a-z][a-z0-9.+-]{0,10}"
}

fn media_type() -> impl Strategy<Value = MediaType> {
	(
		token(),
		token(),
		prop::collection::btree_map("[a-z]{1,6}", "[ -~]{0,8}", 0..3),
		0u16..=1000,
	)
		.prop_map(|(main, sub, params, q)| {
			params
				.into_iter()
				.filter(|(k, _)| k != "q")
				.fold(MediaType::new(main, sub), |mt, (k, v)| mt.with_param(&k, v))
				.with_quality(Quality::from_thousandths(q))
		})
}

proptest! {
	#[test]
	fn prop_format_then_parse_round_trips(mt in media_type()) {
		let formatted = mt.to_string();
		let reparsed = MediaType::parse(&formatted).unwrap();
		prop_assert_eq!(reparsed, mt);
	}

	#[test]
	fn prop_best_match_is_deterministic(
		ranges in prop::collection::vec(media_type(), 0..5),
		candidates in prop::collection::vec(media_type(), 0..5),
	) {
		let accept = AcceptHeader::from(ranges);
		let matcher = MediaRangeMatcher::new();
		let first = matcher.best_match(&accept, &candidates);
		let second = matcher.best_match(&accept, &candidates);
		prop_assert_eq!(first, second);
	}

	#[test]
	fn prop_zero_quality_ranges_never_select(candidates in prop::collection::vec(media_type(), 1..5)) {
		let accept = AcceptHeader::parse("*/*;q=0");
		let result = MediaRangeMatcher::new().best_match(&accept, &candidates);
		prop_assert!(!result.is_match());
	}

	#[test]
	fn prop_parse_never_panics(input in "\\PC{0,40}") {
		let _ = MediaType::parse(&input);
		let _ = AcceptHeader::parse(&input);
	}
}
