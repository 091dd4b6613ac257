use resourceful_negotiation::{AcceptHeader, MediaRangeMatcher, MediaType, parse_media_types};
use rstest::rstest;

fn negotiate(accept: Option<&str>, offered: &[&str]) -> Option<String> {
	let offered = parse_media_types(offered).unwrap();
	let result = MediaRangeMatcher::new().best_match(&AcceptHeader::from_header(accept), &offered);
	result.media_type().map(MediaType::essence)
}

#[rstest]
#[case(None, &["application/json", "application/xml"], Some("application/json"))]
#[case(Some(""), &["application/json", "application/xml"], Some("application/json"))]
#[case(Some("application/xml"), &["application/json", "application/xml"], Some("application/xml"))]
#[case(Some("text/*;q=0, */*;q=0.1"), &["text/html", "application/json"], Some("application/json"))]
#[case(Some("text/html;q=0, application/json;q=0"), &["text/html", "application/json"], None)]
#[case(Some("image/*"), &["application/json"], None)]
#[case(Some("*/html, application/json"), &["text/html", "application/json"], Some("application/json"))]
#[case(Some("garbage"), &["application/json"], None)]
#[case(
	Some("text/*;q=0.3, text/html;q=0.7, text/html;level=1, text/html;level=2;q=0.4, */*;q=0.5"),
	&["text/plain", "image/jpeg", "text/html"],
	Some("text/html")
)]
fn test_negotiation_table(
	#[case] accept: Option<&str>,
	#[case] offered: &[&str],
	#[case] expected: Option<&str>,
) {
	assert_eq!(negotiate(accept, offered).as_deref(), expected);
}

#[test]
fn test_browser_style_header() {
	let header = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
	assert_eq!(
		negotiate(Some(header), &["application/json", "application/xml"]).as_deref(),
		Some("application/xml")
	);
	assert_eq!(
		negotiate(Some(header), &["application/json", "text/html"]).as_deref(),
		Some("text/html")
	);
}

#[test]
fn test_matched_range_reports_specific_range() {
	let offered = parse_media_types(&["text/html"]).unwrap();
	let accept = AcceptHeader::parse("text/html;q=0.5, text/*;q=0.5");
	let result = MediaRangeMatcher::new().best_match(&accept, &offered);
	let range = result.matched_range().unwrap();
	assert_eq!(range.essence(), "text/html");
	assert_eq!(range.quality().thousandths(), 500);
}
