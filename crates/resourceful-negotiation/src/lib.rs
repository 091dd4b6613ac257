//! # Resourceful Negotiation
//!
//! Media type parsing and `Accept` header negotiation.
//!
//! ## Overview
//!
//! - [`MediaType`]: one `type/subtype;params` token, wildcards included
//! - [`AcceptHeader`]: the ordered ranges of an `Accept` header
//! - [`MediaRangeMatcher`]: picks the best offered type for a header
//! - [`NegotiationResult`]: what was chosen, and which version
//!
//! ## Example
//!
//! ```
//! use resourceful_negotiation::{AcceptHeader, MediaRangeMatcher, MediaType};
//!
//! let offered = vec![
//!     MediaType::parse("application/json").unwrap(),
//!     MediaType::parse("application/xml").unwrap(),
//! ];
//!
//! let accept = AcceptHeader::parse("application/xml;q=0.9, application/json;q=0.5");
//! let result = MediaRangeMatcher::new().best_match(&accept, &offered);
//!
//! assert!(result.is_match());
//! assert_eq!(result.media_type().unwrap().essence(), "application/xml");
//! ```

pub mod accept;
pub mod error;
pub mod matcher;
pub mod media_type;
pub mod quality;
pub mod result;

pub use accept::AcceptHeader;
pub use error::ParseError;
pub use matcher::{FitnessAndQuality, MediaRangeMatcher};
pub use media_type::{MediaType, Specificity, VERSION_PARAM};
pub use quality::Quality;
pub use result::NegotiationResult;

/// Parses a list of media type strings, failing on the first bad one.
///
/// Meant for resource declarations, where a typo is a programming error that
/// should surface at construction rather than be skipped.
///
/// # Examples
///
/// ```
/// use resourceful_negotiation::parse_media_types;
///
/// let types = parse_media_types(&["application/json", "text/html"]).unwrap();
/// assert_eq!(types.len(), 2);
/// assert!(parse_media_types(&["application/json", "nope"]).is_err());
/// ```
pub fn parse_media_types<S: AsRef<str>>(types: &[S]) -> Result<Vec<MediaType>, ParseError> {
	types.iter().map(|s| MediaType::parse(s.as_ref())).collect()
}
