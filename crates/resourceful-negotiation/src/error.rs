use thiserror::Error;

/// Malformed media type or header token.
///
/// Never fatal to a whole header: the offending range is dropped and the
/// remaining ranges are still evaluated.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("empty media type")]
	Empty,

	#[error("media type '{0}' must contain exactly one '/'")]
	MissingSlash(String),

	#[error("invalid token in media type '{0}'")]
	InvalidToken(String),

	#[error("wildcard type with concrete subtype is not a valid range: '{0}'")]
	WildcardType(String),

	#[error("malformed media type parameter '{0}'")]
	InvalidParameter(String),

	#[error("quality value '{0}' is not in [0, 1]")]
	InvalidQuality(String),
}
