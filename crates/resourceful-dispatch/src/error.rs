use resourceful_negotiation::ParseError;
use thiserror::Error;

/// Failure turning a representation into bytes or back
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
	#[error("Failed to decode {media_type}: {message}")]
	Decode { media_type: String, message: String },

	#[error("Failed to encode {media_type}: {message}")]
	Encode { media_type: String, message: String },

	#[error("No codec registered for {0}")]
	Unsupported(String),
}

/// Failure raised by a method handler. The dispatcher answers 500 for
/// every variant and logs the cause.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("{0}")]
	Message(String),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Http(#[from] resourceful_http::Error),

	#[error(transparent)]
	Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
	pub fn message(message: impl Into<String>) -> Self {
		HandlerError::Message(message.into())
	}
}

/// Invalid resource declaration
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DescriptorError {
	#[error("Invalid media type {value:?}: {source}")]
	MediaType {
		value: String,
		#[source]
		source: ParseError,
	},
}
