use thiserror::Error;

/// Errors crossing the [`Handler`](crate::Handler) boundary
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
	/// Malformed request (bad header name or value, bad URI)
	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	/// Serialization error
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Internal error
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Status code a response built from this error should carry.
	pub fn status_code(&self) -> u16 {
		match self {
			Error::InvalidRequest(_) => 400,
			Error::Serialization(_) | Error::Internal(_) => 500,
		}
	}
}

impl From<hyper::header::InvalidHeaderValue> for Error {
	fn from(err: hyper::header::InvalidHeaderValue) -> Self {
		Error::InvalidRequest(err.to_string())
	}
}

impl From<hyper::header::InvalidHeaderName> for Error {
	fn from(err: hyper::header::InvalidHeaderName) -> Self {
		Error::InvalidRequest(err.to_string())
	}
}

impl From<hyper::http::uri::InvalidUri> for Error {
	fn from(err: hyper::http::uri::InvalidUri) -> Self {
		Error::InvalidRequest(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
