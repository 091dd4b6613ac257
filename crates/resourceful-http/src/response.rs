use bytes::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::Error;

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn not_modified() -> Self {
		Self::new(StatusCode::NOT_MODIFIED)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body, Bytes::from("Hello, World!"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header, replacing any previous value. Invalid names or values
	/// are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Response;
	///
	/// let response = Response::ok().with_header("Allow", "GET, HEAD");
	/// assert_eq!(response.header("allow"), Some("GET, HEAD"));
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		self.set_header(name, value);
		self
	}

	pub fn with_typed_header(mut self, key: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(key, value);
		self
	}

	/// Set the body to serialized JSON and add the matching `Content-Type`
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"ok": true})).unwrap();
	/// assert_eq!(response.header("content-type"), Some("application/json"));
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// In-place variant of [`Response::with_header`] for handlers that
	/// receive `&mut Response`.
	pub fn set_header(&mut self, name: &str, value: &str) {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
	}

	/// Header value as a string
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Replace the body and keep `Content-Length` in step with it
	pub fn set_body(&mut self, body: impl Into<Bytes>) {
		self.body = body.into();
		self.headers
			.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len() as u64));
	}

	/// Drop the body while leaving headers, including `Content-Length`,
	/// untouched. Used to answer HEAD with the headers GET would send.
	pub fn strip_body(&mut self) {
		self.body = Bytes::new();
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let message = match &error {
			Error::InvalidRequest(_) => error.to_string(),
			_ => "Internal Server Error".to_string(),
		};
		Response::new(status)
			.with_json(&serde_json::json!({ "error": message }))
			.unwrap_or_else(|_| Response::new(status))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_set_body_updates_content_length() {
		// Arrange
		let mut response = Response::ok();

		// Act
		response.set_body("hello");

		// Assert
		assert_eq!(response.header("content-length"), Some("5"));
	}

	#[rstest]
	fn test_strip_body_keeps_headers() {
		let mut response = Response::ok();
		response.set_body("hello");

		response.strip_body();

		assert!(response.body.is_empty());
		assert_eq!(response.header("content-length"), Some("5"));
	}

	#[rstest]
	fn test_invalid_header_ignored() {
		let response = Response::ok().with_header("bad name", "value");
		assert!(response.headers.is_empty());
	}

	#[rstest]
	#[case(Error::InvalidRequest("bad uri".into()), StatusCode::BAD_REQUEST)]
	#[case(Error::Serialization("trailing comma".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(Error::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_from_error(#[case] error: Error, #[case] expected: StatusCode) {
		let response = Response::from(error);

		assert_eq!(response.status, expected);
		assert_eq!(response.header("content-type"), Some("application/json"));
	}

	#[rstest]
	fn test_internal_error_detail_not_leaked() {
		let response = Response::from(Error::Internal("database password".into()));
		let body = String::from_utf8(response.body.to_vec()).unwrap();
		assert!(!body.contains("password"));
	}
}
