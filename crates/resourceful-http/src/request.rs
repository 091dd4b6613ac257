use bytes::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, Uri, Version};
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Inbound HTTP request.
///
/// `data` holds the request body once a codec has decoded it; it stays
/// `None` until then and for requests without a body.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	data: Option<serde_json::Value>,
}

impl Request {
	/// Create a request with no headers and an empty body
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Request;
	/// use hyper::{Method, Uri};
	///
	/// let request = Request::new(Method::GET, Uri::from_static("/widgets"));
	/// assert_eq!(request.method, Method::GET);
	/// assert!(request.body.is_empty());
	/// ```
	pub fn new(method: Method, uri: Uri) -> Self {
		Self {
			method,
			uri,
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			data: None,
		}
	}

	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Header value as a string. Values that are not visible ASCII are
	/// treated as absent.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Request;
	///
	/// let request = Request::builder()
	///     .header("Accept", "application/json")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.header("accept"), Some("application/json"));
	/// assert_eq!(request.header("if-match"), None);
	/// ```
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Raw `Content-Type` header, if present
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(str::trim)
			.filter(|v| !v.is_empty())
	}

	/// Entity length: the larger of a valid `Content-Length` and the length
	/// of the buffered body, so an understated header cannot hide a body.
	pub fn content_length(&self) -> u64 {
		let buffered = self.body.len() as u64;
		self.headers
			.get(CONTENT_LENGTH)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.trim().parse::<u64>().ok())
			.map_or(buffered, |declared| declared.max(buffered))
	}

	/// Whether the request carries an entity: a non-empty body, a positive
	/// `Content-Length`, or a `Content-Type` header.
	pub fn has_body(&self) -> bool {
		!self.body.is_empty() || self.content_length() > 0 || self.content_type().is_some()
	}

	/// Decoded request body
	pub fn data(&self) -> Option<&serde_json::Value> {
		self.data.as_ref()
	}

	pub fn set_data(&mut self, data: serde_json::Value) {
		self.data = Some(data);
	}

	/// Deserialize the decoded body into `T`
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_http::Request;
	/// use serde::Deserialize;
	///
	/// #[derive(Deserialize)]
	/// struct Widget {
	///     name: String,
	/// }
	///
	/// let mut request = Request::builder().build().unwrap();
	/// request.set_data(serde_json::json!({"name": "sprocket"}));
	/// let widget: Widget = request.data_as().unwrap().unwrap();
	/// assert_eq!(widget.name, "sprocket");
	/// ```
	pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
		self.data
			.clone()
			.map(serde_json::from_value::<T>)
			.transpose()
			.map_err(|e| Error::Serialization(e.to_string()))
	}
}

/// Builder for [`Request`]. Invalid header names, header values and URIs
/// are reported by [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: Vec<(String, String)>,
	body: Bytes,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: Vec::new(),
			body: Bytes::new(),
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Append a header. Repeated names are kept as separate values.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a JSON body and its `Content-Type`
	pub fn json<T: serde::Serialize>(self, data: &T) -> Result<Self> {
		let body = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		Ok(self.header("Content-Type", "application/json").body(body))
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self.uri.parse()?;
		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let name = HeaderName::from_bytes(name.as_bytes())?;
			let value = HeaderValue::from_str(&value)?;
			headers.append(name, value);
		}
		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers,
			body: self.body,
			data: None,
		})
	}
}
