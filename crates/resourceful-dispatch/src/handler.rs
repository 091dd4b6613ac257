//! Method handlers and the fixed slots a resource binds them to

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use resourceful_http::{Method, Request, Response};
use resourceful_negotiation::NegotiationResult;
use serde_json::Value;

use crate::error::HandlerError;

/// What a handler produced
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
	/// Nothing to send. Answered with 204 unless the handler chose a status.
	Empty,
	/// Bytes written as they are
	Raw(Bytes),
	/// Structured data, encoded with the codec of the negotiated type
	Data(Value),
}

impl From<Value> for Content {
	fn from(value: Value) -> Self {
		Content::Data(value)
	}
}

impl From<Bytes> for Content {
	fn from(bytes: Bytes) -> Self {
		Content::Raw(bytes)
	}
}

impl From<&'static str> for Content {
	fn from(s: &'static str) -> Self {
		Content::Raw(Bytes::from_static(s.as_bytes()))
	}
}

impl From<String> for Content {
	fn from(s: String) -> Self {
		Content::Raw(Bytes::from(s))
	}
}

/// Logic bound to one request method.
///
/// `response` starts as an empty 200; handlers may change its status and
/// headers. `negotiated` carries the chosen representation and version.
#[async_trait]
pub trait MethodHandler: Send + Sync {
	async fn handle(
		&self,
		request: &Request,
		response: &mut Response,
		negotiated: &NegotiationResult,
	) -> Result<Content, HandlerError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> MethodHandler for FnHandler<F>
where
	F: Fn(&Request, &mut Response, &NegotiationResult) -> Result<Content, HandlerError>
		+ Send
		+ Sync,
{
	async fn handle(
		&self,
		request: &Request,
		response: &mut Response,
		negotiated: &NegotiationResult,
	) -> Result<Content, HandlerError> {
		(self.0)(request, response, negotiated)
	}
}

/// Wrap a synchronous closure as a [`MethodHandler`]
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::handler::{handler_fn, Content};
///
/// let handler = handler_fn(|_request, _response, _negotiated| {
///     Ok(Content::Data(serde_json::json!({"ok": true})))
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F>(f: F) -> Arc<dyn MethodHandler>
where
	F: Fn(&Request, &mut Response, &NegotiationResult) -> Result<Content, HandlerError>
		+ Send
		+ Sync
		+ 'static,
{
	Arc::new(FnHandler(f))
}

/// Handler slots. HEAD is served by the GET handler and OPTIONS is
/// answered by the dispatcher, so neither has a slot.
#[derive(Clone, Default)]
pub struct HandlerSet {
	get: Option<Arc<dyn MethodHandler>>,
	post: Option<Arc<dyn MethodHandler>>,
	put: Option<Arc<dyn MethodHandler>>,
	patch: Option<Arc<dyn MethodHandler>>,
	delete: Option<Arc<dyn MethodHandler>>,
}

impl HandlerSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(mut self, handler: Arc<dyn MethodHandler>) -> Self {
		self.get = Some(handler);
		self
	}

	pub fn post(mut self, handler: Arc<dyn MethodHandler>) -> Self {
		self.post = Some(handler);
		self
	}

	pub fn put(mut self, handler: Arc<dyn MethodHandler>) -> Self {
		self.put = Some(handler);
		self
	}

	pub fn patch(mut self, handler: Arc<dyn MethodHandler>) -> Self {
		self.patch = Some(handler);
		self
	}

	pub fn delete(mut self, handler: Arc<dyn MethodHandler>) -> Self {
		self.delete = Some(handler);
		self
	}

	/// Whether `method` has a slot at all
	pub fn has_slot(method: &Method) -> bool {
		matches!(
			*method,
			Method::GET | Method::HEAD | Method::POST | Method::PUT | Method::PATCH | Method::DELETE
		)
	}

	/// Handler serving `method`
	pub fn for_method(&self, method: &Method) -> Option<&Arc<dyn MethodHandler>> {
		let slot = match *method {
			Method::GET | Method::HEAD => &self.get,
			Method::POST => &self.post,
			Method::PUT => &self.put,
			Method::PATCH => &self.patch,
			Method::DELETE => &self.delete,
			_ => return None,
		};
		slot.as_ref()
	}

	/// Methods with a bound handler, HEAD included when GET is bound
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_dispatch::handler::{handler_fn, Content, HandlerSet};
	/// use resourceful_http::Method;
	///
	/// let handlers = HandlerSet::new().get(handler_fn(|_, _, _| Ok(Content::Empty)));
	/// assert_eq!(handlers.bound_methods(), vec![Method::GET, Method::HEAD]);
	/// ```
	pub fn bound_methods(&self) -> Vec<Method> {
		let mut methods = Vec::new();
		if self.get.is_some() {
			methods.push(Method::GET);
			methods.push(Method::HEAD);
		}
		for (method, slot) in [
			(Method::POST, &self.post),
			(Method::PUT, &self.put),
			(Method::PATCH, &self.patch),
			(Method::DELETE, &self.delete),
		] {
			if slot.is_some() {
				methods.push(method);
			}
		}
		methods
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn noop() -> Arc<dyn MethodHandler> {
		handler_fn(|_, _, _| Ok(Content::Empty))
	}

	#[rstest]
	fn test_empty_set() {
		let handlers = HandlerSet::new();
		assert!(handlers.bound_methods().is_empty());
		assert!(handlers.for_method(&Method::GET).is_none());
	}

	#[rstest]
	fn test_head_uses_get_slot() {
		let handlers = HandlerSet::new().get(noop());
		assert!(handlers.for_method(&Method::HEAD).is_some());
	}

	#[rstest]
	fn test_bound_methods_without_get() {
		let handlers = HandlerSet::new().delete(noop()).post(noop());
		assert_eq!(handlers.bound_methods(), vec![Method::POST, Method::DELETE]);
	}

	#[rstest]
	#[case(Method::OPTIONS, false)]
	#[case(Method::TRACE, false)]
	#[case(Method::PATCH, true)]
	fn test_has_slot(#[case] method: Method, #[case] expected: bool) {
		assert_eq!(HandlerSet::has_slot(&method), expected);
	}

	#[tokio::test]
	async fn test_handler_fn_can_set_status() {
		// Arrange
		let handler = handler_fn(|request, response, _| {
			response.status = resourceful_http::StatusCode::CREATED;
			Ok(Content::from(format!("{} ok", request.method)))
		});
		let request = Request::builder().method(Method::POST).build().unwrap();
		let mut response = Response::ok();

		// Act
		let content = handler
			.handle(&request, &mut response, &NegotiationResult::unconstrained())
			.await
			.unwrap();

		// Assert
		assert_eq!(response.status, resourceful_http::StatusCode::CREATED);
		assert_eq!(content, Content::Raw(Bytes::from("POST ok")));
	}
}
