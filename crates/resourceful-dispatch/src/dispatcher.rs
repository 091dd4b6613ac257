//! The per-request state machine

use bytes::Bytes;
use chrono::{DateTime, Utc};
use resourceful_conditional::{
	ConditionalContext, ConditionalEvaluator, Decision, EntityTag, Preconditions,
};
use resourceful_conf::{AcceptPolicy, DispatchSettings};
use resourceful_http::date::{format_http_date, truncate_to_seconds};
use resourceful_http::header::{
	ACCEPT, ALLOW, CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderValue, LAST_MODIFIED,
	RETRY_AFTER, VARY,
};
use resourceful_http::method::allow_header_value;
use resourceful_http::{Method, MethodExt, Request, Response, StatusCode};
use resourceful_negotiation::{
	AcceptHeader, MediaRangeMatcher, MediaType, NegotiationResult, Specificity,
};

use crate::cache::apply_uncacheable;
use crate::codec::{CodecRegistry, JSON};
use crate::descriptor::ResourceDescriptor;
use crate::error::CodecError;
use crate::handler::{Content, HandlerSet};
use crate::resource::{Availability, Resource};

/// Media type assumed for request bodies sent without `Content-Type`
pub const OCTET_STREAM: &str = "application/octet-stream";

/// RFC 5789 §3.1
const ACCEPT_PATCH: &str = "Accept-Patch";

/// Drives a request through a [`Resource`].
///
/// States run in a fixed order and each may end the request:
/// availability (503), authorization (401), permission (403), rate limit
/// (429), method (405, 501, OPTIONS), body type (415), body length (413),
/// Accept negotiation (406), existence (404, 410), required preconditions
/// (428), preconditions (412, 304), body decoding (400), and finally the
/// handler (500 on failure). Every outcome is a [`Response`].
///
/// The dispatcher keeps no per-request state and can be shared between
/// tasks.
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::{BasicResource, HandlerSet, ResourceDescriptor, ResourceDispatcher};
/// use resourceful_dispatch::handler::{handler_fn, Content};
/// use resourceful_http::{Request, StatusCode};
///
/// # tokio_test::block_on(async {
/// let resource = BasicResource::new(
///     ResourceDescriptor::builder().accept_types(["application/json"]).build().unwrap(),
///     HandlerSet::new().get(handler_fn(|_, _, _| {
///         Ok(Content::Data(serde_json::json!({"hello": "world"})))
///     })),
/// );
/// let dispatcher = ResourceDispatcher::default();
///
/// let request = Request::builder().header("Accept", "application/json").build().unwrap();
/// let response = dispatcher.dispatch(&resource, request).await;
///
/// assert_eq!(response.status, StatusCode::OK);
/// assert_eq!(response.header("content-type"), Some("application/json"));
/// assert_eq!(&response.body[..], br#"{"hello":"world"}"#);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct ResourceDispatcher {
	settings: DispatchSettings,
	codecs: CodecRegistry,
	matcher: MediaRangeMatcher,
}

impl ResourceDispatcher {
	pub fn new(settings: DispatchSettings) -> Self {
		Self {
			settings,
			codecs: CodecRegistry::default(),
			matcher: MediaRangeMatcher::new(),
		}
	}

	pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
		self.codecs = codecs;
		self
	}

	pub fn settings(&self) -> &DispatchSettings {
		&self.settings
	}

	pub fn codecs(&self) -> &CodecRegistry {
		&self.codecs
	}

	pub async fn dispatch(&self, resource: &dyn Resource, mut request: Request) -> Response {
		let method = request.method.clone();
		let descriptor = resource.descriptor();
		let handlers = resource.handlers();
		let mut response = Response::ok();

		tracing::debug!(method = %method, path = request.uri.path(), "dispatching request");

		let availability = resource.availability(&request).await;
		if !availability.is_available() {
			return exit("availability", unavailable(availability));
		}

		if resource.is_unauthorized(&request, &mut response).await {
			return exit("authorization", with_status(response, StatusCode::UNAUTHORIZED));
		}
		if resource.is_forbidden(&request, &mut response).await {
			return exit("permission", with_status(response, StatusCode::FORBIDDEN));
		}
		if resource.is_too_many_requests(&request, &mut response).await {
			return exit("rate_limit", with_status(response, StatusCode::TOO_MANY_REQUESTS));
		}

		let allowed = descriptor.allowed_methods(handlers);
		if method == Method::OPTIONS {
			return exit("method", options_response(descriptor, &allowed));
		}
		if !allowed.contains(&method) {
			// TRACE and CONNECT are standard but never served by a resource
			let response = if HandlerSet::has_slot(&method) || !method.is_recognized() {
				Response::new(StatusCode::METHOD_NOT_ALLOWED)
					.with_header(ALLOW.as_str(), &allow_header_value(&allowed))
			} else {
				tracing::debug!(method = %method, "no handler slot for method");
				Response::new(StatusCode::NOT_IMPLEMENTED)
			};
			return exit("method", response);
		}
		let Some(handler) = handlers.for_method(&method).cloned() else {
			return exit("method", Response::new(StatusCode::NOT_IMPLEMENTED));
		};

		let mut body_type = None;
		if method.carries_entity() && request.has_body() {
			let supported = if method == Method::PATCH {
				descriptor.patch_types()
			} else {
				descriptor.content_types()
			};
			match self.check_content_type(&request, supported) {
				Ok(content_type) => body_type = Some(content_type),
				Err(mut response) => {
					if method == Method::PATCH && !supported.is_empty() {
						response.set_header(ACCEPT_PATCH, &join_types(supported));
					}
					return exit("content_type", response);
				}
			}

			let limit = descriptor
				.max_request_entity_length()
				.or(self.settings.max_request_entity_length);
			if let Some(limit) = limit
				&& request.content_length() > limit
			{
				return exit("entity_length", Response::new(StatusCode::PAYLOAD_TOO_LARGE));
			}
		}

		let Some(negotiated) = self.negotiate(&request, descriptor) else {
			return exit("accept", Response::new(StatusCode::NOT_ACCEPTABLE));
		};

		if resource.is_not_found(&request, &mut response).await {
			return exit("existence", with_status(response, StatusCode::NOT_FOUND));
		}
		if resource.is_gone(&request, &mut response).await {
			return exit("existence", with_status(response, StatusCode::GONE));
		}

		let preconditions = Preconditions::from_headers(&request.headers);
		let require_conditional = descriptor
			.require_conditional_request()
			.unwrap_or(self.settings.require_conditional_request);
		if require_conditional
			&& (method == Method::PUT || method == Method::PATCH)
			&& !preconditions.has_write_precondition()
		{
			let mut response = Response::new(StatusCode::PRECONDITION_REQUIRED);
			apply_uncacheable(&mut response);
			return exit("precondition_required", response);
		}

		let is_read = method == Method::GET || method == Method::HEAD;
		let (etag, last_modified) = if is_read || !preconditions.is_empty() {
			let etag = resource.etag(&request).await;
			let last_modified = resource.last_modified(&request).await;
			(
				etag.as_deref().map(EntityTag::from_resource),
				last_modified.map(truncate_to_seconds),
			)
		} else {
			(None, None)
		};

		if !preconditions.is_empty() {
			let ctx = ConditionalContext::new(preconditions)
				.with_etag(etag.clone())
				.with_last_modified(last_modified);
			match ConditionalEvaluator::evaluate(&ctx, method.is_safe()) {
				Decision::Proceed => {}
				Decision::NotModified => {
					let mut response = Response::not_modified();
					self.apply_vary(&mut response, descriptor);
					descriptor.cache().apply(&mut response);
					self.apply_validators(&mut response, etag.as_ref(), last_modified);
					return exit("conditional", response);
				}
				Decision::PreconditionFailed => {
					let mut response = Response::new(StatusCode::PRECONDITION_FAILED);
					apply_uncacheable(&mut response);
					return exit("conditional", response);
				}
			}
		}

		if let Some(content_type) = &body_type
			&& !request.body.is_empty()
			&& let Some(codec) = self.codecs.get(content_type)
		{
			match codec.decode(&request.body) {
				Ok(data) => request.set_data(data),
				Err(error) => {
					tracing::warn!(%error, content_type = %content_type, "request body could not be decoded");
					return exit("decode", Response::bad_request());
				}
			}
		}

		let content = match handler.handle(&request, &mut response, &negotiated).await {
			Ok(content) => content,
			Err(error) => {
				tracing::error!(%error, method = %method, path = request.uri.path(), "handler failed");
				return exit("handler", Response::internal_server_error());
			}
		};
		if let Err(error) = self.write(&mut response, content, &negotiated) {
			tracing::error!(%error, "response could not be encoded");
			return exit("handler", Response::internal_server_error());
		}

		self.finalize(&mut response, descriptor, &negotiated);
		if is_read && response.status.is_success() {
			descriptor.cache().apply(&mut response);
			let etag = match etag {
				Some(etag) => Some(etag),
				None if !response.body.is_empty() => Some(EntityTag::from_content(&response.body)),
				None => None,
			};
			self.apply_validators(&mut response, etag.as_ref(), last_modified);
		}
		if method == Method::HEAD {
			response.strip_body();
		}

		exit("handler", response)
	}

	/// Matches the request body type against `supported`. A body without
	/// `Content-Type` is treated as `application/octet-stream`.
	fn check_content_type(
		&self,
		request: &Request,
		supported: &[MediaType],
	) -> Result<MediaType, Response> {
		let raw = request.content_type().unwrap_or(OCTET_STREAM);
		let content_type = MediaType::parse(raw).map_err(|error| {
			tracing::debug!(%error, content_type = raw, "unparseable Content-Type");
			Response::new(StatusCode::UNSUPPORTED_MEDIA_TYPE)
		})?;
		if supported.is_empty() || self.matcher.content_type_match(&content_type, supported).is_some()
		{
			Ok(content_type)
		} else {
			Err(Response::new(StatusCode::UNSUPPORTED_MEDIA_TYPE))
		}
	}

	/// `None` means nothing acceptable can be served
	fn negotiate(&self, request: &Request, descriptor: &ResourceDescriptor) -> Option<NegotiationResult> {
		let offered = descriptor.accept_types();
		if offered.is_empty() {
			return Some(NegotiationResult::unconstrained());
		}

		let values: Vec<&str> = request
			.headers
			.get_all(ACCEPT)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.collect();
		let accept = if values.is_empty() {
			AcceptHeader::empty()
		} else {
			AcceptHeader::parse(&values.join(", "))
		};

		let result = self.matcher.best_match(&accept, offered);
		if result.is_match() {
			return Some(result);
		}
		if self.settings.accept_policy == AcceptPolicy::Lenient && !refuses_everything(&accept) {
			tracing::debug!("no acceptable representation, falling back to the first declared");
			return offered.first().cloned().map(NegotiationResult::fallback);
		}
		None
	}

	fn write(
		&self,
		response: &mut Response,
		content: Content,
		negotiated: &NegotiationResult,
	) -> Result<(), CodecError> {
		match content {
			Content::Empty => {
				if response.status == StatusCode::OK {
					response.status = StatusCode::NO_CONTENT;
				}
				response.body = Bytes::new();
			}
			Content::Raw(bytes) => response.set_body(bytes),
			Content::Data(value) => {
				let body = match negotiated.media_type() {
					Some(media_type) => self.codecs.encode(media_type, &value)?,
					None => {
						let json = MediaType::new("application", "json");
						if !response.headers.contains_key(CONTENT_TYPE) {
							response.headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
						}
						self.codecs.encode(&json, &value)?
					}
				};
				response.set_body(body);
			}
		}
		Ok(())
	}

	fn finalize(
		&self,
		response: &mut Response,
		descriptor: &ResourceDescriptor,
		negotiated: &NegotiationResult,
	) {
		let has_entity = !response.body.is_empty()
			|| response
				.header(CONTENT_LENGTH.as_str())
				.is_some_and(|len| len != "0");
		if has_entity
			&& !response.headers.contains_key(CONTENT_TYPE)
			&& let Some(content_type) = negotiated.content_type()
		{
			response.set_header(CONTENT_TYPE.as_str(), &content_type);
		}
		self.apply_vary(response, descriptor);
	}

	fn apply_vary(&self, response: &mut Response, descriptor: &ResourceDescriptor) {
		if !self.settings.vary_accept || descriptor.accept_types().len() < 2 {
			return;
		}
		let vary = match response.header(VARY.as_str()) {
			Some(existing) if existing.to_ascii_lowercase().contains("accept") => return,
			Some(existing) => format!("{existing}, Accept"),
			None => "Accept".to_string(),
		};
		response.set_header(VARY.as_str(), &vary);
	}

	fn apply_validators(
		&self,
		response: &mut Response,
		etag: Option<&EntityTag>,
		last_modified: Option<DateTime<Utc>>,
	) {
		if self.settings.use_etags
			&& !response.headers.contains_key(ETAG)
			&& let Some(etag) = etag
		{
			response.set_header(ETAG.as_str(), &etag.to_string());
		}
		if self.settings.use_last_modified
			&& !response.headers.contains_key(LAST_MODIFIED)
			&& let Some(last_modified) = last_modified
		{
			response.set_header(LAST_MODIFIED.as_str(), &format_http_date(last_modified));
		}
	}
}

fn exit(state: &'static str, response: Response) -> Response {
	tracing::debug!(state, status = response.status.as_u16(), "dispatch finished");
	response
}

fn with_status(mut response: Response, status: StatusCode) -> Response {
	response.status = status;
	response
}

fn unavailable(availability: Availability) -> Response {
	let response = Response::new(StatusCode::SERVICE_UNAVAILABLE);
	match availability {
		Availability::RetryAfter(seconds) if seconds > 0 => {
			response.with_header(RETRY_AFTER.as_str(), &seconds.to_string())
		}
		Availability::RetryAt(at) => response.with_header(RETRY_AFTER.as_str(), &format_http_date(at)),
		_ => response,
	}
}

fn options_response(descriptor: &ResourceDescriptor, allowed: &[Method]) -> Response {
	let mut response = Response::ok()
		.with_header(ALLOW.as_str(), &allow_header_value(allowed))
		.with_header(CONTENT_LENGTH.as_str(), "0");
	if allowed.contains(&Method::PATCH) && !descriptor.patch_types().is_empty() {
		response.set_header(ACCEPT_PATCH, &join_types(descriptor.patch_types()));
	}
	apply_uncacheable(&mut response);
	response
}

fn join_types(types: &[MediaType]) -> String {
	types
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}

/// `*/*;q=0` rules out every representation, fallback included
fn refuses_everything(accept: &AcceptHeader) -> bool {
	accept
		.ranges()
		.iter()
		.any(|range| range.specificity() == Specificity::Any && range.quality().is_zero())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handler::handler_fn;
	use crate::resource::BasicResource;
	use rstest::rstest;
	use serde_json::json;

	fn json_resource() -> BasicResource {
		BasicResource::new(
			ResourceDescriptor::builder()
				.accept_types(["application/json", "text/plain"])
				.build()
				.unwrap(),
			HandlerSet::new().get(handler_fn(|_, _, _| Ok(Content::Data(json!("hi"))))),
		)
	}

	#[rstest]
	#[case("*/*;q=0", true)]
	#[case("*/*;q=0.1", false)]
	#[case("text/*;q=0", false)]
	#[case("", false)]
	fn test_refuses_everything(#[case] header: &str, #[case] expected: bool) {
		assert_eq!(refuses_everything(&AcceptHeader::parse(header)), expected);
	}

	#[rstest]
	fn test_negotiate_joins_repeated_accept_headers() {
		// Arrange
		let dispatcher = ResourceDispatcher::default();
		let resource = json_resource();
		let request = Request::builder()
			.header("Accept", "image/png")
			.header("Accept", "text/plain")
			.build()
			.unwrap();

		// Act
		let result = dispatcher.negotiate(&request, resource.descriptor()).unwrap();

		// Assert
		assert_eq!(result.media_type().unwrap().essence(), "text/plain");
	}

	#[rstest]
	#[case(AcceptPolicy::Strict, "image/png", None)]
	#[case(AcceptPolicy::Lenient, "image/png", Some("application/json"))]
	#[case(AcceptPolicy::Lenient, "*/*;q=0", None)]
	fn test_accept_policy(
		#[case] policy: AcceptPolicy,
		#[case] header: &str,
		#[case] expected: Option<&str>,
	) {
		let dispatcher =
			ResourceDispatcher::new(DispatchSettings::default().with_accept_policy(policy));
		let request = Request::builder().header("Accept", header).build().unwrap();

		let result = dispatcher.negotiate(&request, json_resource().descriptor());

		assert_eq!(
			result.and_then(|r| r.media_type().map(MediaType::essence)),
			expected.map(str::to_string)
		);
	}

	#[rstest]
	#[case(Availability::Unavailable, None)]
	#[case(Availability::RetryAfter(0), None)]
	#[case(Availability::RetryAfter(120), Some("120"))]
	fn test_unavailable(#[case] availability: Availability, #[case] retry: Option<&str>) {
		let response = unavailable(availability);

		assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(response.header("retry-after"), retry);
	}

	#[rstest]
	fn test_write_empty_keeps_chosen_status() {
		let dispatcher = ResourceDispatcher::default();
		let mut response = Response::created();

		dispatcher
			.write(&mut response, Content::Empty, &NegotiationResult::unconstrained())
			.unwrap();

		assert_eq!(response.status, StatusCode::CREATED);
	}

	#[rstest]
	fn test_write_data_without_negotiated_type_uses_json() {
		let dispatcher = ResourceDispatcher::default();
		let mut response = Response::ok();

		dispatcher
			.write(&mut response, Content::Data(json!([1, 2])), &NegotiationResult::unconstrained())
			.unwrap();

		assert_eq!(response.header("content-type"), Some("application/json"));
		assert_eq!(response.header("content-length"), Some("5"));
	}

	#[rstest]
	fn test_write_data_without_codec_fails() {
		let dispatcher = ResourceDispatcher::default();
		let mut response = Response::ok();
		let negotiated = NegotiationResult::fallback(MediaType::new("image", "png"));

		let result = dispatcher.write(&mut response, Content::Data(json!(null)), &negotiated);

		assert!(matches!(result, Err(CodecError::Unsupported(_))));
	}
}
