use resourceful_http::Method;
use resourceful_negotiation::MediaType;

use crate::cache::CachePolicy;
use crate::error::DescriptorError;
use crate::handler::HandlerSet;

/// Declared capabilities of a resource. Built once and shared read-only
/// between requests.
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::ResourceDescriptor;
///
/// let descriptor = ResourceDescriptor::builder()
///     .accept_types(["application/json", "text/plain"])
///     .build()
///     .unwrap();
///
/// assert_eq!(descriptor.accept_types().len(), 2);
/// // content and patch types default to the accept types
/// assert_eq!(descriptor.content_types(), descriptor.accept_types());
/// assert_eq!(descriptor.patch_types(), descriptor.accept_types());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceDescriptor {
	supported_methods: Option<Vec<Method>>,
	accept_types: Vec<MediaType>,
	content_types: Option<Vec<MediaType>>,
	patch_types: Option<Vec<MediaType>>,
	cache: CachePolicy,
	max_request_entity_length: Option<u64>,
	require_conditional_request: Option<bool>,
}

impl ResourceDescriptor {
	pub fn builder() -> ResourceDescriptorBuilder {
		ResourceDescriptorBuilder::default()
	}

	/// Explicitly declared methods, if any
	pub fn supported_methods(&self) -> Option<&[Method]> {
		self.supported_methods.as_deref()
	}

	/// Representations offered, most preferred first
	pub fn accept_types(&self) -> &[MediaType] {
		&self.accept_types
	}

	/// Request body types accepted, defaulting to the accept types
	pub fn content_types(&self) -> &[MediaType] {
		self.content_types.as_deref().unwrap_or(&self.accept_types)
	}

	/// PATCH body types accepted, defaulting to the content types
	pub fn patch_types(&self) -> &[MediaType] {
		self.patch_types
			.as_deref()
			.unwrap_or_else(|| self.content_types())
	}

	pub fn cache(&self) -> &CachePolicy {
		&self.cache
	}

	pub fn max_request_entity_length(&self) -> Option<u64> {
		self.max_request_entity_length
	}

	pub fn require_conditional_request(&self) -> Option<bool> {
		self.require_conditional_request
	}

	/// Methods the resource answers: the declared set, or the methods with
	/// a bound handler. HEAD follows GET and OPTIONS is always present.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_dispatch::ResourceDescriptor;
	/// use resourceful_dispatch::handler::HandlerSet;
	/// use resourceful_http::Method;
	///
	/// let descriptor = ResourceDescriptor::builder()
	///     .methods([Method::GET, Method::POST])
	///     .build()
	///     .unwrap();
	/// let allowed = descriptor.allowed_methods(&HandlerSet::new());
	/// assert_eq!(allowed, vec![Method::GET, Method::HEAD, Method::OPTIONS, Method::POST]);
	/// ```
	pub fn allowed_methods(&self, handlers: &HandlerSet) -> Vec<Method> {
		let mut methods = match &self.supported_methods {
			Some(declared) => declared.clone(),
			None => handlers.bound_methods(),
		};
		let has_get = methods.contains(&Method::GET);
		methods.retain(|m| *m != Method::HEAD || has_get);
		if has_get && !methods.contains(&Method::HEAD) {
			methods.push(Method::HEAD);
		}
		if !methods.contains(&Method::OPTIONS) {
			methods.push(Method::OPTIONS);
		}
		methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		methods.dedup();
		methods
	}
}

/// Builder for [`ResourceDescriptor`]. Media types are parsed by
/// [`ResourceDescriptorBuilder::build`].
#[derive(Debug, Default)]
pub struct ResourceDescriptorBuilder {
	supported_methods: Option<Vec<Method>>,
	accept_types: Vec<String>,
	content_types: Option<Vec<String>>,
	patch_types: Option<Vec<String>>,
	cache: CachePolicy,
	max_request_entity_length: Option<u64>,
	require_conditional_request: Option<bool>,
}

impl ResourceDescriptorBuilder {
	pub fn methods<I>(mut self, methods: I) -> Self
	where
		I: IntoIterator<Item = Method>,
	{
		self.supported_methods = Some(methods.into_iter().collect());
		self
	}

	pub fn accept_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.accept_types = types.into_iter().map(Into::into).collect();
		self
	}

	pub fn content_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.content_types = Some(types.into_iter().map(Into::into).collect());
		self
	}

	pub fn patch_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.patch_types = Some(types.into_iter().map(Into::into).collect());
		self
	}

	pub fn cache(mut self, cache: CachePolicy) -> Self {
		self.cache = cache;
		self
	}

	pub fn max_request_entity_length(mut self, limit: u64) -> Self {
		self.max_request_entity_length = Some(limit);
		self
	}

	pub fn require_conditional_request(mut self, required: bool) -> Self {
		self.require_conditional_request = Some(required);
		self
	}

	pub fn build(self) -> Result<ResourceDescriptor, DescriptorError> {
		Ok(ResourceDescriptor {
			supported_methods: self.supported_methods,
			accept_types: parse_all(&self.accept_types)?,
			content_types: self.content_types.as_deref().map(parse_all).transpose()?,
			patch_types: self.patch_types.as_deref().map(parse_all).transpose()?,
			cache: self.cache,
			max_request_entity_length: self.max_request_entity_length,
			require_conditional_request: self.require_conditional_request,
		})
	}
}

fn parse_all(types: &[String]) -> Result<Vec<MediaType>, DescriptorError> {
	types
		.iter()
		.map(|value| {
			MediaType::parse(value).map_err(|source| DescriptorError::MediaType {
				value: value.clone(),
				source,
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handler::{handler_fn, Content};
	use rstest::rstest;

	fn noop() -> std::sync::Arc<dyn crate::handler::MethodHandler> {
		handler_fn(|_, _, _| Ok(Content::Empty))
	}

	#[rstest]
	fn test_invalid_media_type_rejected() {
		let result = ResourceDescriptor::builder()
			.accept_types(["application/json", "*/json"])
			.build();

		assert!(matches!(
			result,
			Err(DescriptorError::MediaType { value, .. }) if value == "*/json"
		));
	}

	#[rstest]
	fn test_patch_types_default_to_content_types() {
		let descriptor = ResourceDescriptor::builder()
			.accept_types(["application/json"])
			.content_types(["application/x-www-form-urlencoded"])
			.build()
			.unwrap();

		assert_eq!(descriptor.patch_types()[0].essence(), "application/x-www-form-urlencoded");
	}

	#[rstest]
	fn test_allowed_methods_from_handlers() {
		let descriptor = ResourceDescriptor::default();
		let handlers = HandlerSet::new().get(noop()).post(noop());

		assert_eq!(
			descriptor.allowed_methods(&handlers),
			vec![Method::GET, Method::HEAD, Method::OPTIONS, Method::POST]
		);
	}

	#[rstest]
	fn test_head_dropped_without_get() {
		let descriptor = ResourceDescriptor::builder()
			.methods([Method::HEAD, Method::DELETE])
			.build()
			.unwrap();

		assert_eq!(
			descriptor.allowed_methods(&HandlerSet::new()),
			vec![Method::DELETE, Method::OPTIONS]
		);
	}

	#[rstest]
	fn test_no_handlers_allows_options_only() {
		let descriptor = ResourceDescriptor::default();
		assert_eq!(descriptor.allowed_methods(&HandlerSet::new()), vec![Method::OPTIONS]);
	}
}
