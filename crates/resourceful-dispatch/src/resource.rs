use async_trait::async_trait;
use chrono::{DateTime, Utc};
use resourceful_http::{Request, Response};

use crate::descriptor::ResourceDescriptor;
use crate::handler::HandlerSet;

/// Whether a resource can currently serve requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Availability {
	#[default]
	Available,
	/// 503 without a retry hint
	Unavailable,
	/// 503 with `Retry-After` in seconds
	RetryAfter(u64),
	/// 503 with `Retry-After` as an HTTP date
	RetryAt(DateTime<Utc>),
}

impl Availability {
	pub fn is_available(&self) -> bool {
		matches!(self, Availability::Available)
	}
}

/// A resource served by [`ResourceDispatcher`](crate::ResourceDispatcher).
///
/// Only [`descriptor`](Resource::descriptor) and
/// [`handlers`](Resource::handlers) are required. The hooks run in the
/// dispatcher's order and default to letting the request through; returning
/// `true` stops processing with the matching status. Hooks receive the
/// response so they can add headers such as `WWW-Authenticate`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use resourceful_dispatch::{HandlerSet, Resource, ResourceDescriptor};
/// use resourceful_http::{Request, Response};
///
/// struct Private {
///     descriptor: ResourceDescriptor,
///     handlers: HandlerSet,
/// }
///
/// #[async_trait]
/// impl Resource for Private {
///     fn descriptor(&self) -> &ResourceDescriptor {
///         &self.descriptor
///     }
///
///     fn handlers(&self) -> &HandlerSet {
///         &self.handlers
///     }
///
///     async fn is_unauthorized(&self, request: &Request, response: &mut Response) -> bool {
///         if request.header("authorization").is_none() {
///             response.set_header("WWW-Authenticate", "Bearer");
///             return true;
///         }
///         false
///     }
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync {
	fn descriptor(&self) -> &ResourceDescriptor;

	fn handlers(&self) -> &HandlerSet;

	async fn availability(&self, _request: &Request) -> Availability {
		Availability::Available
	}

	async fn is_unauthorized(&self, _request: &Request, _response: &mut Response) -> bool {
		false
	}

	async fn is_forbidden(&self, _request: &Request, _response: &mut Response) -> bool {
		false
	}

	async fn is_too_many_requests(&self, _request: &Request, _response: &mut Response) -> bool {
		false
	}

	async fn is_not_found(&self, _request: &Request, _response: &mut Response) -> bool {
		false
	}

	async fn is_gone(&self, _request: &Request, _response: &mut Response) -> bool {
		false
	}

	/// Current entity tag of the target, quoted or bare
	async fn etag(&self, _request: &Request) -> Option<String> {
		None
	}

	async fn last_modified(&self, _request: &Request) -> Option<DateTime<Utc>> {
		None
	}
}

/// A resource made of a descriptor, handlers and a fixed availability.
///
/// # Examples
///
/// ```
/// use resourceful_dispatch::{BasicResource, HandlerSet, Resource, ResourceDescriptor};
/// use resourceful_dispatch::handler::{handler_fn, Content};
///
/// let resource = BasicResource::new(
///     ResourceDescriptor::builder().accept_types(["application/json"]).build().unwrap(),
///     HandlerSet::new().get(handler_fn(|_, _, _| Ok(Content::Data(serde_json::json!([]))))),
/// );
/// assert_eq!(resource.descriptor().accept_types().len(), 1);
/// ```
#[derive(Clone)]
pub struct BasicResource {
	descriptor: ResourceDescriptor,
	handlers: HandlerSet,
	availability: Availability,
}

impl BasicResource {
	pub fn new(descriptor: ResourceDescriptor, handlers: HandlerSet) -> Self {
		Self {
			descriptor,
			handlers,
			availability: Availability::Available,
		}
	}

	pub fn with_availability(mut self, availability: Availability) -> Self {
		self.availability = availability;
		self
	}
}

#[async_trait]
impl Resource for BasicResource {
	fn descriptor(&self) -> &ResourceDescriptor {
		&self.descriptor
	}

	fn handlers(&self) -> &HandlerSet {
		&self.handlers
	}

	async fn availability(&self, _request: &Request) -> Availability {
		self.availability
	}
}
