use std::sync::Arc;

use async_trait::async_trait;
use resourceful_http::{Handler, Request, Response, Result};

use crate::dispatcher::ResourceDispatcher;
use crate::resource::Resource;

/// Mounts a [`Resource`] wherever a [`Handler`] is expected
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use resourceful_dispatch::{BasicResource, HandlerSet, ResourceDescriptor, ResourceDispatcher, ResourceEndpoint};
/// use resourceful_dispatch::handler::{handler_fn, Content};
/// use resourceful_http::{Handler, Method, Request, StatusCode};
///
/// # tokio_test::block_on(async {
/// let resource = BasicResource::new(
///     ResourceDescriptor::default(),
///     HandlerSet::new().delete(handler_fn(|_, _, _| Ok(Content::Empty))),
/// );
/// let endpoint = ResourceEndpoint::new(resource, Arc::new(ResourceDispatcher::default()));
///
/// let request = Request::builder().method(Method::DELETE).uri("/items/1").build().unwrap();
/// let response = endpoint.handle(request).await.unwrap();
/// assert_eq!(response.status, StatusCode::NO_CONTENT);
/// # });
/// ```
pub struct ResourceEndpoint<R> {
	resource: R,
	dispatcher: Arc<ResourceDispatcher>,
}

impl<R: Resource> ResourceEndpoint<R> {
	pub fn new(resource: R, dispatcher: Arc<ResourceDispatcher>) -> Self {
		Self {
			resource,
			dispatcher,
		}
	}

	pub fn resource(&self) -> &R {
		&self.resource
	}
}

#[async_trait]
impl<R: Resource> Handler for ResourceEndpoint<R> {
	async fn handle(&self, request: Request) -> Result<Response> {
		Ok(self.dispatcher.dispatch(&self.resource, request).await)
	}
}
