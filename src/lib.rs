//! # Resourceful
//!
//! Resource-oriented HTTP handling. Given a request, a resource and its
//! declared capabilities, resourceful decides which representation to
//! serve, whether a conditional request can be short-circuited, and which
//! status code applies, before any application code runs.
//!
//! ## Crates
//!
//! - [`http`]: `Request`, `Response` and the `Handler` boundary
//! - `negotiation`: media types and `Accept` negotiation
//! - `conditional`: entity tags and precondition evaluation
//! - `conf`: layered dispatcher settings
//! - `dispatch`: the resource dispatcher
//!
//! ## Feature Flags
//!
//! - `full` (default): everything
//! - `minimal`: negotiation and conditional evaluation without the
//!   dispatcher
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "dispatch")]
//! # {
//! use resourceful::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let resource = BasicResource::new(
//!     ResourceDescriptor::builder()
//!         .accept_types(["application/json", "text/plain"])
//!         .build()
//!         .unwrap(),
//!     HandlerSet::new().get(handler_fn(|_, _, _| Ok(Content::Data(serde_json::json!("hello"))))),
//! );
//!
//! let request = Request::builder().header("Accept", "text/plain").build().unwrap();
//! let response = ResourceDispatcher::default().dispatch(&resource, request).await;
//!
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(&response.body[..], b"hello");
//! # });
//! # }
//! ```

pub use resourceful_http as http;

#[cfg(feature = "conditional")]
pub use resourceful_conditional as conditional;
#[cfg(feature = "conf")]
pub use resourceful_conf as conf;
#[cfg(feature = "dispatch")]
pub use resourceful_dispatch as dispatch;
#[cfg(feature = "negotiation")]
pub use resourceful_negotiation as negotiation;

/// Common imports
pub mod prelude {
	pub use resourceful_http::{Handler, Method, Request, Response, StatusCode};

	#[cfg(feature = "conditional")]
	pub use resourceful_conditional::{ConditionalEvaluator, Decision, EntityTag};
	#[cfg(feature = "conf")]
	pub use resourceful_conf::{AcceptPolicy, DispatchSettings, SettingsBuilder};
	#[cfg(feature = "dispatch")]
	pub use resourceful_dispatch::{
		Availability, BasicResource, CachePolicy, Content, HandlerError, HandlerSet, Resource,
		ResourceDescriptor, ResourceDispatcher, ResourceEndpoint, handler_fn,
	};
	#[cfg(feature = "negotiation")]
	pub use resourceful_negotiation::{AcceptHeader, MediaRangeMatcher, MediaType};
}
