//! # Resourceful Dispatch
//!
//! Resource-oriented request handling. A [`Resource`] declares what it
//! offers through a [`ResourceDescriptor`] and binds logic to methods in a
//! [`HandlerSet`]; the [`ResourceDispatcher`] checks the request against
//! those declarations before any handler runs.
//!
//! ## Architecture
//!
//! ```text
//! Request → ResourceDispatcher → checks (503 … 304) → MethodHandler → Response
//!                 ↓                    ↓                      ↓
//!          ResourceDescriptor   MediaRangeMatcher       CodecRegistry
//!                               ConditionalEvaluator
//! ```
//!
//! ## Example
//!
//! ```
//! use resourceful_dispatch::{BasicResource, HandlerSet, ResourceDescriptor, ResourceDispatcher};
//! use resourceful_dispatch::handler::{handler_fn, Content};
//! use resourceful_http::{Method, Request, StatusCode};
//!
//! # tokio_test::block_on(async {
//! let resource = BasicResource::new(
//!     ResourceDescriptor::builder()
//!         .accept_types(["application/json"])
//!         .build()
//!         .unwrap(),
//!     HandlerSet::new().get(handler_fn(|_, _, _| Ok(Content::Data(serde_json::json!([]))))),
//! );
//! let dispatcher = ResourceDispatcher::default();
//!
//! let request = Request::builder().method(Method::POST).build().unwrap();
//! let response = dispatcher.dispatch(&resource, request).await;
//! assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(response.header("allow"), Some("GET, HEAD, OPTIONS"));
//! # });
//! ```

pub mod cache;
pub mod codec;
pub mod descriptor;
pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod resource;

pub use cache::{CachePolicy, CacheType, Expiry};
pub use codec::{Codec, CodecRegistry};
pub use descriptor::{ResourceDescriptor, ResourceDescriptorBuilder};
pub use dispatcher::ResourceDispatcher;
pub use endpoint::ResourceEndpoint;
pub use error::{CodecError, DescriptorError, HandlerError};
pub use handler::{Content, HandlerSet, MethodHandler, handler_fn};
pub use resource::{Availability, BasicResource, Resource};
