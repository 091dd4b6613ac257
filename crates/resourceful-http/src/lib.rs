//! Request and response types shared by the resourceful crates.
//!
//! Bodies are buffered in full as [`bytes::Bytes`]; headers use the
//! `hyper` header map so that values can be handed straight to a server.

pub mod date;
pub mod error;
pub mod handler;
pub mod method;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use handler::Handler;
pub use method::MethodExt;
pub use request::{Request, RequestBuilder};
pub use response::Response;

pub use hyper::{HeaderMap, Method, StatusCode, Uri, Version, header};
