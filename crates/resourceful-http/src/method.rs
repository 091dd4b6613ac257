//! Method classification

use hyper::Method;

/// Semantic properties of request methods.
///
/// # Examples
///
/// ```
/// use resourceful_http::MethodExt;
/// use hyper::Method;
///
/// assert!(Method::GET.is_safe());
/// assert!(!Method::POST.is_safe());
/// assert!(Method::PATCH.carries_entity());
/// assert!(!Method::DELETE.carries_entity());
/// assert!(Method::TRACE.is_recognized());
/// ```
pub trait MethodExt {
	/// GET, HEAD, OPTIONS and TRACE have no side effects (RFC 7231 §4.2.1).
	fn is_safe(&self) -> bool;

	/// Whether a request body has defined meaning for this method.
	fn carries_entity(&self) -> bool;

	/// Standard methods defined by RFC 7231 and RFC 5789.
	fn is_recognized(&self) -> bool;
}

impl MethodExt for Method {
	fn is_safe(&self) -> bool {
		matches!(
			*self,
			Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
		)
	}

	fn carries_entity(&self) -> bool {
		matches!(*self, Method::POST | Method::PUT | Method::PATCH)
	}

	fn is_recognized(&self) -> bool {
		matches!(
			*self,
			Method::GET
				| Method::HEAD
				| Method::OPTIONS
				| Method::POST
				| Method::PUT
				| Method::PATCH
				| Method::DELETE
				| Method::TRACE
				| Method::CONNECT
		)
	}
}

/// Formats a method set for an `Allow` header: sorted, comma separated.
///
/// # Examples
///
/// ```
/// use resourceful_http::method::allow_header_value;
/// use hyper::Method;
///
/// let value = allow_header_value(&[Method::POST, Method::GET, Method::GET]);
/// assert_eq!(value, "GET, POST");
/// ```
pub fn allow_header_value(methods: &[Method]) -> String {
	let mut names: Vec<&str> = methods.iter().map(Method::as_str).collect();
	names.sort_unstable();
	names.dedup();
	names.join(", ")
}
