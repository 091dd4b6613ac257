use serde::{Deserialize, Serialize};

/// How the dispatcher reacts when no declared representation satisfies
/// the `Accept` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptPolicy {
	/// Answer 406
	#[default]
	Strict,
	/// Serve the first declared type, unless the client explicitly
	/// refused everything with `*/*;q=0`
	Lenient,
}

/// Dispatcher-wide defaults. Individual resources may override the
/// request-related ones through their descriptor.
///
/// # Examples
///
/// ```
/// use resourceful_conf::{AcceptPolicy, DispatchSettings};
///
/// let settings = DispatchSettings::default();
/// assert!(!settings.use_etags);
/// assert!(settings.use_last_modified);
/// assert_eq!(settings.accept_policy, AcceptPolicy::Strict);
/// assert_eq!(settings.max_request_entity_length, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
	pub use_etags: bool,
	pub use_last_modified: bool,
	pub require_conditional_request: bool,
	pub accept_policy: AcceptPolicy,
	pub max_request_entity_length: Option<u64>,
	pub vary_accept: bool,
}

impl Default for DispatchSettings {
	fn default() -> Self {
		Self {
			use_etags: false,
			use_last_modified: true,
			require_conditional_request: false,
			accept_policy: AcceptPolicy::Strict,
			max_request_entity_length: None,
			vary_accept: true,
		}
	}
}

impl DispatchSettings {
	pub fn with_etags(mut self, enabled: bool) -> Self {
		self.use_etags = enabled;
		self
	}

	pub fn with_last_modified(mut self, enabled: bool) -> Self {
		self.use_last_modified = enabled;
		self
	}

	pub fn with_required_conditional_request(mut self, required: bool) -> Self {
		self.require_conditional_request = required;
		self
	}

	pub fn with_accept_policy(mut self, policy: AcceptPolicy) -> Self {
		self.accept_policy = policy;
		self
	}

	pub fn with_max_request_entity_length(mut self, limit: Option<u64>) -> Self {
		self.max_request_entity_length = limit;
		self
	}

	pub fn with_vary_accept(mut self, enabled: bool) -> Self {
		self.vary_accept = enabled;
		self
	}
}
