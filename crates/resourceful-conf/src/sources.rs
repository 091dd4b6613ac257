//! Configuration sources for layered settings
//!
//! Sources are merged in priority order: environment variables override
//! the TOML file, which overrides built-in defaults.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::DispatchSettings;

/// Prefix for environment variables read by [`EnvSource::default`]
pub const ENV_PREFIX: &str = "RESOURCEFUL_";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Built-in defaults, taken from [`DispatchSettings::default`]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		let values = match serde_json::to_value(DispatchSettings::default()) {
			Ok(Value::Object(map)) => map.into_iter().collect(),
			_ => IndexMap::new(),
		};
		Self { values }
	}

	/// Override a single default
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_conf::sources::{ConfigSource, DefaultSource};
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new().with_value("use_etags", Value::Bool(true));
	/// let values = source.load().unwrap();
	/// assert_eq!(values.get("use_etags"), Some(&Value::Bool(true)));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file source. A missing file contributes nothing.
///
/// Keys may sit at the top level or inside a `[dispatch]` table.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let Value::Object(mut map) = json_value else {
			return Err(SourceError::Parse("Expected table at root".to_string()));
		};
		if let Some(Value::Object(section)) = map.remove("dispatch") {
			map.extend(section);
		}

		Ok(map.into_iter().collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable source. Only variables carrying the prefix are
/// read; the prefix is stripped and the rest lowercased, so
/// `RESOURCEFUL_USE_ETAGS` sets `use_etags`.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::with_prefix(ENV_PREFIX)
	}

	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let Some(stripped) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let key = stripped.to_lowercase();
			let parsed = parse_env_value(&key, &value);
			config.insert(key, parsed);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

const BOOL_KEYS: [&str; 4] = [
	"use_etags",
	"use_last_modified",
	"require_conditional_request",
	"vary_accept",
];

fn parse_env_value(key: &str, value: &str) -> Value {
	let trimmed = value.trim();
	if BOOL_KEYS.contains(&key) {
		match trimmed.to_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => return Value::Bool(true),
			"false" | "0" | "no" | "off" => return Value::Bool(false),
			_ => {}
		}
	}
	if key == "max_request_entity_length" && (trimmed.is_empty() || trimmed == "none") {
		return Value::Null;
	}
	if let Ok(num) = trimmed.parse::<u64>() {
		Value::Number(num.into())
	} else if let Ok(b) = trimmed.parse::<bool>() {
		Value::Bool(b)
	} else {
		Value::String(trimmed.to_string())
	}
}
