use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;

use crate::DispatchSettings;
use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};

/// Error produced while building [`DispatchSettings`]
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Invalid(#[from] serde_json::Error),
}

/// Merges configuration sources by priority and deserialises the result.
///
/// # Examples
///
/// ```
/// use resourceful_conf::SettingsBuilder;
/// use resourceful_conf::sources::DefaultSource;
/// use serde_json::Value;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("use_etags", Value::Bool(true)))
///     .build()
///     .unwrap();
/// assert!(settings.use_etags);
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Defaults, then the given TOML file, then `RESOURCEFUL_*` variables
	pub fn layered(toml_path: impl Into<PathBuf>) -> Self {
		Self::new()
			.add_source(DefaultSource::new())
			.add_source(TomlFileSource::new(toml_path))
			.add_source(EnvSource::new())
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge every source and deserialise. Keys absent from all sources
	/// keep their [`DispatchSettings::default`] value.
	pub fn build(mut self) -> Result<DispatchSettings, SettingsError> {
		self.sources.sort_by_key(|s| s.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "loaded settings source");
			merged.extend(values);
		}

		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}
