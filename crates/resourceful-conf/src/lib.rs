//! Settings for the resource dispatcher, layered from defaults, a TOML
//! file and `RESOURCEFUL_`-prefixed environment variables.

pub mod builder;
pub mod settings;
pub mod sources;

pub use builder::{SettingsBuilder, SettingsError};
pub use settings::{AcceptPolicy, DispatchSettings};
pub use sources::{ConfigSource, SourceError};
