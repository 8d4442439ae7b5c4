//! Loading and validation of `strand.toml` project configuration.
//!
//! The `[link]` table controls how the object-model linker resolves private
//! symbol collisions, how untagged translation units are named, how many worker
//! threads it uses, and whether merged output is checked for dangling
//! references.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
