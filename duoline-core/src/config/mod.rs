//! Configuration types
//!
//! Board-agnostic settings for the pipeline, loaded from `device.toml`.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ConfigError};
pub use types::*;
