//! Model descriptions used for KV cache sizing.
//!
//! - [`config`]: Architecture parameters, validation and named presets.
//! - [`resolve`]: Merging a preset with explicitly given parameters.

pub mod config;
pub mod resolve;

pub use config::{ModelConfig, ModelPreset};
pub use resolve::{resolve_config, ConfigOverrides, ResolvedModel};
