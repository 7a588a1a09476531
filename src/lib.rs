//! KV cache memory estimation for transformer inference.
//!
//! This crate estimates how much memory the key/value cache of a decoder-only
//! transformer occupies at a given context length, including models that use
//! Grouped Query Attention.

pub mod error;
pub mod estimate;
pub mod model;
pub mod precision;
pub mod report;

pub use error::{KvCalcError, Result};
pub use estimate::{calculate_kv_cache_size, KvCacheEstimate, KvCacheEstimator, BYTES_PER_GB};
pub use model::{resolve_config, ConfigOverrides, ModelConfig, ModelPreset, ResolvedModel};
pub use precision::Precision;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
