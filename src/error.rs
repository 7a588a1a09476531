//! Error types for the kvcalc crate.

use thiserror::Error;

/// Top-level error type for kvcalc operations.
///
/// Only the checked API returns these; [`crate::calculate_kv_cache_size`]
/// never fails.
#[derive(Error, Debug)]
pub enum KvCalcError {
    #[error("num_attention_heads must be greater than zero")]
    ZeroAttentionHeads,

    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error(
        "num_key_value_heads ({num_key_value_heads}) cannot exceed num_attention_heads ({num_attention_heads})"
    )]
    InvalidHeadRatio {
        num_key_value_heads: usize,
        num_attention_heads: usize,
    },

    #[error("Invalid precision: {0}")]
    InvalidPrecision(String),

    #[error("Invalid memory budget: {0} GB")]
    InvalidBudget(f64),

    #[error("Missing parameter: --{0} (or pass --preset)")]
    MissingParameter(&'static str),

    #[error("Unknown model preset: {0}")]
    UnknownPreset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KvCalcError>;
