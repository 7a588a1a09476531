//! KV cache size estimation.
//!
//! Every layer caches one key and one value vector per token. With Grouped
//! Query Attention only `num_key_value_heads` of the `num_attention_heads`
//! heads are stored, so the per-token width is `hidden_size * kv / heads`:
//!
//! ```text
//! params = 2 * context_length * hidden_size * (kv_heads / heads) * layers
//! bytes  = params * precision_bytes
//! gb     = bytes / 1024^3
//! ```
//!
//! [`calculate_kv_cache_size`] evaluates this directly and never fails.
//! [`KvCacheEstimator`] validates its inputs first and returns a full
//! [`KvCacheEstimate`] breakdown.

use serde::Serialize;

use crate::error::{KvCalcError, Result};
use crate::model::ModelConfig;
use crate::precision::Precision;

/// Bytes in one (binary) gigabyte.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Number of cached K and V elements across all layers.
///
/// Counts are promoted to `f64` before the head ratio is taken, so grouped
/// ratios such as 8/64 are not truncated to zero.
pub fn kv_cache_params(
    context_length: usize,
    hidden_size: usize,
    num_attention_heads: usize,
    num_key_value_heads: usize,
    num_hidden_layers: usize,
) -> f64 {
    let kv_ratio = num_key_value_heads as f64 / num_attention_heads as f64;
    2.0 * context_length as f64 * hidden_size as f64 * kv_ratio * num_hidden_layers as f64
}

/// Convert a byte count to binary gigabytes.
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Estimated KV cache size in gigabytes.
///
/// Inputs are not validated. Zero counts give zero. A zero
/// `num_attention_heads` divides by zero, which yields `f64::INFINITY` (or
/// `NaN` when `num_key_value_heads` is also zero); use
/// [`KvCacheEstimator`] to get an error instead.
pub fn calculate_kv_cache_size(
    context_length: usize,
    hidden_size: usize,
    num_attention_heads: usize,
    num_key_value_heads: usize,
    num_hidden_layers: usize,
    precision_bytes: f64,
) -> f64 {
    let params = kv_cache_params(
        context_length,
        hidden_size,
        num_attention_heads,
        num_key_value_heads,
        num_hidden_layers,
    );
    bytes_to_gb(params * precision_bytes)
}

/// Breakdown of a KV cache estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KvCacheEstimate {
    /// Context length the estimate was computed for.
    pub context_length: usize,
    /// Total cached K and V elements across all layers.
    pub kv_cache_params: f64,
    /// Total cache size in bytes.
    pub kv_cache_size_bytes: f64,
    /// Total cache size in binary gigabytes.
    pub kv_cache_size_gb: f64,
    /// Bytes added to the cache by one token (all layers, K and V).
    pub bytes_per_token: f64,
    /// Bytes added to one layer's cache by one token.
    pub bytes_per_token_per_layer: f64,
}

impl std::fmt::Display for KvCacheEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KV Cache Size: {:.2} GB", self.kv_cache_size_gb)
    }
}

/// Validated KV cache estimator for one model at one precision.
#[derive(Debug, Clone)]
pub struct KvCacheEstimator {
    config: ModelConfig,
    precision: Precision,
}

impl KvCacheEstimator {
    pub fn new(config: ModelConfig, precision: Precision) -> Self {
        Self { config, precision }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Estimate at the configured context length.
    pub fn estimate(&self) -> Result<KvCacheEstimate> {
        self.estimate_at(self.config.context_length)
    }

    /// Estimate at an explicit context length.
    ///
    /// # Errors
    /// - Any [`ModelConfig::validate`] failure
    /// - `InvalidPrecision`: non-positive or non-finite bytes per element
    pub fn estimate_at(&self, context_length: usize) -> Result<KvCacheEstimate> {
        self.validate()?;

        let c = &self.config;
        let precision_bytes = self.precision.bytes_per_element();
        let kv_cache_params = kv_cache_params(
            context_length,
            c.hidden_size,
            c.num_attention_heads,
            c.num_key_value_heads,
            c.num_hidden_layers,
        );
        let kv_cache_size_bytes = kv_cache_params * precision_bytes;
        let bytes_per_token_per_layer = 2.0 * c.hidden_size as f64 * c.kv_head_ratio() * precision_bytes;

        let estimate = KvCacheEstimate {
            context_length,
            kv_cache_params,
            kv_cache_size_bytes,
            kv_cache_size_gb: bytes_to_gb(kv_cache_size_bytes),
            bytes_per_token: bytes_per_token_per_layer * c.num_hidden_layers as f64,
            bytes_per_token_per_layer,
        };
        tracing::debug!(
            context_length,
            precision = %self.precision,
            bytes = estimate.kv_cache_size_bytes,
            "estimated kv cache size"
        );
        Ok(estimate)
    }

    /// Bytes one token adds to the cache across all layers.
    pub fn bytes_per_token(&self) -> Result<f64> {
        Ok(self.estimate_at(1)?.bytes_per_token)
    }

    /// Largest context length whose cache fits in `budget_gb` gigabytes.
    ///
    /// # Errors
    /// - `InvalidBudget`: negative or non-finite budget
    /// - Any validation error from [`Self::estimate_at`]
    pub fn max_context_for_budget(&self, budget_gb: f64) -> Result<usize> {
        if !budget_gb.is_finite() || budget_gb < 0.0 {
            return Err(KvCalcError::InvalidBudget(budget_gb));
        }
        let per_token = self.bytes_per_token()?;
        let budget_bytes = budget_gb * BYTES_PER_GB;
        let tokens = (budget_bytes / per_token).floor() as usize;
        tracing::debug!(budget_gb, per_token, tokens, "computed max context for budget");
        Ok(tokens)
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()?;
        let bytes = self.precision.bytes_per_element();
        if !bytes.is_finite() || bytes <= 0.0 {
            return Err(KvCalcError::InvalidPrecision(format!(
                "bytes per element must be positive and finite (got {bytes})"
            )));
        }
        Ok(())
    }
}
