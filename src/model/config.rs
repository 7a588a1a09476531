//! Transformer architecture parameters relevant to KV cache sizing.
//!
//! Only the hyperparameters that determine how many key/value elements a
//! model caches are kept here; vocabulary, FFN width and RoPE settings have
//! no effect on the cache.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{KvCalcError, Result};
use crate::precision::Precision;

/// Architecture of a decoder-only transformer, as far as its KV cache is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    /// Maximum sequence length the cache is sized for, in tokens.
    pub context_length: usize,

    /// Hidden dimension of the model (e.g., 8192 for 70B-class models).
    pub hidden_size: usize,

    /// Number of query attention heads.
    pub num_attention_heads: usize,

    /// Number of key/value heads (GQA).
    /// Fewer KV heads than query heads shrinks the cache by the same ratio.
    pub num_key_value_heads: usize,

    /// Number of transformer layers.
    pub num_hidden_layers: usize,
}

impl ModelConfig {
    pub fn new(
        context_length: usize,
        hidden_size: usize,
        num_attention_heads: usize,
        num_key_value_heads: usize,
        num_hidden_layers: usize,
    ) -> Self {
        Self {
            context_length,
            hidden_size,
            num_attention_heads,
            num_key_value_heads,
            num_hidden_layers,
        }
    }

    /// Check the structural invariants the checked estimator relies on.
    ///
    /// A zero context length is accepted: it describes an empty cache.
    pub fn validate(&self) -> Result<()> {
        if self.num_attention_heads == 0 {
            return Err(KvCalcError::ZeroAttentionHeads);
        }
        if self.num_key_value_heads == 0 {
            return Err(KvCalcError::NonPositive {
                field: "num_key_value_heads",
            });
        }
        if self.hidden_size == 0 {
            return Err(KvCalcError::NonPositive {
                field: "hidden_size",
            });
        }
        if self.num_hidden_layers == 0 {
            return Err(KvCalcError::NonPositive {
                field: "num_hidden_layers",
            });
        }
        if self.num_key_value_heads > self.num_attention_heads {
            return Err(KvCalcError::InvalidHeadRatio {
                num_key_value_heads: self.num_key_value_heads,
                num_attention_heads: self.num_attention_heads,
            });
        }
        Ok(())
    }

    /// Dimension of each attention head (hidden_size / num_attention_heads).
    ///
    /// `None` when the model has no attention heads.
    pub fn head_dim(&self) -> Option<usize> {
        self.hidden_size.checked_div(self.num_attention_heads)
    }

    /// Fraction of the hidden dimension actually stored per token for K (or V).
    pub fn kv_head_ratio(&self) -> f64 {
        self.num_key_value_heads as f64 / self.num_attention_heads as f64
    }

    /// Number of query heads per KV head (GQA group size).
    ///
    /// `None` when the model has no KV heads.
    pub fn num_queries_per_kv(&self) -> Option<usize> {
        self.num_attention_heads.checked_div(self.num_key_value_heads)
    }

    /// Whether the model uses Grouped Query Attention.
    pub fn uses_gqa(&self) -> bool {
        self.num_key_value_heads < self.num_attention_heads
    }

    /// Copy of this config sized for a different context length.
    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    /// Preset for Qwen2-VL 72B (32K context, 8 KV heads).
    pub fn qwen2_vl_72b() -> Self {
        Self::new(32768, 8192, 64, 8, 80)
    }

    /// Preset configuration for Llama 3 8B.
    pub fn llama3_8b() -> Self {
        Self::new(8192, 4096, 32, 8, 32)
    }

    /// Preset configuration for Llama 3 70B.
    pub fn llama3_70b() -> Self {
        Self::new(8192, 8192, 64, 8, 80)
    }
}

/// Built-in model configurations selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPreset {
    Qwen2Vl72b,
    Llama3_8b,
    Llama3_70b,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 3] = [
        ModelPreset::Qwen2Vl72b,
        ModelPreset::Llama3_8b,
        ModelPreset::Llama3_70b,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelPreset::Qwen2Vl72b => "qwen2-vl-72b",
            ModelPreset::Llama3_8b => "llama3-8b",
            ModelPreset::Llama3_70b => "llama3-70b",
        }
    }

    /// Precision the preset's published checkpoint caches in.
    pub fn default_precision(self) -> Precision {
        match self {
            ModelPreset::Qwen2Vl72b => Precision::Int4,
            ModelPreset::Llama3_8b | ModelPreset::Llama3_70b => Precision::Float16,
        }
    }

    pub fn config(self) -> ModelConfig {
        match self {
            ModelPreset::Qwen2Vl72b => ModelConfig::qwen2_vl_72b(),
            ModelPreset::Llama3_8b => ModelConfig::llama3_8b(),
            ModelPreset::Llama3_70b => ModelConfig::llama3_70b(),
        }
    }
}

impl FromStr for ModelPreset {
    type Err = KvCalcError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        ModelPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == lower)
            .ok_or_else(|| KvCalcError::UnknownPreset(s.to_string()))
    }
}

impl std::fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
