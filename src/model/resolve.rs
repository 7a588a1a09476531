//! Merging of a named preset with explicitly given parameters.
//!
//! Explicit values always win; anything left unset is taken from the preset.
//! Without a preset every count must be given explicitly.

use crate::error::{KvCalcError, Result};
use crate::model::config::{ModelConfig, ModelPreset};
use crate::precision::Precision;

/// Precision used when neither a flag nor a preset chooses one.
pub const DEFAULT_PRECISION: Precision = Precision::Float16;

/// Explicitly supplied model parameters, each optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub context_length: Option<usize>,
    pub hidden_size: Option<usize>,
    pub num_attention_heads: Option<usize>,
    pub num_key_value_heads: Option<usize>,
    pub num_hidden_layers: Option<usize>,
    pub precision: Option<Precision>,
}

/// A fully specified model ready for estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    /// Preset name, or `"custom"` when no preset was used.
    pub name: String,
    pub config: ModelConfig,
    pub precision: Precision,
}

/// Combine `preset` and `overrides` into a complete model description.
///
/// Precision resolves as override, then the preset's default, then
/// [`DEFAULT_PRECISION`].
///
/// # Errors
/// - `MissingParameter`: a count is neither overridden nor provided by a preset.
///   The first missing count (in CLI flag order) is reported.
pub fn resolve_config(
    preset: Option<ModelPreset>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedModel> {
    let base = preset.map(ModelPreset::config);
    let pick = |value: Option<usize>, from_preset: fn(&ModelConfig) -> usize, flag: &'static str| {
        value
            .or_else(|| base.as_ref().map(from_preset))
            .ok_or(KvCalcError::MissingParameter(flag))
    };

    let config = ModelConfig::new(
        pick(
            overrides.context_length,
            |c| c.context_length,
            "context-length",
        )?,
        pick(overrides.hidden_size, |c| c.hidden_size, "hidden-size")?,
        pick(
            overrides.num_attention_heads,
            |c| c.num_attention_heads,
            "num-attention-heads",
        )?,
        pick(
            overrides.num_key_value_heads,
            |c| c.num_key_value_heads,
            "num-key-value-heads",
        )?,
        pick(
            overrides.num_hidden_layers,
            |c| c.num_hidden_layers,
            "num-hidden-layers",
        )?,
    );
    let precision = overrides
        .precision
        .or_else(|| preset.map(ModelPreset::default_precision))
        .unwrap_or(DEFAULT_PRECISION);
    let name = preset
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| "custom".to_string());

    tracing::debug!(%name, %precision, "resolved model parameters");
    Ok(ResolvedModel {
        name,
        config,
        precision,
    })
}
