//! Tests for model configuration and presets.

use kvcalc::model::config::{ModelConfig, ModelPreset};
use kvcalc::KvCalcError;

#[test]
fn test_qwen2_vl_72b_preset() {
    let config = ModelConfig::qwen2_vl_72b();
    assert_eq!(config.context_length, 32768);
    assert_eq!(config.hidden_size, 8192);
    assert_eq!(config.num_attention_heads, 64);
    assert_eq!(config.num_key_value_heads, 8);
    assert_eq!(config.num_hidden_layers, 80);
    assert!(config.uses_gqa());
    assert_eq!(config.num_queries_per_kv(), Some(8));
    assert_eq!(config.head_dim(), Some(128));
}

#[test]
fn test_llama3_8b_preset() {
    let config = ModelConfig::llama3_8b();
    assert_eq!(config.hidden_size, 4096);
    assert_eq!(config.num_hidden_layers, 32);
    assert_eq!(config.num_attention_heads, 32);
    assert_eq!(config.num_key_value_heads, 8);
    assert_eq!(config.kv_head_ratio(), 0.25);
    assert_eq!(config.num_queries_per_kv(), Some(4));
}

#[test]
fn test_llama3_70b_preset() {
    let config = ModelConfig::llama3_70b();
    assert_eq!(config.hidden_size, 8192);
    assert_eq!(config.num_hidden_layers, 80);
    assert_eq!(config.num_queries_per_kv(), Some(8));
    assert!(config.validate().is_ok());
}

#[test]
fn test_multi_head_attention_is_not_gqa() {
    let config = ModelConfig::new(2048, 4096, 32, 32, 32);
    assert!(!config.uses_gqa());
    assert_eq!(config.kv_head_ratio(), 1.0);
}

#[test]
fn test_preset_lookup_by_name() {
    for preset in ModelPreset::ALL {
        let parsed: ModelPreset = preset.name().parse().unwrap();
        assert_eq!(parsed, preset);
        assert!(preset.config().validate().is_ok());
    }
    assert_eq!(
        "Llama3-70B".parse::<ModelPreset>().unwrap(),
        ModelPreset::Llama3_70b
    );
}

#[test]
fn test_unknown_preset() {
    let err = "gpt-5".parse::<ModelPreset>().unwrap_err();
    assert!(matches!(err, KvCalcError::UnknownPreset(ref name) if name == "gpt-5"));
}

#[test]
fn test_with_context_length() {
    let config = ModelConfig::llama3_8b().with_context_length(131072);
    assert_eq!(config.context_length, 131072);
    assert_eq!(config.hidden_size, 4096);
}

#[test]
fn test_validate_zero_fields() {
    let cases = [
        (ModelConfig::new(8, 0, 4, 4, 2), "hidden_size"),
        (ModelConfig::new(8, 64, 4, 0, 2), "num_key_value_heads"),
        (ModelConfig::new(8, 64, 4, 4, 0), "num_hidden_layers"),
    ];
    for (config, expected) in cases {
        match config.validate() {
            Err(KvCalcError::NonPositive { field }) => assert_eq!(field, expected),
            other => panic!("expected NonPositive for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_head_counts_without_heads() {
    assert_eq!(ModelConfig::new(16, 64, 0, 0, 2).head_dim(), None);
    assert_eq!(ModelConfig::new(16, 64, 4, 0, 2).num_queries_per_kv(), None);
}

#[test]
fn test_version_matches_package() {
    assert_eq!(kvcalc::VERSION, env!("CARGO_PKG_VERSION"));
}
