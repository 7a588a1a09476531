//! KV cache size of Qwen2-VL 72B with AWQ 4-bit quantization.
//!
//! Values come from the model's config.json:
//! https://huggingface.co/Qwen/Qwen2-VL-72B-Instruct-AWQ/blob/main/config.json
//!
//! Run with: cargo run --example qwen2_vl_72b_awq

use kvcalc::{calculate_kv_cache_size, ModelPreset};

fn main() {
    let preset = ModelPreset::Qwen2Vl72b;
    let config = preset.config();
    let precision_bytes = preset.default_precision().bytes_per_element(); // AWQ 4-bit

    let kv_cache_size = calculate_kv_cache_size(
        config.context_length,
        config.hidden_size,
        config.num_attention_heads,
        config.num_key_value_heads,
        config.num_hidden_layers,
        precision_bytes,
    );

    println!("KV Cache Size: {kv_cache_size:.2} GB");
}
