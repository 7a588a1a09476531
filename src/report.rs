//! Rendering of estimates for terminal and JSON output.

use serde::Serialize;

use crate::error::Result;
use crate::estimate::KvCacheEstimate;
use crate::model::ModelConfig;
use crate::precision::Precision;

/// Full report as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct EstimateReport<'a> {
    pub model: &'a str,
    pub config: &'a ModelConfig,
    pub precision: Precision,
    pub precision_bytes: f64,
    pub estimate: &'a KvCacheEstimate,
}

/// Multi-line summary of a model's KV cache footprint.
pub fn render_summary(
    name: &str,
    config: &ModelConfig,
    precision: Precision,
    estimate: &KvCacheEstimate,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("{name} KV Cache\n"));
    out.push_str(&format!("{}\n", "=".repeat(50)));
    out.push_str(&format!("Context length:      {}\n", estimate.context_length));
    out.push_str(&format!("Hidden size:         {}\n", config.hidden_size));
    out.push_str(&format!("Num layers:          {}\n", config.num_hidden_layers));
    out.push_str(&format!(
        "Heads (Q/KV):        {}/{}\n",
        config.num_attention_heads, config.num_key_value_heads
    ));
    if let Some(group) = config.num_queries_per_kv().filter(|_| config.uses_gqa()) {
        out.push_str(&format!("GQA ratio:           {group}:1\n"));
    }
    out.push_str(&format!(
        "Precision:           {} ({} bytes/element)\n",
        precision,
        precision.bytes_per_element()
    ));
    out.push_str(&format!(
        "Per token:           {:.1} KiB\n",
        estimate.bytes_per_token / 1024.0
    ));
    out.push_str(&format!("{estimate}\n"));
    out
}

/// Pretty-printed JSON report.
pub fn render_json(
    name: &str,
    config: &ModelConfig,
    precision: Precision,
    estimate: &KvCacheEstimate,
) -> Result<String> {
    let report = EstimateReport {
        model: name,
        config,
        precision,
        precision_bytes: precision.bytes_per_element(),
        estimate,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
