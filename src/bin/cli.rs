//! Command-line interface for kvcalc.
//!
//! Run without arguments to print the KV cache size of a 72B-class model
//! (Qwen2-VL 72B, AWQ 4-bit). Subcommands estimate arbitrary configurations.

use clap::{Args, Parser, Subcommand};
use kvcalc::{
    calculate_kv_cache_size, report, resolve_config, ConfigOverrides, KvCacheEstimator,
    KvCalcError, ModelPreset, Precision, ResolvedModel,
};

/// kvcalc: KV cache memory estimation for transformer inference
#[derive(Parser)]
#[command(name = "kvcalc", version = kvcalc::VERSION)]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the KV cache size of a model.
    Estimate {
        #[command(flatten)]
        model: ModelArgs,

        /// Emit a JSON report instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List built-in model presets with their default estimate.
    Presets {
        /// Cache precision for every preset (default: each preset's own).
        #[arg(short, long)]
        precision: Option<Precision>,
    },
    /// Find the longest context whose KV cache fits a memory budget.
    Budget {
        #[command(flatten)]
        model: ModelArgs,

        /// Memory available for the KV cache, in GB.
        #[arg(short, long)]
        budget_gb: f64,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Start from a built-in preset (qwen2-vl-72b, llama3-8b, llama3-70b).
    #[arg(long)]
    preset: Option<ModelPreset>,

    /// Maximum sequence length in tokens.
    #[arg(long)]
    context_length: Option<usize>,

    /// Hidden dimension per layer.
    #[arg(long)]
    hidden_size: Option<usize>,

    /// Number of query attention heads.
    #[arg(long)]
    num_attention_heads: Option<usize>,

    /// Number of key/value heads.
    #[arg(long)]
    num_key_value_heads: Option<usize>,

    /// Number of transformer layers.
    #[arg(long)]
    num_hidden_layers: Option<usize>,

    /// Cache precision: fp32, fp16, bf16, fp8, int8, int4 or bytes per element
    /// (default: the preset's, else fp16).
    #[arg(short, long)]
    precision: Option<Precision>,
}

impl ModelArgs {
    fn resolve(&self) -> Result<ResolvedModel, KvCalcError> {
        let overrides = ConfigOverrides {
            context_length: self.context_length,
            hidden_size: self.hidden_size,
            num_attention_heads: self.num_attention_heads,
            num_key_value_heads: self.num_key_value_heads,
            num_hidden_layers: self.num_hidden_layers,
            precision: self.precision,
        };
        resolve_config(self.preset, &overrides)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        None => {
            run_demo();
            Ok(())
        }
        Some(Command::Estimate { model, json }) => cmd_estimate(&model, json),
        Some(Command::Presets { precision }) => cmd_presets(precision),
        Some(Command::Budget { model, budget_gb }) => cmd_budget(&model, budget_gb),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Qwen2-VL 72B with AWQ 4-bit quantization.
fn run_demo() {
    let preset = ModelPreset::Qwen2Vl72b;
    let config = preset.config();

    let kv_cache_size = calculate_kv_cache_size(
        config.context_length,
        config.hidden_size,
        config.num_attention_heads,
        config.num_key_value_heads,
        config.num_hidden_layers,
        preset.default_precision().bytes_per_element(),
    );
    println!("KV Cache Size: {kv_cache_size:.2} GB");
}

fn cmd_estimate(model: &ModelArgs, json: bool) -> Result<(), KvCalcError> {
    let ResolvedModel {
        name,
        config,
        precision,
    } = model.resolve()?;
    let estimator = KvCacheEstimator::new(config, precision);
    let estimate = estimator.estimate()?;

    if json {
        println!(
            "{}",
            report::render_json(&name, estimator.config(), precision, &estimate)?
        );
    } else {
        print!(
            "{}",
            report::render_summary(&name, estimator.config(), precision, &estimate)
        );
    }
    Ok(())
}

fn cmd_presets(precision: Option<Precision>) -> Result<(), KvCalcError> {
    println!("Presets:");
    for preset in ModelPreset::ALL {
        let config = preset.config();
        let precision = precision.unwrap_or_else(|| preset.default_precision());
        let estimate = KvCacheEstimator::new(config.clone(), precision).estimate()?;
        println!(
            "  {:<14} ctx={:<6} hidden={:<5} heads={}/{} layers={:<3} {:<9} {:>8.2} GB",
            preset.name(),
            config.context_length,
            config.hidden_size,
            config.num_attention_heads,
            config.num_key_value_heads,
            config.num_hidden_layers,
            precision.to_string(),
            estimate.kv_cache_size_gb
        );
    }
    Ok(())
}

fn cmd_budget(model: &ModelArgs, budget_gb: f64) -> Result<(), KvCalcError> {
    let ResolvedModel {
        name,
        config,
        precision,
    } = model.resolve()?;
    let estimator = KvCacheEstimator::new(config, precision);
    let tokens = estimator.max_context_for_budget(budget_gb)?;
    tracing::debug!(model = %name, budget_gb, tokens, "budget resolved");
    println!("Max context length: {tokens} tokens ({budget_gb} GB at {precision})");
    Ok(())
}
