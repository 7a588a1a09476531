//! Cache element precision.
//!
//! Maps the storage formats a KV cache is commonly kept in to the number of
//! bytes one cached scalar occupies. Sub-byte formats are packed, so 4-bit
//! quantization costs half a byte per value.

use std::str::FromStr;

use serde::Serialize;

use crate::error::{KvCalcError, Result};

/// Storage format of a single cached key or value element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Float32,
    Float16,
    BFloat16,
    Float8,
    Int8,
    /// Packed 4-bit quantization (AWQ, GPTQ, Q4).
    Int4,
    /// Explicit number of bytes per element.
    Custom(f64),
}

impl Precision {
    /// Size of a single cached element in bytes.
    pub fn bytes_per_element(self) -> f64 {
        match self {
            Precision::Float32 => 4.0,
            Precision::Float16 | Precision::BFloat16 => 2.0,
            Precision::Float8 | Precision::Int8 => 1.0,
            Precision::Int4 => 0.5,
            Precision::Custom(bytes) => bytes,
        }
    }

    /// Build a precision from a raw byte count.
    ///
    /// Returns the matching named format when one exists, so `from_bytes(2.0)`
    /// is `Float16` rather than `Custom(2.0)`.
    pub fn from_bytes(bytes: f64) -> Result<Self> {
        if !bytes.is_finite() || bytes <= 0.0 {
            return Err(KvCalcError::InvalidPrecision(format!(
                "bytes per element must be positive and finite (got {bytes})"
            )));
        }
        Ok(match bytes {
            b if b == 4.0 => Precision::Float32,
            b if b == 2.0 => Precision::Float16,
            b if b == 1.0 => Precision::Int8,
            b if b == 0.5 => Precision::Int4,
            b => Precision::Custom(b),
        })
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Precision::Float32 => "float32",
            Precision::Float16 => "float16",
            Precision::BFloat16 => "bfloat16",
            Precision::Float8 => "float8",
            Precision::Int8 => "int8",
            Precision::Int4 => "int4",
            Precision::Custom(_) => "custom",
        }
    }
}

impl FromStr for Precision {
    type Err = KvCalcError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "fp32" | "f32" | "float32" => Ok(Precision::Float32),
            "fp16" | "f16" | "float16" | "half" => Ok(Precision::Float16),
            "bf16" | "bfloat16" => Ok(Precision::BFloat16),
            "fp8" | "f8" | "float8" => Ok(Precision::Float8),
            "int8" | "q8" | "8bit" => Ok(Precision::Int8),
            "int4" | "q4" | "4bit" | "awq" | "gptq" => Ok(Precision::Int4),
            other => match other.parse::<f64>() {
                Ok(bytes) => Precision::from_bytes(bytes),
                Err(_) => Err(KvCalcError::InvalidPrecision(format!(
                    "unknown format '{s}' (expected fp32, fp16, bf16, fp8, int8, int4 or a byte count)"
                ))),
            },
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::Custom(bytes) => write!(f, "{bytes} bytes"),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_formats_parse_case_insensitively() {
        assert_eq!("FP16".parse::<Precision>().unwrap(), Precision::Float16);
        assert_eq!(" awq ".parse::<Precision>().unwrap(), Precision::Int4);
        assert_eq!("BF16".parse::<Precision>().unwrap(), Precision::BFloat16);
    }

    #[test]
    fn numeric_precision_maps_to_named_format() {
        assert_eq!("0.5".parse::<Precision>().unwrap(), Precision::Int4);
        assert_eq!("1.25".parse::<Precision>().unwrap(), Precision::Custom(1.25));
    }

    #[test]
    fn rejects_non_positive_bytes() {
        assert!(matches!(
            "0".parse::<Precision>(),
            Err(KvCalcError::InvalidPrecision(_))
        ));
        assert!("-2".parse::<Precision>().is_err());
        assert!("nan".parse::<Precision>().is_err());
    }

    #[test]
    fn custom_display_shows_bytes() {
        assert_eq!(Precision::Custom(0.75).to_string(), "0.75 bytes");
        assert_eq!(Precision::Int4.to_string(), "int4");
    }
}
