//! # Pricing Module
//!
//! Per-model token prices used to cost recorded LLM calls.
//!
//! ## Pricing Structure
//!
//! Each model has an input and an output price, both expressed in USD per
//! [`PriceUnit`] tokens. A table carries exactly one unit for every entry, so
//! per-1K and per-1M prices can never be mixed in one lookup.
//!
//! Lookups are exact on the model identifier. A model that is not in the
//! table has no price and costs nothing.
//!
//! The built-in table can be replaced by a TOML file:
//!
//! ```toml
//! unit = "per_million"
//!
//! [models."gpt-4.1-mini"]
//! input = 0.80
//! output = 3.20
//! ```

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Token count a price is quoted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceUnit {
    PerThousand,
    #[default]
    PerMillion,
}

impl PriceUnit {
    pub fn tokens(&self) -> f64 {
        match self {
            Self::PerThousand => 1_000.0,
            Self::PerMillion => 1_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrice {
    pub input: f64,
    pub output: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    #[serde(default)]
    pub unit: PriceUnit,
    #[serde(default)]
    pub models: HashMap<String, ModelPrice>,
}

// USD per 1M tokens
const BUILTIN_PRICES: &[(&str, f64, f64)] = &[
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-4.1-mini", 0.80, 3.20),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4o-mini", 0.15, 0.60),
    ("claude-opus-4-1", 15.00, 75.00),
    ("claude-opus-4-20250514", 15.00, 75.00),
    ("claude-sonnet-4-20250514", 3.00, 15.00),
    ("claude-3-7-sonnet-20250219", 3.00, 15.00),
    ("claude-3-5-haiku-20241022", 0.80, 4.00),
];

static BUILTIN_TABLE: Lazy<PricingTable> = Lazy::new(|| PricingTable {
    unit: PriceUnit::PerMillion,
    models: BUILTIN_PRICES
        .iter()
        .map(|&(model, input, output)| (model.to_string(), ModelPrice { input, output }))
        .collect(),
});

/// Round to 6 decimal places, the precision costs are reported at
pub fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

impl PricingTable {
    pub fn new(unit: PriceUnit) -> Self {
        Self {
            unit,
            models: HashMap::new(),
        }
    }

    /// The table compiled into the binary (USD per 1M tokens)
    pub fn builtin() -> Self {
        BUILTIN_TABLE.clone()
    }

    pub fn with_model(mut self, model: &str, input: f64, output: f64) -> Self {
        self.models
            .insert(model.to_string(), ModelPrice { input, output });
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table: PricingTable = toml::from_str(s).context("parse pricing table")?;
        for (model, price) in &table.models {
            if !(price.input >= 0.0 && price.output >= 0.0) {
                anyhow::bail!("negative or invalid price for model {model}");
            }
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pricing file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse pricing file: {}", path.display()))
    }

    /// Exact-match lookup
    pub fn lookup(&self, model: &str) -> Option<ModelPrice> {
        self.models.get(model).copied()
    }

    /// Cost in USD for the given token counts, rounded to 6 decimals.
    /// Unknown models cost 0.0.
    pub fn cost(&self, model: &str, input_tokens: u64, output_tokens: u64) -> f64 {
        let Some(price) = self.lookup(model) else {
            return 0.0;
        };
        let per = self.unit.tokens();
        let input_cost = (input_tokens as f64 / per) * price.input;
        let output_cost = (output_tokens as f64 / per) * price.output;
        round6(input_cost + output_cost)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::builtin()
    }
}
