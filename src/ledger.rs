//! # Ledger Module
//!
//! Append-only record of LLM calls and their cost.
//!
//! ## Key Types
//!
//! - [`UsageLedger`]: owned call list plus the pricing table used to cost it
//! - [`SharedLedger`]: mutex-guarded handle for callers answering questions
//!   from more than one thread
//!
//! Recording never fails. A call without usage data, or from a provider we
//! cannot normalize, is skipped.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::models::{CostedCall, Provider, ProviderUsage, UsageCall, UsageSummary};
use crate::pricing::{round6, PricingTable};

#[derive(Debug, Clone)]
pub struct UsageLedger {
    started_at: DateTime<Utc>,
    calls: Vec<UsageCall>,
    pricing: PricingTable,
}

impl UsageLedger {
    pub fn new(pricing: PricingTable) -> Self {
        Self::with_start(pricing, Utc::now())
    }

    pub fn with_start(pricing: PricingTable, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            calls: Vec::new(),
            pricing,
        }
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn calls(&self) -> &[UsageCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Record the `usage` object from a provider response.
    ///
    /// Returns the appended call, or `None` when nothing was recorded.
    pub fn record(
        &mut self,
        usage: Option<&Value>,
        model: &str,
        stage: &str,
        provider: &str,
    ) -> Option<&UsageCall> {
        let raw = match usage {
            Some(v) if !v.is_null() => v,
            _ => {
                debug!(model, stage, provider, "no usage data on response; not recorded");
                return None;
            }
        };
        self.record_usage(&ProviderUsage::from_raw(provider, raw), model, stage)
    }

    /// Record an already-tagged usage payload.
    pub fn record_usage(
        &mut self,
        usage: &ProviderUsage,
        model: &str,
        stage: &str,
    ) -> Option<&UsageCall> {
        let provider = match usage {
            ProviderUsage::OpenAi(_) => Provider::OpenAi,
            ProviderUsage::Claude(_) => Provider::Claude,
            ProviderUsage::Unknown => {
                warn!(model, stage, "usage could not be normalized; not recorded");
                return None;
            }
        };
        let tokens = usage.normalize()?;
        if self.pricing.lookup(model).is_none() {
            debug!(model, "model not in pricing table; cost will be 0");
        }
        self.calls.push(UsageCall {
            stage: stage.to_string(),
            model: model.to_string(),
            provider,
            input_tokens: tokens.input_tokens,
            output_tokens: tokens.output_tokens,
            total_tokens: tokens.total_tokens,
        });
        let call = self.calls.last()?;
        debug!(
            model,
            stage,
            provider = provider.as_str(),
            input = call.input_tokens,
            output = call.output_tokens,
            "recorded usage"
        );
        Some(call)
    }

    /// Cost of one call in USD, rounded to 6 decimals; 0.0 for unpriced models
    pub fn calculate_cost(&self, call: &UsageCall) -> f64 {
        self.pricing
            .cost(&call.model, call.input_tokens, call.output_tokens)
    }

    pub fn summary(&self) -> UsageSummary {
        let calls: Vec<CostedCall> = self
            .calls
            .iter()
            .map(|c| CostedCall {
                call: c.clone(),
                cost_usd: self.calculate_cost(c),
            })
            .collect();
        UsageSummary {
            started_at: self.started_at.to_rfc3339(),
            total_calls: calls.len(),
            total_input_tokens: saturating_total(self.calls.iter().map(|c| c.input_tokens)),
            total_output_tokens: saturating_total(self.calls.iter().map(|c| c.output_tokens)),
            total_tokens: saturating_total(self.calls.iter().map(|c| c.total_tokens)),
            total_cost_usd: round6(calls.iter().map(|c| c.cost_usd).sum()),
            calls,
        }
    }

    /// Write the detailed report for [`UsageLedger::summary`] to stdout
    pub fn print_detailed_report(&self) {
        print!("{}", crate::display::format_usage_report(&self.summary()));
    }
}

fn saturating_total(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(PricingTable::builtin())
    }
}

/// Thread-safe handle; every mutation goes through the lock
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<UsageLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: UsageLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Lock the ledger. A poisoned lock is recovered since the call list is
    /// only ever appended to.
    pub fn lock(&self) -> MutexGuard<'_, UsageLedger> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(
        &self,
        usage: Option<&Value>,
        model: &str,
        stage: &str,
        provider: &str,
    ) -> Option<UsageCall> {
        self.lock().record(usage, model, stage, provider).cloned()
    }

    pub fn summary(&self) -> UsageSummary {
        self.lock().summary()
    }
}
