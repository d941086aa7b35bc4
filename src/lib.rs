//! # Activity QA
//!
//! Answers natural-language questions about a collection of development and
//! impact activity records, and keeps an account of what each LLM call cost.
//!
//! ## Overview
//!
//! A question first passes through a rule-based filter that picks a small,
//! loosely on-topic subset of the records. The subset is embedded in a single
//! prompt sent to an LLM provider, and the usage block of the reply is
//! normalized and appended to a ledger that prices it per model.
//!
//! ## Features
//!
//! - `colors` (default): Enables terminal color output via owo-colors

/// Command-line argument parsing and configuration
pub mod cli;

/// Activity dataset loading
pub mod data;

/// Display formatting for text and JSON output
pub mod display;

/// Rule cascade selecting records for a question
pub mod filter;

/// Persistent question history
pub mod history;

/// Usage ledger: recorded calls, cost, summaries
pub mod ledger;

/// Provider HTTP clients
pub mod llm;

/// Data models for activity records and usage payloads
pub mod models;

/// Model-specific pricing calculations
pub mod pricing;

/// Prompt construction
pub mod prompt;

/// Question answering pipeline
pub mod qa;

/// Utility functions for paths, formatting, and input
pub mod utils;

pub use filter::filter_activities;
pub use ledger::{SharedLedger, UsageLedger};
