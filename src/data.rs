//! Loading the activity dataset from its JSON file.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::models::ActivityRecord;

/// Parse a JSON array of activity objects.
pub fn parse_records(contents: &str) -> Result<Vec<ActivityRecord>> {
    let value: Value = serde_json::from_str(contents).context("parse activity json")?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(ActivityRecord::new).collect()),
        other => bail!(
            "activity data must be a JSON array, found {}",
            json_kind(&other)
        ),
    }
}

/// Load records from `path`. A missing file is not fatal: the dataset is
/// treated as empty so questions answer "not available" instead of failing.
pub fn load_records(path: &Path) -> Result<Vec<ActivityRecord>> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "activity data not found; starting with empty dataset");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read activity data: {}", path.display()));
        }
    };
    let records = parse_records(&contents)
        .with_context(|| format!("Failed to parse activity data: {}", path.display()))?;
    info!(path = %path.display(), count = records.len(), "loaded activity records");
    Ok(records)
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
