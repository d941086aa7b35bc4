use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Join CLI words into a question; fall back to stdin when none were given
pub fn resolve_question(words: &[String], stdin: impl FnOnce() -> anyhow::Result<Vec<u8>>) -> anyhow::Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" ").trim().to_string());
    }
    let raw = stdin()?;
    Ok(String::from_utf8_lossy(&raw).trim().to_string())
}

/// Data directory for persistent state (history store).
/// `ACTIVITY_QA_DB_PATH` overrides the full database path elsewhere.
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "activity_qa")
        .map(|d| d.data_dir().to_path_buf())
        .or_else(|| directories::BaseDirs::new().map(|b| b.home_dir().join(".activity_qa")))
        .unwrap_or_else(|| PathBuf::from(".activity_qa"))
}

pub fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn request_timeout() -> Duration {
    let secs = env::var("ACTIVITY_QA_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&s| s > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// USD at reporting precision
pub fn format_currency(v: f64) -> String {
    format!("{v:.6}")
}

pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1e9)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        n.to_string()
    }
}
