use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// LLM vendors whose usage payloads we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
}

impl Provider {
    /// Parse a provider identifier; "anthropic" is accepted for Claude
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "claude" | "anthropic" => Some(Self::Claude),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }
}

/// OpenAI usage block. Chat completions report `prompt_tokens` /
/// `completion_tokens`; the Responses API reports `input_tokens` /
/// `output_tokens`. Both report `total_tokens`. Compatible servers may send
/// both spellings, in which case the chat completions names win.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct OpenAiUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// Anthropic messages usage block (no total)
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClaudeUsage {
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

/// Provider-specific usage payload, tagged by vendor
#[derive(Debug, Clone)]
pub enum ProviderUsage {
    OpenAi(OpenAiUsage),
    Claude(ClaudeUsage),
    Unknown,
}

impl ProviderUsage {
    /// Interpret a raw `usage` object according to the provider identifier.
    /// An unrecognised provider or an unparseable payload yields `Unknown`.
    pub fn from_raw(provider: &str, raw: &Value) -> Self {
        let parsed = match Provider::parse(provider) {
            Some(Provider::OpenAi) => serde_json::from_value(raw.clone()).map(Self::OpenAi),
            Some(Provider::Claude) => serde_json::from_value(raw.clone()).map(Self::Claude),
            None => {
                warn!(provider, "unsupported provider");
                return Self::Unknown;
            }
        };
        parsed.unwrap_or_else(|e| {
            warn!(provider, error = %e, "usage payload did not parse");
            Self::Unknown
        })
    }

    /// Normalize into canonical counts. `Unknown` has no normalization rule.
    /// Computed totals saturate at `u64::MAX`.
    pub fn normalize(&self) -> Option<TokenUsage> {
        match self {
            Self::OpenAi(u) => {
                let input = u.prompt_tokens.or(u.input_tokens).unwrap_or(0);
                let output = u.completion_tokens.or(u.output_tokens).unwrap_or(0);
                Some(TokenUsage {
                    input_tokens: input,
                    output_tokens: output,
                    total_tokens: u
                        .total_tokens
                        .unwrap_or_else(|| input.saturating_add(output)),
                })
            }
            Self::Claude(u) => {
                let input = u.input_tokens.unwrap_or(0);
                let output = u.output_tokens.unwrap_or(0);
                Some(TokenUsage {
                    input_tokens: input,
                    output_tokens: output,
                    total_tokens: input.saturating_add(output),
                })
            }
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// One completed LLM invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageCall {
    pub stage: String,
    pub model: String,
    pub provider: Provider,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// A recorded call annotated with its computed cost
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostedCall {
    #[serde(flatten)]
    pub call: UsageCall,
    pub cost_usd: f64,
}

/// Aggregate view over every recorded call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub started_at: String,
    pub total_calls: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
    pub calls: Vec<CostedCall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn openai_chat_usage_keeps_reported_total() {
        let raw = json!({"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 155});
        let usage = ProviderUsage::from_raw("openai", &raw).normalize().unwrap();
        assert_eq!(usage.input_tokens, 120);
        assert_eq!(usage.output_tokens, 30);
        assert_eq!(usage.total_tokens, 155);
    }

    #[test]
    fn openai_responses_api_field_names_are_accepted() {
        let raw = json!({"input_tokens": 10, "output_tokens": 5});
        let usage = ProviderUsage::from_raw("OpenAI", &raw).normalize().unwrap();
        assert_eq!(usage, TokenUsage { input_tokens: 10, output_tokens: 5, total_tokens: 15 });
    }

    #[test]
    fn openai_block_with_both_spellings_is_read() {
        let raw = json!({
            "prompt_tokens": 10, "completion_tokens": 5,
            "input_tokens": 11, "output_tokens": 6,
            "total_tokens": 15
        });
        let usage = ProviderUsage::from_raw("openai", &raw).normalize().unwrap();
        assert_eq!(usage, TokenUsage { input_tokens: 10, output_tokens: 5, total_tokens: 15 });
    }

    #[test]
    fn computed_total_saturates() {
        let raw = json!({"input_tokens": u64::MAX, "output_tokens": 1});
        let claude = ProviderUsage::from_raw("claude", &raw).normalize().unwrap();
        assert_eq!(claude.total_tokens, u64::MAX);
        let openai = ProviderUsage::from_raw("openai", &raw).normalize().unwrap();
        assert_eq!(openai.total_tokens, u64::MAX);
    }

    #[test]
    fn claude_total_is_computed() {
        let raw = json!({"input_tokens": 1000, "output_tokens": 500, "cache_read_input_tokens": 7});
        let usage = ProviderUsage::from_raw("claude", &raw).normalize().unwrap();
        assert_eq!(usage.total_tokens, 1500);
    }

    #[test]
    fn unknown_provider_has_no_normalization() {
        let raw = json!({"input_tokens": 1, "output_tokens": 1});
        assert!(matches!(ProviderUsage::from_raw("mistral", &raw), ProviderUsage::Unknown));
        assert!(ProviderUsage::Unknown.normalize().is_none());
    }

    #[test]
    fn malformed_payload_for_known_provider_is_unknown() {
        assert!(matches!(ProviderUsage::from_raw("openai", &json!("oops")), ProviderUsage::Unknown));
        let raw = json!({"input_tokens": "many"});
        assert!(matches!(ProviderUsage::from_raw("claude", &raw), ProviderUsage::Unknown));
    }

    #[test]
    fn provider_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Provider::OpenAi).unwrap(), json!("openai"));
        assert_eq!(serde_json::to_value(Provider::Claude).unwrap(), json!("claude"));
        assert_eq!(Provider::parse(" anthropic "), Some(Provider::Claude));
    }
}
