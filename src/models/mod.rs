pub mod activity;
pub mod usage;

pub use activity::{ActivityRecord, ActivityStatus};
pub use usage::{
    ClaudeUsage, CostedCall, OpenAiUsage, Provider, ProviderUsage, TokenUsage, UsageCall,
    UsageSummary,
};
