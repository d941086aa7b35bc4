use std::path::PathBuf;

use crate::models::Provider;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderArg {
    /// OpenAI chat completions
    Openai,
    /// Anthropic messages
    Claude,
}

impl From<ProviderArg> for Provider {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Openai => Provider::OpenAi,
            ProviderArg::Claude => Provider::Claude,
        }
    }
}

#[derive(clap::Parser, Debug)]
#[command(about = "Ask questions about the activity dataset")]
pub struct Args {
    /// Question to ask. Read from stdin when omitted
    pub question: Vec<String>,

    /// Activity dataset (JSON array)
    #[arg(long, env = "ACTIVITY_QA_DATA", default_value = "activity.json")]
    pub data: PathBuf,

    /// LLM provider: openai|claude
    #[arg(long, value_enum, env = "ACTIVITY_QA_PROVIDER", default_value_t = ProviderArg::Openai)]
    pub provider: ProviderArg,

    /// Model identifier sent to the provider and used for pricing
    #[arg(long, env = "ACTIVITY_QA_MODEL", default_value = "gpt-4.1-mini")]
    pub model: String,

    /// TOML pricing table replacing the built-in prices
    #[arg(long, env = "ACTIVITY_QA_PRICING")]
    pub pricing: Option<PathBuf>,

    /// Emit JSON instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Print the detailed usage report after answering
    #[arg(long)]
    pub report: bool,

    /// List recent questions and exit
    #[arg(long)]
    pub history: bool,

    /// Do not save the question to history
    #[arg(long)]
    pub no_history: bool,

    /// Debug mode: verbose logging to stderr
    #[arg(long, env = "ACTIVITY_QA_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}
