#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

// Provide a no-op color shim when "colors" feature is disabled
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn bright_black(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn green(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bold(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn dimmed(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for &str {
        fn as_str(&self) -> &str {
            self
        }
    }
    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
    impl ColorizeShim for Plain {
        fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim as OwoColorize;

use crate::models::UsageSummary;
use crate::qa::Answer;
use crate::utils::{format_currency, format_tokens};

/// Plain-text usage report. No colors so it can be logged or diffed.
pub fn format_usage_report(summary: &UsageSummary) -> String {
    let mut out = format!(
        "\n========== LLM API Usage Report ==========\n\
         Execution started at (UTC): {}\n\
         Total API calls: {}\n\
         Total input tokens: {}\n\
         Total output tokens: {}\n\
         Total tokens: {}\n\
         Total estimated cost (USD): ${}\n\
         \n--- Per Call Breakdown ---\n",
        summary.started_at,
        summary.total_calls,
        summary.total_input_tokens,
        summary.total_output_tokens,
        summary.total_tokens,
        format_currency(summary.total_cost_usd)
    );
    for (i, c) in summary.calls.iter().enumerate() {
        out.push_str(&format!(
            "{}. Stage: {} | Provider: {} | Model: {} | In: {} | Out: {} | Total: {} | Cost: ${}\n",
            i + 1,
            c.call.stage,
            c.call.provider.as_str(),
            c.call.model,
            c.call.input_tokens,
            c.call.output_tokens,
            c.call.total_tokens,
            format_currency(c.cost_usd)
        ));
    }
    out.push_str("==========================================\n");
    out
}

pub fn build_summary_json(summary: &UsageSummary) -> serde_json::Value {
    serde_json::json!({
        "started_at": summary.started_at,
        "total_calls": summary.total_calls,
        "total_input_tokens": summary.total_input_tokens,
        "total_output_tokens": summary.total_output_tokens,
        "total_tokens": summary.total_tokens,
        "total_cost_usd": summary.total_cost_usd,
        "calls": summary.calls,
    })
}

pub fn build_answer_json(
    question: &str,
    answer: &Answer,
    summary: &UsageSummary,
) -> serde_json::Value {
    serde_json::json!({
        "question": question,
        "answer": answer.text,
        "records_used": answer.records_used,
        "rule": answer.rule,
        "call": answer.call.as_ref().map(|c| serde_json::json!({
            "stage": c.call.stage,
            "model": c.call.model,
            "provider": c.call.provider.as_str(),
            "input_tokens": c.call.input_tokens,
            "output_tokens": c.call.output_tokens,
            "total_tokens": c.call.total_tokens,
            "cost_usd": c.cost_usd,
        })),
        "usage": build_summary_json(summary),
    })
}

pub fn print_json_output(
    question: &str,
    answer: &Answer,
    summary: &UsageSummary,
) -> anyhow::Result<()> {
    let json = build_answer_json(question, answer, summary);
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}

pub fn print_text_output(question: &str, answer: &Answer) {
    println!("{} {}", "❯".cyan(), question.bold());
    println!();
    println!("{}", answer.text);
    if let Some(c) = answer.call.as_ref() {
        let stats = format!(
            "{} records · {} · {} in / {} out · ${}",
            answer.records_used,
            c.call.model,
            format_tokens(c.call.input_tokens),
            format_tokens(c.call.output_tokens),
            format_currency(c.cost_usd)
        );
        println!();
        println!("{}", stats.dimmed());
    }
}

pub fn print_history(questions: &[String]) {
    if questions.is_empty() {
        println!("{}", "No questions asked yet".dimmed());
        return;
    }
    println!("{}", "History".bold());
    for q in questions {
        println!("  {} {}", "•".bright_black(), q);
    }
}

pub fn print_error(msg: &str) {
    eprintln!("{}", msg.red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostedCall, Provider, UsageCall};

    fn summary() -> UsageSummary {
        UsageSummary {
            started_at: "2026-01-01T00:00:00+00:00".to_string(),
            total_calls: 1,
            total_input_tokens: 1000,
            total_output_tokens: 500,
            total_tokens: 1500,
            total_cost_usd: 0.0024,
            calls: vec![CostedCall {
                call: UsageCall {
                    stage: "answer_generation".into(),
                    model: "gpt-4.1-mini".into(),
                    provider: Provider::OpenAi,
                    input_tokens: 1000,
                    output_tokens: 500,
                    total_tokens: 1500,
                },
                cost_usd: 0.0024,
            }],
        }
    }

    #[test]
    fn report_lists_totals_and_calls() {
        let report = format_usage_report(&summary());
        assert!(report.starts_with("\n========== LLM API Usage Report ==========\nExecution started at (UTC): "));
        assert!(report.contains("Total API calls: 1\n"));
        assert!(report.contains("\n\n--- Per Call Breakdown ---\n1. Stage: "));
        assert!(report.ends_with("Cost: $0.002400\n==========================================\n"));
        assert!(report.contains("Total tokens: 1500"));
        assert!(report.contains("Total estimated cost (USD): $0.002400"));
        assert!(report.contains(
            "1. Stage: answer_generation | Provider: openai | Model: gpt-4.1-mini | In: 1000 | Out: 500 | Total: 1500 | Cost: $0.002400"
        ));
    }

    #[test]
    fn summary_json_flattens_calls() {
        let json = build_summary_json(&summary());
        assert_eq!(json["total_calls"], 1);
        assert_eq!(json["calls"][0]["model"], "gpt-4.1-mini");
        assert_eq!(json["calls"][0]["provider"], "openai");
        assert_eq!(json["calls"][0]["cost_usd"], 0.0024);
    }
}
