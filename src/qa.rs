//! # QA Module
//!
//! Single-shot question answering over the activity dataset: filter the
//! records, build one prompt, make one provider call, record its usage.

use anyhow::Result;
use tracing::info;

use crate::filter::{filter_activities, select_rule};
use crate::ledger::UsageLedger;
use crate::llm::CompletionProvider;
use crate::models::{ActivityRecord, CostedCall};
use crate::prompt::{NOT_AVAILABLE, build_prompt};

/// Ledger stage label for the answering call
pub const ANSWER_STAGE: &str = "answer_generation";

/// Answer text plus what it took to produce it
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub records_used: usize,
    /// Name of the filter rule that selected the records; `None` for the fallback
    pub rule: Option<&'static str>,
    /// The recorded provider call, when one was made and reported usage
    pub call: Option<CostedCall>,
}

pub struct Assistant<'a> {
    records: &'a [ActivityRecord],
    provider: &'a dyn CompletionProvider,
    model: String,
}

impl<'a> Assistant<'a> {
    pub fn new(
        records: &'a [ActivityRecord],
        provider: &'a dyn CompletionProvider,
        model: impl Into<String>,
    ) -> Self {
        Self {
            records,
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer `question`, appending the provider call to `ledger`.
    ///
    /// When the filter selects nothing the provider is not called and the
    /// fixed "not available" reply is returned. Provider errors propagate.
    pub fn answer(&self, question: &str, ledger: &mut UsageLedger) -> Result<Answer> {
        let rule = select_rule(question).map(|(name, _)| name);
        let selected = filter_activities(question, self.records);
        if selected.is_empty() {
            info!(rule, "no matching records; skipping provider call");
            return Ok(Answer {
                text: NOT_AVAILABLE.to_string(),
                records_used: 0,
                rule,
                call: None,
            });
        }

        let prompt = build_prompt(question, &selected);
        let completion = self.provider.complete(&prompt, &self.model)?;
        let recorded = ledger
            .record(
                completion.usage.as_ref(),
                &self.model,
                ANSWER_STAGE,
                self.provider.provider().as_str(),
            )
            .cloned();
        let call = recorded.map(|call| CostedCall {
            cost_usd: ledger.calculate_cost(&call),
            call,
        });

        Ok(Answer {
            text: completion.text.trim().to_string(),
            records_used: selected.len(),
            rule,
            call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Completion;
    use crate::models::Provider;
    use crate::pricing::PricingTable;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        reply: Completion,
        prompts: Mutex<Vec<String>>,
    }

    impl CompletionProvider for Scripted {
        fn provider(&self) -> Provider {
            Provider::OpenAi
        }

        fn complete(&self, prompt: &str, _model: &str) -> Result<Completion> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn empty_selection_skips_provider() {
        let provider = Scripted {
            reply: Completion::default(),
            prompts: Mutex::new(Vec::new()),
        };
        let records = vec![ActivityRecord::new(json!({"ActivityStatus": "Planned"}))];
        let assistant = Assistant::new(&records, &provider, "gpt-4.1-mini");
        let mut ledger = UsageLedger::new(PricingTable::builtin());

        let answer = assistant.answer("what was executed?", &mut ledger).unwrap();
        assert_eq!(answer.text, NOT_AVAILABLE);
        assert_eq!(answer.rule, Some("status"));
        assert!(provider.prompts.lock().unwrap().is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn answer_records_usage_and_trims_text() {
        let provider = Scripted {
            reply: Completion {
                text: "  One executed project.\n".to_string(),
                usage: Some(json!({"prompt_tokens": 1000, "completion_tokens": 500, "total_tokens": 1500})),
            },
            prompts: Mutex::new(Vec::new()),
        };
        let records = vec![
            ActivityRecord::new(json!({"thefieldthatshallnotbenamed": "x", "ActivityStatus": "Executed"})),
            ActivityRecord::new(json!({"thefieldthatshallnotbenamed": "y", "ActivityStatus": "Planned"})),
        ];
        let assistant = Assistant::new(&records, &provider, "gpt-4.1-mini");
        let mut ledger = UsageLedger::new(PricingTable::builtin());

        let answer = assistant.answer("What was executed?", &mut ledger).unwrap();
        assert_eq!(answer.text, "One executed project.");
        assert_eq!(answer.records_used, 1);
        let call = answer.call.unwrap();
        assert_eq!(call.call.stage, ANSWER_STAGE);
        assert!((call.cost_usd - 0.0024).abs() < 1e-12);
        assert_eq!(ledger.len(), 1);

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"x\""));
        assert!(!prompts[0].contains("\"y\""));
    }
}
