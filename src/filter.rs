//! # Filter Module
//!
//! Rule-based pre-selection of activity records for a question.
//!
//! Rules are tried in order and the first one whose keyword appears in the
//! lower-cased question decides the result:
//!
//! 1. Status: "executed", "planned", "in progress"
//! 2. Country: ghana, nigeria, kenya, south africa
//! 3. Beneficiary: "women" selects "Women and Girls"
//!
//! With no match the first [`FALLBACK_LIMIT`] records are returned. Output
//! always preserves the source order of the records.

use tracing::debug;

use crate::models::{ActivityRecord, ActivityStatus};

/// Cap on records returned when no rule matches
pub const FALLBACK_LIMIT: usize = 50;

const STATUS_KEYWORDS: [(&str, ActivityStatus); 3] = [
    ("executed", ActivityStatus::Executed),
    ("planned", ActivityStatus::Planned),
    ("in progress", ActivityStatus::InProgress),
];

const COUNTRIES: [&str; 4] = ["ghana", "nigeria", "kenya", "south africa"];

const BENEFICIARY_KEYWORDS: [(&str, &str); 1] = [("women", "Women and Girls")];

/// What a matched rule selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Status(ActivityStatus),
    Country(&'static str),
    Beneficiary(&'static str),
}

impl Selector {
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        match self {
            Self::Status(status) => record.status_raw() == Some(status.as_str()),
            Self::Country(country) => record.in_country(country),
            Self::Beneficiary(label) => record.has_beneficiary(label),
        }
    }
}

/// A named predicate over the lower-cased question
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: fn(&str) -> Option<Selector>,
}

fn status_rule(q: &str) -> Option<Selector> {
    STATUS_KEYWORDS
        .iter()
        .find(|(kw, _)| q.contains(kw))
        .map(|&(_, status)| Selector::Status(status))
}

fn country_rule(q: &str) -> Option<Selector> {
    COUNTRIES
        .iter()
        .find(|c| q.contains(*c))
        .map(|&c| Selector::Country(c))
}

fn beneficiary_rule(q: &str) -> Option<Selector> {
    BENEFICIARY_KEYWORDS
        .iter()
        .find(|(kw, _)| q.contains(kw))
        .map(|&(_, label)| Selector::Beneficiary(label))
}

/// Default cascade, in precedence order
pub const RULES: [Rule; 3] = [
    Rule {
        name: "status",
        predicate: status_rule,
    },
    Rule {
        name: "country",
        predicate: country_rule,
    },
    Rule {
        name: "beneficiary",
        predicate: beneficiary_rule,
    },
];

/// Find the first rule matching the question, if any
pub fn select_rule(question: &str) -> Option<(&'static str, Selector)> {
    let q = question.to_lowercase();
    RULES
        .iter()
        .find_map(|rule| (rule.predicate)(&q).map(|sel| (rule.name, sel)))
}

/// Select the records relevant to `question`, in source order.
pub fn filter_activities<'a>(question: &str, records: &'a [ActivityRecord]) -> Vec<&'a ActivityRecord> {
    match select_rule(question) {
        Some((name, selector)) => {
            let selected: Vec<&ActivityRecord> =
                records.iter().filter(|r| selector.matches(r)).collect();
            debug!(rule = name, ?selector, selected = selected.len(), "filter rule matched");
            selected
        }
        None => {
            let selected: Vec<&ActivityRecord> = records.iter().take(FALLBACK_LIMIT).collect();
            debug!(selected = selected.len(), "no filter rule matched; using fallback cap");
            selected
        }
    }
}
