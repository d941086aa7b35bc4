//! Activity records from the development/impact dataset.
//!
//! Records are kept as the raw JSON object they were loaded from so that every
//! field (funding, organizations, sources, ...) is forwarded verbatim into the
//! prompt. Only the handful of fields the filter looks at get typed accessors,
//! and each accessor treats a missing or malformed value as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "thefieldthatshallnotbenamed";
pub const STATUS_FIELD: &str = "ActivityStatus";
pub const COUNTRIES_FIELD: &str = "CountriesSplitted";
pub const BENEFICIARIES_FIELD: &str = "BeneficiariesExtracted";

/// Lifecycle status of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Planned,
    #[serde(rename = "In progress")]
    InProgress,
    Executed,
}

impl ActivityStatus {
    /// Parse the dataset's exact status spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Planned" => Some(Self::Planned),
            "In progress" => Some(Self::InProgress),
            "Executed" => Some(Self::Executed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In progress",
            Self::Executed => "Executed",
        }
    }
}

/// One activity entry, held as its original JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRecord(Value);

impl ActivityRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Primary key, if present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Raw status string as stored
    pub fn status_raw(&self) -> Option<&str> {
        self.0.get(STATUS_FIELD).and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<ActivityStatus> {
        self.status_raw().and_then(ActivityStatus::parse)
    }

    /// Country names from the geography list, in stored order.
    /// Entries without a string `value` are skipped.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.0
            .get(COUNTRIES_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|c| c.get("value").and_then(Value::as_str))
    }

    /// Beneficiary category labels. Non-string entries are skipped.
    pub fn beneficiaries(&self) -> impl Iterator<Item = &str> {
        self.0
            .get(BENEFICIARIES_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn has_beneficiary(&self, label: &str) -> bool {
        self.beneficiaries().any(|b| b == label)
    }

    /// Case-insensitive exact match against any geography value
    pub fn in_country(&self, country: &str) -> bool {
        self.countries().any(|c| c.to_lowercase() == country.to_lowercase())
    }
}

impl From<Value> for ActivityRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
