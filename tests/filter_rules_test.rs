use serde_json::{Value, json};

use activity_qa::filter::{FALLBACK_LIMIT, filter_activities};
use activity_qa::models::ActivityRecord;

fn create_record(id: &str, status: &str, countries: &[&str], beneficiaries: &[&str]) -> ActivityRecord {
    let geo: Vec<Value> = countries.iter().map(|c| json!({ "value": c })).collect();
    ActivityRecord::new(json!({
        "thefieldthatshallnotbenamed": id,
        "ActivityStatus": status,
        "CountriesSplitted": geo,
        "BeneficiariesExtracted": beneficiaries,
        "AmountOfSupportSplitted": [{"AmountInUSD": 1000}],
    }))
}

fn ids(records: &[&ActivityRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.id().unwrap_or("").to_string())
        .collect()
}

fn dataset() -> Vec<ActivityRecord> {
    vec![
        create_record("a1", "Executed", &["Ghana"], &["Youth"]),
        create_record("a2", "Planned", &["Nigeria", "Ghana"], &["Women and Girls"]),
        create_record("a3", "In progress", &["Kenya"], &[]),
        create_record("a4", "Executed", &["South Africa"], &["Women and Girls"]),
        create_record("a5", "Planned", &["ghana"], &["Farmers"]),
    ]
}

#[test]
fn test_executed_scenario() {
    let records = vec![
        ActivityRecord::new(json!({"ActivityStatus": "Executed"})),
        ActivityRecord::new(json!({"ActivityStatus": "Planned"})),
    ];
    let out = filter_activities("What was executed?", &records);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].as_value(), &json!({"ActivityStatus": "Executed"}));
}

#[test]
fn test_status_takes_precedence_over_country_and_beneficiary() {
    let records = dataset();
    let out = filter_activities("EXECUTED projects in Kenya for women", &records);
    assert_eq!(ids(&out), vec!["a1", "a4"]);
}

#[test]
fn test_in_progress_status() {
    let records = dataset();
    let out = filter_activities("Which ones are in progress?", &records);
    assert_eq!(ids(&out), vec!["a3"]);
}

#[test]
fn test_country_match_is_case_insensitive_and_exact() {
    let mut records = dataset();
    records.push(create_record("a6", "Other", &["Ghana North"], &[]));
    let out = filter_activities("activities in GHANA", &records);
    assert_eq!(ids(&out), vec!["a1", "a2", "a5"]);

    // substring on the question side still matches
    let out = filter_activities("activities in ghanaian region", &records);
    assert_eq!(ids(&out), vec!["a1", "a2", "a5"]);
}

#[test]
fn test_first_country_in_candidate_order_wins() {
    let records = dataset();
    let out = filter_activities("compare kenya with nigeria", &records);
    assert_eq!(ids(&out), vec!["a2"]);
}

#[test]
fn test_multi_word_country() {
    let records = dataset();
    let out = filter_activities("funding in south africa", &records);
    assert_eq!(ids(&out), vec!["a4"]);
}

#[test]
fn test_women_beneficiary() {
    let records = dataset();
    let out = filter_activities("Programs for Women", &records);
    assert_eq!(ids(&out), vec!["a2", "a4"]);
}

#[test]
fn test_fallback_keeps_order_and_cap() {
    let records: Vec<ActivityRecord> = (0..75)
        .map(|i| create_record(&format!("r{i}"), "Unknown", &[], &[]))
        .collect();
    let out = filter_activities("total funding by organization", &records);
    assert_eq!(out.len(), FALLBACK_LIMIT);
    assert_eq!(out[0].id(), Some("r0"));
    assert_eq!(out[FALLBACK_LIMIT - 1].id(), Some("r49"));

    let small = dataset();
    let out = filter_activities("", &small);
    assert_eq!(ids(&out), vec!["a1", "a2", "a3", "a4", "a5"]);
}

#[test]
fn test_empty_collection_for_every_rule() {
    for q in ["executed", "planned", "in progress", "ghana", "women", "", "anything else"] {
        assert!(filter_activities(q, &[]).is_empty(), "question {q:?}");
    }
}

#[test]
fn test_malformed_records_never_match() {
    let records = vec![
        ActivityRecord::new(json!({})),
        ActivityRecord::new(json!(null)),
        ActivityRecord::new(json!({"ActivityStatus": null, "CountriesSplitted": [{"name": "Ghana"}, {"value": 7}]})),
        ActivityRecord::new(json!({"BeneficiariesExtracted": "Women and Girls"})),
    ];
    assert!(filter_activities("executed", &records).is_empty());
    assert!(filter_activities("ghana", &records).is_empty());
    assert!(filter_activities("women", &records).is_empty());
    assert_eq!(filter_activities("hello", &records).len(), 4);
}

#[test]
fn test_filter_is_deterministic_and_non_mutating() {
    let records = dataset();
    let before = records.clone();
    let first = ids(&filter_activities("planned work", &records));
    let second = ids(&filter_activities("planned work", &records));
    assert_eq!(first, second);
    assert_eq!(first, vec!["a2", "a5"]);
    assert_eq!(records, before);
}
