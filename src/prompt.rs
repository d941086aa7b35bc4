//! Prompt text sent to the LLM for a filtered record subset.

use crate::models::ActivityRecord;

/// Shape of the dataset, given to the model so it can read the records
pub const SCHEMA: &str = "\
You are working with a JSON database of development and impact activities.

Each record represents ONE activity with the following structure:

Primary Key:
- thefieldthatshallnotbenamed (string)

Core Fields:
- ActivityTitle (string)
- Summary (string)
- ActivityStatus (Planned | In progress | Executed)
- Date (string or NA)
- RegionLocation (string)

Funding:
- AmountOfSupport (raw string)
- AmountOfSupportSplitted[]: cleaned_value, value_standardized, AmountInUSD (number)

Organizations:
- Organizations[]: OrganizationName, Organization Type, Registered Country

Beneficiaries:
- BeneficiariesExtracted[] (array of strings)

Support Types:
- TypeOfSupportExtracted[]: SupportType, SupportCategory (Financial | Nonfinancial)

Geography:
- CountriesSplitted[]: value (country name)

Classifications:
- SocialCauses[] (array of strings)
- SDGs[] (array of strings)

Sources:
- Source[]: NewsArticleTitle, PublicationDate
";

pub const RULES: &str = "\
Rules:
- Answer ONLY from the provided records
- Do NOT use external knowledge
- Do NOT assume missing data
- Do NOT invent numbers, countries, organizations, or dates
- Use USD amounts only from AmountOfSupportSplitted.AmountInUSD
- If multiple records match, summarize clearly
- If unsure, say \"Not available in the dataset\"
";

/// Reply used when the filter leaves nothing to ask about
pub const NOT_AVAILABLE: &str = "Not available in the dataset.";

/// Build the single-shot prompt. Records are embedded as a JSON array in
/// the order given; non-ASCII text is kept as-is.
pub fn build_prompt(question: &str, records: &[&ActivityRecord]) -> String {
    let values: Vec<&serde_json::Value> = records.iter().map(|r| r.as_value()).collect();
    // Serializing borrowed JSON values cannot fail.
    let records_json = serde_json::to_string(&values).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are a data analyst answering questions from a JSON dataset.\n\n\
         {SCHEMA}\n\
         {RULES}\n\
         Relevant Records:\n{records_json}\n\n\
         User Question:\n{question}\n\n\
         Provide a clear, factual answer.\n"
    )
}
