use anyhow::{Context, Result};
use tracing::warn;

use activity_qa::cli::Args;
use activity_qa::data::load_records;
use activity_qa::display::{
    print_error, print_history, print_json_output, print_text_output,
};
use activity_qa::history::HistoryStore;
use activity_qa::ledger::UsageLedger;
use activity_qa::llm::provider_from_env;
use activity_qa::models::Provider;
use activity_qa::pricing::PricingTable;
use activity_qa::qa::Assistant;
use activity_qa::utils::{read_stdin, resolve_question};

fn init_logging(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    if args.history {
        let store = HistoryStore::open_default()?;
        print_history(&store.recent()?);
        return Ok(());
    }

    let question = resolve_question(&args.question, read_stdin)?;
    if question.is_empty() {
        println!("Ask a question, e.g. `activity_qa \"Which projects were executed in Ghana?\"`");
        return Ok(());
    }

    let records = load_records(&args.data)?;
    let pricing = match args.pricing.as_deref() {
        Some(path) => PricingTable::load(path)?,
        None => PricingTable::builtin(),
    };
    let mut ledger = UsageLedger::new(pricing);

    let provider_id = Provider::from(args.provider);
    let provider = provider_from_env(provider_id)
        .with_context(|| format!("configure {} provider", provider_id.as_str()))?;
    let assistant = Assistant::new(&records, provider.as_ref(), args.model.clone());

    if !args.no_history {
        // best effort
        if let Err(e) = HistoryStore::open_default().and_then(|s| s.push(&question)) {
            warn!(error = %e, "could not save question history");
        }
    }

    let answer = match assistant.answer(&question, &mut ledger) {
        Ok(a) => a,
        Err(e) => {
            print_error(&format!("Error calling AI API: {e:#}"));
            std::process::exit(1);
        }
    };

    if args.json {
        print_json_output(&question, &answer, &ledger.summary())?;
    } else {
        print_text_output(&question, &answer);
    }
    if args.report {
        ledger.print_detailed_report();
    }
    Ok(())
}
