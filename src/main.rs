//! # Article Readability
//!
//! Batch scraper and scorer for a list of article URLs. Each page's title and
//! body text are extracted, optionally saved as `<URL_ID>.txt`, and scored for
//! sentiment and readability. Results are written as a CSV table with the
//! input columns followed by thirteen metric columns.
//!
//! ## Usage
//!
//! ```sh
//! article_readability -i input.csv -o output.csv -t ./articles
//! ```
//!
//! ## Architecture
//!
//! 1. **Input**: read `URL_ID` / `URL` rows from the input CSV
//! 2. **Extraction**: fetch each page, locate the content container, keep the
//!    document in memory (and on disk when a text directory is set)
//! 3. **Analysis**: compute the metric set for every extracted document
//! 4. **Output**: write the result table and, optionally, a JSON report

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analyzer;
mod cli;
mod config;
mod error;
mod extractor;
mod fetch;
mod input;
mod models;
mod outputs;
mod pipeline;
mod utils;

use analyzer::Analyzer;
use analyzer::sentiment::LexiconSentiment;
use cli::Cli;
use config::PipelineConfig;
use extractor::Extractor;
use fetch::{HttpFetcher, RetryFetch};
use outputs::{json, table};
use utils::{ensure_writable_dir, parent_dir};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_readability starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    config.apply_cli(&args);
    let selectors = config.validate()?;
    debug!(?config, "Resolved configuration");

    let sentiment = match &config.sentiment_lexicon {
        Some(path) => LexiconSentiment::with_overrides_from_path(path)?,
        None => LexiconSentiment::default(),
    };
    let analyzer = Analyzer::new(sentiment);

    // Early checks: output locations must be writable before any fetching
    if let Some(dir) = &config.text_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir.display(), error = %e, "Text directory is not writable");
            return Err(e);
        }
    }
    for path in [Some(&args.output), args.json_report.as_ref()].into_iter().flatten() {
        if let Some(dir) = parent_dir(path) {
            ensure_writable_dir(dir).await?;
        }
    }

    // ---- Input ----
    let input_table = input::read_input(&args.input)?;
    let total_rows = input_table.rows.len();

    // ---- Extraction ----
    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())?;
    let fetcher = RetryFetch::new(fetcher, config.max_retries, config.retry_base_delay());
    let extractor = Extractor::new(fetcher, selectors, config.text_dir.clone());

    info!(
        rows = total_rows,
        concurrency = config.concurrency,
        max_retries = config.max_retries,
        policy = ?config.on_network_error,
        "Starting extraction"
    );
    let mut outcome = pipeline::extract_all(
        &extractor,
        &input_table,
        config.concurrency,
        config.on_network_error,
    )
    .await?;
    info!(documents = outcome.store.len(), "Document store ready");

    // ---- Analysis ----
    let results = pipeline::analyze_all(&input_table, &mut outcome, &analyzer);
    if results.is_empty() {
        warn!("No rows survived extraction and analysis; output will contain headers only");
    }

    // ---- Output ----
    table::write_output(&args.output, &results)?;

    if let Some(report_path) = &args.json_report {
        let report = json::RunReport::new(&args.input, total_rows, &results, &outcome.excluded);
        if let Err(e) = json::write_report(&report, report_path).await {
            error!(path = %report_path.display(), error = %e, "Failed to write JSON report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        total = total_rows,
        analyzed = results.len(),
        excluded = outcome.excluded.len(),
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
