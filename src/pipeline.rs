//! The two pipeline phases and the state passed between them.
//!
//! 1. **Extraction** ([`extract_all`]): fetch and parse every input row with a
//!    bounded number of requests in flight, collecting documents into a
//!    [`DocumentStore`] keyed by `URL_ID`. Results are consumed in input order.
//! 2. **Analysis** ([`analyze_all`]): score each surviving row's document and
//!    accumulate the [`ResultTable`].
//!
//! Rows dropped by either phase are reported as [`Exclusion`]s.

use crate::analyzer::Analyzer;
use crate::analyzer::sentiment::SentimentModel;
use crate::config::NetworkErrorPolicy;
use crate::error::ExtractError;
use crate::extractor::Extractor;
use crate::fetch::FetchPage;
use crate::models::{AnalyzedRow, ArticleDocument, Exclusion, InputTable, ResultTable, Stage};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Extracted documents by `URL_ID`.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: HashMap<String, ArticleDocument>,
}

impl DocumentStore {
    /// Insert or replace the document for `url_id`.
    pub fn insert(&mut self, url_id: String, doc: ArticleDocument) {
        self.docs.insert(url_id, doc);
    }

    pub fn get(&self, url_id: &str) -> Option<&ArticleDocument> {
        self.docs.get(url_id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }
}

/// Result of the extraction phase.
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub store: DocumentStore,
    /// Indices into the input rows that extracted successfully, ascending.
    pub survivors: Vec<usize>,
    pub excluded: Vec<Exclusion>,
}

fn exclusion(url_id: &str, url: &str, stage: Stage, kind: &'static str, reason: String) -> Exclusion {
    Exclusion {
        url_id: url_id.to_string(),
        url: url.to_string(),
        stage,
        kind,
        reason,
    }
}

/// Run the extractor over every row of `table`.
///
/// Content-not-found and missing-title pages drop their row. Network errors
/// drop the row or end the phase depending on `policy`. A failure to write a
/// text file always ends the phase.
///
/// # Arguments
///
/// * `extractor` - Fetches, parses and optionally saves one row's article
/// * `table` - Input rows, processed in order
/// * `concurrency` - Maximum requests in flight (values below 1 act as 1)
/// * `policy` - What a network error does to the run
///
/// # Returns
///
/// The [`ExtractionOutcome`]: documents keyed by `URL_ID` (a later duplicate
/// replaces an earlier one), surviving row indices in input order, and the
/// excluded rows.
///
/// # Errors
///
/// The first network error under [`NetworkErrorPolicy::Abort`], or any
/// [`ExtractError::Persist`].
#[instrument(
    level = "info",
    skip_all,
    fields(rows = table.rows.len(), concurrency = concurrency, ?policy)
)]
pub async fn extract_all<F>(
    extractor: &Extractor<F>,
    table: &InputTable,
    concurrency: usize,
    policy: NetworkErrorPolicy,
) -> Result<ExtractionOutcome, ExtractError>
where
    F: FetchPage,
{
    let mut outcome = ExtractionOutcome::default();
    let mut results = stream::iter(table.rows.iter().enumerate())
        .map(|(idx, row)| async move { (idx, row, extractor.extract(row).await) })
        .buffered(concurrency.max(1));

    while let Some((idx, row, result)) = results.next().await {
        match result {
            Ok(doc) => {
                debug!(url_id = %row.url_id, "Extracted article");
                outcome.store.insert(row.url_id.clone(), doc);
                outcome.survivors.push(idx);
            }
            Err(e) if e.is_network() => {
                error!(url_id = %row.url_id, url = %row.url, error = %e, "Network error");
                if policy == NetworkErrorPolicy::Abort {
                    return Err(e);
                }
                outcome.excluded.push(exclusion(
                    &row.url_id,
                    &row.url,
                    Stage::Extract,
                    e.kind(),
                    e.to_string(),
                ));
            }
            Err(e @ ExtractError::Persist { .. }) => {
                error!(url_id = %row.url_id, error = %e, "Cannot save article text");
                return Err(e);
            }
            Err(e) => {
                warn!(url_id = %row.url_id, url = %row.url, error = %e, "Skipping row");
                outcome.excluded.push(exclusion(
                    &row.url_id,
                    &row.url,
                    Stage::Extract,
                    e.kind(),
                    e.to_string(),
                ));
            }
        }
    }

    info!(
        extracted = outcome.survivors.len(),
        excluded = outcome.excluded.len(),
        "Extraction finished"
    );
    Ok(outcome)
}

/// Score the document of every surviving row, in input order.
///
/// Rows whose document is degenerate are appended to `outcome.excluded`.
///
/// # Arguments
///
/// * `table` - The input table `outcome` was produced from
/// * `outcome` - Extraction result; gains analysis-stage exclusions
/// * `analyzer` - Metric calculator
///
/// # Returns
///
/// A [`ResultTable`] with one row per analyzed input row. Rows sharing a
/// `URL_ID` are all kept and all scored against the stored document.
///
/// # Examples
///
/// ```ignore
/// let mut outcome = extract_all(&extractor, &table, 4, NetworkErrorPolicy::Skip).await?;
/// let results = analyze_all(&table, &mut outcome, &Analyzer::default());
/// table::write_output(Path::new("output.csv"), &results)?;
/// ```
#[instrument(level = "info", skip_all, fields(survivors = outcome.survivors.len()))]
pub fn analyze_all<S>(
    table: &InputTable,
    outcome: &mut ExtractionOutcome,
    analyzer: &Analyzer<S>,
) -> ResultTable
where
    S: SentimentModel,
{
    let mut results = ResultTable::new(&table.headers);

    for &idx in &outcome.survivors {
        let row = &table.rows[idx];
        let Some(doc) = outcome.store.get(&row.url_id) else {
            continue;
        };
        match analyzer.analyze(&doc.to_text()) {
            Ok(metrics) => {
                debug!(url_id = %row.url_id, word_count = metrics.word_count, "Analyzed article");
                results.push(AnalyzedRow {
                    row: row.clone(),
                    title: doc.title.clone(),
                    metrics,
                });
            }
            Err(e) => {
                warn!(url_id = %row.url_id, error = %e, "Skipping row");
                outcome.excluded.push(exclusion(
                    &row.url_id,
                    &row.url,
                    Stage::Analyze,
                    "degenerate_document",
                    e.to_string(),
                ));
            }
        }
    }

    info!(analyzed = results.len(), "Analysis finished");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::sentiment::LexiconSentiment;
    use crate::error::FetchError;
    use crate::extractor::ContentSelectors;
    use crate::models::InputRow;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use url::Url;

    const GOOD: &str = "<html><head><title>Cats</title></head><body>\
        <div class=\"article-content\"><p>I love cats.</p><p>Cats are wonderful animals that purr.</p></div>\
        </body></html>";
    const ARTICLE_TAG: &str = "<html><head><title>Dogs</title></head><body>\
        <article><p>Dogs bark. We walk them daily.</p></article></body></html>";
    const NO_CONTENT: &str =
        "<html><head><title>Index</title></head><body><div><p>Menu</p></div></body></html>";
    const EMPTY: &str = "<html><head><title></title></head><body><article></article></body></html>";

    /// Serves canned pages; anything else is a 503.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, &'static str>,
    }

    impl FakeFetcher {
        fn with(mut self, url: &str, html: &'static str) -> Self {
            self.pages.insert(url.to_string(), html);
            self
        }
    }

    impl FetchPage for FakeFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            tokio::task::yield_now().await;
            self.pages
                .get(url.as_str())
                .map(|html| html.to_string())
                .ok_or(FetchError::Status { status: 503 })
        }
    }

    fn table(rows: &[(&str, &str)]) -> InputTable {
        InputTable {
            headers: vec!["URL_ID".to_string(), "URL".to_string()],
            rows: rows
                .iter()
                .map(|(id, url)| InputRow {
                    url_id: id.to_string(),
                    url: url.to_string(),
                    cells: vec![id.to_string(), url.to_string()],
                })
                .collect(),
        }
    }

    fn selectors() -> ContentSelectors {
        ContentSelectors::new(
            "title",
            &["div.article-content".to_string(), "article".to_string()],
            "p",
        )
        .unwrap()
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher::default()
            .with("https://a.test/1", GOOD)
            .with("https://a.test/2", NO_CONTENT)
            .with("https://a.test/4", ARTICLE_TAG)
    }

    fn mixed_table() -> InputTable {
        table(&[
            ("1", "https://a.test/1"),
            ("2", "https://a.test/2"),
            ("3", "https://a.test/3"),
            ("4", "https://a.test/4"),
        ])
    }

    fn ids(results: &ResultTable) -> Vec<&str> {
        results.rows().iter().map(|r| r.row.url_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_skip_policy_drops_failed_rows() {
        let extractor = Extractor::new(fetcher(), selectors(), None);
        let table = mixed_table();

        let mut outcome = extract_all(&extractor, &table, 1, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.survivors, vec![0, 3]);
        assert_eq!(outcome.store.len(), 2);

        let kinds: Vec<(&str, &str)> = outcome
            .excluded
            .iter()
            .map(|e| (e.url_id.as_str(), e.kind))
            .collect();
        assert_eq!(kinds, vec![("2", "content_not_found"), ("3", "network")]);

        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());
        assert_eq!(ids(&results), vec!["1", "4"]);
        assert_eq!(outcome.excluded.len(), 2);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_on_network_error() {
        let extractor = Extractor::new(fetcher(), selectors(), None);
        let err = extract_all(&extractor, &mixed_table(), 1, NetworkErrorPolicy::Abort)
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("https://a.test/3"));
    }

    #[tokio::test]
    async fn test_concurrent_extraction_keeps_input_order() {
        let extractor = Extractor::new(fetcher(), selectors(), None);
        let table = mixed_table();
        let mut outcome = extract_all(&extractor, &table, 4, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.survivors, vec![0, 3]);
        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());
        assert_eq!(ids(&results), vec!["1", "4"]);
    }

    #[tokio::test]
    async fn test_output_ids_are_rows_with_content() {
        let fetcher = FakeFetcher::default()
            .with("https://a.test/1", GOOD)
            .with("https://a.test/2", NO_CONTENT)
            .with("https://a.test/3", ARTICLE_TAG)
            .with("https://a.test/4", NO_CONTENT);
        let extractor = Extractor::new(fetcher, selectors(), None);
        let table = table(&[
            ("1", "https://a.test/1"),
            ("2", "https://a.test/2"),
            ("3", "https://a.test/3"),
            ("4", "https://a.test/4"),
        ]);

        let mut outcome = extract_all(&extractor, &table, 2, NetworkErrorPolicy::Abort)
            .await
            .unwrap();
        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());

        let not_found: Vec<&str> = outcome
            .excluded
            .iter()
            .filter(|e| e.kind == "content_not_found")
            .map(|e| e.url_id.as_str())
            .collect();
        assert_eq!(not_found, vec!["2", "4"]);
        assert_eq!(ids(&results), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_degenerate_document_is_excluded_at_analysis() {
        let fetcher = FakeFetcher::default()
            .with("https://a.test/1", EMPTY)
            .with("https://a.test/2", GOOD);
        let extractor = Extractor::new(fetcher, selectors(), None);
        let table = table(&[("1", "https://a.test/1"), ("2", "https://a.test/2")]);

        let mut outcome = extract_all(&extractor, &table, 1, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.survivors, vec![0, 1]);

        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());
        assert_eq!(ids(&results), vec!["2"]);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.excluded[0].stage, Stage::Analyze);
        assert_eq!(outcome.excluded[0].url_id, "1");
    }

    #[tokio::test]
    async fn test_metrics_come_from_saved_text_layout() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(fetcher(), selectors(), Some(dir.path().to_path_buf()));
        let table = table(&[("1", "https://a.test/1")]);

        let mut outcome = extract_all(&extractor, &table, 1, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());

        let saved = std::fs::read_to_string(dir.path().join("1.txt")).unwrap();
        assert_eq!(saved, "Cats\n\nI love cats. Cats are wonderful animals that purr.");

        let expected = Analyzer::<LexiconSentiment>::default().analyze(&saved).unwrap();
        assert_eq!(results.rows()[0].metrics, expected);
        // The "Cats" title adds one token and runs into the first sentence.
        assert_eq!(expected.word_count, 12);
        assert_eq!(expected.avg_sentence_length, 6.0);
    }

    fn titles(results: &ResultTable) -> Vec<&str> {
        results.rows().iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_duplicate_id_uses_later_document() {
        let extractor = Extractor::new(fetcher(), selectors(), None);
        let table = table(&[("7", "https://a.test/1"), ("7", "https://a.test/4")]);

        let mut outcome = extract_all(&extractor, &table, 2, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.survivors, vec![0, 1]);
        assert_eq!(outcome.store.len(), 1);
        assert_eq!(outcome.store.get("7").unwrap().title, "Dogs");

        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());
        assert_eq!(ids(&results), vec!["7", "7"]);
        assert_eq!(titles(&results), vec!["Dogs", "Dogs"]);
        assert_eq!(results.rows()[0].row.url, "https://a.test/1");
        assert_eq!(results.rows()[1].row.url, "https://a.test/4");
        assert_eq!(results.rows()[0].metrics, results.rows()[1].metrics);
    }

    #[tokio::test]
    async fn test_failed_duplicate_keeps_earlier_document() {
        let extractor = Extractor::new(fetcher(), selectors(), None);
        let table = table(&[
            ("7", "https://a.test/1"),
            ("7", "https://a.test/3"),
            ("7", "https://a.test/2"),
        ]);

        let mut outcome = extract_all(&extractor, &table, 1, NetworkErrorPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome.survivors, vec![0]);
        assert_eq!(outcome.excluded.len(), 2);

        let results = analyze_all(&table, &mut outcome, &Analyzer::<LexiconSentiment>::default());
        assert_eq!(ids(&results), vec!["7"]);
        assert_eq!(titles(&results), vec!["Cats"]);
        assert_eq!(results.rows()[0].row.url, "https://a.test/1");
    }

    /// Collects the fields recorded when the `extract_all` span opens.
    #[derive(Clone, Default)]
    struct SpanFields(Arc<Mutex<Vec<(String, String)>>>);

    impl Visit for SpanFields {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0
                .lock()
                .unwrap()
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for SpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            if attrs.metadata().name() == "extract_all" {
                attrs.record(&mut self.clone());
            }
        }
    }

    #[tokio::test]
    async fn test_extract_span_records_concurrency() {
        let fields = SpanFields::default();
        let subscriber = tracing_subscriber::registry().with(fields.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let extractor = Extractor::new(fetcher(), selectors(), None);
        let table = table(&[("1", "https://a.test/1")]);
        extract_all(&extractor, &table, 3, NetworkErrorPolicy::Skip)
            .await
            .unwrap();

        let recorded = fields.0.lock().unwrap();
        assert!(recorded.contains(&("concurrency".to_string(), "3".to_string())));
        assert!(recorded.contains(&("rows".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_persist_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let extractor = Extractor::new(fetcher(), selectors(), Some(missing));
        let table = table(&[("1", "https://a.test/1")]);

        let err = extract_all(&extractor, &table, 1, NetworkErrorPolicy::Skip)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Persist { .. }));
    }
}
