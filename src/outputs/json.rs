//! JSON run report.
//!
//! # Output Structure
//!
//! ```text
//! {
//!   "generated_at": "2025-05-06T20:30:00+00:00",
//!   "input": "input.csv",
//!   "total_rows": 3,
//!   "analyzed": 2,
//!   "articles": [ { "url_id", "url", "title", "metrics": { "POSITIVE SCORE": ... } } ],
//!   "excluded": [ { "url_id", "url", "stage", "kind", "reason" } ]
//! }
//! ```

use crate::models::{Exclusion, MetricSet, ResultTable};
use chrono::Local;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
pub struct ArticleReport<'a> {
    pub url_id: &'a str,
    pub url: &'a str,
    pub title: &'a str,
    pub metrics: &'a MetricSet,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: String,
    pub input: String,
    pub total_rows: usize,
    pub analyzed: usize,
    pub articles: Vec<ArticleReport<'a>>,
    pub excluded: &'a [Exclusion],
}

impl<'a> RunReport<'a> {
    pub fn new(
        input: &Path,
        total_rows: usize,
        table: &'a ResultTable,
        excluded: &'a [Exclusion],
    ) -> Self {
        let articles = table
            .rows()
            .iter()
            .map(|row| ArticleReport {
                url_id: &row.row.url_id,
                url: &row.row.url,
                title: row.title.trim(),
                metrics: &row.metrics,
            })
            .collect();
        Self {
            generated_at: Local::now().to_rfc3339(),
            input: input.display().to_string(),
            total_rows,
            analyzed: table.len(),
            articles,
            excluded,
        }
    }
}

/// Serialize `report` as pretty JSON to `path`. Failures are returned to the
/// caller unlogged.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_report(report: &RunReport<'_>, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).await?;
    info!(articles = report.analyzed, excluded = report.excluded.len(), "Wrote JSON report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzedRow, InputRow, Stage};

    fn table() -> ResultTable {
        let mut table = ResultTable::new(&["URL_ID".to_string(), "URL".to_string()]);
        table.push(AnalyzedRow {
            row: InputRow {
                url_id: "1".to_string(),
                url: "https://example.com/1".to_string(),
                cells: vec!["1".to_string(), "https://example.com/1".to_string()],
            },
            title: "  Headline \n".to_string(),
            metrics: MetricSet {
                positive_score: 0.5,
                negative_score: 0.6,
                polarity_score: 0.5,
                subjectivity_score: 0.6,
                avg_sentence_length: 5.5,
                percentage_of_complex_words: 0.18,
                fog_index: 2.272,
                avg_number_of_words_per_sentence: 5.5,
                complex_word_count: 2,
                word_count: 11,
                syllable_per_word: 1.18,
                personal_pronouns: 1,
                avg_word_length: 3.8,
            },
        });
        table
    }

    #[tokio::test]
    async fn test_report_round_trip() {
        let table = table();
        let excluded = vec![Exclusion {
            url_id: "2".to_string(),
            url: "https://example.com/2".to_string(),
            stage: Stage::Extract,
            kind: "content_not_found",
            reason: "could not find article content on https://example.com/2".to_string(),
        }];
        let report = RunReport::new(Path::new("input.csv"), 2, &table, &excluded);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&report, &path).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_rows"], 2);
        assert_eq!(value["analyzed"], 1);
        assert_eq!(value["articles"][0]["title"], "Headline");
        assert_eq!(value["articles"][0]["metrics"]["WORD COUNT"], 11);
        assert_eq!(value["excluded"][0]["stage"], "extract");
        assert_eq!(value["excluded"][0]["kind"], "content_not_found");
    }

    #[tokio::test]
    async fn test_write_failure_is_returned() {
        let table = table();
        let report = RunReport::new(Path::new("input.csv"), 1, &table, &[]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(write_report(&report, &path).await.is_err());
        assert!(!path.exists());
    }
}
