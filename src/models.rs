//! Data models for input rows, scraped articles, and computed metrics.
//!
//! - [`InputTable`] / [`InputRow`]: the requested articles, in input order
//! - [`ArticleDocument`]: title and body scraped from one page
//! - [`MetricSet`]: the thirteen readability and sentiment measurements
//! - [`ResultTable`]: the accumulator that becomes the output table
//! - [`Exclusion`]: a row that was dropped and why

use serde::{Deserialize, Serialize};

/// Output column names for the metrics, in output order.
pub const METRIC_COLUMNS: [&str; 13] = [
    "POSITIVE SCORE",
    "NEGATIVE SCORE",
    "POLARITY SCORE",
    "SUBJECTIVITY SCORE",
    "AVG SENTENCE LENGTH",
    "PERCENTAGE OF COMPLEX WORDS",
    "FOG INDEX",
    "AVG NUMBER OF WORDS PER SENTENCE",
    "COMPLEX WORD COUNT",
    "WORD COUNT",
    "SYLLABLE PER WORD",
    "PERSONAL PRONOUNS",
    "AVG WORD LENGTH",
];

/// One requested article.
///
/// `cells` holds every column of the input record (including `URL_ID` and
/// `URL`) so the output table can reproduce the input verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub url_id: String,
    pub url: String,
    pub cells: Vec<String>,
}

/// The parsed input table.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<InputRow>,
}

/// Title and body text scraped from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub title: String,
    pub body: String,
}

impl ArticleDocument {
    /// The persisted and analyzed form: title, a blank line, then the body.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// Readability and sentiment measurements for one document.
///
/// `positive_score` mirrors `polarity_score` and `negative_score` mirrors
/// `subjectivity_score`. Both pairs are sourced from the same sentiment model
/// outputs rather than from separate positive/negative word counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    #[serde(rename = "POSITIVE SCORE")]
    pub positive_score: f64,
    #[serde(rename = "NEGATIVE SCORE")]
    pub negative_score: f64,
    #[serde(rename = "POLARITY SCORE")]
    pub polarity_score: f64,
    #[serde(rename = "SUBJECTIVITY SCORE")]
    pub subjectivity_score: f64,
    #[serde(rename = "AVG SENTENCE LENGTH")]
    pub avg_sentence_length: f64,
    #[serde(rename = "PERCENTAGE OF COMPLEX WORDS")]
    pub percentage_of_complex_words: f64,
    #[serde(rename = "FOG INDEX")]
    pub fog_index: f64,
    #[serde(rename = "AVG NUMBER OF WORDS PER SENTENCE")]
    pub avg_number_of_words_per_sentence: f64,
    #[serde(rename = "COMPLEX WORD COUNT")]
    pub complex_word_count: usize,
    #[serde(rename = "WORD COUNT")]
    pub word_count: usize,
    #[serde(rename = "SYLLABLE PER WORD")]
    pub syllable_per_word: f64,
    #[serde(rename = "PERSONAL PRONOUNS")]
    pub personal_pronouns: usize,
    #[serde(rename = "AVG WORD LENGTH")]
    pub avg_word_length: f64,
}

impl MetricSet {
    /// Cell values in [`METRIC_COLUMNS`] order.
    pub fn to_cells(&self) -> [String; 13] {
        [
            self.positive_score.to_string(),
            self.negative_score.to_string(),
            self.polarity_score.to_string(),
            self.subjectivity_score.to_string(),
            self.avg_sentence_length.to_string(),
            self.percentage_of_complex_words.to_string(),
            self.fog_index.to_string(),
            self.avg_number_of_words_per_sentence.to_string(),
            self.complex_word_count.to_string(),
            self.word_count.to_string(),
            self.syllable_per_word.to_string(),
            self.personal_pronouns.to_string(),
            self.avg_word_length.to_string(),
        ]
    }
}

/// Where an output cell comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Input(usize),
    Metric(usize),
}

/// A row that survived extraction and analysis.
#[derive(Debug, Clone)]
pub struct AnalyzedRow {
    pub row: InputRow,
    pub title: String,
    pub metrics: MetricSet,
}

/// Accumulates analyzed rows in input order.
///
/// Output headers are the input headers followed by any metric columns the
/// input did not already carry. An input column that shares a metric name is
/// filled with the computed value.
#[derive(Debug, Clone)]
pub struct ResultTable {
    headers: Vec<String>,
    columns: Vec<Column>,
    rows: Vec<AnalyzedRow>,
}

impl ResultTable {
    pub fn new(input_headers: &[String]) -> Self {
        let mut headers = Vec::with_capacity(input_headers.len() + METRIC_COLUMNS.len());
        let mut columns = Vec::with_capacity(headers.capacity());

        for (idx, header) in input_headers.iter().enumerate() {
            headers.push(header.clone());
            match METRIC_COLUMNS.iter().position(|m| m == header) {
                Some(metric) => columns.push(Column::Metric(metric)),
                None => columns.push(Column::Input(idx)),
            }
        }
        for (metric, name) in METRIC_COLUMNS.iter().enumerate() {
            if !input_headers.iter().any(|h| h == name) {
                headers.push((*name).to_string());
                columns.push(Column::Metric(metric));
            }
        }

        Self {
            headers,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: AnalyzedRow) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[AnalyzedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output cells for one analyzed row, aligned with [`headers`](Self::headers).
    pub fn record(&self, analyzed: &AnalyzedRow) -> Vec<String> {
        let metrics = analyzed.metrics.to_cells();
        self.columns
            .iter()
            .map(|column| match *column {
                Column::Input(idx) => analyzed.row.cells.get(idx).cloned().unwrap_or_default(),
                Column::Metric(idx) => metrics[idx].clone(),
            })
            .collect()
    }
}

/// The pipeline stage that dropped a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Analyze,
}

/// A row removed from the active set.
#[derive(Debug, Clone, Serialize)]
pub struct Exclusion {
    pub url_id: String,
    pub url: String,
    pub stage: Stage,
    pub kind: &'static str,
    pub reason: String,
}
