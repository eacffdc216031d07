//! Article extraction: download a page, pull out its title and body text,
//! and optionally keep a copy on disk.
//!
//! # Content Location
//!
//! The main content container is located by trying each configured selector
//! in order (by default `div.article-content`, then `article`). The body is
//! the text of every `<p>` inside that container joined with single spaces.
//! A page with no matching container is rejected with
//! [`ExtractError::ContentNotFound`] and nothing is written.

use crate::error::{ConfigError, ExtractError};
use crate::fetch::FetchPage;
use crate::models::{ArticleDocument, InputRow};
use crate::utils::truncate_for_log;
use scraper::{ElementRef, Html, Selector};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Compiled selectors used to pick apart a page.
#[derive(Debug, Clone)]
pub struct ContentSelectors {
    title: Selector,
    containers: Vec<Selector>,
    paragraph: Selector,
}

impl ContentSelectors {
    pub fn new(
        title: &str,
        containers: &[String],
        paragraph: &str,
    ) -> Result<Self, ConfigError> {
        if containers.is_empty() {
            return Err(ConfigError::InvalidValue(
                "content_selectors must list at least one selector".to_string(),
            ));
        }
        Ok(Self {
            title: compile(title)?,
            containers: containers
                .iter()
                .map(|s| compile(s))
                .collect::<Result<Vec<_>, _>>()?,
            paragraph: compile(paragraph)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated text of every descendant text node, untrimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parse a fetched page into an [`ArticleDocument`].
///
/// `url` is only used to label errors.
pub fn parse_article(
    url: &str,
    html: &str,
    selectors: &ContentSelectors,
) -> Result<ArticleDocument, ExtractError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(element_text)
        .ok_or_else(|| ExtractError::MissingTitle {
            url: url.to_string(),
        })?;

    let container = selectors
        .containers
        .iter()
        .find_map(|selector| document.select(selector).next())
        .ok_or_else(|| ExtractError::ContentNotFound {
            url: url.to_string(),
        })?;

    let body = container
        .select(&selectors.paragraph)
        .map(element_text)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(ArticleDocument { title, body })
}

/// Path of the text file written for `url_id`.
pub fn text_path(dir: &Path, url_id: &str) -> PathBuf {
    dir.join(format!("{url_id}.txt"))
}

/// Fetches and parses one article per call.
#[derive(Debug)]
pub struct Extractor<F> {
    fetcher: F,
    selectors: ContentSelectors,
    text_dir: Option<PathBuf>,
}

impl<F> Extractor<F>
where
    F: FetchPage,
{
    /// `text_dir = None` keeps documents in memory only.
    pub fn new(fetcher: F, selectors: ContentSelectors, text_dir: Option<PathBuf>) -> Self {
        Self {
            fetcher,
            selectors,
            text_dir,
        }
    }

    /// Fetch `row.url`, parse it, and persist `{title}\n\n{body}` as
    /// `<url_id>.txt` when a text directory is configured.
    ///
    /// # Arguments
    ///
    /// * `row` - Input row supplying the URL and the `URL_ID` used for the file name
    ///
    /// # Returns
    ///
    /// The extracted [`ArticleDocument`]. Nothing is written unless extraction
    /// succeeds, so an existing file for the same id is left untouched on failure.
    ///
    /// # Errors
    ///
    /// * [`ExtractError::InvalidUrl`] / [`ExtractError::Network`] - the page could not be fetched
    /// * [`ExtractError::MissingTitle`] / [`ExtractError::ContentNotFound`] - the page lacks the expected elements
    /// * [`ExtractError::Persist`] - the text file could not be written
    #[instrument(level = "info", skip_all, fields(url_id = %row.url_id, url = %row.url))]
    pub async fn extract(&self, row: &InputRow) -> Result<ArticleDocument, ExtractError> {
        let url = Url::parse(&row.url).map_err(|source| ExtractError::InvalidUrl {
            url: row.url.clone(),
            source,
        })?;

        let html = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| ExtractError::Network {
                url: row.url.clone(),
                source,
            })?;

        let document = parse_article(&row.url, &html, &self.selectors)?;
        debug!(
            title = %truncate_for_log(document.title.trim(), 80),
            body_bytes = document.body.len(),
            "Parsed article"
        );

        if let Some(dir) = &self.text_dir {
            let path = text_path(dir, &row.url_id);
            fs::write(&path, document.to_text())
                .await
                .map_err(|source| ExtractError::Persist {
                    path: path.clone(),
                    source,
                })?;
            info!(path = %path.display(), "Saved article text");
        }

        Ok(document)
    }
}
