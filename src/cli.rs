//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable. Values
//! given here override the YAML config file passed with `--config`.

use crate::config::NetworkErrorPolicy;
use clap::Parser;
use std::path::PathBuf;

/// Scrape each article in the input table, save its text, and score it.
///
/// # Examples
///
/// ```sh
/// # Sequential run, text files in ./articles
/// article_readability -i input.csv -o output.csv -t ./articles
///
/// # Four fetch workers, abort on the first network error
/// article_readability -i input.csv --concurrency 4 --on-network-error abort
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Input CSV with `URL_ID` and `URL` columns
    #[arg(short, long, env = "ARTICLE_INPUT")]
    pub input: PathBuf,

    /// Output CSV path
    #[arg(short, long, env = "ARTICLE_OUTPUT", default_value = "output.csv")]
    pub output: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "ARTICLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the `<URL_ID>.txt` article files
    #[arg(short, long, env = "ARTICLE_TEXT_DIR")]
    pub text_dir: Option<PathBuf>,

    /// Keep article text in memory only
    #[arg(long, conflicts_with = "text_dir")]
    pub no_text_files: bool,

    /// Also write a JSON run report to this path
    #[arg(long, env = "ARTICLE_JSON_REPORT")]
    pub json_report: Option<PathBuf>,

    /// Number of pages fetched concurrently
    #[arg(long, env = "ARTICLE_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Retries per page after a network failure
    #[arg(long, env = "ARTICLE_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// What to do when a page cannot be fetched
    #[arg(long, value_enum, env = "ARTICLE_ON_NETWORK_ERROR")]
    pub on_network_error: Option<NetworkErrorPolicy>,

    /// User-Agent header sent with every request
    #[arg(long, env = "ARTICLE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "ARTICLE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "article_readability",
            "--input",
            "./input.csv",
            "--output",
            "./out.csv",
        ]);

        assert_eq!(cli.input, PathBuf::from("./input.csv"));
        assert_eq!(cli.output, PathBuf::from("./out.csv"));
        assert!(cli.config.is_none());
        assert!(!cli.no_text_files);
    }

    #[test]
    fn test_cli_short_flags_and_policy() {
        let cli = Cli::parse_from([
            "article_readability",
            "-i",
            "/tmp/in.csv",
            "-t",
            "/tmp/articles",
            "--concurrency",
            "4",
            "--on-network-error",
            "abort",
        ]);

        assert_eq!(cli.input, PathBuf::from("/tmp/in.csv"));
        assert_eq!(cli.text_dir, Some(PathBuf::from("/tmp/articles")));
        assert_eq!(cli.concurrency, Some(4));
        assert_eq!(cli.on_network_error, Some(NetworkErrorPolicy::Abort));
    }

    #[test]
    fn test_no_text_files_conflicts_with_text_dir() {
        let res = Cli::try_parse_from([
            "article_readability",
            "-i",
            "in.csv",
            "-t",
            "articles",
            "--no-text-files",
        ]);
        assert!(res.is_err());
    }
}
