//! `pagegist` — fetch a web page, reduce it to visible text, and print the
//! model-generated digest (title, abstract, keywords, Melvil categories).

use anyhow::Result;
use clap::Parser;
use gist_common::observability::{init_logging, LogConfig};
use gist_extract::fetch_visible_text;
use gist_llm::digest::summarize;
use gist_llm::openai::OpenAiClient;
use gist_llm::DEFAULT_OPENAI_MODEL;

const DEFAULT_URL: &str = "https://www.yahoo.com";

#[derive(Debug, Parser)]
#[command(name = "pagegist", about = "Summarize and categorize a web page")]
struct Cli {
    /// URL to parse
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// OpenAI API key
    #[arg(long)]
    key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Argument errors exit here, before any network I/O.
    let cli = Cli::parse();

    init_logging(LogConfig::default())?;
    tracing::info!(url = %cli.url, "pagegist.start");

    let text = fetch_visible_text(&cli.url).await?;

    let client = OpenAiClient::new(cli.key, DEFAULT_OPENAI_MODEL.to_string())?;
    let digest = summarize(&client, &text).await?;

    tracing::info!("pagegist.done");
    println!("{digest}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_usage_error() {
        let err = Cli::try_parse_from(["pagegist"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn url_defaults_to_the_fixed_homepage() {
        let cli = Cli::try_parse_from(["pagegist", "--key", "sk-test"]).unwrap();
        assert_eq!(cli.url, DEFAULT_URL);
        assert_eq!(cli.key, "sk-test");
    }

    #[test]
    fn url_override_is_honored() {
        let cli =
            Cli::try_parse_from(["pagegist", "--key", "sk-test", "--url", "https://example.org"])
                .unwrap();
        assert_eq!(cli.url, "https://example.org");
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["pagegist", "--key", "k", "--format", "json"]).is_err());
    }
}
