//! The consolidated digest request.
//!
//! One call covers all four facets. An earlier design issued four sequential
//! calls (title, abstract, keywords, categories) with fixed pauses between
//! them to dodge rate limits; folding the sub-tasks into one instruction
//! removes the pauses and three quarters of the quota cost.

use crate::traits::LlmClient;
use gist_common::Result;

/// Instruction prompt sent alongside the page text. Kept as a named constant
/// so prompt iteration never touches the call site.
pub const DIGEST_INSTRUCTIONS: &str = "\
You will be provided with the visible text of a web page. \
First, provide the Title for the content received. \
Second, succinctly summarize the content received as an abstract. \
Third, extract a list of the top 5 keywords from it, as a comma-separated list. \
Fourth, list 3 Melvil Decimal System ids to tag the content received with, \
as a comma-separated list; just list the ID and Topic.";

/// Ask the model for the title/abstract/keywords/categories digest of `text`.
///
/// The answer comes back verbatim: formatting of the four facets is left to
/// the model, and no structured parsing happens downstream.
pub async fn summarize(client: &dyn LlmClient, text: &str) -> Result<String> {
    let response = client
        .generate(text, Some(DIGEST_INSTRUCTIONS), None, None)
        .await?;

    tracing::debug!(
        model = ?response.model,
        tokens_used = ?response.tokens_used,
        answer_len = response.text.len(),
        "digest.answer"
    );

    Ok(response.text)
}
