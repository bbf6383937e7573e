mod common;

use gist_common::Result;
use gist_llm::openai::OpenAiClient;
use gist_llm::traits::LlmClient;

const MODEL: &str = "gpt-4o-mini";

fn make_client_or_skip() -> OpenAiClient {
    let key = std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        tracing::debug!("Skipping: OPENAI API KEY not set");

        panic!("SKIP");
    });

    OpenAiClient::new(key, MODEL.to_string()).expect("should work")
}

#[tokio::test]
#[ignore]
async fn openai_generate_smoketest() -> Result<()> {
    common::init_test_tracing();
    let client = make_client_or_skip();

    let response = client.generate("Say Ok", None, Some(8), Some(0.2)).await?;

    tracing::debug!("OpenAi response is: {}", response.text);

    assert!(
        !response.text.trim().is_empty(),
        "response text should not be empty"
    );
    Ok(())
}
