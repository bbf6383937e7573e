//! Minimal HTTP helper with safe logging and flexible per-call headers.
//!
//! - [`HttpClient::post_json`]: JSON request/response with optional Bearer auth
//! - [`HttpClient::get_text`]: plain body fetch with caller-supplied headers
//! - Bearer tokens are sanitized before use and never logged
//! - Every request is attempted exactly once; transient upstream failures
//!   surface to the caller as errors
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status/duration, body snippets (truncated), and final errors.
//! Secret values only ever appear in logs as their kind (bearer/none).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNIPPET_MAX: usize = 500;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(120),
        })
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// POST a JSON body to `path` (joined onto the base URL) and decode the
    /// JSON response. `bearer` adds an `Authorization: Bearer` header after
    /// sanitization.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let mut rb = self
            .inner
            .request(Method::POST, url.clone())
            .timeout(self.default_timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body);

        let auth_kind = if let Some(tok) = bearer {
            rb = rb.bearer_auth(sanitize_api_key(tok)?);
            "bearer"
        } else {
            "none"
        };

        tracing::debug!(
            method = "POST",
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            timeout_ms = self.default_timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let request_id = upstream_request_id(&headers);
        let snippet = snip_body(&bytes);

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            x_request_id = %request_id,
            "http.response"
        );
        tracing::trace!(body_snippet = %snippet, "http.response.body_snippet");

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    serde_err = %e,
                    body_snippet = %snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            %status,
            message = %message,
            x_request_id = %request_id,
            body_snippet = %snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id,
        })
    }

    /// GET an absolute URL and return the response body as text. Used for
    /// page downloads where the target lives outside the base URL.
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<String, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;

        tracing::debug!(
            method = "GET",
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            timeout_ms = self.default_timeout.as_millis() as u64,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = self
            .inner
            .request(Method::GET, url)
            .timeout(self.default_timeout)
            .headers(headers)
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let body = resp
            .text()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        tracing::debug!(
            %status,
            duration_ms = t0.elapsed().as_millis() as u64,
            body_len = body.len(),
            "http.response"
        );

        if !status.is_success() {
            let request_id = upstream_request_id(&resp_headers);
            let message = extract_error_message(body.as_bytes());
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }

        Ok(body)
    }
}

fn upstream_request_id(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .or_else(|| headers.get("x-correlation-id"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

/// Pull a human-readable message out of common error envelopes.
fn extract_error_message(body: &[u8]) -> String {
    // OpenAI style: {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct OpenAiEnv {
        error: OpenAiDetail,
    }
    #[derive(Deserialize)]
    struct OpenAiDetail {
        message: String,
    }

    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<OpenAiEnv>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        // Walk back to a char boundary; a fixed byte cut panics on
        // multibyte text.
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    // Trim outer spaces/quotes, then drop all ASCII whitespace; keys pasted
    // from shells routinely pick up stray newlines.
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }

    // Validate header value upfront for clear errors.
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key(" \"sk-abc\n\" ").unwrap(), "sk-abc");
        assert_eq!(sanitize_api_key("sk-a b c").unwrap(), "sk-abc");
    }

    #[test]
    fn sanitize_rejects_non_ascii() {
        assert!(matches!(
            sanitize_api_key("sk-ключ"),
            Err(HttpError::Build(_))
        ));
    }

    #[test]
    fn error_message_prefers_openai_envelope() {
        let body = br#"{"error":{"message":"Incorrect API key provided"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn error_message_falls_back_to_generic_fields() {
        assert_eq!(
            extract_error_message(br#"{"detail":"not found"}"#),
            "not found"
        );
        assert_eq!(extract_error_message(b"plain text failure"), "plain text failure");
    }

    #[test]
    fn long_bodies_are_snipped() {
        let body = "x".repeat(2000);
        let snip = snip_body(body.as_bytes());
        assert!(snip.len() <= SNIPPET_MAX + 3);
        assert!(snip.ends_with("..."));
    }

    #[test]
    fn snipping_respects_char_boundaries() {
        // Multibyte char straddling the cut point must not panic the snip.
        let mut body = "x".repeat(SNIPPET_MAX - 1);
        body.push('€');
        body.push_str("tail");
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= SNIPPET_MAX + 3);
    }
}
