//! HTTP client for the remote rendering function.
//!
//! One endpoint serves two operations: rendering a chunk of source
//! pages to PDF, and merging previously rendered artifacts. Render
//! responses come in two shapes; small documents are returned inline
//! as base64, larger ones are written to the artifact store by the
//! function itself and referenced by pointer.

use crate::config::RenderFunctionConfig;
use crate::error::{CardpressError, Result};
use crate::pipeline::traits::RenderBackend;
use crate::types::{ArtifactPointer, MergeOutcome, MergeRequest, RenderRequest, RenderResult};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client as HttpClient;
use serde::Deserialize;

pub struct RenderFunctionClient {
    config: RenderFunctionConfig,
    http_client: HttpClient,
}

/// Success body of a render invocation, before shape validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderResponseBody {
    /// Inline shape: base64-encoded document
    data: Option<String>,
    /// Pointer shape
    pointer_store: Option<String>,
    pointer_key: Option<String>,
    size: Option<u64>,
}

/// Error body the function returns on failure; fields are surfaced verbatim
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderErrorBody {
    message: Option<String>,
    error: Option<String>,
    error_name: Option<String>,
    error_stack: Option<String>,
}

impl RenderErrorBody {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.error_name {
            parts.push(name.clone());
        }
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        if let Some(error) = &self.error {
            parts.push(error.clone());
        }
        if let Some(stack) = &self.error_stack {
            parts.push(stack.clone());
        }
        if parts.is_empty() {
            "unknown render function error".to_string()
        } else {
            parts.join(": ")
        }
    }
}

impl RenderFunctionClient {
    pub fn new(config: RenderFunctionConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// POST a JSON body to the function and return the raw response text
    async fn invoke<B: serde::Serialize>(&self, body: &B) -> Result<String> {
        let response = self
            .http_client
            .post(&self.config.base_url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if !status.is_success() {
            let detail = serde_json::from_str::<RenderErrorBody>(&text)
                .map(|e| e.describe())
                .unwrap_or(text);

            // A definitive rejection of the request body will not pass
            // on retry; throttling and server-side failures will.
            if status == reqwest::StatusCode::BAD_REQUEST
                || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            {
                return Err(CardpressError::BadInput(format!(
                    "render function returned {} - {}",
                    status, detail
                )));
            }

            return Err(CardpressError::ServiceUnavailable(format!(
                "render function returned {} - {}",
                status, detail
            )));
        }

        Ok(text)
    }
}

/// Convert a success body into the tagged result, enforcing that
/// exactly one of the two shapes is present
fn parse_render_body(text: &str) -> Result<RenderResult> {
    let body: RenderResponseBody = serde_json::from_str(text)?;

    match (body.data, body.pointer_key) {
        (Some(encoded), None) => {
            let bytes = general_purpose::STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                CardpressError::ServiceUnavailable(format!(
                    "render function returned undecodable inline payload: {}",
                    e
                ))
            })?;
            Ok(RenderResult::Inline(bytes))
        }
        (None, Some(key)) => {
            let store = body.pointer_store.ok_or_else(|| {
                CardpressError::ServiceUnavailable(
                    "render function pointer response missing store".to_string(),
                )
            })?;
            Ok(RenderResult::Pointer(ArtifactPointer {
                store,
                key,
                size: body.size.unwrap_or(0),
            }))
        }
        _ => Err(CardpressError::ServiceUnavailable(
            "render function response is neither inline nor pointer shaped".to_string(),
        )),
    }
}

#[async_trait]
impl RenderBackend for RenderFunctionClient {
    async fn render_chunk(&self, request: &RenderRequest) -> Result<RenderResult> {
        log::debug!("Invoking render function for {}", request.url);
        let text = self.invoke(request).await?;
        parse_render_body(&text)
    }

    async fn merge(&self, request: &MergeRequest) -> Result<MergeOutcome> {
        log::debug!("Invoking merge over {} artifacts", request.keys.len());
        let text = self.invoke(request).await?;
        let outcome: MergeOutcome = serde_json::from_str(&text)
            .map_err(|e| CardpressError::Merge(format!("malformed merge response: {}", e)))?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_response() {
        let payload = general_purpose::STANDARD.encode(b"%PDF-1.7 fake");
        let body = format!("{{\"data\":\"{}\"}}", payload);
        let result = parse_render_body(&body).unwrap();
        assert_eq!(result, RenderResult::Inline(b"%PDF-1.7 fake".to_vec()));
    }

    #[test]
    fn test_parse_pointer_response() {
        let body = r#"{"pointerStore":"artifacts","pointerKey":"temp_0_cards.pdf","size":52428800}"#;
        let result = parse_render_body(body).unwrap();
        let pointer = result.pointer().unwrap();
        assert_eq!(pointer.store, "artifacts");
        assert_eq!(pointer.key, "temp_0_cards.pdf");
        assert_eq!(pointer.size, 52428800);
    }

    #[test]
    fn test_ambiguous_response_is_rejected() {
        assert!(parse_render_body(r#"{}"#).is_err());
        assert!(parse_render_body(r#"{"data":"aGk=","pointerKey":"k"}"#).is_err());
    }

    #[test]
    fn test_pointer_without_store_is_rejected() {
        assert!(parse_render_body(r#"{"pointerKey":"k","size":10}"#).is_err());
    }

    #[test]
    fn test_error_body_fields_are_surfaced_verbatim() {
        let body: RenderErrorBody = serde_json::from_str(
            r#"{"message":"out of memory","errorName":"RangeError","errorStack":"at render()"}"#,
        )
        .unwrap();
        let described = body.describe();
        assert!(described.contains("RangeError"));
        assert!(described.contains("out of memory"));
        assert!(described.contains("at render()"));
    }
}
