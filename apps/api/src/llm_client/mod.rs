//! LLM client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: no other module may call the generative-language API
//! directly. All recommendation fetches go through `RecommendationSource`,
//! implemented here by `GeminiClient` and by mocks in tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {message}")]
    Api { message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seam between the request controller and the network. `AppState` carries an
/// `Arc<dyn RecommendationSource>` so tests can substitute a mock.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Sends one prompt and returns the candidate list. An absent
    /// `candidates` field in an otherwise well-formed success body is an
    /// empty list, not an error.
    async fn generate(&self, prompt: &str) -> Result<Vec<Candidate>, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PromptPart<'a>>,
}

#[derive(Debug, Serialize)]
struct PromptPart<'a> {
    text: &'a str,
}

/// One recommendation entry as returned by the API. Carried through to the
/// session state verbatim; nested fields are optional because the remote
/// shape is untrusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl Candidate {
    /// Text of the first part, if the candidate carries one.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

/// Response envelope. A body may carry `candidates`, an `error` descriptor,
/// or neither (an empty candidate list). Unknown sibling fields (usage
/// metadata etc.) are ignored.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the generative-language `generateContent` endpoint. The API
/// key is injected at construction and sent as a query parameter.
///
/// No retry and no request timeout: a failed call resolves to an error
/// exactly once, and an unresponsive endpoint stalls only its own fetch.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl RecommendationSource for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<Candidate>, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![PromptPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The API reports failures in the body (`error.message`) regardless
        // of status, so decode first and let the envelope decide. A body
        // fitting neither shape fails closed as a decode error.
        let decoded: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(err) = decoded.error {
            return Err(LlmError::Api {
                message: err.message,
            });
        }

        let candidates = decoded.candidates.unwrap_or_default();
        debug!(
            "generateContent succeeded: status={}, candidates={}",
            status,
            candidates.len()
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_decodes_candidates() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "1. Dune"}]}},
                {"content": {"parts": [{"text": "2. Hyperion"}]}}
            ]
        }"#;
        let decoded: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let candidates = decoded.candidates.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text(), Some("1. Dune"));
    }

    #[test]
    fn test_absent_candidates_field_is_empty_list() {
        let decoded: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.error.is_none());
        assert!(decoded.candidates.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_error_envelope_decodes_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let decoded: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(decoded.error.unwrap().message, "API key not valid");
    }

    #[test]
    fn test_non_object_body_fails_closed() {
        let result: Result<GenerateContentResponse, _> = serde_json::from_str("\"oops\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_candidate_without_text_part_reads_none() {
        let candidate: Candidate =
            serde_json::from_str(r#"{"content": {"parts": [{"functionCall": {}}]}}"#).unwrap();
        assert_eq!(candidate.text(), None);

        let bare: Candidate = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.text(), None);
    }

    #[test]
    fn test_request_body_wire_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![PromptPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }
}
