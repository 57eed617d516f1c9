//! Gemini vision API reader

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use carpark_types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::PlateReader;
use crate::staging::StagedImage;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PLATE_PROMPT: &str = "Please analyze this image and read any visible vehicle registration \
plate for parking management. Reply with the plate characters exactly as printed, \
in uppercase, and nothing else.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Reads plates through Google's `generateContent` endpoint
pub struct GeminiReader {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiReader {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Upstream(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            endpoint: GEMINI_ENDPOINT.to_string(),
        })
    }

    /// Point the reader at a different API root (proxies, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

fn build_request<'a>(mime_type: &'a str, bytes: &[u8]) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: PLATE_PROMPT },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type,
                        data: STANDARD.encode(bytes),
                    },
                },
            ],
        }],
    }
}

fn collect_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl PlateReader for GeminiReader {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn read_text(&self, image: &StagedImage) -> Result<String> {
        let request = build_request(image.mime_type(), image.bytes());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Gemini returned {status}: {}",
                body.trim()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Gemini response unreadable: {e}")))?;

        let text = collect_text(parsed);
        tracing::debug!(model = %self.model, text = %text, "Gemini recognized text");
        Ok(text)
    }
}
