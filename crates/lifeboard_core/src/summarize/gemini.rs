//! Gemini `generateContent` client.

use super::{SummarizeError, SummarizeResult, Summarizer};
use crate::http::error_body;
use log::{error, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_ERROR_CHARS: usize = 300;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

/// Blocking Gemini client for one model.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Summarizer for GeminiClient {
    fn summarize(&self, prompt: &str) -> SummarizeResult<String> {
        let started_at = Instant::now();
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
        };
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=summarize module=summarize status=error model={} http_status={} duration_ms={}",
                self.model,
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                message: error_body(response, MAX_ERROR_CHARS),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|err| SummarizeError::Decode(err.to_string()))?;
        let text = extract_text(parsed)?;
        info!(
            "event=summarize module=summarize status=ok model={} prompt_chars={} reply_chars={} duration_ms={}",
            self.model,
            prompt.chars().count(),
            text.chars().count(),
            started_at.elapsed().as_millis()
        );
        Ok(text)
    }
}

fn extract_text(response: GenerateResponse) -> SummarizeResult<String> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(SummarizeError::EmptyResponse(format!(
            "prompt blocked ({reason})"
        )));
    }
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(SummarizeError::EmptyResponse("no candidates".to_string()));
    };
    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "empty candidate".to_string());
        return Err(SummarizeError::EmptyResponse(reason));
    }
    Ok(text)
}
