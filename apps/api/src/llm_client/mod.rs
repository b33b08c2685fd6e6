/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// Feature services depend on the `TextGenerator` trait, which `AppState`
/// carries as `Arc<dyn TextGenerator>`.
///
/// One prompt in, one complete text blob out. No retries, no streaming.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod parser;
pub mod prompts;

use parser::{extract_json, parse_records, JsonShape, ParseError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Raw responses are truncated to this many characters when logged.
const LOGGED_RESPONSE_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI model not initialized. Check GEMINI_API_KEY.")]
    Unavailable,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Anything that can turn a prompt into text. Implemented by `LlmClient` in
/// production and by scripted fakes in tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Whether a credential was supplied at startup.
    fn is_configured(&self) -> bool {
        true
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Process-wide generation capability, built once at startup.
///
/// Constructed without an API key it still exists, but every call fails with
/// `LlmError::Unavailable`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::Unavailable)?;

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let url = format!("{GEMINI_API_BASE}/{}:generateContent", self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Generation succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl LlmClient {
    fn map_transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Http(err)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline helpers: generate → extract → parse, with contextual logging
// ────────────────────────────────────────────────────────────────────────────

/// Which feature a generation call belongs to. Used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    CareerPlan,
    InternshipSet,
    Quiz,
    Grading,
    JobList,
    LocalVibes,
    TravelPlan,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::CareerPlan => "career_plan",
            ContentKind::InternshipSet => "internship_set",
            ContentKind::Quiz => "quiz",
            ContentKind::Grading => "grading",
            ContentKind::JobList => "job_list",
            ContentKind::LocalVibes => "local_vibes",
            ContentKind::TravelPlan => "travel_plan",
        }
    }
}

/// A single generation request: what is produced, for which subject (a user,
/// internship or location), and the fully rendered prompt.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub kind: ContentKind,
    pub subject: String,
    pub prompt: String,
}

impl ContentRequest {
    pub fn new(kind: ContentKind, subject: impl Into<String>, prompt: String) -> Self {
        Self {
            kind,
            subject: subject.into(),
            prompt,
        }
    }
}

/// Failure of a generate-and-parse round trip.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<GenerationFailure> for crate::errors::AppError {
    fn from(err: GenerationFailure) -> Self {
        match err {
            GenerationFailure::Llm(e) => e.into(),
            GenerationFailure::Parse(e) => e.into(),
        }
    }
}

/// Calls the generator and logs failures with the request's context.
pub async fn generate_text(
    llm: &dyn TextGenerator,
    request: &ContentRequest,
) -> Result<String, LlmError> {
    info!(
        kind = request.kind.as_str(),
        subject = %request.subject,
        "Requesting AI generation"
    );
    llm.generate(&request.prompt).await.map_err(|e| {
        warn!(
            kind = request.kind.as_str(),
            subject = %request.subject,
            "Generation failed: {e}"
        );
        e
    })
}

/// Generates and extracts a JSON value of the given shape.
pub async fn generate_json(
    llm: &dyn TextGenerator,
    request: &ContentRequest,
    shape: JsonShape,
) -> Result<Value, GenerationFailure> {
    let text = generate_text(llm, request).await?;
    extract_json(&text, shape).map_err(|e| {
        log_parse_failure(request, &text, &e);
        GenerationFailure::Parse(e)
    })
}

/// Generates a JSON array and parses each entry into `T`, skipping entries
/// that do not fit.
pub async fn generate_records<T: DeserializeOwned>(
    llm: &dyn TextGenerator,
    request: &ContentRequest,
) -> Result<Vec<T>, GenerationFailure> {
    let text = generate_text(llm, request).await?;
    extract_json(&text, JsonShape::Array)
        .and_then(parse_records::<T>)
        .map_err(|e| {
            log_parse_failure(request, &text, &e);
            GenerationFailure::Parse(e)
        })
}

fn log_parse_failure(request: &ContentRequest, raw: &str, err: &ParseError) {
    let snippet: String = raw.chars().take(LOGGED_RESPONSE_CHARS).collect();
    warn!(
        kind = request.kind.as_str(),
        subject = %request.subject,
        raw_response = %snippet,
        "Could not parse AI response: {err}"
    );
}
