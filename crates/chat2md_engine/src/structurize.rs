use std::time::Duration;

use chat2md_core::Config;
use chrono::{Local, NaiveDate};
use engine_logging::{engine_debug, engine_info, engine_warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::frontmatter::ensure_front_matter;
use crate::prompt::build_instructions;
use crate::{ConvertError, ErrorKind};

pub const API_VERSION_SEGMENT: &str = "/v1";
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct StructurizerSettings {
    pub request_timeout: Duration,
}

impl Default for StructurizerSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Client for OpenAI-compatible chat-completion endpoints.
///
/// One request per call. Failures are returned as-is, never retried: a retry
/// would spend tokens again on a paid API.
#[derive(Debug, Clone)]
pub struct Structurizer {
    client: reqwest::Client,
}

impl Structurizer {
    pub fn new(settings: StructurizerSettings) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ConvertError::new(ErrorKind::Network, err.to_string()))?;
        Ok(Self { client })
    }

    pub async fn structurize(
        &self,
        raw_text: &str,
        config: &Config,
        source: Option<&str>,
    ) -> Result<String, ConvertError> {
        self.structurize_on(raw_text, config, source, Local::now().date_naive())
            .await
    }

    /// Same as [`Structurizer::structurize`] with the front-matter date supplied by the caller.
    pub async fn structurize_on(
        &self,
        raw_text: &str,
        config: &Config,
        source: Option<&str>,
        today: NaiveDate,
    ) -> Result<String, ConvertError> {
        if config.api_key.trim().is_empty() {
            return Err(ConvertError::validation(
                "API key not configured. Please run: aichat2md --setup",
            ));
        }
        if config.api_base_url.trim().is_empty() {
            return Err(ConvertError::validation(
                "API base URL not configured. Please run: aichat2md --setup",
            ));
        }

        let instructions = build_instructions(config.language, source)?;
        let endpoint = chat_completions_endpoint(&config.api_base_url);
        let body = ChatRequest {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &instructions,
                },
                ChatMessage {
                    role: "user",
                    content: raw_text,
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        engine_info!(
            "POST {} model={} chars={}",
            endpoint,
            config.model,
            raw_text.chars().count()
        );

        let response = self
            .client
            .post(&endpoint)
            .headers(auth_headers(&config.api_key)?)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = map_status(status, &body);
            engine_warn!("chat completion failed: {}", err);
            return Err(err);
        }

        let text = response.text().await.map_err(map_reqwest_error)?;
        let markdown = first_choice_content(&text)?;
        engine_debug!("received {} bytes of markdown", markdown.len());

        Ok(ensure_front_matter(markdown, config.language, source, today))
    }
}

/// `{base}/v1/chat/completions`, without doubling a `/v1` the base already ends in.
pub fn chat_completions_endpoint(api_base_url: &str) -> String {
    let base = api_base_url.trim().trim_end_matches('/');
    if base.ends_with(API_VERSION_SEGMENT) {
        format!("{base}/chat/completions")
    } else {
        format!("{base}{API_VERSION_SEGMENT}/chat/completions")
    }
}

fn auth_headers(api_key: &str) -> Result<HeaderMap, ConvertError> {
    let mut headers = HeaderMap::new();
    let auth = format!("Bearer {}", api_key.trim());
    let value = HeaderValue::from_str(&auth)
        .map_err(|_| ConvertError::validation("API key contains characters not allowed in a header"))?;
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn first_choice_content(body: &str) -> Result<String, ConvertError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| ConvertError::validation(format!("Invalid API response: {err}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ConvertError::validation("Invalid API response: missing choices"))
}

fn map_status(status: StatusCode, body: &str) -> ConvertError {
    match status {
        StatusCode::UNAUTHORIZED => ConvertError::new(
            ErrorKind::Auth,
            "API authentication failed. Check your API key",
        ),
        StatusCode::TOO_MANY_REQUESTS => ConvertError::new(
            ErrorKind::RateLimit,
            "Rate limit exceeded. Please wait and try again",
        ),
        other => {
            let detail = match serde_json::from_str::<serde_json::Value>(body) {
                Ok(json) => json.to_string(),
                Err(_) => body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
            };
            ConvertError::new(
                ErrorKind::Api {
                    status: other.as_u16(),
                },
                format!("API request failed: {} - {detail}", other.as_u16()),
            )
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ConvertError {
    if err.is_timeout() {
        return ConvertError::new(
            ErrorKind::Timeout,
            "API request timed out. The conversation might be too long",
        );
    }
    ConvertError::new(ErrorKind::Network, format!("Network error: {err}"))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}
