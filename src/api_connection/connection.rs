use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;

use super::endpoints::{ChatCompletionRequest, ChatCompletionResponse};

/// How long a single chat-completion call may run before being aborted.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum ApiConnectionError {
    NetworkError(reqwest::Error),
    Timeout,
    SerializationError(serde_json::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::Timeout => write!(f, "Request timed out"),
            ApiConnectionError::SerializationError(err) => {
                write!(f, "Serialization error: {}", err)
            }
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            ApiConnectionError::SerializationError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiConnectionError::Timeout
        } else {
            ApiConnectionError::NetworkError(err)
        }
    }
}

impl From<serde_json::Error> for ApiConnectionError {
    fn from(err: serde_json::Error) -> Self {
        ApiConnectionError::SerializationError(err)
    }
}

/// Client for an OpenAI-compatible chat-completion endpoint. The base URL is
/// overridable so tests can point it at a local server.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let chat_response = response.json::<ChatCompletionResponse>().await?;
            Ok(chat_response)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }
}

/// Pulls the first JSON object out of a model response, tolerating markdown code
/// fences and prose around it.
pub fn extract_json_object(content: &str) -> Option<&str> {
    let mut trimmed = content.trim();

    if let Some(stripped) = trimmed.strip_prefix("```json") {
        trimmed = stripped;
    } else if let Some(stripped) = trimmed.strip_prefix("```") {
        trimmed = stripped;
    }
    if let Some(stripped) = trimmed.strip_suffix("```") {
        trimmed = stripped;
    }
    trimmed = trimmed.trim();

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&trimmed[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_json() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn strips_markdown_fences() {
        let fenced = "```json\n{\"recipes\": []}\n```";
        assert_eq!(extract_json_object(fenced), Some("{\"recipes\": []}"));

        let plain_fence = "```\n{\"recipes\": []}\n```";
        assert_eq!(extract_json_object(plain_fence), Some("{\"recipes\": []}"));
    }

    #[test]
    fn extracts_object_embedded_in_prose() {
        let noisy = "Here you go: {\"recipes\": [{\"title\": \"Soup\"}]} Enjoy!";
        assert_eq!(
            extract_json_object(noisy),
            Some("{\"recipes\": [{\"title\": \"Soup\"}]}")
        );
    }

    #[test]
    fn returns_none_without_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }
}
