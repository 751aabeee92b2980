use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::api_connection::connection::{extract_json_object, ApiConnectionError, OpenAiClient};
use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, ResponseFormat};
use crate::config::Config;
use crate::prompts::{build_prompt, system_prompt, Preferences};
use crate::recipe::{mock_recipes, validate_and_format, Recipe};

/// Artificial latency for mock generations, so the calling UI exercises its
/// loading state.
pub const MOCK_DELAY: Duration = Duration::from_millis(1500);

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2500;

/// Failures that must reach the user instead of being masked by mock data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Invalid API key. Please check your OpenAI API key in .env file")]
    InvalidApiKey,
    #[error("Rate limit exceeded. Please wait a moment and try again")]
    RateLimited,
    #[error("Invalid request. Please try with different ingredients")]
    BadRequest,
    #[error("Request timeout. Please try again")]
    Timeout,
}

/// Request body shared with the backend proxy. `ingredients` defaults to empty
/// so a body omitting the field reaches the handler's empty-check instead of
/// failing extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Deserialize)]
struct RecipesEnvelope {
    #[serde(default)]
    recipes: Vec<Value>,
}

/// Ordered generation strategies. The driver walks this table in order,
/// advancing only past retryable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    BackendProxy,
    DirectApi,
    MockData,
}

/// Outcome of one strategy attempt.
enum Outcome {
    Success(Vec<Recipe>),
    Retryable(String),
    Fatal(GenerateError),
}

enum ServiceMode {
    /// No usable API key; every generation returns canned data.
    Mock,
    Live {
        client: OpenAiClient,
        model: String,
        backend_url: Option<String>,
    },
}

/// Recipe generation over the LLM API, with a backend-proxy stage and a mock
/// fallback. The mode is decided once at construction.
pub struct RecipeService {
    mode: ServiceMode,
    http: reqwest::Client,
}

impl RecipeService {
    pub fn from_config(config: &Config) -> Self {
        let mode = if config.has_valid_api_key() {
            let key = config.api_key.clone().unwrap_or_default();
            info!("API key configured, using model {}", config.model);
            ServiceMode::Live {
                client: OpenAiClient::new(key, config.base_url.clone()),
                model: config.model.clone(),
                backend_url: config.use_backend.then(|| config.backend_url.clone()),
            }
        } else {
            warn!("OpenAI API key not configured properly. Using mock data.");
            ServiceMode::Mock
        };

        Self {
            mode,
            http: reqwest::Client::new(),
        }
    }

    /// The strategy table for the current mode, in attempt order.
    pub fn strategies(&self) -> Vec<Strategy> {
        match &self.mode {
            ServiceMode::Mock => vec![Strategy::MockData],
            ServiceMode::Live { backend_url, .. } => {
                let mut table = Vec::new();
                if backend_url.is_some() {
                    table.push(Strategy::BackendProxy);
                }
                table.push(Strategy::DirectApi);
                table.push(Strategy::MockData);
                table
            }
        }
    }

    /// Generates recipes for the given ingredients. Classified upstream failures
    /// (401, 429, 400, timeout) surface as errors; anything else falls back to
    /// the next strategy, ending at mock data.
    pub async fn generate_recipes(
        &self,
        ingredients: &[String],
        preferences: &Preferences,
    ) -> Result<Vec<Recipe>, GenerateError> {
        for strategy in self.strategies() {
            let outcome = match strategy {
                Strategy::BackendProxy => self.try_backend(ingredients, preferences).await,
                Strategy::DirectApi => self.try_direct(ingredients, preferences).await,
                Strategy::MockData => self.try_mock(ingredients).await,
            };

            match outcome {
                Outcome::Success(recipes) => return Ok(recipes),
                Outcome::Fatal(err) => return Err(err),
                Outcome::Retryable(reason) => {
                    warn!("{:?} failed ({}), trying next strategy", strategy, reason);
                }
            }
        }

        // The table always ends with MockData, which cannot fail.
        Ok(mock_recipes(ingredients))
    }

    async fn try_mock(&self, ingredients: &[String]) -> Outcome {
        tokio::time::sleep(MOCK_DELAY).await;
        Outcome::Success(mock_recipes(ingredients))
    }

    async fn try_backend(&self, ingredients: &[String], preferences: &Preferences) -> Outcome {
        let backend_url = match &self.mode {
            ServiceMode::Live {
                backend_url: Some(url),
                ..
            } => url,
            _ => return Outcome::Retryable("no backend configured".to_string()),
        };

        let body = GenerateRequest {
            ingredients: ingredients.to_vec(),
            preferences: Some(preferences.clone()),
        };

        let response = match self
            .http
            .post(format!(
                "{}/api/generate-recipes",
                backend_url.trim_end_matches('/')
            ))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return Outcome::Retryable(format!("backend unreachable: {}", err)),
        };

        if !response.status().is_success() {
            return Outcome::Retryable(format!("backend returned {}", response.status()));
        }

        match response.json::<RecipesEnvelope>().await {
            Ok(envelope) => Outcome::Success(validate_and_format(envelope.recipes)),
            Err(err) => Outcome::Retryable(format!("backend response unparseable: {}", err)),
        }
    }

    async fn try_direct(&self, ingredients: &[String], preferences: &Preferences) -> Outcome {
        let (client, model) = match &self.mode {
            ServiceMode::Live { client, model, .. } => (client, model),
            ServiceMode::Mock => return Outcome::Retryable("no API client".to_string()),
        };

        let request = ChatCompletionRequest {
            model: model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt()),
                ChatMessage::user(build_prompt(ingredients, preferences)),
            ],
            response_format: Some(ResponseFormat::json_object()),
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
        };

        let response = match client.chat_completion(request).await {
            Ok(response) => response,
            Err(err) => return classify_api_error(err),
        };

        let content = match response.choices.first() {
            Some(choice) => choice.message.content.clone(),
            None => return Outcome::Retryable("no response choices received".to_string()),
        };

        let json = match extract_json_object(&content) {
            Some(json) => json,
            None => return Outcome::Retryable("response contained no JSON object".to_string()),
        };

        match serde_json::from_str::<RecipesEnvelope>(json) {
            Ok(envelope) => {
                info!("Generated {} recipes", envelope.recipes.len());
                Outcome::Success(validate_and_format(envelope.recipes))
            }
            Err(err) => Outcome::Retryable(format!("recipe JSON unparseable: {}", err)),
        }
    }
}

/// Splits API failures into fatal (the request itself is broken, tell the user)
/// and retryable (fall through to the next strategy).
fn classify_api_error(err: ApiConnectionError) -> Outcome {
    match err {
        ApiConnectionError::ApiError { status, .. } => match status.as_u16() {
            401 => Outcome::Fatal(GenerateError::InvalidApiKey),
            429 => Outcome::Fatal(GenerateError::RateLimited),
            400 => Outcome::Fatal(GenerateError::BadRequest),
            _ => Outcome::Retryable(format!("API returned {}", status)),
        },
        ApiConnectionError::Timeout => Outcome::Fatal(GenerateError::Timeout),
        other => Outcome::Retryable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BACKEND_URL, DEFAULT_PORT};

    fn config(key: Option<&str>, use_backend: bool) -> Config {
        Config {
            api_key: key.map(|k| k.to_string()),
            model: "gpt-4o-mini".to_string(),
            base_url: "http://localhost:9".to_string(),
            use_backend,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn mock_mode_has_single_strategy() {
        let service = RecipeService::from_config(&config(None, false));
        assert_eq!(service.strategies(), vec![Strategy::MockData]);
    }

    #[test]
    fn live_mode_orders_strategies() {
        let service = RecipeService::from_config(&config(Some("sk-test"), false));
        assert_eq!(
            service.strategies(),
            vec![Strategy::DirectApi, Strategy::MockData]
        );

        let with_backend = RecipeService::from_config(&config(Some("sk-test"), true));
        assert_eq!(
            with_backend.strategies(),
            vec![
                Strategy::BackendProxy,
                Strategy::DirectApi,
                Strategy::MockData
            ]
        );
    }

    #[test]
    fn classifies_fatal_statuses() {
        for (code, expected) in [
            (401, GenerateError::InvalidApiKey),
            (429, GenerateError::RateLimited),
            (400, GenerateError::BadRequest),
        ] {
            let err = ApiConnectionError::ApiError {
                status: reqwest::StatusCode::from_u16(code).unwrap(),
                error_body: String::new(),
            };
            match classify_api_error(err) {
                Outcome::Fatal(e) => assert_eq!(e, expected),
                _ => panic!("status {} should be fatal", code),
            }
        }
    }

    #[test]
    fn classifies_timeout_as_fatal() {
        match classify_api_error(ApiConnectionError::Timeout) {
            Outcome::Fatal(GenerateError::Timeout) => {}
            _ => panic!("timeout should be fatal"),
        }
    }

    #[test]
    fn classifies_server_errors_as_retryable() {
        let err = ApiConnectionError::ApiError {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            error_body: "down".to_string(),
        };
        assert!(matches!(classify_api_error(err), Outcome::Retryable(_)));
    }
}
