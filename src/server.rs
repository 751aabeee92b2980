use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::api_connection::connection::{extract_json_object, ApiConnectionError, OpenAiClient};
use crate::api_connection::endpoints::{ChatCompletionRequest, ChatMessage, ResponseFormat};
use crate::config::Config;
use crate::prompts::{build_prompt, system_prompt, Preferences};
use crate::service::GenerateRequest;

/// Shared state for the proxy: the upstream client and model, built once from
/// config so the key never leaves the server.
pub struct ProxyState {
    client: OpenAiClient,
    model: String,
}

impl ProxyState {
    pub fn from_config(config: &Config) -> anyhow::Result<Arc<Self>> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set to run the server"))?;
        Ok(Arc::new(Self {
            client: OpenAiClient::new(api_key, config.base_url.clone()),
            model: config.model.clone(),
        }))
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("No ingredients provided")]
    NoIngredients,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Failed to generate recipes")]
    Upstream,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::NoIngredients => StatusCode::BAD_REQUEST,
            ProxyError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ProxyError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ApiConnectionError> for ProxyError {
    fn from(err: ApiConnectionError) -> Self {
        match err {
            ApiConnectionError::ApiError { status, .. } if status.as_u16() == 401 => {
                ProxyError::InvalidApiKey
            }
            ApiConnectionError::ApiError { status, .. } if status.as_u16() == 429 => {
                ProxyError::RateLimited
            }
            _ => ProxyError::Upstream,
        }
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-recipes", post(generate_recipes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = ProxyState::from_config(config)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "SmartMix API is running" }))
}

/// Forwards a generation request upstream and passes the model's JSON back
/// verbatim.
async fn generate_recipes(
    State(state): State<Arc<ProxyState>>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<Value>, ProxyError> {
    if body.ingredients.is_empty() {
        return Err(ProxyError::NoIngredients);
    }

    let preferences = body.preferences.unwrap_or_else(Preferences::default);
    let prompt = build_prompt(&body.ingredients, &preferences);

    let request = ChatCompletionRequest {
        model: state.model.clone(),
        messages: vec![
            ChatMessage::system(system_prompt()),
            ChatMessage::user(prompt),
        ],
        response_format: Some(ResponseFormat::json_object()),
        temperature: Some(0.7),
        max_tokens: Some(2500),
    };

    let response = state.client.chat_completion(request).await.map_err(|err| {
        error!("Upstream API error: {}", err);
        ProxyError::from(err)
    })?;

    let content = response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or(ProxyError::Upstream)?;

    let json_str = extract_json_object(&content).ok_or(ProxyError::Upstream)?;
    let result: Value = serde_json::from_str(json_str).map_err(|err| {
        error!("Upstream returned unparseable JSON: {}", err);
        ProxyError::Upstream
    })?;

    Ok(Json(result))
}
