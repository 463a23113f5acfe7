use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::{Config, API_KEY_VAR},
    errors::AppError,
    gateway::{GatewayClient, OutfitGateway},
    models::{ErrorBody, GenerateRequest, GenerateResponse},
    orchestrator::generate_outfits,
};

pub const GENERATE_PATH: &str = "/api/generate-outfit";
pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Clone)]
pub struct AppState {
    /// `None` when no gateway credential is configured.
    pub gateway: Option<Arc<dyn OutfitGateway>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let gateway = config
            .api_key
            .clone()
            .map(|key| Arc::new(GatewayClient::new(key, config)) as Arc<dyn OutfitGateway>);
        Self { gateway }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_outfit))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(CORS_ALLOW_HEADERS),
                ))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(answer_preflight)),
        )
        .with_state(state)
}

/// Answers every `OPTIONS` request with an empty 204 before routing, so no
/// handler logic runs for a preflight.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    let body = ErrorBody { error: "Not found".to_string() };
    (StatusCode::NOT_FOUND, Json(body))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn generate_outfit(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let gateway = state.gateway.as_ref().ok_or(AppError::Configuration(API_KEY_VAR))?;

    let span = tracing::info_span!("generate_outfit", request_id = %Uuid::new_v4());
    let outfits = generate_outfits(gateway.as_ref(), req.gender, req.mood)
        .instrument(span)
        .await?;
    Ok(Json(GenerateResponse { outfits }))
}
