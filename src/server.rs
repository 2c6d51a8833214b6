//! HTTP API
//!
//! The calling layer around the pipeline: identity, request validation,
//! profile lookup and history persistence. Authentication itself happens
//! upstream; a trusted proxy supplies the user's email in `x-user-email`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::pipeline::Guru;
use crate::profile::{SpiritualProfile, UserRecord};
use crate::store::{ChatHistory, ChatTurn, ProfileStore, RECENT_TURNS};
use crate::sutras::{parse_reference, Sutra};

pub const USER_HEADER: &str = "x-user-email";

// ═══════════════════════════════════════════════════════════════
// STATE & TYPES
// ═══════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AppState {
    pub guru: Guru,
    pub profiles: Arc<dyn ProfileStore>,
    pub history: Arc<dyn ChatHistory>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: SpiritualProfile,
    pub profile_completed: bool,
    pub chat_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub success: bool,
    pub message: String,
    pub profile: SpiritualProfile,
}

/// Error returned as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn user_email(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(ApiError::unauthorized)
}

// ═══════════════════════════════════════════════════════════════
// HANDLERS
// ═══════════════════════════════════════════════════════════════

async fn health() -> &'static str {
    "ok"
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let email = user_email(&headers)?;

    let message_required = || ApiError::new(StatusCode::BAD_REQUEST, "Message is required");
    let Json(req) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejected chat body");
        message_required()
    })?;
    if req.message.trim().is_empty() {
        return Err(message_required());
    }
    let message = req.message.as_str();

    let user = state
        .profiles
        .get(&email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "User profile not found"))?;

    let reply = state.guru.respond(message, &user.spiritual_profile).await;

    state
        .history
        .append(&email, &reply.to_turn(message))
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(reply).into_response())
}

async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let email = user_email(&headers)?;

    let user = state
        .profiles
        .get(&email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "User not found"))?;

    let chat_history = state
        .history
        .recent(&email, RECENT_TURNS)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(ProfileResponse {
        profile: user.spiritual_profile,
        profile_completed: user.profile_completed,
        chat_history,
    }))
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SpiritualProfile>, JsonRejection>,
) -> Result<Json<ProfileUpdated>, ApiError> {
    let email = user_email(&headers)?;
    let Json(profile) = payload.map_err(|e| {
        tracing::debug!(error = %e, "rejected profile body");
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let record = UserRecord {
        email,
        spiritual_profile: profile.clone(),
        profile_completed: true,
    };
    state.profiles.put(record).await.map_err(ApiError::internal)?;

    Ok(Json(ProfileUpdated {
        success: true,
        message: "Profile updated successfully".to_string(),
        profile,
    }))
}

async fn list_sutras(State(state): State<AppState>) -> Json<Vec<Sutra>> {
    Json(state.guru.knowledge_base().entries().to_vec())
}

async fn get_sutra(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<Sutra>, ApiError> {
    let not_found = || ApiError::new(StatusCode::NOT_FOUND, "Sutra not found");
    let (chapter, verse) = parse_reference(&reference).ok_or_else(not_found)?;
    state
        .guru
        .knowledge_base()
        .find(chapter, verse)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", axum::routing::post(chat))
        .route("/api/profile", get(get_profile).post(update_profile))
        .route("/api/sutras", get(list_sutras))
        .route("/api/sutras/:reference", get(get_sutra))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
