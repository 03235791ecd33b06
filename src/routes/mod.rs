// Route exports
pub mod matches;
pub mod users;

use crate::core::{MatchRanker, MatchingError};
use crate::models::{ErrorResponse, PreferenceDefaults};
use crate::services::{InMemoryStore, StoreError};
use actix_web::{error, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub ranker: MatchRanker,
    pub defaults: PreferenceDefaults,
}

impl AppState {
    pub fn new(store: Arc<InMemoryStore>, ranker: MatchRanker) -> Self {
        Self {
            store,
            ranker,
            defaults: PreferenceDefaults::default(),
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error))
        .service(
            web::scope("/api/v1")
                .configure(users::configure)
                .configure(matches::configure),
        );
}

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(
            self.error.clone(),
            self.message.clone(),
            self.status_code,
        ))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle malformed path parameters such as a non-numeric user id
pub fn handle_path_error(err: error::PathError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("validation_failed", errors.to_string(), 400))
}

pub(crate) fn matching_error_response(err: &MatchingError) -> HttpResponse {
    match err {
        MatchingError::MissingPreferences { .. } => HttpResponse::BadRequest().json(ErrorResponse::new(
            "missing_preferences",
            "Please set your lifestyle preferences first",
            400,
        )),
        MatchingError::InvalidRange { .. } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("invalid_range", err.to_string(), 400))
        }
        MatchingError::InvalidWeights(_) | MatchingError::InvalidThreshold(_) => {
            tracing::error!("Matching engine misconfigured: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("internal_error", err.to_string(), 500))
        }
    }
}

pub(crate) fn store_error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::UserNotFound(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new("not_found", err.to_string(), 404))
        }
        StoreError::UsernameTaken(_) | StoreError::DuplicateMatch(_, _) => {
            HttpResponse::Conflict().json(ErrorResponse::new("conflict", err.to_string(), 409))
        }
        StoreError::SelfMatch(_) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("self_match", err.to_string(), 400))
        }
        StoreError::Invalid(inner) => matching_error_response(inner),
    }
}

pub(crate) fn user_not_found(user_id: crate::models::UserId) -> HttpResponse {
    store_error_response(&StoreError::UserNotFound(user_id))
}
