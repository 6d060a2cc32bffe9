// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::header::ContentType, http::StatusCode, HttpResponse};
use askama::Template;
use thiserror::Error;
use uuid::Uuid;

use crate::views::ErrorTemplate;

/// Application-specific error types
/// DOCUMENTATION: Every handler returns this type, so all failures end up
/// in `error_response` below, which renders the shared error page
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("Place not found with id: {0}")]
    NotFound(String),

    #[error("Creator {0} of this place could not be resolved")]
    CreatorNotFound(Uuid),

    #[error("There's already a place with that name: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Template error: {0}")]
    TemplateError(String),
}

impl PlacesError {
    /// Stable machine-readable code shown on the error page
    pub fn code(&self) -> &'static str {
        match self {
            PlacesError::NotFound(_) => "NOT_FOUND",
            PlacesError::CreatorNotFound(_) => "CREATOR_NOT_FOUND",
            PlacesError::AlreadyExists(_) => "ALREADY_EXISTS",
            PlacesError::DatabaseError(_) => "DATABASE_ERROR",
            PlacesError::InvalidInput(_) => "INVALID_INPUT",
            PlacesError::ValidationError(_) => "VALIDATION_ERROR",
            PlacesError::Unauthorized => "UNAUTHORIZED",
            PlacesError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            PlacesError::TemplateError(_) => "TEMPLATE_ERROR",
        }
    }
}

impl From<sqlx::Error> for PlacesError {
    fn from(e: sqlx::Error) -> Self {
        PlacesError::DatabaseError(e.to_string())
    }
}

/// Convert PlacesError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and renders error.html
impl ResponseError for PlacesError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let page = ErrorTemplate {
            status: status.as_u16(),
            code: self.code(),
            message: self.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match page.render() {
            Ok(html) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(html),
            Err(e) => {
                log::error!("Failed to render error page: {}", e);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(format!("{}: {}", self.code(), self))
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PlacesError::NotFound(_) => StatusCode::NOT_FOUND,
            PlacesError::CreatorNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::AlreadyExists(_) => StatusCode::CONFLICT,
            PlacesError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlacesError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PlacesError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PlacesError::Unauthorized => StatusCode::UNAUTHORIZED,
            PlacesError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            PlacesError::TemplateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
