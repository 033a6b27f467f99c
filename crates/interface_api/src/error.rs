//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use domain_catalog::CatalogError;
use domain_pricing::PricingError;
use domain_purchase::PurchaseError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The purchase cannot complete yet; every outstanding issue is listed
    #[error("Submission blocked")]
    SubmissionBlocked(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg, None)
            }
            ApiError::SubmissionBlocked(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "submission_blocked",
                "The purchase cannot be completed yet".to_string(),
                Some(issues),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::PolicyTypeNotFound(_) | CatalogError::ProviderNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CatalogError::ComparisonLimitReached { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::Catalog(e) => e.into(),
            PurchaseError::Pricing(e) => e.into(),
            PurchaseError::InvalidPattern { .. } => ApiError::Internal(err.to_string()),
            PurchaseError::DependentNotFound(_) => ApiError::NotFound(err.to_string()),
            PurchaseError::InvalidMobile(_) => ApiError::Validation(err.to_string()),
            PurchaseError::PolicyTypeNotSelected
            | PurchaseError::ProviderNotSelected
            | PurchaseError::PremiumNotCalculated => ApiError::Conflict(err.to_string()),
            PurchaseError::SubmissionBlocked(issues) => ApiError::SubmissionBlocked(issues),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}
