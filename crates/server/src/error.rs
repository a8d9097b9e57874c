use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::DomainError;
use log::error;
use serde_json::json;

/// Translates service errors into HTTP responses in one place. The services
/// guarantee the error kind; this mapping is the only presentation decision
/// the server makes.
pub enum ApiError {
    Unauthorized,
    Domain(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let domain = match self {
            Self::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "missing or malformed identity claims" })),
                )
                    .into_response();
            }
            Self::Domain(domain) => domain,
        };

        let status = match &domain {
            DomainError::Forbidden | DomainError::NotAssigned => StatusCode::FORBIDDEN,
            DomainError::AlreadyClosed | DomainError::NotClosed => StatusCode::CONFLICT,
            DomainError::OverAllocation { .. }
            | DomainError::InvalidRange(_)
            | DomainError::SelfReference
            | DomainError::OrderingViolation
            | DomainError::DuplicateEdge => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::TransactionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        if let DomainError::TransactionFailed(err) = &domain {
            error!("infrastructure failure: {err}");
        }

        let body = Json(json!({
            "error": domain.to_string(),
            "retryable": domain.is_retryable(),
        }));
        (status, body).into_response()
    }
}
