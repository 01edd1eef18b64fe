use crate::domain::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Transport-side wrapper that maps domain error kinds onto HTTP status
/// codes. `Unexpected` and `AllocationExhausted` intentionally collapse
/// to a generic 500 body.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        ApiError(DomainError::InvalidArgument(details.join(", ")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::NonZeroBalance => StatusCode::CONFLICT,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::AllocationExhausted => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Unexpected(detail) => {
                error!("unexpected error reached the API boundary: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}
