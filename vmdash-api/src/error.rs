use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use vmdash_common::ErrorBody;

use crate::repository::RepoError;

/// Failures surfaced by the VM endpoints. `context` is the short summary put
/// in the `error` field (e.g. "Failed to fetch VMs").
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{context}: {details}")]
    Datastore { context: String, details: String },
}

impl ApiError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn vm_not_found() -> Self {
        ApiError::NotFound("VM not found".to_string())
    }

    /// Map a repository failure, keeping a configuration problem distinct
    /// from a runtime datastore error.
    pub fn from_repo(context: &str, err: RepoError) -> Self {
        match err {
            RepoError::NotConfigured => ApiError::Configuration(err.to_string()),
            other => ApiError::Datastore {
                context: context.to_string(),
                details: other.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Datastore { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Configuration(msg) => {
                ErrorBody::new("Database not configured", Some(msg.clone()))
            }
            ApiError::Validation(msg) | ApiError::NotFound(msg) => ErrorBody::new(msg.clone(), None),
            ApiError::Datastore { context, details } => {
                ErrorBody::new(context.clone(), Some(details.clone()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Datastore { .. } | ApiError::Configuration(_) => {
                tracing::error!("{}", self);
            }
            _ => tracing::debug!("{}", self),
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_is_not_a_generic_500() {
        let err = ApiError::from_repo("Failed to fetch VMs", RepoError::NotConfigured);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body().error, "Database not configured");
    }

    #[test]
    fn datastore_error_carries_details() {
        let err = ApiError::from_repo(
            "Failed to fetch VMs",
            RepoError::Unavailable("connection refused".into()),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.error, "Failed to fetch VMs");
        assert_eq!(body.details.as_deref(), Some("datastore unavailable: connection refused"));
    }

    #[test]
    fn missing_fields_message_lists_fields() {
        let err = ApiError::missing_fields(&["name", "ipAddress"]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields: name, ipAddress");
    }
}
