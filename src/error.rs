use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;
use serde_json::json;

/// Detail for 500-class errors is only exposed to clients in a development
/// posture; production clients get a generic message and the full chain goes
/// to the log.
static DEV_MODE: Lazy<bool> =
    Lazy::new(|| std::env::var("REELIST_ENV").is_ok_and(|env| env == "development"));

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range input; always user-correctable.
    #[error("{0}")]
    Validation(String),
    /// No entity matched the given id.
    #[error("{0}")]
    NotFound(String),
    /// Duplicate title detected on import.
    #[error("{0}")]
    Conflict(String),
    /// The metadata provider could not satisfy the lookup (transport error,
    /// non-success status, or a provider-reported "not found"). Surfaced to
    /// clients as 404 but logged separately from plain not-found.
    #[error("{0}")]
    Provider(String),
    /// The metadata provider rejected our credentials; operator-facing.
    #[error("{0}")]
    ProviderConfig(String),
    /// The backing store is unreachable or unset.
    #[error("{0}")]
    Configuration(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::Provider(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ProviderConfig(_) => StatusCode::BAD_GATEWAY,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Provider(_) => "provider",
            ApiError::ProviderConfig(_) => "provider_config",
            ApiError::Configuration(_) => "configuration",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match &self {
            ApiError::Provider(msg) => {
                tracing::warn!(error = %msg, "metadata provider lookup failed");
                msg.clone()
            }
            ApiError::ProviderConfig(msg) => {
                tracing::error!(error = %msg, "metadata provider misconfigured");
                msg.clone()
            }
            ApiError::Configuration(msg) => {
                tracing::error!(error = %msg, "configuration error");
                msg.clone()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "unhandled error");
                if *DEV_MODE {
                    format!("{err:#}")
                } else {
                    "An unexpected error occurred".to_string()
                }
            }
            other => other.to_string(),
        };

        (status, axum::Json(json!({ "error": code, "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `axum::Json` with the rejection routed through [`ApiError`], so a
/// malformed body still produces a JSON error envelope instead of axum's
/// plain-text default.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Same treatment for query strings.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
