//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors from the core, storage and
//! processing crates convert into it with `?`, and every error renders the same JSON
//! body and is logged at the level its variant asks for.
//!
//! Bodies are rendered without `details`/`error_type`. Outside production,
//! [`expose_error_details`] swaps in the full body for non-sensitive errors.

use crate::state::AppState;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use reelhouse_core::{AppError, ErrorMetadata, LogLevel};
use reelhouse_processing::ProcessingError;
use reelhouse_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from reelhouse-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// A body that is not multipart/form-data at all.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Unable to parse form: {}",
            rejection.body_text()
        )))
    }
}

/// Malformed multipart bodies are 400, bodies over the route's size cap are 413.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Unable to parse form: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Full error body carried on the response for [`expose_error_details`].
#[derive(Debug, Clone)]
struct DetailedErrorBody(ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let mut body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };
        let mut response = (status, Json(&body)).into_response();

        if !app_error.is_sensitive() {
            body.details = Some(app_error.detailed_message());
            body.error_type = Some(app_error.error_type().to_string());
            response.extensions_mut().insert(DetailedErrorBody(body));
        }

        response
    }
}

/// Re-render error responses with `details` and `error_type` unless the service
/// runs in production.
pub async fn expose_error_details(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let detailed = response.extensions_mut().remove::<DetailedErrorBody>();

    match detailed {
        Some(DetailedErrorBody(body)) if !state.config.is_production() => {
            (response.status(), Json(body)).into_response()
        }
        _ => response,
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::Internal(format!("Invalid storage key: {}", msg)),
            StorageError::UploadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

/// Every tool failure is a 500 for the client; the log line keeps the specific cause.
impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let cause = match &err {
            ProcessingError::InvalidToolPath { .. } | ProcessingError::Spawn { .. } => {
                "tool_unavailable"
            }
            ProcessingError::ToolFailed { .. } => "tool_failed",
            ProcessingError::InvalidOutput(_)
            | ProcessingError::NoStreams
            | ProcessingError::MissingDimensions
            | ProcessingError::EmptyOutput(_) => "unexpected_output",
            ProcessingError::Io(_) => "io",
        };
        tracing::warn!(error = %err, cause, "Media tool invocation failed");
        HttpAppError(AppError::MediaProcessing(err.to_string()))
    }
}
