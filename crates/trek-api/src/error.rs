use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;
use trek_domain::{DomainError, StoreError};

use crate::serializers::{MsgResp, StatusErrorResp};

/// Forma del cuerpo de error: los endpoints de autenticación responden
/// `{"msg": ..}`, los de media/cuenta `{"status": "error", "message": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Msg,
    Status,
}

#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub envelope: Envelope,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), envelope: Envelope::Status }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }
    pub fn unauthorized(message: impl Into<String>) -> Self { Self::new(StatusCode::UNAUTHORIZED, message).into_msg() }
    pub fn forbidden(message: impl Into<String>) -> Self { Self::new(StatusCode::FORBIDDEN, message).into_msg() }
    pub fn internal(message: impl Into<String>) -> Self { Self::new(StatusCode::INTERNAL_SERVER_ERROR, message) }

    pub fn into_msg(mut self) -> Self {
        self.envelope = Envelope::Msg;
        self
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DomainError::UsernameTaken(_) | DomainError::DuplicateTitle(_) => StatusCode::CONFLICT,
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            // Token válido de una cuenta ya borrada.
            DomainError::Store(StoreError::ForeignKeyViolation(_)) => StatusCode::UNAUTHORIZED,
            DomainError::Store(StoreError::CheckViolation(_)) => StatusCode::BAD_REQUEST,
            DomainError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Hashing(_) | DomainError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        ApiError::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.envelope {
            Envelope::Msg => (self.status, Json(MsgResp::new(self.message))).into_response(),
            Envelope::Status => (self.status, Json(StatusErrorResp::new(self.message))).into_response(),
        }
    }
}

/// Corre trabajo síncrono (Diesel, Argon2) fuera del runtime async.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
    where F: FnOnce() -> Result<T, DomainError> + Send + 'static,
          T: Send + 'static
{
    tokio::task::spawn_blocking(f).await
                                  .map_err(|e| ApiError::internal(format!("blocking task failed: {e}")))?
                                  .map_err(ApiError::from)
}
