//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use mtnav_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error onto an HTTP status.
  ///
  /// Domain failures travel wrapped inside the store's error type; walking
  /// the source chain recovers them so validation and transition failures
  /// keep their proper statuses instead of collapsing into 500.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(current) = source {
      if let Some(core) = current.downcast_ref::<CoreError>() {
        return Self::from_core(core);
      }
      source = current.source();
    }
    Self::Store(Box::new(err))
  }

  fn from_core(err: &CoreError) -> Self {
    match err {
      CoreError::Validation(_) => Self::BadRequest(err.to_string()),
      CoreError::InvalidTransition(_) | CoreError::InvestigationClosed(_) => {
        Self::Conflict(err.to_string())
      }
      CoreError::ActionNotFound(_)
      | CoreError::InvestigationNotFound(_)
      | CoreError::MessageNotFound(_) => Self::NotFound(err.to_string()),
      CoreError::Serialization(_) => Self::Internal(err.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
