//! Error types for `mtnav-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(String),

  #[error("invalid transition: {0}")]
  InvalidTransition(String),

  #[error("investigation {0} is closed")]
  InvestigationClosed(Uuid),

  #[error("action not found: {0}")]
  ActionNotFound(Uuid),

  #[error("investigation not found: {0}")]
  InvestigationNotFound(Uuid),

  #[error("message not found: {0}")]
  MessageNotFound(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
