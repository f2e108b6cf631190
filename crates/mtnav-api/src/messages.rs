//! Handlers for `/messages` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/messages` | Optional `?limit=&offset=`, newest first |
//! | `POST` | `/messages` | Body: [`CreateBody`]; returns 201 + stored message |
//! | `GET`  | `/messages/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mtnav_core::{
  message::{Message, MessageFormat, NewMessage},
  store::InvestigationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub reference: String,
  pub format:    MessageFormat,
  pub content:   String,
}

/// `POST /messages` — returns 201 + the stored [`Message`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let message = store
    .add_message(NewMessage {
      reference: body.reference,
      format:    body.format,
      content:   body.content,
    })
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /messages[?limit=...][&offset=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Message>>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let messages = store
    .list_messages(params.limit, params.offset)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(messages))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /messages/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Message>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let message = store
    .get_message(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("message {id} not found")))?;
  Ok(Json(message))
}
