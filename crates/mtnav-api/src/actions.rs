//! Handlers for investigation action endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/investigations/:id/actions` | Body: [`AddBody`]; returns 201 + stored action |
//! | `PUT`  | `/investigations/:id/actions/:action_id` | Body: [`UpdateBody`] |
//!
//! Action updates are scoped to the owning investigation: an action id that
//! belongs to a different investigation is a 404, not a cross-tenant write.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use mtnav_core::{
  action::{Action, ActionStatus, ActionType, NewAction, Priority},
  store::InvestigationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Add ──────────────────────────────────────────────────────────────────────

fn default_deadline_days() -> i64 { 3 }

/// JSON body accepted by `POST /investigations/:id/actions`.
#[derive(Debug, Deserialize)]
pub struct AddBody {
  pub action_type:        ActionType,
  pub description:        String,
  pub suggested_response: Option<String>,
  #[serde(default)]
  pub priority:           Priority,
  /// Days until the action's deadline, measured from now.
  #[serde(default = "default_deadline_days")]
  pub deadline_days:      i64,
}

impl From<AddBody> for NewAction {
  fn from(b: AddBody) -> Self {
    NewAction {
      action_type:        b.action_type,
      description:        b.description,
      suggested_response: b.suggested_response,
      priority:           b.priority,
      deadline:           Some(Utc::now() + Duration::days(b.deadline_days)),
    }
  }
}

/// `POST /investigations/:id/actions` — returns 201 + the stored
/// [`Action`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AddBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let action = store
    .add_action(id, NewAction::from(body))
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(action)))
}

// ─── Update status ────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /investigations/:id/actions/:action_id`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub status: ActionStatus,
  pub notes:  Option<String>,
}

/// `PUT /investigations/:id/actions/:action_id`
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  Path((id, action_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Action>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let action = store
    .update_action_status(id, action_id, body.status, body.notes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(action))
}
