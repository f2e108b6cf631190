//! Handlers for `/investigations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/investigations` | Optional `?status=&priority=&limit=&offset=` |
//! | `POST` | `/investigations` | Body: [`CreateBody`]; returns 201 + full view |
//! | `GET`  | `/investigations/:id` | Full [`InvestigationView`]; 404 if not found |
//! | `GET`  | `/investigations/reference/:reference` | Same view by reference number |
//! | `GET`  | `/investigations/analytics/summary` | Aggregated reporting view |
//! | `PUT`  | `/investigations/:id/resolve` | Body: [`ResolveBody`] |
//! | `PUT`  | `/investigations/:id/close` | No body |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use mtnav_core::{
  action::Priority,
  investigation::{CustomerInfo, Investigation, InvestigationStatus, NewInvestigation},
  message::Message,
  progress::ActionCounts,
  store::{AnalyticsSummary, InvestigationPage, InvestigationQuery, InvestigationStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── View ─────────────────────────────────────────────────────────────────────

/// The full read model served to detail pages: the aggregate plus its
/// message and the derived gating data the client renders (progress bar,
/// resolve button). Pure projection — nothing here is stored.
#[derive(Debug, Serialize)]
pub struct InvestigationView {
  pub investigation: Investigation,
  pub message:       Option<Message>,
  pub action_counts: ActionCounts,
  pub progress:      u8,
  pub can_resolve:   bool,
}

async fn view_of<S>(
  store: &Arc<S>,
  investigation: Investigation,
) -> Result<InvestigationView, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let message = store
    .get_message(investigation.message_id)
    .await
    .map_err(ApiError::from_store)?;

  Ok(InvestigationView {
    action_counts: investigation.counts(),
    progress:      investigation.progress(),
    can_resolve:   investigation.can_resolve(),
    investigation,
    message,
  })
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /investigations`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub message_id:    Uuid,
  #[serde(default)]
  pub priority:      Priority,
  pub customer_info: Option<CustomerInfo>,
}

impl From<CreateBody> for NewInvestigation {
  fn from(b: CreateBody) -> Self {
    NewInvestigation {
      message_id:    b.message_id,
      priority:      b.priority,
      customer_info: b.customer_info,
    }
  }
}

/// `POST /investigations` — returns 201 + the full view.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let investigation = store
    .create_investigation(NewInvestigation::from(body))
    .await
    .map_err(ApiError::from_store)?;
  let view = view_of(&store, investigation).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status:   Option<InvestigationStatus>,
  pub priority: Option<Priority>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /investigations[?status=...][&priority=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<InvestigationPage>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = InvestigationQuery {
    status:   params.status,
    priority: params.priority,
    limit:    params.limit,
    offset:   params.offset,
  };
  let page = store
    .list_investigations(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /investigations/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InvestigationView>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let investigation = store
    .get_investigation(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("investigation {id} not found"))
    })?;
  Ok(Json(view_of(&store, investigation).await?))
}

/// `GET /investigations/reference/:reference`
pub async fn get_by_reference<S>(
  State(store): State<Arc<S>>,
  Path(reference): Path<String>,
) -> Result<Json<InvestigationView>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let investigation = store
    .get_by_reference(&reference)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("investigation {reference} not found"))
    })?;
  Ok(Json(view_of(&store, investigation).await?))
}

// ─── Analytics ────────────────────────────────────────────────────────────────

/// `GET /investigations/analytics/summary`
pub async fn analytics<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<AnalyticsSummary>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let summary = store.analytics().await.map_err(ApiError::from_store)?;
  Ok(Json(summary))
}

// ─── Resolve ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
  pub resolution_notes: String,
}

/// `PUT /investigations/:id/resolve` — body: `{"resolution_notes":"..."}`.
pub async fn resolve<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ResolveBody>,
) -> Result<Json<Investigation>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let investigation = store
    .resolve_investigation(id, body.resolution_notes)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(investigation))
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `PUT /investigations/:id/close`
pub async fn close<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Investigation>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let investigation = store
    .close_investigation(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(investigation))
}
