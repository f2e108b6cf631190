//! Handlers for `/settings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/settings` | Masked view; creates the default row on first read |
//! | `POST` | `/settings` | Partial update, body: [`mtnav_core::settings::SettingsUpdate`] |
//! | `DELETE` | `/settings/api-key` | Clears the stored key |
//!
//! The stored API key never leaves the server verbatim — responses carry
//! only `api_key_set` and the masked form.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use mtnav_core::{
  settings::{ProcessingMode, SettingsUpdate, UserSettings},
  store::InvestigationStore,
};
use serde::Serialize;

use crate::error::ApiError;

// ─── View ─────────────────────────────────────────────────────────────────────

/// The response shape for every settings endpoint.
#[derive(Debug, Serialize)]
pub struct SettingsView {
  pub api_key_set:    bool,
  pub api_key_masked: Option<String>,
  pub model:          String,
  pub default_mode:   ProcessingMode,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl From<UserSettings> for SettingsView {
  fn from(s: UserSettings) -> Self {
    Self {
      api_key_set:    s.api_key.is_some(),
      api_key_masked: s.masked_api_key(),
      model:          s.model,
      default_mode:   s.default_mode,
      created_at:     s.created_at,
      updated_at:     s.updated_at,
    }
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `GET /settings`
pub async fn get_settings<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<SettingsView>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = store.get_settings().await.map_err(ApiError::from_store)?;
  Ok(Json(SettingsView::from(settings)))
}

/// `POST /settings` — body: any subset of
/// `{"api_key":"...","model":"...","default_mode":"convert"|"extract"}`.
pub async fn update_settings<S>(
  State(store): State<Arc<S>>,
  Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = store
    .update_settings(update)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(SettingsView::from(settings)))
}

/// `DELETE /settings/api-key`
pub async fn delete_api_key<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<SettingsView>, ApiError>
where
  S: InvestigationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let settings = store
    .clear_api_key()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(SettingsView::from(settings)))
}
