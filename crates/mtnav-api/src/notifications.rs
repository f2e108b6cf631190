//! Handler for `POST /investigations/:id/notifications`.
//!
//! The notification type is validated at the enum boundary; the composed
//! subject/body come from the deterministic templates in
//! [`mtnav_core::notification`]. Delivery is the caller's concern.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use mtnav_core::{
  notification::{Notification, NotificationType},
  store::InvestigationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body accepted by `POST /investigations/:id/notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateBody {
  #[serde(default)]
  pub notification_type: NotificationType,
}

/// `POST /investigations/:id/notifications` — body:
/// `{"notification_type":"status_update"|"request_info"|"resolution"}`.
pub async fn generate<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GenerateBody>,
) -> Result<Json<Notification>, ApiError>
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

  let notification =
    Notification::compose(&investigation, body.notification_type);
  Ok(Json(notification))
}
