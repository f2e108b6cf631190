//! JSON REST API for the MT Navigator investigation service.
//!
//! Exposes an axum [`Router`] backed by any
//! [`mtnav_core::store::InvestigationStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", mtnav_api::api_router(store.clone()))
//! ```

pub mod actions;
pub mod error;
pub mod investigations;
pub mod messages;
pub mod notifications;
pub mod settings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use mtnav_core::store::InvestigationStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: InvestigationStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Messages
    .route(
      "/messages",
      get(messages::list::<S>).post(messages::create::<S>),
    )
    .route("/messages/{id}", get(messages::get_one::<S>))
    // Investigations
    .route(
      "/investigations",
      get(investigations::list::<S>).post(investigations::create::<S>),
    )
    .route("/investigations/{id}", get(investigations::get_one::<S>))
    .route(
      "/investigations/reference/{reference}",
      get(investigations::get_by_reference::<S>),
    )
    .route(
      "/investigations/analytics/summary",
      get(investigations::analytics::<S>),
    )
    .route(
      "/investigations/{id}/resolve",
      put(investigations::resolve::<S>),
    )
    .route("/investigations/{id}/close", put(investigations::close::<S>))
    // Actions
    .route("/investigations/{id}/actions", post(actions::create::<S>))
    .route(
      "/investigations/{id}/actions/{action_id}",
      put(actions::update_status::<S>),
    )
    // Notifications
    .route(
      "/investigations/{id}/notifications",
      post(notifications::generate::<S>),
    )
    // Settings
    .route(
      "/settings",
      get(settings::get_settings::<S>).post(settings::update_settings::<S>),
    )
    .route("/settings/api-key", delete(settings::delete_api_key::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
