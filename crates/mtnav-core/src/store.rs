//! The `InvestigationStore` trait and supporting query/read-model types.
//!
//! The trait is implemented by storage backends (e.g.
//! `mtnav-store-sqlite`). The API layer depends on this abstraction, not on
//! any concrete backend. Every mutation loads the aggregate, applies the
//! core transition guard, and persists the result, so the lifecycle rules
//! live in exactly one place.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  action::{Action, ActionStatus, NewAction, Priority},
  investigation::{Investigation, InvestigationStatus, NewInvestigation},
  message::{Message, NewMessage},
  progress::ActionCounts,
  settings::{SettingsUpdate, UserSettings},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`InvestigationStore::list_investigations`].
#[derive(Debug, Clone, Default)]
pub struct InvestigationQuery {
  pub status:   Option<InvestigationStatus>,
  pub priority: Option<Priority>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// One row of the investigation list — a projection, not the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationSummary {
  pub investigation_id:  Uuid,
  pub reference_number:  String,
  pub status:            InvestigationStatus,
  pub priority:          Priority,
  /// SWIFT reference of the underlying message, if it still resolves.
  pub message_reference: Option<String>,
  pub customer_name:     Option<String>,
  pub action_counts:     ActionCounts,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
  pub days_open:         i64,
}

/// A page of summaries plus the unpaginated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationPage {
  pub total:          usize,
  pub investigations: Vec<InvestigationSummary>,
  pub limit:          usize,
  pub offset:         usize,
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusCounts {
  pub open:        usize,
  pub in_progress: usize,
  pub resolved:    usize,
  pub closed:      usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PriorityCounts {
  pub low:      usize,
  pub medium:   usize,
  pub high:     usize,
  pub critical: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionTypeCounts {
  pub information_request:   usize,
  pub amendment_request:     usize,
  pub customer_notification: usize,
  pub cancellation:          usize,
  pub other:                 usize,
}

/// Aggregated reporting view over every stored investigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
  pub status_counts:        StatusCounts,
  pub priority_counts:      PriorityCounts,
  pub action_type_counts:   ActionTypeCounts,
  pub total_investigations: usize,
  /// Mean hours from creation to resolution, over investigations with
  /// `resolved_at` set. Zero when none have resolved yet.
  pub avg_resolution_hours: f64,
  pub updated_at:           DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an investigation store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait InvestigationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Messages ──────────────────────────────────────────────────────────

  /// Register an externally-produced message. `message_id` and
  /// `created_at` are assigned by the store.
  fn add_message(
    &self,
    input: NewMessage,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Retrieve a message by id. Returns `None` if not found.
  fn get_message(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Message>, Self::Error>> + Send + '_;

  /// Most recent messages first.
  fn list_messages(
    &self,
    limit: Option<usize>,
    offset: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Message>, Self::Error>> + Send + '_;

  // ── Investigations ────────────────────────────────────────────────────

  /// Create and persist a new open investigation.
  ///
  /// Fails if `input.message_id` does not reference a stored message.
  fn create_investigation(
    &self,
    input: NewInvestigation,
  ) -> impl Future<Output = Result<Investigation, Self::Error>> + Send + '_;

  /// Retrieve the full aggregate (actions included, in creation order).
  fn get_investigation(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Investigation>, Self::Error>> + Send + '_;

  /// Retrieve by human-facing reference number.
  fn get_by_reference<'a>(
    &'a self,
    reference: &'a str,
  ) -> impl Future<Output = Result<Option<Investigation>, Self::Error>> + Send + 'a;

  /// List summaries, most recently updated first.
  fn list_investigations<'a>(
    &'a self,
    query: &'a InvestigationQuery,
  ) -> impl Future<Output = Result<InvestigationPage, Self::Error>> + Send + 'a;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Append a pending action and return it as stored.
  fn add_action(
    &self,
    investigation_id: Uuid,
    input: NewAction,
  ) -> impl Future<Output = Result<Action, Self::Error>> + Send + '_;

  /// Apply a status change to one owned action.
  fn update_action_status(
    &self,
    investigation_id: Uuid,
    action_id: Uuid,
    new_status: ActionStatus,
    notes: Option<String>,
  ) -> impl Future<Output = Result<Action, Self::Error>> + Send + '_;

  /// Resolve; returns the updated aggregate.
  fn resolve_investigation(
    &self,
    investigation_id: Uuid,
    resolution_notes: String,
  ) -> impl Future<Output = Result<Investigation, Self::Error>> + Send + '_;

  /// Close; returns the updated aggregate.
  fn close_investigation(
    &self,
    investigation_id: Uuid,
  ) -> impl Future<Output = Result<Investigation, Self::Error>> + Send + '_;

  // ── Reporting ─────────────────────────────────────────────────────────

  fn analytics(
    &self,
  ) -> impl Future<Output = Result<AnalyticsSummary, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// Return the stored settings, creating the default row if none exists.
  fn get_settings(
    &self,
  ) -> impl Future<Output = Result<UserSettings, Self::Error>> + Send + '_;

  /// Apply a partial update and return the new state.
  fn update_settings(
    &self,
    update: SettingsUpdate,
  ) -> impl Future<Output = Result<UserSettings, Self::Error>> + Send + '_;

  /// Remove the stored API key, keeping everything else.
  fn clear_api_key(
    &self,
  ) -> impl Future<Output = Result<UserSettings, Self::Error>> + Send + '_;
}
