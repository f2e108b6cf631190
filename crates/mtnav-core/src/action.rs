//! Action types — the unit of work attached to an investigation.
//!
//! Actions are owned by their investigation and have no independent
//! lifecycle. Status moves pending → in_progress → completed, or to
//! cancelled; completed and cancelled are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// What kind of work an action represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
  InformationRequest,
  AmendmentRequest,
  CustomerNotification,
  Cancellation,
  Other,
}

impl ActionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::InformationRequest => "information_request",
      Self::AmendmentRequest => "amendment_request",
      Self::CustomerNotification => "customer_notification",
      Self::Cancellation => "cancellation",
      Self::Other => "other",
    }
  }
}

/// Workflow status of a single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
  Pending,
  InProgress,
  Completed,
  Cancelled,
}

impl ActionStatus {
  /// Terminal statuses admit no further transitions.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Completed | Self::Cancelled)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::InProgress => "in_progress",
      Self::Completed => "completed",
      Self::Cancelled => "cancelled",
    }
  }
}

/// Priority scale shared by actions and investigations.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
  Critical,
}

impl Priority {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Low => "low",
      Self::Medium => "medium",
      Self::High => "high",
      Self::Critical => "critical",
    }
  }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// One unit of work on an investigation.
///
/// Invariant: `completed_at` is set if and only if `status` is `completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
  pub action_id:          Uuid,
  pub action_type:        ActionType,
  pub description:        String,
  /// Template text for a response, if one was suggested at creation.
  pub suggested_response: Option<String>,
  pub priority:           Priority,
  pub status:             ActionStatus,
  pub deadline:           Option<DateTime<Utc>>,
  pub notes:              Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
  pub completed_at:       Option<DateTime<Utc>>,
}

impl Action {
  /// Apply a manual status change.
  ///
  /// `pending` is the birth status, never a manual target. Terminal actions
  /// reject any further change. Notes are overwritten only when the caller
  /// supplies non-empty text; existing notes are preserved otherwise.
  pub fn update_status(
    &mut self,
    new_status: ActionStatus,
    notes: Option<&str>,
  ) -> Result<()> {
    if self.status.is_terminal() {
      return Err(Error::InvalidTransition(format!(
        "action {} is already {}",
        self.action_id,
        self.status.as_str()
      )));
    }
    if new_status == ActionStatus::Pending {
      return Err(Error::InvalidTransition(format!(
        "action {} cannot be moved back to pending",
        self.action_id
      )));
    }

    let now = Utc::now();
    self.status = new_status;
    if new_status == ActionStatus::Completed {
      self.completed_at = Some(now);
    }
    if let Some(text) = notes
      && !text.trim().is_empty()
    {
      self.notes = Some(text.to_owned());
    }
    self.updated_at = now;
    Ok(())
  }
}

// ─── NewAction ───────────────────────────────────────────────────────────────

/// Input to [`crate::investigation::Investigation::add_action`].
/// Identity, status, and timestamps are always assigned by the model.
#[derive(Debug, Clone)]
pub struct NewAction {
  pub action_type:        ActionType,
  pub description:        String,
  pub suggested_response: Option<String>,
  pub priority:           Priority,
  pub deadline:           Option<DateTime<Utc>>,
}

impl NewAction {
  /// Convenience constructor with all optional fields set to their defaults.
  pub fn new(action_type: ActionType, description: impl Into<String>) -> Self {
    Self {
      action_type,
      description: description.into(),
      suggested_response: None,
      priority: Priority::default(),
      deadline: None,
    }
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.description.trim().is_empty() {
      return Err(Error::Validation(
        "action description must not be empty".to_owned(),
      ));
    }
    Ok(())
  }
}
