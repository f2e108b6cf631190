//! Investigation — the aggregate that owns actions and the status
//! lifecycle.
//!
//! Every transition rule lives here. Storage backends load the aggregate,
//! call these methods, and persist the result; HTTP views are read-only
//! projections of this model's state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  action::{Action, ActionStatus, NewAction, Priority},
  progress::ActionCounts,
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status. Advances monotonically open → in_progress → resolved →
/// closed; `closed` is terminal and no backward transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
  Open,
  InProgress,
  Resolved,
  Closed,
}

impl InvestigationStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Open => "open",
      Self::InProgress => "in_progress",
      Self::Resolved => "resolved",
      Self::Closed => "closed",
    }
  }
}

// ─── Customer info ───────────────────────────────────────────────────────────

/// Contact details supplied at creation. All fields are optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
  pub name:           Option<String>,
  pub email:          Option<String>,
  pub phone:          Option<String>,
  pub account_number: Option<String>,
  pub reference:      Option<String>,
}

// ─── Investigation ───────────────────────────────────────────────────────────

/// An investigation into one message that failed straight-through
/// processing.
///
/// Invariants: `resolved_at` is set iff status is resolved or closed;
/// `updated_at` is refreshed on every state-affecting mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investigation {
  pub investigation_id: Uuid,
  /// Human-facing identifier, `INV-<date>-<suffix>`; unique per store.
  pub reference_number: String,
  /// The message under investigation. Set at creation, never changed.
  pub message_id:       Uuid,
  pub status:           InvestigationStatus,
  /// Independent of the priorities of individual actions.
  pub priority:         Priority,
  pub customer_info:    Option<CustomerInfo>,
  /// Ordered by creation; the investigation is the sole owner.
  pub actions:          Vec<Action>,
  pub resolution_notes: Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
  pub resolved_at:      Option<DateTime<Utc>>,
}

/// Input to [`crate::store::InvestigationStore::create_investigation`].
#[derive(Debug, Clone)]
pub struct NewInvestigation {
  pub message_id:    Uuid,
  pub priority:      Priority,
  pub customer_info: Option<CustomerInfo>,
}

impl Investigation {
  /// Create a fresh investigation in the `open` state with no actions.
  pub fn new(
    message_id: Uuid,
    priority: Priority,
    customer_info: Option<CustomerInfo>,
  ) -> Self {
    let now = Utc::now();
    Self {
      investigation_id: Uuid::new_v4(),
      reference_number: generate_reference(now),
      message_id,
      status: InvestigationStatus::Open,
      priority,
      customer_info,
      actions: Vec::new(),
      resolution_notes: None,
      created_at: now,
      updated_at: now,
      resolved_at: None,
    }
  }

  // ── Aggregation ─────────────────────────────────────────────────────────

  pub fn counts(&self) -> ActionCounts { ActionCounts::tally(&self.actions) }

  /// Completion percentage over all actions; see
  /// [`ActionCounts::progress_percent`].
  pub fn progress(&self) -> u8 { self.counts().progress_percent() }

  /// Resolution is gated on being in progress with every action completed.
  ///
  /// Cancelled actions stay in the denominator, so they block this gate.
  /// An empty action list passes vacuously; in practice that state is
  /// unreachable because `in_progress` is only entered by an action
  /// mutation and actions are never removed.
  pub fn can_resolve(&self) -> bool {
    self.status == InvestigationStatus::InProgress
      && self.counts().all_completed()
  }

  // ── Mutations ───────────────────────────────────────────────────────────

  /// Append a new pending action.
  ///
  /// There is no upper bound on action count and no duplicate check. The
  /// first action moves an `open` investigation into `in_progress`.
  pub fn add_action(&mut self, input: NewAction) -> Result<Action> {
    self.reject_if_closed()?;
    input.validate()?;

    let now = Utc::now();
    let action = Action {
      action_id:          Uuid::new_v4(),
      action_type:        input.action_type,
      description:        input.description,
      suggested_response: input.suggested_response,
      priority:           input.priority,
      status:             ActionStatus::Pending,
      deadline:           input.deadline,
      notes:              None,
      created_at:         now,
      updated_at:         now,
      completed_at:       None,
    };
    self.actions.push(action.clone());

    self.begin_work();
    self.updated_at = now;
    Ok(action)
  }

  /// Change the status of an owned action; see
  /// [`Action::update_status`] for the per-action rules.
  pub fn update_action_status(
    &mut self,
    action_id: Uuid,
    new_status: ActionStatus,
    notes: Option<&str>,
  ) -> Result<Action> {
    self.reject_if_closed()?;

    let action = self
      .actions
      .iter_mut()
      .find(|a| a.action_id == action_id)
      .ok_or(Error::ActionNotFound(action_id))?;
    action.update_status(new_status, notes)?;
    let updated = action.clone();

    self.begin_work();
    self.updated_at = Utc::now();
    Ok(updated)
  }

  /// Resolve the investigation.
  ///
  /// Empty notes fail validation before the transition gate is consulted,
  /// so the caller always learns about missing notes first.
  pub fn resolve(&mut self, resolution_notes: &str) -> Result<()> {
    if resolution_notes.trim().is_empty() {
      return Err(Error::Validation(
        "resolution notes must not be empty".to_owned(),
      ));
    }
    if !self.can_resolve() {
      return Err(Error::InvalidTransition(format!(
        "cannot resolve investigation {} from status {} at {}% progress",
        self.investigation_id,
        self.status.as_str(),
        self.progress()
      )));
    }

    let now = Utc::now();
    self.status = InvestigationStatus::Resolved;
    self.resolution_notes = Some(resolution_notes.to_owned());
    self.resolved_at = Some(now);
    self.updated_at = now;
    Ok(())
  }

  /// Close a resolved investigation. Terminal — every later mutation fails
  /// with [`Error::InvestigationClosed`].
  pub fn close(&mut self) -> Result<()> {
    if self.status != InvestigationStatus::Resolved {
      return Err(Error::InvalidTransition(format!(
        "cannot close investigation {} from status {}",
        self.investigation_id,
        self.status.as_str()
      )));
    }
    self.status = InvestigationStatus::Closed;
    self.updated_at = Utc::now();
    Ok(())
  }

  // ── Internal ────────────────────────────────────────────────────────────

  fn reject_if_closed(&self) -> Result<()> {
    if self.status == InvestigationStatus::Closed {
      return Err(Error::InvestigationClosed(self.investigation_id));
    }
    Ok(())
  }

  // The first mutation moves an open investigation into in_progress.
  fn begin_work(&mut self) {
    if self.status == InvestigationStatus::Open {
      self.status = InvestigationStatus::InProgress;
    }
  }
}

/// `INV-<YYYYMMDD>-<4 chars>`. The suffix comes from a v4 UUID so no extra
/// randomness source is needed; uniqueness is ultimately enforced by the
/// store's UNIQUE constraint.
fn generate_reference(now: DateTime<Utc>) -> String {
  let uuid = Uuid::new_v4().simple().to_string();
  format!(
    "INV-{}-{}",
    now.format("%Y%m%d"),
    uuid[..4].to_ascii_uppercase()
  )
}
