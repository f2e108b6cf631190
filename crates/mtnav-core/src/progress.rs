//! Progress aggregation — the pure tally that views and resolution gating
//! share.
//!
//! Cancelled actions are excluded from the pending and completed buckets but
//! still count in the denominator, so an investigation whose actions were
//! all cancelled never reaches 100% and never qualifies for resolution.

use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionStatus};

/// Bucketed action counts for one investigation.
///
/// Never stored — always recomputed from the current action list.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ActionCounts {
  pub total:       usize,
  pub pending:     usize,
  pub in_progress: usize,
  pub completed:   usize,
  pub cancelled:   usize,
}

impl ActionCounts {
  pub fn tally(actions: &[Action]) -> Self {
    let mut counts = Self::default();
    for action in actions {
      counts.total += 1;
      match action.status {
        ActionStatus::Pending => counts.pending += 1,
        ActionStatus::InProgress => counts.in_progress += 1,
        ActionStatus::Completed => counts.completed += 1,
        ActionStatus::Cancelled => counts.cancelled += 1,
      }
    }
    counts
  }

  /// Actions still requiring work (pending or in progress).
  pub fn open(&self) -> usize { self.pending + self.in_progress }

  /// `round(100 × completed / total)`; 0 for an empty list.
  pub fn progress_percent(&self) -> u8 {
    if self.total == 0 {
      return 0;
    }
    ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
  }

  /// Whether every action is completed. Vacuously true for an empty list.
  pub fn all_completed(&self) -> bool { self.completed == self.total }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::action::{ActionType, Priority};

  fn action_with(status: ActionStatus) -> Action {
    let now = Utc::now();
    Action {
      action_id:          Uuid::new_v4(),
      action_type:        ActionType::InformationRequest,
      description:        "request missing documents".to_owned(),
      suggested_response: None,
      priority:           Priority::Medium,
      status,
      deadline:           None,
      notes:              None,
      created_at:         now,
      updated_at:         now,
      completed_at:       (status == ActionStatus::Completed).then_some(now),
    }
  }

  #[test]
  fn empty_list_is_zero_percent() {
    let counts = ActionCounts::tally(&[]);
    assert_eq!(counts.progress_percent(), 0);
    assert!(counts.all_completed());
  }

  #[test]
  fn all_completed_is_full_progress() {
    let actions = vec![
      action_with(ActionStatus::Completed),
      action_with(ActionStatus::Completed),
    ];
    let counts = ActionCounts::tally(&actions);
    assert_eq!(counts.progress_percent(), 100);
    assert!(counts.all_completed());
  }

  #[test]
  fn cancelled_stays_in_denominator() {
    let actions = vec![
      action_with(ActionStatus::Completed),
      action_with(ActionStatus::Cancelled),
    ];
    let counts = ActionCounts::tally(&actions);
    assert_eq!(counts.progress_percent(), 50);
    assert!(!counts.all_completed());
  }

  #[test]
  fn only_cancelled_never_reaches_full_progress() {
    let actions = vec![
      action_with(ActionStatus::Cancelled),
      action_with(ActionStatus::Cancelled),
    ];
    let counts = ActionCounts::tally(&actions);
    assert_eq!(counts.progress_percent(), 0);
    assert!(!counts.all_completed());
  }

  #[test]
  fn percent_is_rounded_and_bounded() {
    let actions = vec![
      action_with(ActionStatus::Completed),
      action_with(ActionStatus::Completed),
      action_with(ActionStatus::Pending),
    ];
    let counts = ActionCounts::tally(&actions);
    // 2/3 rounds to 67.
    assert_eq!(counts.progress_percent(), 67);
    assert!(counts.progress_percent() <= 100);
  }

  #[test]
  fn open_counts_pending_and_in_progress() {
    let actions = vec![
      action_with(ActionStatus::Pending),
      action_with(ActionStatus::InProgress),
      action_with(ActionStatus::Completed),
      action_with(ActionStatus::Cancelled),
    ];
    let counts = ActionCounts::tally(&actions);
    assert_eq!(counts.open(), 2);
    assert_eq!(counts.total, 4);
  }
}
