//! Integration tests for `SqliteStore` against an in-memory database.

use mtnav_core::{
  Error as CoreError,
  action::{ActionStatus, ActionType, NewAction, Priority},
  investigation::{CustomerInfo, InvestigationStatus, NewInvestigation},
  message::{Message, MessageFormat, NewMessage},
  settings::{ProcessingMode, SettingsUpdate},
  store::{InvestigationQuery, InvestigationStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn message(s: &SqliteStore) -> Message {
  s.add_message(NewMessage {
    reference: "REF123456".to_owned(),
    format:    MessageFormat::Mt,
    content:   ":20:REF123456\n:79:PLEASE ADVISE STATUS".to_owned(),
  })
  .await
  .unwrap()
}

fn request_action() -> NewAction {
  NewAction::new(ActionType::InformationRequest, "Request W8-BEN")
}

// ─── Messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_message() {
  let s = store().await;

  let msg = message(&s).await;
  assert_eq!(msg.format, MessageFormat::Mt);

  let fetched = s.get_message(msg.message_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.message_id, msg.message_id);
  assert_eq!(fetched.reference, "REF123456");
  assert_eq!(fetched.content, msg.content);
}

#[tokio::test]
async fn get_message_missing_returns_none() {
  let s = store().await;
  let result = s.get_message(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_messages_respects_limit() {
  let s = store().await;
  for _ in 0..3 {
    message(&s).await;
  }

  let all = s.list_messages(None, None).await.unwrap();
  assert_eq!(all.len(), 3);

  let page = s.list_messages(Some(2), None).await.unwrap();
  assert_eq!(page.len(), 2);
}

// ─── Investigation creation ──────────────────────────────────────────────────

#[tokio::test]
async fn create_investigation_starts_open() {
  let s = store().await;
  let msg = message(&s).await;

  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::High,
      customer_info: None,
    })
    .await
    .unwrap();

  assert_eq!(inv.status, InvestigationStatus::Open);
  assert_eq!(inv.priority, Priority::High);
  assert!(inv.actions.is_empty());
  assert!(inv.reference_number.starts_with("INV-"));

  let fetched = s.get_investigation(inv.investigation_id).await.unwrap();
  assert!(fetched.is_some());
  assert_eq!(
    fetched.unwrap().reference_number,
    inv.reference_number
  );
}

#[tokio::test]
async fn create_investigation_unknown_message_errors() {
  let s = store().await;

  let err = s
    .create_investigation(NewInvestigation {
      message_id:    Uuid::new_v4(),
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MessageNotFound(_))));
}

#[tokio::test]
async fn customer_info_roundtrips() {
  let s = store().await;
  let msg = message(&s).await;

  let info = CustomerInfo {
    name: Some("A. Liddell".to_owned()),
    email: Some("alice@example.com".to_owned()),
    account_number: Some("CH93-0000-0000-0000-0".to_owned()),
    ..Default::default()
  };
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: Some(info.clone()),
    })
    .await
    .unwrap();

  let fetched = s
    .get_investigation(inv.investigation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.customer_info, Some(info));
}

#[tokio::test]
async fn get_by_reference_finds_investigation() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Low,
      customer_info: None,
    })
    .await
    .unwrap();

  let fetched = s.get_by_reference(&inv.reference_number).await.unwrap();
  assert!(fetched.is_some());
  assert_eq!(fetched.unwrap().investigation_id, inv.investigation_id);

  let missing = s.get_by_reference("INV-19700101-ZZZZ").await.unwrap();
  assert!(missing.is_none());
}

// ─── Actions through the store ───────────────────────────────────────────────

#[tokio::test]
async fn add_action_persists_and_starts_work() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();

  let action = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  assert_eq!(action.status, ActionStatus::Pending);

  let fetched = s
    .get_investigation(inv.investigation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.status, InvestigationStatus::InProgress);
  assert_eq!(fetched.actions.len(), 1);
  assert_eq!(fetched.actions[0].action_id, action.action_id);
}

#[tokio::test]
async fn add_action_unknown_investigation_errors() {
  let s = store().await;
  let err = s
    .add_action(Uuid::new_v4(), request_action())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::InvestigationNotFound(_))
  ));
}

#[tokio::test]
async fn update_action_status_persists_completion() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  let action = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();

  let updated = s
    .update_action_status(
      inv.investigation_id,
      action.action_id,
      ActionStatus::Completed,
      Some("document received".to_owned()),
    )
    .await
    .unwrap();
  assert_eq!(updated.status, ActionStatus::Completed);
  assert!(updated.completed_at.is_some());

  let fetched = s
    .get_investigation(inv.investigation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.actions[0].status, ActionStatus::Completed);
  assert_eq!(fetched.actions[0].notes.as_deref(), Some("document received"));
  assert!(fetched.actions[0].completed_at.is_some());
  assert_eq!(fetched.progress(), 100);
}

#[tokio::test]
async fn update_action_status_unknown_action_errors() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  s.add_action(inv.investigation_id, request_action())
    .await
    .unwrap();

  let err = s
    .update_action_status(
      inv.investigation_id,
      Uuid::new_v4(),
      ActionStatus::Completed,
      None,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::ActionNotFound(_))));
}

// ─── Resolve and close ───────────────────────────────────────────────────────

#[tokio::test]
async fn full_lifecycle_through_store() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Critical,
      customer_info: None,
    })
    .await
    .unwrap();

  let action = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.update_action_status(
    inv.investigation_id,
    action.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();

  let resolved = s
    .resolve_investigation(
      inv.investigation_id,
      "Customer confirmed".to_owned(),
    )
    .await
    .unwrap();
  assert_eq!(resolved.status, InvestigationStatus::Resolved);
  assert_eq!(
    resolved.resolution_notes.as_deref(),
    Some("Customer confirmed")
  );
  assert!(resolved.resolved_at.is_some());

  let closed = s.close_investigation(inv.investigation_id).await.unwrap();
  assert_eq!(closed.status, InvestigationStatus::Closed);
  // resolved_at survives closing.
  assert!(closed.resolved_at.is_some());
}

#[tokio::test]
async fn resolve_with_incomplete_actions_errors() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  s.add_action(inv.investigation_id, request_action())
    .await
    .unwrap();

  let err = s
    .resolve_investigation(inv.investigation_id, "done".to_owned())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidTransition(_))));

  // State unchanged on disk.
  let fetched = s
    .get_investigation(inv.investigation_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.status, InvestigationStatus::InProgress);
  assert!(fetched.resolved_at.is_none());
}

#[tokio::test]
async fn resolve_with_empty_notes_errors() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  let action = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.update_action_status(
    inv.investigation_id,
    action.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();

  let err = s
    .resolve_investigation(inv.investigation_id, "   ".to_owned())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn closed_investigation_rejects_mutations() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  let action = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.update_action_status(
    inv.investigation_id,
    action.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();
  s.resolve_investigation(inv.investigation_id, "done".to_owned())
    .await
    .unwrap();
  s.close_investigation(inv.investigation_id).await.unwrap();

  let err = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::InvestigationClosed(_))
  ));

  let err = s
    .update_action_status(
      inv.investigation_id,
      action.action_id,
      ActionStatus::Cancelled,
      None,
    )
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::InvestigationClosed(_))
  ));
}

#[tokio::test]
async fn close_unresolved_errors() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();

  let err = s
    .close_investigation(inv.investigation_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::InvalidTransition(_))));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_status_and_priority() {
  let s = store().await;
  let msg = message(&s).await;

  let open = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Low,
      customer_info: None,
    })
    .await
    .unwrap();
  let started = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::High,
      customer_info: None,
    })
    .await
    .unwrap();
  s.add_action(started.investigation_id, request_action())
    .await
    .unwrap();

  let all = s
    .list_investigations(&InvestigationQuery::default())
    .await
    .unwrap();
  assert_eq!(all.total, 2);
  assert_eq!(all.investigations.len(), 2);

  let in_progress = s
    .list_investigations(&InvestigationQuery {
      status: Some(InvestigationStatus::InProgress),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(in_progress.total, 1);
  assert_eq!(
    in_progress.investigations[0].investigation_id,
    started.investigation_id
  );

  let low = s
    .list_investigations(&InvestigationQuery {
      priority: Some(Priority::Low),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(low.total, 1);
  assert_eq!(
    low.investigations[0].investigation_id,
    open.investigation_id
  );
}

#[tokio::test]
async fn list_pagination_keeps_total() {
  let s = store().await;
  let msg = message(&s).await;
  for _ in 0..5 {
    s.create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  }

  let page = s
    .list_investigations(&InvestigationQuery {
      limit: Some(2),
      offset: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 5);
  assert_eq!(page.investigations.len(), 2);
  assert_eq!(page.limit, 2);
  assert_eq!(page.offset, 2);
}

#[tokio::test]
async fn list_summary_carries_counts_and_customer() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: Some(CustomerInfo {
        name: Some("A. Liddell".to_owned()),
        ..Default::default()
      }),
    })
    .await
    .unwrap();

  let a = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.update_action_status(
    inv.investigation_id,
    a.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();

  let page = s
    .list_investigations(&InvestigationQuery::default())
    .await
    .unwrap();
  let summary = &page.investigations[0];
  assert_eq!(summary.customer_name.as_deref(), Some("A. Liddell"));
  assert_eq!(summary.message_reference.as_deref(), Some("REF123456"));
  assert_eq!(summary.action_counts.total, 2);
  assert_eq!(summary.action_counts.completed, 1);
  assert_eq!(summary.action_counts.pending, 1);
  assert_eq!(summary.days_open, 0);
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn analytics_counts_statuses_priorities_and_types() {
  let s = store().await;
  let msg = message(&s).await;

  let first = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::High,
      customer_info: None,
    })
    .await
    .unwrap();
  s.create_investigation(NewInvestigation {
    message_id:    msg.message_id,
    priority:      Priority::Low,
    customer_info: None,
  })
  .await
  .unwrap();

  let a = s
    .add_action(first.investigation_id, request_action())
    .await
    .unwrap();
  s.add_action(
    first.investigation_id,
    NewAction::new(ActionType::CustomerNotification, "Notify customer"),
  )
  .await
  .unwrap();
  s.update_action_status(
    first.investigation_id,
    a.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();

  let analytics = s.analytics().await.unwrap();
  assert_eq!(analytics.total_investigations, 2);
  assert_eq!(analytics.status_counts.open, 1);
  assert_eq!(analytics.status_counts.in_progress, 1);
  assert_eq!(analytics.priority_counts.high, 1);
  assert_eq!(analytics.priority_counts.low, 1);
  assert_eq!(analytics.action_type_counts.information_request, 1);
  assert_eq!(analytics.action_type_counts.customer_notification, 1);
  assert_eq!(analytics.avg_resolution_hours, 0.0);
}

#[tokio::test]
async fn analytics_tracks_resolution_time() {
  let s = store().await;
  let msg = message(&s).await;
  let inv = s
    .create_investigation(NewInvestigation {
      message_id:    msg.message_id,
      priority:      Priority::Medium,
      customer_info: None,
    })
    .await
    .unwrap();
  let a = s
    .add_action(inv.investigation_id, request_action())
    .await
    .unwrap();
  s.update_action_status(
    inv.investigation_id,
    a.action_id,
    ActionStatus::Completed,
    None,
  )
  .await
  .unwrap();
  s.resolve_investigation(inv.investigation_id, "done".to_owned())
    .await
    .unwrap();

  let analytics = s.analytics().await.unwrap();
  assert_eq!(analytics.status_counts.resolved, 1);
  assert!(analytics.avg_resolution_hours >= 0.0);
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn settings_created_with_defaults_on_first_read() {
  let s = store().await;

  let settings = s.get_settings().await.unwrap();
  assert!(settings.api_key.is_none());
  assert_eq!(settings.model, mtnav_core::settings::DEFAULT_MODEL);
  assert_eq!(settings.default_mode, ProcessingMode::Convert);

  // Second read returns the same stored row.
  let again = s.get_settings().await.unwrap();
  assert_eq!(again.created_at, settings.created_at);
}

#[tokio::test]
async fn settings_partial_update() {
  let s = store().await;

  let updated = s
    .update_settings(SettingsUpdate {
      api_key: Some("sk-abcdefghijklmnop".to_owned()),
      default_mode: Some(ProcessingMode::Extract),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(updated.api_key.as_deref(), Some("sk-abcdefghijklmnop"));
  assert_eq!(updated.default_mode, ProcessingMode::Extract);
  assert_eq!(updated.model, mtnav_core::settings::DEFAULT_MODEL);

  let fetched = s.get_settings().await.unwrap();
  assert_eq!(fetched.api_key.as_deref(), Some("sk-abcdefghijklmnop"));
}

#[tokio::test]
async fn clear_api_key_keeps_other_fields() {
  let s = store().await;
  s.update_settings(SettingsUpdate {
    api_key: Some("sk-abcdefghijklmnop".to_owned()),
    model: Some("gpt-4o-mini".to_owned()),
    ..Default::default()
  })
  .await
  .unwrap();

  let cleared = s.clear_api_key().await.unwrap();
  assert!(cleared.api_key.is_none());
  assert_eq!(cleared.model, "gpt-4o-mini");

  let fetched = s.get_settings().await.unwrap();
  assert!(fetched.api_key.is_none());
}
