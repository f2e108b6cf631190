//! [`SqliteStore`] — the SQLite implementation of [`InvestigationStore`].
//!
//! Mutations load the full aggregate, apply the transition guards in
//! `mtnav-core`, and write the changed rows back. No lifecycle rule is
//! re-implemented in SQL.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use mtnav_core::{
  Error as CoreError,
  action::{Action, ActionStatus, ActionType, NewAction, Priority},
  investigation::{Investigation, InvestigationStatus, NewInvestigation},
  message::{Message, NewMessage},
  settings::{SettingsUpdate, UserSettings},
  store::{
    ActionTypeCounts, AnalyticsSummary, InvestigationPage, InvestigationQuery,
    InvestigationStore, PriorityCounts, StatusCounts,
  },
};

use crate::{
  Error, Result,
  encode::{
    RawAction, RawInvestigation, RawMessage, RawSettings, RawSummary,
    decode_action_type, decode_investigation_status, decode_priority,
    decode_uuid, encode_customer_info, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An investigation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Aggregate load ────────────────────────────────────────────────────────

  /// Load an investigation together with its actions in creation order.
  async fn load(&self, id: Uuid) -> Result<Option<Investigation>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawInvestigation, Vec<RawAction>)> = self
      .conn
      .call(move |conn| {
        let investigation = conn
          .query_row(
            "SELECT investigation_id, reference_number, message_id, status,
                    priority, customer_info, resolution_notes,
                    created_at, updated_at, resolved_at
             FROM investigations WHERE investigation_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawInvestigation {
                investigation_id: row.get(0)?,
                reference_number: row.get(1)?,
                message_id:       row.get(2)?,
                status:           row.get(3)?,
                priority:         row.get(4)?,
                customer_info:    row.get(5)?,
                resolution_notes: row.get(6)?,
                created_at:       row.get(7)?,
                updated_at:       row.get(8)?,
                resolved_at:      row.get(9)?,
              })
            },
          )
          .optional()?;

        let Some(investigation) = investigation else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT action_id, action_type, description, suggested_response,
                  status, priority, deadline, notes,
                  created_at, updated_at, completed_at
           FROM investigation_actions
           WHERE investigation_id = ?1
           ORDER BY created_at ASC, action_id ASC",
        )?;
        let actions = stmt
          .query_map(
            rusqlite::params![investigation.investigation_id.clone()],
            |row| {
              Ok(RawAction {
                action_id:          row.get(0)?,
                action_type:        row.get(1)?,
                description:        row.get(2)?,
                suggested_response: row.get(3)?,
                status:             row.get(4)?,
                priority:           row.get(5)?,
                deadline:           row.get(6)?,
                notes:              row.get(7)?,
                created_at:         row.get(8)?,
                updated_at:         row.get(9)?,
                completed_at:       row.get(10)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((investigation, actions)))
      })
      .await?;

    match raw {
      Some((investigation, actions)) => {
        let actions = actions
          .into_iter()
          .map(RawAction::into_action)
          .collect::<Result<Vec<_>>>()?;
        Ok(Some(investigation.into_investigation(actions)?))
      }
      None => Ok(None),
    }
  }

  /// Load an investigation or fail with the core not-found error.
  async fn load_required(&self, id: Uuid) -> Result<Investigation> {
    self
      .load(id)
      .await?
      .ok_or(Error::Core(CoreError::InvestigationNotFound(id)))
  }

  // ── Row writes ────────────────────────────────────────────────────────────

  /// Write back the mutable columns of an investigation row.
  async fn update_investigation_row(&self, inv: &Investigation) -> Result<()> {
    let id_str           = encode_uuid(inv.investigation_id);
    let status           = inv.status.as_str().to_owned();
    let resolution_notes = inv.resolution_notes.clone();
    let updated_at       = encode_dt(inv.updated_at);
    let resolved_at      = inv.resolved_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE investigations
           SET status = ?2, resolution_notes = ?3, updated_at = ?4,
               resolved_at = ?5
           WHERE investigation_id = ?1",
          rusqlite::params![
            id_str,
            status,
            resolution_notes,
            updated_at,
            resolved_at
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_action_row(
    &self,
    investigation_id: Uuid,
    action: &Action,
  ) -> Result<()> {
    let action_id_str      = encode_uuid(action.action_id);
    let inv_id_str         = encode_uuid(investigation_id);
    let action_type        = action.action_type.as_str().to_owned();
    let description        = action.description.clone();
    let suggested_response = action.suggested_response.clone();
    let status             = action.status.as_str().to_owned();
    let priority           = action.priority.as_str().to_owned();
    let deadline           = action.deadline.map(encode_dt);
    let notes              = action.notes.clone();
    let created_at         = encode_dt(action.created_at);
    let updated_at         = encode_dt(action.updated_at);
    let completed_at       = action.completed_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO investigation_actions (
             action_id, investigation_id, action_type, description,
             suggested_response, status, priority, deadline, notes,
             created_at, updated_at, completed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            action_id_str,
            inv_id_str,
            action_type,
            description,
            suggested_response,
            status,
            priority,
            deadline,
            notes,
            created_at,
            updated_at,
            completed_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write back the mutable columns of an action row.
  async fn update_action_row(&self, action: &Action) -> Result<()> {
    let action_id_str = encode_uuid(action.action_id);
    let status        = action.status.as_str().to_owned();
    let notes         = action.notes.clone();
    let updated_at    = encode_dt(action.updated_at);
    let completed_at  = action.completed_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE investigation_actions
           SET status = ?2, notes = ?3, updated_at = ?4, completed_at = ?5
           WHERE action_id = ?1",
          rusqlite::params![
            action_id_str,
            status,
            notes,
            updated_at,
            completed_at
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write back the single settings row; `get_settings` guarantees it
  /// exists.
  async fn write_settings(&self, settings: &UserSettings) -> Result<()> {
    let api_key      = settings.api_key.clone();
    let model        = settings.model.clone();
    let default_mode = settings.default_mode.as_str().to_owned();
    let updated_at   = encode_dt(settings.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE user_settings
           SET api_key = ?1, model = ?2, default_mode = ?3, updated_at = ?4
           WHERE id = 1",
          rusqlite::params![api_key, model, default_mode, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── InvestigationStore impl ─────────────────────────────────────────────────

impl InvestigationStore for SqliteStore {
  type Error = Error;

  // ── Messages ──────────────────────────────────────────────────────────────

  async fn add_message(&self, input: NewMessage) -> Result<Message> {
    let message = Message {
      message_id: Uuid::new_v4(),
      reference:  input.reference,
      format:     input.format,
      content:    input.content,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(message.message_id);
    let reference  = message.reference.clone();
    let format     = message.format.as_str().to_owned();
    let content    = message.content.clone();
    let created_at = encode_dt(message.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (message_id, reference, format, content, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, reference, format, content, created_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(message)
  }

  async fn get_message(&self, id: Uuid) -> Result<Option<Message>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMessage> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT message_id, reference, format, content, created_at
               FROM messages WHERE message_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawMessage {
                  message_id: row.get(0)?,
                  reference:  row.get(1)?,
                  format:     row.get(2)?,
                  content:    row.get(3)?,
                  created_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMessage::into_message).transpose()
  }

  async fn list_messages(
    &self,
    limit: Option<usize>,
    offset: Option<usize>,
  ) -> Result<Vec<Message>> {
    let limit_val  = limit.unwrap_or(100) as i64;
    let offset_val = offset.unwrap_or(0) as i64;

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT message_id, reference, format, content, created_at
           FROM messages
           ORDER BY created_at DESC
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val, offset_val], |row| {
            Ok(RawMessage {
              message_id: row.get(0)?,
              reference:  row.get(1)?,
              format:     row.get(2)?,
              content:    row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }

  // ── Investigations ────────────────────────────────────────────────────────

  async fn create_investigation(
    &self,
    input: NewInvestigation,
  ) -> Result<Investigation> {
    let msg_id_str = encode_uuid(input.message_id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM messages WHERE message_id = ?1",
              rusqlite::params![msg_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    if !exists {
      return Err(Error::Core(CoreError::MessageNotFound(input.message_id)));
    }

    let investigation =
      Investigation::new(input.message_id, input.priority, input.customer_info);

    let id_str           = encode_uuid(investigation.investigation_id);
    let reference_number = investigation.reference_number.clone();
    let message_id_str   = encode_uuid(investigation.message_id);
    let status           = investigation.status.as_str().to_owned();
    let priority         = investigation.priority.as_str().to_owned();
    let customer_info    = investigation
      .customer_info
      .as_ref()
      .map(encode_customer_info)
      .transpose()?;
    let created_at       = encode_dt(investigation.created_at);
    let updated_at       = encode_dt(investigation.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO investigations (
             investigation_id, reference_number, message_id, status, priority,
             customer_info, resolution_notes, created_at, updated_at,
             resolved_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, NULL)",
          rusqlite::params![
            id_str,
            reference_number,
            message_id_str,
            status,
            priority,
            customer_info,
            created_at,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(investigation)
  }

  async fn get_investigation(&self, id: Uuid) -> Result<Option<Investigation>> {
    self.load(id).await
  }

  async fn get_by_reference(
    &self,
    reference: &str,
  ) -> Result<Option<Investigation>> {
    let reference = reference.to_owned();
    let id_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT investigation_id FROM investigations
               WHERE reference_number = ?1",
              rusqlite::params![reference],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match id_str {
      Some(s) => self.load(decode_uuid(&s)?).await,
      None => Ok(None),
    }
  }

  async fn list_investigations(
    &self,
    query: &InvestigationQuery,
  ) -> Result<InvestigationPage> {
    let status_str   = query.status.map(|s| s.as_str().to_owned());
    let priority_str = query.priority.map(|p| p.as_str().to_owned());
    let limit_val    = query.limit.unwrap_or(100) as i64;
    let offset_val   = query.offset.unwrap_or(0) as i64;

    let (total, raws): (i64, Vec<RawSummary>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM investigations i
           WHERE (?1 IS NULL OR i.status = ?1)
             AND (?2 IS NULL OR i.priority = ?2)",
          rusqlite::params![status_str.as_deref(), priority_str.as_deref()],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(
          "SELECT i.investigation_id, i.reference_number, i.status,
                  i.priority, i.customer_info, i.created_at, i.updated_at,
                  m.reference
           FROM investigations i
           LEFT JOIN messages m ON m.message_id = i.message_id
           WHERE (?1 IS NULL OR i.status = ?1)
             AND (?2 IS NULL OR i.priority = ?2)
           ORDER BY i.updated_at DESC
           LIMIT ?3 OFFSET ?4",
        )?;
        let mut rows = stmt
          .query_map(
            rusqlite::params![
              status_str.as_deref(),
              priority_str.as_deref(),
              limit_val,
              offset_val,
            ],
            |row| {
              Ok(RawSummary {
                investigation_id:  row.get(0)?,
                reference_number:  row.get(1)?,
                status:            row.get(2)?,
                priority:          row.get(3)?,
                customer_info:     row.get(4)?,
                created_at:        row.get(5)?,
                updated_at:        row.get(6)?,
                message_reference: row.get(7)?,
                action_tallies:    Vec::new(),
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut tally_stmt = conn.prepare(
          "SELECT status, COUNT(*) FROM investigation_actions
           WHERE investigation_id = ?1
           GROUP BY status",
        )?;
        for raw in &mut rows {
          raw.action_tallies = tally_stmt
            .query_map(
              rusqlite::params![raw.investigation_id.clone()],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        }

        Ok((total, rows))
      })
      .await?;

    let now = Utc::now();
    let investigations = raws
      .into_iter()
      .map(|raw| raw.into_summary(now))
      .collect::<Result<Vec<_>>>()?;

    Ok(InvestigationPage {
      total: total as usize,
      investigations,
      limit: limit_val as usize,
      offset: offset_val as usize,
    })
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn add_action(
    &self,
    investigation_id: Uuid,
    input: NewAction,
  ) -> Result<Action> {
    let mut investigation = self.load_required(investigation_id).await?;
    let action = investigation.add_action(input)?;

    self
      .insert_action_row(investigation.investigation_id, &action)
      .await?;
    self.update_investigation_row(&investigation).await?;
    Ok(action)
  }

  async fn update_action_status(
    &self,
    investigation_id: Uuid,
    action_id: Uuid,
    new_status: ActionStatus,
    notes: Option<String>,
  ) -> Result<Action> {
    let mut investigation = self.load_required(investigation_id).await?;
    let action = investigation.update_action_status(
      action_id,
      new_status,
      notes.as_deref(),
    )?;

    self.update_action_row(&action).await?;
    self.update_investigation_row(&investigation).await?;
    Ok(action)
  }

  async fn resolve_investigation(
    &self,
    investigation_id: Uuid,
    resolution_notes: String,
  ) -> Result<Investigation> {
    let mut investigation = self.load_required(investigation_id).await?;
    investigation.resolve(&resolution_notes)?;

    self.update_investigation_row(&investigation).await?;
    Ok(investigation)
  }

  async fn close_investigation(
    &self,
    investigation_id: Uuid,
  ) -> Result<Investigation> {
    let mut investigation = self.load_required(investigation_id).await?;
    investigation.close()?;

    self.update_investigation_row(&investigation).await?;
    Ok(investigation)
  }

  // ── Reporting ─────────────────────────────────────────────────────────────

  async fn analytics(&self) -> Result<AnalyticsSummary> {
    type Tally = Vec<(String, i64)>;

    let (status_rows, priority_rows, type_rows, avg_hours): (
      Tally,
      Tally,
      Tally,
      Option<f64>,
    ) = self
      .conn
      .call(move |conn| {
        let tally = |conn: &rusqlite::Connection, sql: &str| {
          let mut stmt = conn.prepare(sql)?;
          let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<(String, i64)>>>()?;
          Ok::<_, rusqlite::Error>(rows)
        };

        let status_rows = tally(
          conn,
          "SELECT status, COUNT(*) FROM investigations GROUP BY status",
        )?;
        let priority_rows = tally(
          conn,
          "SELECT priority, COUNT(*) FROM investigations GROUP BY priority",
        )?;
        let type_rows = tally(
          conn,
          "SELECT action_type, COUNT(*) FROM investigation_actions
           GROUP BY action_type",
        )?;

        let avg_hours: Option<f64> = conn.query_row(
          "SELECT AVG((julianday(resolved_at) - julianday(created_at)) * 24.0)
           FROM investigations WHERE resolved_at IS NOT NULL",
          [],
          |row| row.get(0),
        )?;

        Ok((status_rows, priority_rows, type_rows, avg_hours))
      })
      .await?;

    let mut status_counts = StatusCounts::default();
    for (status, n) in &status_rows {
      let n = *n as usize;
      match decode_investigation_status(status)? {
        InvestigationStatus::Open => status_counts.open += n,
        InvestigationStatus::InProgress => status_counts.in_progress += n,
        InvestigationStatus::Resolved => status_counts.resolved += n,
        InvestigationStatus::Closed => status_counts.closed += n,
      }
    }

    let mut priority_counts = PriorityCounts::default();
    for (priority, n) in &priority_rows {
      let n = *n as usize;
      match decode_priority(priority)? {
        Priority::Low => priority_counts.low += n,
        Priority::Medium => priority_counts.medium += n,
        Priority::High => priority_counts.high += n,
        Priority::Critical => priority_counts.critical += n,
      }
    }

    let mut action_type_counts = ActionTypeCounts::default();
    for (action_type, n) in &type_rows {
      let n = *n as usize;
      match decode_action_type(action_type)? {
        ActionType::InformationRequest => {
          action_type_counts.information_request += n
        }
        ActionType::AmendmentRequest => {
          action_type_counts.amendment_request += n
        }
        ActionType::CustomerNotification => {
          action_type_counts.customer_notification += n
        }
        ActionType::Cancellation => action_type_counts.cancellation += n,
        ActionType::Other => action_type_counts.other += n,
      }
    }

    let total_investigations = status_counts.open
      + status_counts.in_progress
      + status_counts.resolved
      + status_counts.closed;

    Ok(AnalyticsSummary {
      status_counts,
      priority_counts,
      action_type_counts,
      total_investigations,
      avg_resolution_hours: avg_hours.unwrap_or(0.0),
      updated_at: Utc::now(),
    })
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_settings(&self) -> Result<UserSettings> {
    let defaults      = UserSettings::defaults(Utc::now());
    let default_model = defaults.model.clone();
    let default_mode  = defaults.default_mode.as_str().to_owned();
    let created_at    = encode_dt(defaults.created_at);

    let raw: Option<RawSettings> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            "SELECT api_key, model, default_mode, created_at, updated_at
             FROM user_settings WHERE id = 1",
            [],
            |row| {
              Ok(RawSettings {
                api_key:      row.get(0)?,
                model:        row.get(1)?,
                default_mode: row.get(2)?,
                created_at:   row.get(3)?,
                updated_at:   row.get(4)?,
              })
            },
          )
          .optional()?;

        if existing.is_none() {
          conn.execute(
            "INSERT INTO user_settings (id, api_key, model, default_mode,
                                        created_at, updated_at)
             VALUES (1, NULL, ?1, ?2, ?3, ?3)",
            rusqlite::params![default_model, default_mode, created_at],
          )?;
        }

        Ok(existing)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_settings(),
      None => Ok(defaults),
    }
  }

  async fn update_settings(&self, update: SettingsUpdate) -> Result<UserSettings> {
    let mut settings = self.get_settings().await?;
    settings.apply(update, Utc::now());
    self.write_settings(&settings).await?;
    Ok(settings)
  }

  async fn clear_api_key(&self) -> Result<UserSettings> {
    let mut settings = self.get_settings().await?;
    settings.api_key = None;
    settings.updated_at = Utc::now();
    self.write_settings(&settings).await?;
    Ok(settings)
  }
}
