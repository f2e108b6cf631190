//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enum columns store the
//! same snake_case strings serde uses on the wire (via the core `as_str`
//! methods). Customer info is stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use mtnav_core::{
  action::{Action, ActionStatus, ActionType, Priority},
  investigation::{CustomerInfo, Investigation, InvestigationStatus},
  message::{Message, MessageFormat},
  progress::ActionCounts,
  settings::{ProcessingMode, UserSettings},
  store::InvestigationSummary,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_dt_opt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_message_format(s: &str) -> Result<MessageFormat> {
  match s {
    "mt" => Ok(MessageFormat::Mt),
    "mx" => Ok(MessageFormat::Mx),
    other => Err(Error::Decode(format!("message format: {other:?}"))),
  }
}

pub fn decode_investigation_status(s: &str) -> Result<InvestigationStatus> {
  match s {
    "open" => Ok(InvestigationStatus::Open),
    "in_progress" => Ok(InvestigationStatus::InProgress),
    "resolved" => Ok(InvestigationStatus::Resolved),
    "closed" => Ok(InvestigationStatus::Closed),
    other => Err(Error::Decode(format!("investigation status: {other:?}"))),
  }
}

pub fn decode_priority(s: &str) -> Result<Priority> {
  match s {
    "low" => Ok(Priority::Low),
    "medium" => Ok(Priority::Medium),
    "high" => Ok(Priority::High),
    "critical" => Ok(Priority::Critical),
    other => Err(Error::Decode(format!("priority: {other:?}"))),
  }
}

pub fn decode_action_type(s: &str) -> Result<ActionType> {
  match s {
    "information_request" => Ok(ActionType::InformationRequest),
    "amendment_request" => Ok(ActionType::AmendmentRequest),
    "customer_notification" => Ok(ActionType::CustomerNotification),
    "cancellation" => Ok(ActionType::Cancellation),
    "other" => Ok(ActionType::Other),
    other => Err(Error::Decode(format!("action type: {other:?}"))),
  }
}

pub fn decode_action_status(s: &str) -> Result<ActionStatus> {
  match s {
    "pending" => Ok(ActionStatus::Pending),
    "in_progress" => Ok(ActionStatus::InProgress),
    "completed" => Ok(ActionStatus::Completed),
    "cancelled" => Ok(ActionStatus::Cancelled),
    other => Err(Error::Decode(format!("action status: {other:?}"))),
  }
}

pub fn decode_processing_mode(s: &str) -> Result<ProcessingMode> {
  match s {
    "convert" => Ok(ProcessingMode::Convert),
    "extract" => Ok(ProcessingMode::Extract),
    other => Err(Error::Decode(format!("processing mode: {other:?}"))),
  }
}

// ─── Customer info ───────────────────────────────────────────────────────────

pub fn encode_customer_info(info: &CustomerInfo) -> Result<String> {
  Ok(serde_json::to_string(info)?)
}

pub fn decode_customer_info(s: &str) -> Result<CustomerInfo> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `messages` row.
pub struct RawMessage {
  pub message_id: String,
  pub reference:  String,
  pub format:     String,
  pub content:    String,
  pub created_at: String,
}

impl RawMessage {
  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      message_id: decode_uuid(&self.message_id)?,
      reference:  self.reference,
      format:     decode_message_format(&self.format)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `investigations` row; actions are
/// loaded separately and supplied to [`RawInvestigation::into_investigation`].
pub struct RawInvestigation {
  pub investigation_id: String,
  pub reference_number: String,
  pub message_id:       String,
  pub status:           String,
  pub priority:         String,
  pub customer_info:    Option<String>,
  pub resolution_notes: Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
  pub resolved_at:      Option<String>,
}

impl RawInvestigation {
  pub fn into_investigation(self, actions: Vec<Action>) -> Result<Investigation> {
    Ok(Investigation {
      investigation_id: decode_uuid(&self.investigation_id)?,
      reference_number: self.reference_number,
      message_id:       decode_uuid(&self.message_id)?,
      status:           decode_investigation_status(&self.status)?,
      priority:         decode_priority(&self.priority)?,
      customer_info:    self
        .customer_info
        .as_deref()
        .map(decode_customer_info)
        .transpose()?,
      actions,
      resolution_notes: self.resolution_notes,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
      resolved_at:      decode_dt_opt(self.resolved_at.as_deref())?,
    })
  }
}

/// Raw strings read directly from an `investigation_actions` row.
pub struct RawAction {
  pub action_id:          String,
  pub action_type:        String,
  pub description:        String,
  pub suggested_response: Option<String>,
  pub status:             String,
  pub priority:           String,
  pub deadline:           Option<String>,
  pub notes:              Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
  pub completed_at:       Option<String>,
}

impl RawAction {
  pub fn into_action(self) -> Result<Action> {
    Ok(Action {
      action_id:          decode_uuid(&self.action_id)?,
      action_type:        decode_action_type(&self.action_type)?,
      description:        self.description,
      suggested_response: self.suggested_response,
      status:             decode_action_status(&self.status)?,
      priority:           decode_priority(&self.priority)?,
      deadline:           decode_dt_opt(self.deadline.as_deref())?,
      notes:              self.notes,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
      completed_at:       decode_dt_opt(self.completed_at.as_deref())?,
    })
  }
}

/// Raw list-page row plus the per-investigation action tally gathered in
/// the same database call (`(status, count)` pairs from a GROUP BY).
pub struct RawSummary {
  pub investigation_id:  String,
  pub reference_number:  String,
  pub status:            String,
  pub priority:          String,
  pub customer_info:     Option<String>,
  pub created_at:        String,
  pub updated_at:        String,
  pub message_reference: Option<String>,
  pub action_tallies:    Vec<(String, i64)>,
}

impl RawSummary {
  pub fn into_summary(self, now: DateTime<Utc>) -> Result<InvestigationSummary> {
    let created_at = decode_dt(&self.created_at)?;
    let customer_name = self
      .customer_info
      .as_deref()
      .map(decode_customer_info)
      .transpose()?
      .and_then(|info| info.name);

    let mut action_counts = ActionCounts::default();
    for (status, n) in &self.action_tallies {
      let n = *n as usize;
      action_counts.total += n;
      match decode_action_status(status)? {
        ActionStatus::Pending => action_counts.pending += n,
        ActionStatus::InProgress => action_counts.in_progress += n,
        ActionStatus::Completed => action_counts.completed += n,
        ActionStatus::Cancelled => action_counts.cancelled += n,
      }
    }

    Ok(InvestigationSummary {
      investigation_id:  decode_uuid(&self.investigation_id)?,
      reference_number:  self.reference_number,
      status:            decode_investigation_status(&self.status)?,
      priority:          decode_priority(&self.priority)?,
      message_reference: self.message_reference,
      customer_name,
      action_counts,
      created_at,
      updated_at:        decode_dt(&self.updated_at)?,
      days_open:         (now - created_at).num_days(),
    })
  }
}

/// Raw strings read directly from the `user_settings` row.
pub struct RawSettings {
  pub api_key:      Option<String>,
  pub model:        String,
  pub default_mode: String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawSettings {
  pub fn into_settings(self) -> Result<UserSettings> {
    Ok(UserSettings {
      api_key:      self.api_key,
      model:        self.model,
      default_mode: decode_processing_mode(&self.default_mode)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
