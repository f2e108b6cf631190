//! Message records — the externally-produced SWIFT messages that
//! investigations reference.
//!
//! Content is opaque to this service: parsing and MT→MX conversion happen
//! upstream. Messages are registered as-is and investigations hold a
//! read-only reference that never changes after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The SWIFT format family a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
  Mt,
  Mx,
}

impl MessageFormat {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Mt => "mt",
      Self::Mx => "mx",
    }
  }
}

/// A stored message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub message_id: Uuid,
  /// The sender's message reference from the SWIFT header (field 20).
  pub reference:  String,
  pub format:     MessageFormat,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::InvestigationStore::add_message`].
/// `message_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
  pub reference: String,
  pub format:    MessageFormat,
  pub content:   String,
}
