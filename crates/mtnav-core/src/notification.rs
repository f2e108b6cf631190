//! Customer notification composition.
//!
//! AI-backed generation lives behind the external API boundary and is not
//! reproduced here; what ships are the deterministic subject/body templates
//! used for each notification type. Type membership is validated at the
//! enum boundary before any dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::investigation::Investigation;

/// The kinds of customer notification that can be requested.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
  #[default]
  StatusUpdate,
  RequestInfo,
  Resolution,
}

impl NotificationType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::StatusUpdate => "status_update",
      Self::RequestInfo => "request_info",
      Self::Resolution => "resolution",
    }
  }
}

/// A composed customer notification, ready to be sent by an external
/// delivery channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
  pub subject:           String,
  pub body:              String,
  pub investigation_id:  Uuid,
  pub reference_number:  String,
  pub notification_type: NotificationType,
  pub generated_at:      DateTime<Utc>,
}

impl Notification {
  /// Compose a notification for `investigation` from the built-in
  /// templates.
  pub fn compose(investigation: &Investigation, kind: NotificationType) -> Self {
    let reference = investigation.reference_number.as_str();
    let greeting = investigation
      .customer_info
      .as_ref()
      .and_then(|c| c.name.as_deref())
      .map(|name| format!("Dear {name},"))
      .unwrap_or_else(|| "Dear Customer,".to_owned());

    let (subject, detail) = match kind {
      NotificationType::StatusUpdate => (
        format!("Update on your payment investigation - Ref: {reference}"),
        format!(
          "The current status of your investigation is: {}.",
          investigation.status.as_str()
        ),
      ),
      NotificationType::RequestInfo => (
        format!(
          "Information required for your payment investigation - Ref: {reference}"
        ),
        "To progress your investigation we require additional information. \
         Please reply to this message with the requested details."
          .to_owned(),
      ),
      NotificationType::Resolution => (
        format!(
          "Your payment investigation has been resolved - Ref: {reference}"
        ),
        match investigation.resolution_notes.as_deref() {
          Some(notes) => format!(
            "Your investigation has been resolved. Resolution details: {notes}"
          ),
          None => "Your investigation has been resolved.".to_owned(),
        },
      ),
    };

    let body = format!(
      "{greeting}\n\n\
       This message concerns your payment investigation (Reference: {reference}).\n\n\
       {detail}\n\n\
       We will continue to keep you informed of any developments.\n\n\
       Best regards,\nThe Investigation Team"
    );

    Self {
      subject,
      body,
      investigation_id: investigation.investigation_id,
      reference_number: investigation.reference_number.clone(),
      notification_type: kind,
      generated_at: Utc::now(),
    }
  }
}
