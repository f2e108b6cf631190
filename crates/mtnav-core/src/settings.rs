//! User settings — passthrough configuration for the external generation
//! service.
//!
//! Not part of the lifecycle model. Persisted as a single row, created with
//! defaults on first read. The stored API key is never returned verbatim;
//! callers display [`UserSettings::masked_api_key`] instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Model name used when the caller has not picked one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default processing mode of the conversion UI.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
  #[default]
  Convert,
  Extract,
}

impl ProcessingMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Convert => "convert",
      Self::Extract => "extract",
    }
  }
}

/// The single stored settings record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
  pub api_key:      Option<String>,
  pub model:        String,
  pub default_mode: ProcessingMode,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl UserSettings {
  /// The defaults written on first read.
  pub fn defaults(now: DateTime<Utc>) -> Self {
    Self {
      api_key: None,
      model: DEFAULT_MODEL.to_owned(),
      default_mode: ProcessingMode::default(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Display form of the key: first and last four characters with the
  /// middle elided, or fully masked for short keys.
  pub fn masked_api_key(&self) -> Option<String> {
    self.api_key.as_deref().map(|key| {
      let chars: Vec<char> = key.chars().collect();
      if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
      } else {
        "****".to_owned()
      }
    })
  }

  /// Apply a partial update; untouched fields keep their current values.
  pub fn apply(&mut self, update: SettingsUpdate, now: DateTime<Utc>) {
    if let Some(key) = update.api_key {
      self.api_key = Some(key);
    }
    if let Some(model) = update.model {
      self.model = model;
    }
    if let Some(mode) = update.default_mode {
      self.default_mode = mode;
    }
    self.updated_at = now;
  }
}

/// Partial update for [`UserSettings`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
  pub api_key:      Option<String>,
  pub model:        Option<String>,
  pub default_mode: Option<ProcessingMode>,
}
