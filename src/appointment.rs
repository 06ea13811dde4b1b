//! Appointment booking — detail extraction and the process-wide log.
//!
//! Extraction is a best-effort scan with two independent patterns, one for
//! the time ("at 3pm", "at 10:30") and one for the date ("on 5th Jan", "12").
//! A field whose pattern does not match falls back to [`NOT_SPECIFIED`].
//!
//! The date pattern has no anchor separating dates from other numbers, so
//! "at 3pm" alone yields a date of "3pm".
//!
//! Digit, word and boundary classes are ASCII-only: "٣" is not a digit and
//! "é" is not a word character.

use std::sync::{LazyLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core_state::CoreError;

/// Placeholder stored when a time or date could not be found.
pub const NOT_SPECIFIED: &str = "not specified";

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(?-u:\b)at\s)((?-u:\d){1,2}(?::(?-u:\d){2})?\s*(?-u:am|pm)?)")
        .expect("valid regex: appointment time")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?-u:\b)(?:on\s)?((?-u:\d){1,2}(?-u:\w){0,2}\s*(?-u:\b)(?-u:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)?)",
    )
    .expect("valid regex: appointment date")
});

// ─── Types ────────────────────────────────────────────────────────────────────

/// One booked appointment, as extracted from a patient message.
///
/// `time` and `date` are never empty: a missing value is [`NOT_SPECIFIED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub time: String,
    pub date: String,
    /// The full message the record was extracted from.
    pub details: String,
}

// ─── Extraction ───────────────────────────────────────────────────────────────

/// Extract appointment time, date and details from a message. Callers pass
/// the lowercased text, so the stored fields are lowercase.
pub fn extract_appointment_details(message: &str) -> AppointmentRecord {
    AppointmentRecord {
        time: first_capture(&TIME_RE, message),
        date: first_capture(&DATE_RE, message),
        details: message.to_string(),
    }
}

fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

// ─── Log ──────────────────────────────────────────────────────────────────────

/// Append-only list of every appointment booked since startup.
#[derive(Debug, Default)]
pub struct AppointmentLog {
    records: RwLock<Vec<AppointmentRecord>>,
}

impl AppointmentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Appends are linearizable: each one observes all
    /// earlier appends.
    pub fn append(&self, record: AppointmentRecord) -> Result<(), CoreError> {
        let mut records = self.records.write().map_err(|_| CoreError::LockPoisoned)?;
        records.push(record);
        Ok(())
    }

    /// Snapshot of all records in creation order.
    pub fn list(&self) -> Result<Vec<AppointmentRecord>, CoreError> {
        let records = self.records.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(records.clone())
    }

    /// Number of records booked so far.
    pub fn count(&self) -> Result<usize, CoreError> {
        let records = self.records.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(records.len())
    }
}
