use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentRecord;

/// Conversational state tracked per user. Decides which follow-up rules
/// are eligible on the next message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// No message has set a context yet.
    #[default]
    Unset,
    Greeting,
    FeverFollowup,
    HeadacheFollowup,
    General,
    Covid,
    /// Waiting for the patient to give a date for a booking.
    Appointment,
    AppointmentConfirmation,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKind::Unset => "unset",
            ContextKind::Greeting => "greeting",
            ContextKind::FeverFollowup => "fever_followup",
            ContextKind::HeadacheFollowup => "headache_followup",
            ContextKind::General => "general",
            ContextKind::Covid => "covid",
            ContextKind::Appointment => "appointment",
            ContextKind::AppointmentConfirmation => "appointment_confirmation",
        }
    }
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything remembered about one user between messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub context: ContextKind,
    /// Last appointment booked by this user, if any.
    pub appointment: Option<AppointmentRecord>,
}

/// A patient message with its lowercased form precomputed for matching.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    raw: &'a str,
    lowered: String,
}

impl<'a> Message<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lowered: raw.to_lowercase(),
        }
    }

    /// The message exactly as received.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Lowercased message; this is what rules match and extract from.
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Case-insensitive substring check. `keyword` must be lowercase.
    pub fn contains(&self, keyword: &str) -> bool {
        self.lowered.contains(keyword)
    }

    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_unset_without_appointment() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.context, ContextKind::Unset);
        assert!(ctx.appointment.is_none());
    }

    #[test]
    fn context_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ContextKind::AppointmentConfirmation).unwrap();
        assert_eq!(json, "\"appointment_confirmation\"");
        assert_eq!(ContextKind::FeverFollowup.to_string(), "fever_followup");
    }

    #[test]
    fn message_matching_ignores_case() {
        let msg = Message::new("I have a FEVER");
        assert!(msg.contains("fever"));
        assert!(!msg.contains("headache"));
        assert_eq!(msg.raw(), "I have a FEVER");
        assert_eq!(msg.lowered(), "i have a fever");
    }

    #[test]
    fn contains_any_checks_every_keyword() {
        let msg = Message::new("Heart Attack symptoms?");
        assert!(msg.contains_any(&["emergency", "heart attack"]));
        assert!(!msg.contains_any(&["goodbye", "bye"]));
    }
}
