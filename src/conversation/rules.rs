//! Keyword rules, applied in a fixed order.
//!
//! Every rule runs on every message. A rule that fires replaces the reply
//! chosen so far and, unless it is reply-only, the context as well. Later
//! rules see the context left by earlier ones within the same message.
//!
//! Order: greeting → symptoms → follow-up → emergency → appointment → farewell.

use super::replies::Reply;
use super::types::{ContextKind, Message};
use crate::appointment::{extract_appointment_details, AppointmentRecord};

/// What a fired rule contributes to the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub reply: Reply,
    /// `None` leaves the context as it was.
    pub context: Option<ContextKind>,
    /// Appointment to record, set only by the booking step.
    pub booking: Option<AppointmentRecord>,
}

impl RuleOutcome {
    fn reply_and_context(reply: Reply, context: ContextKind) -> Self {
        Self {
            reply,
            context: Some(context),
            booking: None,
        }
    }

    fn reply_only(reply: Reply) -> Self {
        Self {
            reply,
            context: None,
            booking: None,
        }
    }
}

/// A named keyword rule. `apply` is pure: it reads the current context and
/// the message and returns what it would change.
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(ContextKind, &Message<'_>) -> Option<RuleOutcome>,
}

pub static RULES: [Rule; 6] = [
    Rule {
        name: "greeting",
        apply: greeting,
    },
    Rule {
        name: "symptom",
        apply: symptom,
    },
    Rule {
        name: "followup",
        apply: followup,
    },
    Rule {
        name: "emergency",
        apply: emergency,
    },
    Rule {
        name: "appointment",
        apply: appointment,
    },
    Rule {
        name: "farewell",
        apply: farewell,
    },
];

/// Result of running the whole cascade over one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub reply: Reply,
    pub context: ContextKind,
    pub booking: Option<AppointmentRecord>,
    /// Names of the rules that fired, in order.
    pub fired: Vec<&'static str>,
}

/// Run every rule against `message`, starting from `context`.
pub fn evaluate(context: ContextKind, message: &Message<'_>) -> Evaluation {
    let mut eval = Evaluation {
        reply: Reply::Fallback,
        context,
        booking: None,
        fired: Vec::new(),
    };

    for rule in RULES.iter() {
        let Some(outcome) = (rule.apply)(eval.context, message) else {
            continue;
        };
        eval.fired.push(rule.name);
        eval.reply = outcome.reply;
        if let Some(next) = outcome.context {
            eval.context = next;
        }
        if outcome.booking.is_some() {
            eval.booking = outcome.booking;
        }
    }

    eval
}

fn greeting(_: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    msg.contains("hello")
        .then(|| RuleOutcome::reply_and_context(Reply::Greeting, ContextKind::Greeting))
}

fn symptom(_: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    let (reply, context) = if msg.contains("fever") {
        (Reply::Fever, ContextKind::FeverFollowup)
    } else if msg.contains("headache") {
        (Reply::Headache, ContextKind::HeadacheFollowup)
    } else if msg.contains("sore throat") {
        (Reply::SoreThroat, ContextKind::General)
    } else if msg.contains("covid") {
        (Reply::Covid, ContextKind::Covid)
    } else {
        return None;
    };
    Some(RuleOutcome::reply_and_context(reply, context))
}

fn followup(context: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    match context {
        ContextKind::FeverFollowup if msg.contains("days") => Some(
            RuleOutcome::reply_and_context(Reply::FeverPrescription, ContextKind::General),
        ),
        ContextKind::HeadacheFollowup if msg.contains("scale") => Some(
            RuleOutcome::reply_and_context(Reply::HeadachePrescription, ContextKind::General),
        ),
        _ => None,
    }
}

/// Overrides the reply only; the context stays as the earlier rules left it.
fn emergency(_: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    msg.contains_any(&["emergency", "heart attack"])
        .then(|| RuleOutcome::reply_only(Reply::Emergency))
}

fn appointment(context: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    if msg.contains_any(&["appointment", "book"]) {
        return Some(RuleOutcome::reply_and_context(
            Reply::AppointmentRequest,
            ContextKind::Appointment,
        ));
    }
    if context == ContextKind::Appointment && msg.contains("date") {
        let record = extract_appointment_details(msg.lowered());
        return Some(RuleOutcome {
            reply: Reply::AppointmentConfirmed {
                date: record.date.clone(),
                time: record.time.clone(),
            },
            context: Some(ContextKind::AppointmentConfirmation),
            booking: Some(record),
        });
    }
    None
}

fn farewell(_: ContextKind, msg: &Message<'_>) -> Option<RuleOutcome> {
    msg.contains_any(&["goodbye", "bye"])
        .then(|| RuleOutcome::reply_and_context(Reply::Goodbye, ContextKind::General))
}
