use std::sync::{Arc, Mutex};

use super::rules::evaluate;
use super::store::ContextStore;
use super::types::{ContextKind, Message};
use crate::appointment::{AppointmentLog, AppointmentRecord};
use crate::core_state::CoreError;

/// User id used when a request does not carry one.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub user_id: String,
    pub reply: String,
    pub context: ContextKind,
    /// Rules that fired, in evaluation order.
    pub fired: Vec<&'static str>,
    /// Appointment booked by this message, if any.
    pub booked: Option<AppointmentRecord>,
}

/// Runs the keyword rules for a user and persists the resulting context.
///
/// Turns are serialised: a message's context read, rule evaluation,
/// appointment append and context write complete before the next message
/// starts, so concurrent requests cannot lose updates.
pub struct Dispatcher {
    store: Arc<dyn ContextStore>,
    appointments: Arc<AppointmentLog>,
    turn: Mutex<()>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ContextStore>, appointments: Arc<AppointmentLog>) -> Self {
        Self {
            store,
            appointments,
            turn: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &dyn ContextStore {
        self.store.as_ref()
    }

    /// Handle a message from `user_id` (anonymous when absent or empty).
    pub fn handle(
        &self,
        user_id: Option<&str>,
        message: &str,
    ) -> Result<DispatchOutcome, CoreError> {
        let user_id = resolve_user_id(user_id);
        let message = Message::new(message);

        let _turn = self.turn.lock().map_err(|_| CoreError::LockPoisoned)?;

        let mut state = self.store.get_or_create(user_id)?;
        let eval = evaluate(state.context, &message);

        if let Some(record) = &eval.booking {
            self.appointments.append(record.clone())?;
            state.appointment = Some(record.clone());
            tracing::info!(
                user_id,
                date = %record.date,
                time = %record.time,
                "Appointment booked"
            );
        }

        let previous = state.context;
        state.context = eval.context;
        self.store.update(user_id, state)?;

        tracing::debug!(
            user_id,
            rules = ?eval.fired,
            from = %previous,
            to = %eval.context,
            "Message dispatched"
        );

        Ok(DispatchOutcome {
            user_id: user_id.to_string(),
            reply: eval.reply.text(),
            context: eval.context,
            fired: eval.fired,
            booked: eval.booking,
        })
    }
}

/// Map a missing or empty user id to [`ANONYMOUS_USER`].
pub fn resolve_user_id(user_id: Option<&str>) -> &str {
    match user_id {
        Some(id) if !id.is_empty() => id,
        _ => ANONYMOUS_USER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::replies;
    use crate::conversation::store::InMemoryContextStore;
    use crate::conversation::types::ConversationContext;

    fn dispatcher() -> (Dispatcher, Arc<AppointmentLog>) {
        let log = Arc::new(AppointmentLog::new());
        let store = Arc::new(InMemoryContextStore::new());
        (Dispatcher::new(store, log.clone()), log)
    }

    fn context_of(d: &Dispatcher, user: &str) -> ContextKind {
        d.store().get(user).unwrap().unwrap().context
    }

    #[test]
    fn missing_or_empty_user_id_is_anonymous() {
        assert_eq!(resolve_user_id(None), ANONYMOUS_USER);
        assert_eq!(resolve_user_id(Some("")), ANONYMOUS_USER);
        assert_eq!(resolve_user_id(Some("u7")), "u7");
    }

    #[test]
    fn greeting_updates_stored_context() {
        let (d, _) = dispatcher();
        let out = d.handle(Some("u1"), "hello").unwrap();
        assert_eq!(out.reply, replies::GREETING);
        assert_eq!(out.context, ContextKind::Greeting);
        assert_eq!(context_of(&d, "u1"), ContextKind::Greeting);
    }

    #[test]
    fn fever_then_days_gives_prescription() {
        let (d, _) = dispatcher();
        let first = d.handle(Some("u1"), "I have a fever").unwrap();
        assert_eq!(first.reply, replies::FEVER);
        assert_eq!(context_of(&d, "u1"), ContextKind::FeverFollowup);

        let second = d.handle(Some("u1"), "it's been 3 days").unwrap();
        assert_eq!(second.reply, replies::FEVER_PRESCRIPTION);
        assert_eq!(context_of(&d, "u1"), ContextKind::General);
    }

    #[test]
    fn emergency_with_fever_keeps_fever_context() {
        let (d, _) = dispatcher();
        let out = d.handle(Some("u1"), "EMERGENCY, my fever is very high").unwrap();
        assert_eq!(out.reply, replies::EMERGENCY);
        assert_eq!(context_of(&d, "u1"), ContextKind::FeverFollowup);
    }

    #[test]
    fn booking_flow_records_appointment() {
        let (d, log) = dispatcher();
        let first = d.handle(Some("u2"), "I want to book an appointment").unwrap();
        assert_eq!(first.reply, replies::APPOINTMENT_REQUEST);
        assert_eq!(context_of(&d, "u2"), ContextKind::Appointment);

        let msg = "On 5th Jan at 3PM, let's set the date";
        let second = d.handle(Some("u2"), msg).unwrap();
        assert_eq!(
            second.reply,
            replies::appointment_confirmation("5th jan", "3pm")
        );

        let records = log.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "5th jan");
        assert_eq!(records[0].time, "3pm");
        assert_eq!(records[0].details, "on 5th jan at 3pm, let's set the date");

        let state = d.store().get("u2").unwrap().unwrap();
        assert_eq!(state.context, ContextKind::AppointmentConfirmation);
        assert_eq!(state.appointment.as_ref(), Some(&records[0]));
        assert_eq!(second.booked.as_ref(), Some(&records[0]));
    }

    #[test]
    fn no_match_is_idempotent() {
        let (d, _) = dispatcher();
        d.handle(Some("u1"), "covid?").unwrap();
        for _ in 0..3 {
            let out = d.handle(Some("u1"), "what should I eat").unwrap();
            assert_eq!(out.reply, replies::FALLBACK);
            assert_eq!(context_of(&d, "u1"), ContextKind::Covid);
        }
    }

    #[test]
    fn first_message_without_keywords_leaves_context_unset() {
        let (d, _) = dispatcher();
        let out = d.handle(None, "hmm").unwrap();
        assert_eq!(out.user_id, ANONYMOUS_USER);
        assert_eq!(context_of(&d, ANONYMOUS_USER), ContextKind::Unset);
    }

    #[test]
    fn users_do_not_share_context() {
        let (d, _) = dispatcher();
        d.handle(Some("a"), "I have a headache").unwrap();
        d.handle(Some("b"), "hello").unwrap();
        assert_eq!(context_of(&d, "a"), ContextKind::HeadacheFollowup);
        assert_eq!(context_of(&d, "b"), ContextKind::Greeting);

        // "scale" only refines a headache for the user who reported it
        let out = d.handle(Some("b"), "on a scale of 1-10, 6").unwrap();
        assert_eq!(out.reply, replies::FALLBACK);
        let out = d.handle(Some("a"), "on a scale of 1-10, 6").unwrap();
        assert_eq!(out.reply, replies::HEADACHE_PRESCRIPTION);
    }

    #[test]
    fn appointments_accumulate_across_users_in_order() {
        let (d, log) = dispatcher();
        d.handle(Some("a"), "book").unwrap();
        d.handle(Some("b"), "book").unwrap();
        d.handle(Some("b"), "date: 2 feb").unwrap();
        d.handle(Some("a"), "date: 1 jan").unwrap();

        let dates: Vec<_> = log.list().unwrap().into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec!["2 feb", "1 jan"]);
    }

    /// Store wrapper that journals every read and write it serves.
    struct JournalingStore {
        inner: InMemoryContextStore,
        journal: Mutex<Vec<(&'static str, ContextKind)>>,
    }

    impl ContextStore for JournalingStore {
        fn get_or_create(&self, user_id: &str) -> Result<ConversationContext, CoreError> {
            let ctx = self.inner.get_or_create(user_id)?;
            self.journal.lock().unwrap().push(("read", ctx.context));
            Ok(ctx)
        }

        fn update(&self, user_id: &str, context: ConversationContext) -> Result<(), CoreError> {
            self.journal.lock().unwrap().push(("write", context.context));
            self.inner.update(user_id, context)
        }

        fn get(&self, user_id: &str) -> Result<Option<ConversationContext>, CoreError> {
            self.inner.get(user_id)
        }

        fn user_count(&self) -> Result<usize, CoreError> {
            self.inner.user_count()
        }
    }

    #[test]
    fn concurrent_turns_for_one_user_are_not_lost() {
        let store = Arc::new(JournalingStore {
            inner: InMemoryContextStore::new(),
            journal: Mutex::new(Vec::new()),
        });
        let log = Arc::new(AppointmentLog::new());
        let d = Arc::new(Dispatcher::new(store.clone(), log.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let d = d.clone();
                std::thread::spawn(move || {
                    let mut booked = 0;
                    for _ in 0..20 {
                        d.handle(Some("shared"), "book").unwrap();
                        if d.handle(Some("shared"), "date 3 mar").unwrap().booked.is_some() {
                            booked += 1;
                        }
                    }
                    booked
                })
            })
            .collect();
        let booked: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // Turns never overlap: reads and writes strictly alternate, and each
        // turn reads exactly what the previous turn wrote.
        let journal = store.journal.lock().unwrap();
        assert_eq!(journal.len(), 160 * 2);
        let mut last_written = ContextKind::Unset;
        let mut bookings = 0;
        for pair in journal.chunks(2) {
            let [(read, seen), (write, written)] = pair else {
                panic!("unpaired store access");
            };
            assert_eq!((*read, *write), ("read", "write"));
            assert_eq!(*seen, last_written);
            if *written == ContextKind::AppointmentConfirmation {
                // A booking only happens right after a "book" turn
                assert_eq!(*seen, ContextKind::Appointment);
                bookings += 1;
            }
            last_written = *written;
        }

        let records = log.list().unwrap();
        assert!(bookings >= 1);
        assert_eq!(records.len(), bookings);
        assert_eq!(records.len(), booked);
        assert!(records.iter().all(|r| r.date == "3 mar"));
    }
}
