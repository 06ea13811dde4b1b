//! Transport-agnostic application state.
//!
//! `CoreState` owns the conversation dispatcher, the context store behind it
//! and the appointment log. It is wrapped in `Arc` at startup and shared by
//! every request handler.

use std::sync::Arc;

use crate::appointment::{AppointmentLog, AppointmentRecord};
use crate::conversation::dispatcher::resolve_user_id;
use crate::conversation::{ContextStore, DispatchOutcome, Dispatcher, InMemoryContextStore};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    dispatcher: Dispatcher,
    appointments: Arc<AppointmentLog>,
}

impl CoreState {
    /// Create a CoreState backed by the in-memory context store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryContextStore::new()))
    }

    /// Create a CoreState with a caller-provided context store.
    pub fn with_store(store: Arc<dyn ContextStore>) -> Self {
        let appointments = Arc::new(AppointmentLog::new());
        Self {
            dispatcher: Dispatcher::new(store, appointments.clone()),
            appointments,
        }
    }

    /// Run one patient message through the dispatcher.
    pub fn handle_message(
        &self,
        user_id: Option<&str>,
        message: &str,
    ) -> Result<DispatchOutcome, CoreError> {
        self.dispatcher.handle(user_id, message)
    }

    /// Every appointment booked since startup, oldest first.
    pub fn appointments(&self) -> Result<Vec<AppointmentRecord>, CoreError> {
        self.appointments.list()
    }

    /// Last appointment booked by a user, if any.
    pub fn last_appointment(
        &self,
        user_id: Option<&str>,
    ) -> Result<Option<AppointmentRecord>, CoreError> {
        let user_id = resolve_user_id(user_id);
        Ok(self
            .dispatcher
            .store()
            .get(user_id)?
            .and_then(|ctx| ctx.appointment))
    }

    /// Number of distinct users with a conversation context.
    pub fn user_count(&self) -> Result<usize, CoreError> {
        self.dispatcher.store().user_count()
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
