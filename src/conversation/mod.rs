//! Keyword-driven conversation engine.
//!
//! A message is lowercased and run through a fixed list of keyword rules
//! (see [`rules`]). The rules pick a reply and move the user's context,
//! which in turn decides which follow-up rules can fire on the next message.
//! This is substring matching only; there is no language understanding.

pub mod dispatcher;
pub mod replies;
pub mod rules;
pub mod store;
pub mod types;

pub use dispatcher::{DispatchOutcome, Dispatcher, ANONYMOUS_USER};
pub use store::{ContextStore, InMemoryContextStore};
pub use types::{ContextKind, ConversationContext};
