//! Per-user conversation context storage.
//!
//! The dispatcher only talks to the [`ContextStore`] trait, so the in-memory
//! map can be replaced by a persistent backend without touching the rules.
//! Entries are never evicted.

use std::collections::HashMap;
use std::sync::RwLock;

use super::types::ConversationContext;
use crate::core_state::CoreError;

pub trait ContextStore: Send + Sync {
    /// Context for `user_id`, creating an unset one on first sight.
    fn get_or_create(&self, user_id: &str) -> Result<ConversationContext, CoreError>;

    /// Replace the stored context for `user_id`.
    fn update(&self, user_id: &str, context: ConversationContext) -> Result<(), CoreError>;

    /// Context for `user_id` without creating it.
    fn get(&self, user_id: &str) -> Result<Option<ConversationContext>, CoreError>;

    /// Number of distinct users seen.
    fn user_count(&self) -> Result<usize, CoreError>;
}

/// Process-lifetime map from user id to context.
#[derive(Debug, Default)]
pub struct InMemoryContextStore {
    entries: RwLock<HashMap<String, ConversationContext>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContextStore for InMemoryContextStore {
    fn get_or_create(&self, user_id: &str) -> Result<ConversationContext, CoreError> {
        let mut entries = self.entries.write().map_err(|_| CoreError::LockPoisoned)?;
        let entry = entries.entry(user_id.to_string()).or_insert_with(|| {
            tracing::debug!(user_id, "New conversation context");
            ConversationContext::default()
        });
        Ok(entry.clone())
    }

    fn update(&self, user_id: &str, context: ConversationContext) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(|_| CoreError::LockPoisoned)?;
        entries.insert(user_id.to_string(), context);
        Ok(())
    }

    fn get(&self, user_id: &str) -> Result<Option<ConversationContext>, CoreError> {
        let entries = self.entries.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(entries.get(user_id).cloned())
    }

    fn user_count(&self) -> Result<usize, CoreError> {
        let entries = self.entries.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(entries.len())
    }
}
