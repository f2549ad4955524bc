// Where role bearer tokens live between calls.

use std::collections::HashMap;
use std::sync::Mutex;

use schoolhub_core::db::Database;
use schoolhub_core::models::Role;
use tracing::warn;

pub trait TokenStore: Send + Sync {
    fn get(&self, role: Role) -> Option<String>;
    fn set(&self, role: Role, token: &str);
    fn clear(&self, role: Role);
}

/// Process-local token map.
#[derive(Default)]
pub struct MemoryTokens {
    tokens: Mutex<HashMap<Role, String>>,
}

impl MemoryTokens {
    pub fn with_token(role: Role, token: &str) -> Self {
        let store = Self::default();
        store.set(role, token);
        store
    }
}

impl TokenStore for MemoryTokens {
    fn get(&self, role: Role) -> Option<String> {
        let tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.get(&role).cloned()
    }

    fn set(&self, role: Role, token: &str) {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.insert(role, token.to_string());
    }

    fn clear(&self, role: Role) {
        let mut tokens = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        tokens.remove(&role);
    }
}

/// Tokens persisted in the local SQLite store. Storage failures are logged
/// and treated as a missing token.
impl TokenStore for Database {
    fn get(&self, role: Role) -> Option<String> {
        match self.load_token(role) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to load {}: {e:#}", role.token_key());
                None
            }
        }
    }

    fn set(&self, role: Role, token: &str) {
        if let Err(e) = self.save_token(role, token) {
            warn!("Failed to save {}: {e:#}", role.token_key());
        }
    }

    fn clear(&self, role: Role) {
        if let Err(e) = self.delete_token(role) {
            warn!("Failed to delete {}: {e:#}", role.token_key());
        }
    }
}
