use std::sync::{Arc, Mutex};

use super::SessionToken;

/// Storage for the admin bearer token.
///
/// Holds at most one token under a single well-known slot. `AdminSession`
/// is the only writer; callers read through the session.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<SessionToken>;
    fn set(&self, token: &SessionToken);
    fn clear(&self);
}

/// Process-scoped token store. The token lives until it is cleared or the
/// process exits, and is never written to disk.
///
/// Clones share the same slot, so several sessions built from clones of
/// one store see the same login.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<SessionToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<SessionToken> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &SessionToken) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.clone());
    }

    fn clear(&self) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set(&SessionToken::new("T1"));
        assert_eq!(store.get(), Some(SessionToken::new("T1")));

        store.set(&SessionToken::new("T2"));
        assert_eq!(store.get(), Some(SessionToken::new("T2")));

        store.clear();
        assert!(store.get().is_none());
        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clones_share_slot() {
        let store = MemoryTokenStore::with_token(SessionToken::new("T1"));
        let other = store.clone();

        other.clear();
        assert!(store.get().is_none());
    }
}
