use std::collections::HashMap;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use tokio::sync::RwLock;
use tracing::debug;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sid";

/// 32 bytes of OS entropy per token.
const TOKEN_BYTES: usize = 32;

/// Identity cached for a logged-in donor.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
    pub username: String,
}

/// Process-wide map from opaque session tokens to identities. Held only in
/// memory: a restart logs everyone out.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionUser>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `user`.
    pub async fn create(&self, user: SessionUser) -> String {
        let token = mint_token();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), user);
        debug!(active = sessions.len(), "session created");
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionUser> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Refresh the cached username after a profile edit.
    pub async fn update_username(&self, token: &str, username: &str) {
        if let Some(user) = self.sessions.write().await.get_mut(token) {
            user.username = username.to_string();
        }
    }

    /// Invalidate `token`. Destroying an unknown token is a no-op.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
        debug!(active = sessions.len(), "session destroyed");
    }
}

/// URL-safe base64 over OS randomness; unguessable and cookie-safe.
fn mint_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionUser {
        SessionUser {
            email: "karim@example.com".into(),
            username: "Karim".into(),
        }
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let first = mint_token();
        let second = mint_token();
        assert_ne!(first, second);
        // 32 bytes of entropy encode to 43 unpadded base64 characters.
        assert!(first.len() >= 43);
    }

    #[tokio::test]
    async fn create_then_get_returns_the_identity() {
        let store = SessionStore::new();
        let token = store.create(identity()).await;

        let user = store.get(&token).await.expect("session should exist");
        assert_eq!(user.email, "karim@example.com");
        assert_eq!(user.username, "Karim");
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_nothing() {
        let store = SessionStore::new();
        assert!(store.get("no-such-token").await.is_none());
    }

    #[tokio::test]
    async fn destroy_invalidates_and_is_idempotent() {
        let store = SessionStore::new();
        let token = store.create(identity()).await;

        store.destroy(&token).await;
        assert!(store.get(&token).await.is_none());

        // A second destroy must not panic or resurrect anything.
        store.destroy(&token).await;
        assert!(store.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn update_username_is_visible_on_next_get() {
        let store = SessionStore::new();
        let token = store.create(identity()).await;

        store.update_username(&token, "Karim Chowdhury").await;
        let user = store.get(&token).await.unwrap();
        assert_eq!(user.username, "Karim Chowdhury");
    }

    #[tokio::test]
    async fn sessions_for_different_tokens_are_independent() {
        let store = SessionStore::new();
        let first = store.create(identity()).await;
        let second = store
            .create(SessionUser {
                email: "salma@example.com".into(),
                username: "Salma".into(),
            })
            .await;

        store.destroy(&first).await;
        assert!(store.get(&first).await.is_none());
        assert_eq!(store.get(&second).await.unwrap().username, "Salma");
    }
}
