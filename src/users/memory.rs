use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::users::{Donor, NewUser, User, UserStore};

/// In-memory store behind `AppState::in_memory()`. Same contract as the
/// Postgres store, including the duplicate-email failure.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    records: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.records.read().await.get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            email: user.email,
            password_hash: user.password_hash,
            username: user.username,
            mobile: user.mobile,
            blood_group: user.blood_group,
            hometown: user.hometown,
            last_donation: None,
            created_at: OffsetDateTime::now_utc(),
        };
        records.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.get_mut(&user.email) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .map(|user| Donor {
                username: user.username.clone(),
                blood_group: user.blood_group.clone(),
                mobile: user.mobile.clone(),
                last_donation: user.last_donation,
            })
            .collect())
    }
}
