use axum::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::users::{Donor, NewUser, User};

/// Persistence seam for donor records. Handlers only ever see this trait; the
/// concrete store is injected through `AppState`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `DuplicateEmail` if the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Full replacement of a previously loaded record. Last writer wins; no
    /// optimistic concurrency check.
    async fn update(&self, user: &User) -> Result<(), StoreError>;

    /// Donor-list projection over every record.
    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT email, password_hash, username, mobile, blood_group, hometown,
                   last_donation, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, username, mobile, blood_group, hometown)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING email, password_hash, username, mobile, blood_group, hometown,
                      last_donation, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.username)
        .bind(&user.mobile)
        .bind(&user.blood_group)
        .bind(&user.hometown)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(inserted)
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, mobile = $3, blood_group = $4, hometown = $5,
                last_donation = $6
            WHERE email = $1
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.mobile)
        .bind(&user.blood_group)
        .bind(&user.hometown)
        .bind(user.last_donation)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_donors(&self) -> Result<Vec<Donor>, StoreError> {
        let donors = sqlx::query_as::<_, Donor>(
            r#"
            SELECT username, blood_group, mobile, last_donation
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(donors)
    }
}

/// Postgres reports a primary-key clash as SQLSTATE 23505.
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        if db.code().as_deref() == Some("23505") {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(err)
}
