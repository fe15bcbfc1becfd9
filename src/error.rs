use thiserror::Error;

/// Errors surfaced by `UserStore` implementations. Handlers translate these
/// into flash messages or JSON bodies at the route boundary; nothing retries.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
