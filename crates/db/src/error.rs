use spotlight_core::error::CoreError;

/// Error type for repository operations that enforce domain invariants
/// mid-transaction (ownership checks, overlap detection, selection).
///
/// Plain CRUD methods return `sqlx::Error` directly; this type exists for
/// the operations that can fail for domain reasons discovered only after
/// the transaction has started.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;
