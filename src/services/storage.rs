use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use crate::models::{Match, NewMatch, Property, PropertyUpdate, Requirement, UnknownVariant};

/// Errors that can occur in the storage collaborator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt record: {0}")]
    CorruptRecord(#[from] UnknownVariant),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Persistence operations the matching engine depends on.
///
/// Implementations must enforce uniqueness of (property_id, requirement_id)
/// on match insertion; the engine relies on it for duplicate safety under
/// concurrent runs.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get_property(&self, id: &str) -> Result<Option<Property>, StoreError>;

    /// Active requirements whose `budget_max >= min_budget`
    async fn find_active_requirements(&self, min_budget: Decimal) -> Result<Vec<Requirement>, StoreError>;

    /// Insert matches, skipping pairs that already exist. Returns the number
    /// of rows actually inserted.
    async fn insert_matches_ignoring_duplicates(&self, matches: &[NewMatch]) -> Result<u64, StoreError>;

    /// Fails with [`StoreError::NotFound`] when the property does not exist
    async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<(), StoreError>;

    /// Matches on properties owned by `owner_id`, newest first
    async fn list_matches_for_owner(&self, owner_id: &str) -> Result<Vec<Match>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
