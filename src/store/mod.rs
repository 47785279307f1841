//! Durable record storage
//!
//! The service treats its document store as an external collaborator behind
//! async traits; [`MemoryStore`] is the in-process implementation.

mod memory;
mod records;

pub use memory::MemoryStore;
pub use records::*;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Lookup and mutation of user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. Fails with `AccountConflict` when the username or
    /// email is already taken.
    async fn create_user(&self, new: NewUser) -> Result<UserRecord>;

    /// Find by username or email.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<UserRecord>>;

    /// All users, ordered by last name.
    async fn list_users(&self) -> Result<Vec<UserRecord>>;

    /// Apply a profile update; `None` when no such user exists.
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<Option<UserRecord>>;

    async fn approve_user(&self, id: Uuid) -> Result<Option<UserRecord>>;

    async fn delete_user(&self, id: Uuid) -> Result<bool>;

    async fn set_password_hash(&self, id: Uuid, hash: String) -> Result<bool>;

    /// Set or clear the password-reset token.
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: Option<(String, DateTime<Utc>)>,
    ) -> Result<bool>;

    async fn count_users(&self) -> Result<usize>;
}

/// Training-record storage.
#[async_trait]
pub trait TrainingStore: Send + Sync {
    async fn create_training(&self, new: NewTraining) -> Result<TrainingRecord>;

    async fn get_training(&self, id: Uuid) -> Result<Option<TrainingRecord>>;

    /// List with filtering applied before pagination, so totals and page
    /// counts are correct for the restricted view.
    async fn list_trainings(&self, query: &TrainingQuery) -> Result<TrainingPage>;

    async fn update_training(
        &self,
        id: Uuid,
        update: TrainingUpdate,
    ) -> Result<Option<TrainingRecord>>;

    async fn delete_training(&self, id: Uuid) -> Result<bool>;
}

/// Offices and training-title taxonomies.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    async fn list_offices(&self) -> Result<Vec<TaxonomyEntry>>;
    async fn add_office(&self, name: &str) -> Result<TaxonomyEntry>;
    async fn delete_office(&self, id: Uuid) -> Result<bool>;

    async fn list_training_titles(&self) -> Result<Vec<TaxonomyEntry>>;
    async fn add_training_title(&self, name: &str) -> Result<TaxonomyEntry>;
    async fn delete_training_title(&self, id: Uuid) -> Result<bool>;
}
