//! Persistence behind store traits so the backing medium is swappable.
//!
//! Two backends exist: [`postgres::PgStore`] when DATABASE_URL is set, and
//! [`memory::MemoryStore`] otherwise (also the test double).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::db::models::{ContactMessage, NewContactMessage, NewProject, Project, ProjectUpdate};

/// Error from a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// CRUD persistence for project records.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert(&self, new: NewProject) -> Result<Project, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<Project>, StoreError>;

    /// All projects, optionally filtered by exact category match.
    async fn list(&self, category: Option<&str>) -> Result<Vec<Project>, StoreError>;

    /// Applies the fully-resolved update. Returns None if the id is absent.
    async fn update(&self, id: i32, update: ProjectUpdate) -> Result<Option<Project>, StoreError>;

    /// Returns true if a record was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Backend reachability probe for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Append/read persistence for contact submissions. No mutation or deletion.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, new: NewContactMessage) -> Result<ContactMessage, StoreError>;

    async fn list(&self) -> Result<Vec<ContactMessage>, StoreError>;
}
