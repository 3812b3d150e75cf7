//! Shared application state injected into handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::db;
use crate::media::{FsMediaStore, MediaStore};
use crate::store::memory::MemoryStore;
use crate::store::postgres::PgStore;
use crate::store::{MessageStore, ProjectStore};

#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectStore>,
    pub messages: Arc<dyn MessageStore>,
    pub media: Arc<dyn MediaStore>,
    pub upload_dir: PathBuf,
}

impl AppState {
    /// State backed entirely by in-memory stores and the given upload
    /// directory. Used when no database is configured, and by tests.
    pub fn in_memory(upload_dir: impl Into<PathBuf>) -> Self {
        let upload_dir = upload_dir.into();
        let store = Arc::new(MemoryStore::new());
        Self {
            projects: store.clone(),
            messages: store,
            media: Arc::new(FsMediaStore::new(upload_dir.clone())),
            upload_dir,
        }
    }

    /// Builds state from the environment: Postgres stores when DATABASE_URL
    /// is set and reachable, in-memory stores otherwise.
    pub async fn from_env() -> Self {
        let media = FsMediaStore::from_env();
        let upload_dir = media.dir().to_path_buf();

        if std::env::var("DATABASE_URL").is_ok() {
            match db::init_pool(None).await {
                Ok(pool) => {
                    if let Err(e) = db::run_migrations(&pool).await {
                        tracing::error!("Failed to run database migrations: {}", e);
                    }
                    let store = Arc::new(PgStore::new(pool));
                    return Self {
                        projects: store.clone(),
                        messages: store,
                        media: Arc::new(media),
                        upload_dir,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize database pool: {}. Falling back to in-memory store.",
                        e
                    );
                }
            }
        } else {
            tracing::info!("DATABASE_URL not set. Using in-memory store.");
        }

        let store = Arc::new(MemoryStore::new());
        Self {
            projects: store.clone(),
            messages: store,
            media: Arc::new(media),
            upload_dir,
        }
    }
}
