//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::TenantDb;
use crate::services::tasks::TaskQueue;

/// Application state shared across all handlers.
///
/// Cheap to clone; the contents live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    db: TenantDb,
    tasks: TaskQueue,
}

impl AppState {
    /// Assemble the state from its parts.
    #[must_use]
    pub fn new(config: AppConfig, db: TenantDb, tasks: TaskQueue) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db, tasks }),
        }
    }

    /// Process-wide configuration, read-only after startup.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Tenant-aware database handle.
    #[must_use]
    pub fn db(&self) -> &TenantDb {
        &self.inner.db
    }

    /// Background task queue for fire-and-forget work.
    #[must_use]
    pub fn tasks(&self) -> &TaskQueue {
        &self.inner.tasks
    }
}
